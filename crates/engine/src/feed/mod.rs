//! Live Feed Dispatcher。
//!
//! 每个连接持有一个 [`FeedSession`]，订阅后立即推送一次排行榜快照，
//! 之后按固定间隔轮询，并在收到同一比赛的分数事件时提前推送。

mod session;

use std::sync::Arc;
use std::time::Duration;

use arena_core::domain::{ContestId, LeaderboardEntry, UserId};

pub use session::{FeedSession, FeedState};

use crate::error::Result;
use crate::events::EventBroadcaster;
use crate::leaderboard::LeaderboardStore;
use crate::store::ContestStore;

pub struct LeaderboardFeed {
    leaderboard: Arc<dyn LeaderboardStore>,
    store: Arc<dyn ContestStore>,
    events: Arc<EventBroadcaster>,
    poll_interval: Duration,
}

impl LeaderboardFeed {
    pub fn new(
        leaderboard: Arc<dyn LeaderboardStore>,
        store: Arc<dyn ContestStore>,
        events: Arc<EventBroadcaster>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            leaderboard,
            store,
            events,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// 读取完整的降序排行，并补全展示名。没有展示名的成员使用其 ID。
    pub async fn snapshot(&self, contest_id: ContestId) -> Result<Vec<LeaderboardEntry>> {
        let ranked = self.leaderboard.top_n(contest_id, None).await?;
        let user_ids: Vec<UserId> = ranked.iter().map(|member| member.user_id).collect();
        let names = self.store.display_names(&user_ids).await?;

        Ok(ranked
            .into_iter()
            .map(|member| LeaderboardEntry {
                participant_id: member.user_id,
                identity: names
                    .get(&member.user_id)
                    .cloned()
                    .unwrap_or_else(|| member.user_id.to_string()),
                score: member.score,
            })
            .collect())
    }

    pub fn session(self: &Arc<Self>) -> FeedSession {
        FeedSession::new(self.clone())
    }
}
