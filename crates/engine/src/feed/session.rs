use std::sync::Arc;

use arena_core::domain::ContestId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::LeaderboardFeed;
use crate::events::RecvError;
use crate::ws_api::{ClientMessage, ServerMessage};

const UPDATE_BUFFER: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Idle,
    Polling(ContestId),
}

struct Subscription {
    contest_id: ContestId,
    updates: mpsc::Receiver<ServerMessage>,
    task: JoinHandle<()>,
}

/// 单个连接的订阅状态机：`Idle` ⇄ `Polling(contest)`。
///
/// 轮询任务的输出只经由当前订阅的通道流出，切换或取消订阅时该通道随之
/// 丢弃，因此旧比赛的快照不会再被推送。
pub struct FeedSession {
    feed: Arc<LeaderboardFeed>,
    active: Option<Subscription>,
}

impl FeedSession {
    pub fn new(feed: Arc<LeaderboardFeed>) -> Self {
        Self { feed, active: None }
    }

    pub fn state(&self) -> FeedState {
        match &self.active {
            Some(subscription) => FeedState::Polling(subscription.contest_id),
            None => FeedState::Idle,
        }
    }

    /// 处理一条客户端文本消息，返回需要立即回复的消息（如果有）。
    pub fn dispatch(&mut self, raw: &str) -> Option<ServerMessage> {
        match serde_json::from_str::<ClientMessage>(raw) {
            Ok(ClientMessage::SubscribeLeaderboard { payload }) => {
                self.subscribe(payload.contest_id);
                None
            }
            Ok(ClientMessage::UnsubscribeLeaderboard) => {
                self.unsubscribe();
                None
            }
            Err(err) => {
                debug!(error = %err, "rejecting malformed feed message");
                Some(ServerMessage::error(format!("invalid message: {err}")))
            }
        }
    }

    pub fn subscribe(&mut self, contest_id: ContestId) {
        self.unsubscribe();

        let (tx, updates) = mpsc::channel(UPDATE_BUFFER);
        let task = tokio::spawn(poll_loop(self.feed.clone(), contest_id, tx));
        info!(%contest_id, "leaderboard subscription started");
        self.active = Some(Subscription {
            contest_id,
            updates,
            task,
        });
    }

    pub fn unsubscribe(&mut self) {
        if let Some(subscription) = self.active.take() {
            subscription.task.abort();
            info!(contest_id = %subscription.contest_id, "leaderboard subscription stopped");
        }
    }

    /// 等待当前订阅的下一条推送。空闲时永远挂起，适合放进 `select!`。
    pub async fn next_update(&mut self) -> Option<ServerMessage> {
        let Some(subscription) = self.active.as_mut() else {
            return std::future::pending().await;
        };

        let message = subscription.updates.recv().await;
        if message.is_none() {
            self.active = None;
        }
        message
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        if let Some(subscription) = self.active.take() {
            subscription.task.abort();
        }
    }
}

async fn poll_loop(
    feed: Arc<LeaderboardFeed>,
    contest_id: ContestId,
    updates: mpsc::Sender<ServerMessage>,
) {
    let mut ticker = time::interval(feed.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut events = feed.events.subscribe();
    let mut events_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            event = events.recv(), if events_open => match event {
                Ok(event) if event.contest_id() == contest_id => {}
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(%contest_id, skipped, "feed lagged behind score events");
                }
                Err(RecvError::Closed) => {
                    events_open = false;
                    continue;
                }
            },
        }

        match feed.snapshot(contest_id).await {
            Ok(leaderboard) => {
                if updates
                    .send(ServerMessage::update(contest_id, leaderboard))
                    .await
                    .is_err()
                {
                    break;
                }
            }
            Err(err) => warn!(%contest_id, error = %err, "failed to build leaderboard snapshot"),
        }
    }
}
