//! 排行榜存储。
//!
//! 每场比赛对应一个有序集合，成员为用户 ID，分值为当前权威分数。

mod memory;
mod redis_board;

use arena_core::domain::{ContestId, RankedMember, Score, UserId};
use async_trait::async_trait;

pub use memory::MemoryLeaderboard;
pub use redis_board::RedisLeaderboard;

type Result<T> = anyhow::Result<T>;

#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// 用权威分数覆盖成员当前分值。
    async fn set_score(&self, contest_id: ContestId, user_id: UserId, score: Score) -> Result<()>;

    /// 按增量调整分值，返回调整后的分数（下限为 0）。
    async fn increment_score(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        delta: i64,
    ) -> Result<Score>;

    /// 按分数降序返回成员。`limit` 为 `None` 时返回全部。
    async fn top_n(&self, contest_id: ContestId, limit: Option<usize>)
    -> Result<Vec<RankedMember>>;

    /// 删除整场比赛的排行榜。
    async fn remove(&self, contest_id: ContestId) -> Result<()>;
}
