use std::collections::HashMap;

use arena_core::domain::{ContestId, RankedMember, Score, UserId};
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{LeaderboardStore, Result};

/// Process-local leaderboard. Ties are ordered by ascending user id.
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    boards: RwLock<HashMap<ContestId, HashMap<UserId, f64>>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardStore for MemoryLeaderboard {
    async fn set_score(&self, contest_id: ContestId, user_id: UserId, score: Score) -> Result<()> {
        let mut boards = self.boards.write().await;
        boards
            .entry(contest_id)
            .or_default()
            .insert(user_id, score.as_rank());
        Ok(())
    }

    async fn increment_score(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        delta: i64,
    ) -> Result<Score> {
        let mut boards = self.boards.write().await;
        let value = boards
            .entry(contest_id)
            .or_default()
            .entry(user_id)
            .or_insert(0.0);
        *value = (*value + delta as f64).max(0.0);
        Ok(Score::from_rank(*value))
    }

    async fn top_n(
        &self,
        contest_id: ContestId,
        limit: Option<usize>,
    ) -> Result<Vec<RankedMember>> {
        let boards = self.boards.read().await;
        let Some(board) = boards.get(&contest_id) else {
            return Ok(Vec::new());
        };

        let mut members: Vec<(UserId, f64)> =
            board.iter().map(|(user_id, value)| (*user_id, *value)).collect();
        members.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(members
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(user_id, value)| RankedMember {
                user_id,
                score: Score::from_rank(value),
            })
            .collect())
    }

    async fn remove(&self, contest_id: ContestId) -> Result<()> {
        self.boards.write().await.remove(&contest_id);
        Ok(())
    }
}
