use anyhow::Context as _;
use arena_core::domain::{ContestId, RankedMember, Score, UserId};
use async_trait::async_trait;
use redis::AsyncCommands as _;
use redis::aio::MultiplexedConnection;
use tracing::warn;

use super::{LeaderboardStore, Result};

/// Sorted-set leaderboard, one key per contest: `{key_prefix}:{contest_id}`.
///
/// Members with equal scores come back in reverse lexicographic order of
/// their user id, which is how `ZREVRANGE` breaks ties.
#[derive(Clone)]
pub struct RedisLeaderboard {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisLeaderboard {
    pub async fn connect(conn_url: &str, key_prefix: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(conn_url).context("invalid redis connection string")?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .context("unable to connect to redis")?;
        Ok(Self {
            conn,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, contest_id: ContestId) -> String {
        board_key(&self.key_prefix, contest_id)
    }
}

/// `ZINCRBY` that never leaves a member below zero.
const INCREMENT_FLOORED: &str = r"
local value = tonumber(redis.call('ZINCRBY', KEYS[1], ARGV[1], ARGV[2]))
if value < 0 then
  redis.call('ZADD', KEYS[1], 0, ARGV[2])
  value = 0
end
return tostring(value)
";

fn board_key(prefix: &str, contest_id: ContestId) -> String {
    format!("{prefix}:{contest_id}")
}

#[async_trait]
impl LeaderboardStore for RedisLeaderboard {
    async fn set_score(&self, contest_id: ContestId, user_id: UserId, score: Score) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .zadd(self.key(contest_id), user_id.to_string(), score.as_rank())
            .await
            .context("ZADD failed")?;
        Ok(())
    }

    async fn increment_score(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        delta: i64,
    ) -> Result<Score> {
        let mut conn = self.conn.clone();
        let value: f64 = redis::Script::new(INCREMENT_FLOORED)
            .key(self.key(contest_id))
            .arg(delta)
            .arg(user_id.to_string())
            .invoke_async(&mut conn)
            .await
            .context("ZINCRBY failed")?;
        Ok(Score::from_rank(value))
    }

    async fn top_n(
        &self,
        contest_id: ContestId,
        limit: Option<usize>,
    ) -> Result<Vec<RankedMember>> {
        let stop = match limit {
            Some(0) => return Ok(Vec::new()),
            Some(n) => isize::try_from(n).map_or(-1, |n| n - 1),
            None => -1,
        };

        let mut conn = self.conn.clone();
        let members: Vec<(String, f64)> = conn
            .zrevrange_withscores(self.key(contest_id), 0, stop)
            .await
            .context("ZREVRANGE failed")?;

        Ok(members
            .into_iter()
            .filter_map(|(member, value)| match member.parse::<UserId>() {
                Ok(user_id) => Some(RankedMember {
                    user_id,
                    score: Score::from_rank(value),
                }),
                Err(_) => {
                    warn!(%contest_id, %member, "skipping non user id leaderboard member");
                    None
                }
            })
            .collect())
    }

    async fn remove(&self, contest_id: ContestId) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(self.key(contest_id))
            .await
            .context("DEL failed")?;
        Ok(())
    }
}
