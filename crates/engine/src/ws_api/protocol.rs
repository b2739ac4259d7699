use arena_core::domain::{ContestId, LeaderboardEntry};
use serde::{Deserialize, Serialize};

/// 客户端发送的 WebSocket 消息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// 订阅某场比赛的排行榜，会取消当前订阅。
    SubscribeLeaderboard { payload: SubscribePayload },
    /// 取消当前订阅。
    UnsubscribeLeaderboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribePayload {
    pub contest_id: ContestId,
}

/// 服务端发送的 WebSocket 消息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// 排行榜完整快照。
    LeaderboardUpdate { payload: LeaderboardPayload },
    /// 请求无法处理。
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPayload {
    pub contest_id: ContestId,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl ServerMessage {
    pub fn update(contest_id: ContestId, leaderboard: Vec<LeaderboardEntry>) -> Self {
        Self::LeaderboardUpdate {
            payload: LeaderboardPayload {
                contest_id,
                leaderboard,
            },
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }
}
