use arena_core::domain::{ContestId, Score, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::RecvError;

/// 评分子系统对外广播的事件类型。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreEvent {
    /// 参赛者的权威分数已写入排行榜。
    ScoreChanged {
        contest_id: ContestId,
        user_id: UserId,
        score: Score,
    },
    /// 比赛的排行榜被整体重建或删除。
    LeaderboardReset { contest_id: ContestId },
}

impl ScoreEvent {
    pub fn contest_id(&self) -> ContestId {
        match self {
            ScoreEvent::ScoreChanged { contest_id, .. }
            | ScoreEvent::LeaderboardReset { contest_id } => *contest_id,
        }
    }
}

/// 基于 `tokio::broadcast` 的事件广播器。
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<ScoreEvent>,
}

impl EventBroadcaster {
    /// 创建事件广播器。
    ///
    /// `capacity` 表示内部广播队列容量。
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// 广播一个事件。没有订阅者时直接丢弃。
    pub fn emit(&self, event: ScoreEvent) {
        let _ = self.sender.send(event);
    }

    /// 订阅事件流。
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

/// 事件接收流包装器。
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<ScoreEvent>,
}

impl EventStream {
    /// 异步接收下一条事件。
    pub async fn recv(&mut self) -> Result<ScoreEvent, RecvError> {
        self.receiver.recv().await
    }
}
