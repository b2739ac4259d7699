pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod executor;
pub mod feed;
pub mod grader;
pub mod leaderboard;
pub mod scoring;
pub mod store;
pub mod ws_api;

pub use config::{EngineConfig, ExecutionConfig, FeedConfig, LeaderboardBackend, LeaderboardConfig};
pub use engine::ContestEngine;
pub use error::{EngineError, Result};
pub use events::{EventBroadcaster, EventStream, ScoreEvent};
pub use executor::HttpExecutionClient;
pub use feed::{FeedSession, FeedState, LeaderboardFeed};
pub use grader::{Grader, TestScope};
pub use leaderboard::{LeaderboardStore, MemoryLeaderboard, RedisLeaderboard};
pub use scoring::{ProgressOutcome, ScoringReconciler, SubmitOutcome};
pub use store::{ContestStore, MemoryContestStore};
