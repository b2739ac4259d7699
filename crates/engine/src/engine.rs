use std::sync::Arc;

use arena_core::domain::{
    AnswerValue, ContestId, ExecutionClient, LeaderboardEntry, QuestionId, RunResult, Submission,
    UserId,
};
use tracing::info;

use crate::{
    EngineConfig, EngineError, EventBroadcaster, FeedConfig, FeedSession, Grader,
    HttpExecutionClient, LeaderboardBackend, LeaderboardFeed, LeaderboardStore, MemoryLeaderboard,
    ProgressOutcome, RedisLeaderboard, Result, ScoringReconciler, SubmitOutcome,
    store::ContestStore,
};

/// Entry point used by the HTTP and WebSocket layers.
pub struct ContestEngine {
    reconciler: ScoringReconciler,
    feed: Arc<LeaderboardFeed>,
}

impl ContestEngine {
    pub fn new(
        feed_config: &FeedConfig,
        store: Arc<dyn ContestStore>,
        leaderboard: Arc<dyn LeaderboardStore>,
        client: Arc<dyn ExecutionClient>,
    ) -> Self {
        let event_broadcaster = Arc::new(EventBroadcaster::new(feed_config.event_buffer_size));
        let reconciler = ScoringReconciler::new(
            store.clone(),
            leaderboard.clone(),
            Grader::new(client),
            event_broadcaster.clone(),
        );
        let feed = Arc::new(LeaderboardFeed::new(
            leaderboard,
            store,
            event_broadcaster,
            feed_config.poll_interval(),
        ));

        Self { reconciler, feed }
    }

    /// Builds the execution client and leaderboard backend named in `config`.
    pub async fn from_config(config: &EngineConfig, store: Arc<dyn ContestStore>) -> Result<Self> {
        info!(
            execution_url = %config.execution.base_url,
            leaderboard_backend = ?config.leaderboard.backend,
            poll_interval_ms = config.feed.poll_interval_ms,
            "initializing contest engine"
        );

        let client = Arc::new(HttpExecutionClient::new(&config.execution)?);
        let leaderboard: Arc<dyn LeaderboardStore> = match config.leaderboard.backend {
            LeaderboardBackend::Memory => Arc::new(MemoryLeaderboard::new()),
            LeaderboardBackend::Redis => {
                let url = config.leaderboard.redis_url.as_deref().ok_or_else(|| {
                    EngineError::Config(
                        "leaderboard.redis_url is required for the redis backend".to_string(),
                    )
                })?;
                let prefix = config.leaderboard.key_prefix.clone();
                Arc::new(RedisLeaderboard::connect(url, prefix).await?)
            }
        };

        Ok(Self::new(&config.feed, store, leaderboard, client))
    }

    pub async fn start(&self, contest_id: ContestId, user_id: UserId) -> Result<Submission> {
        self.reconciler.start(contest_id, user_id).await
    }

    pub async fn save_progress(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        question_id: QuestionId,
        answer: AnswerValue,
    ) -> Result<ProgressOutcome> {
        self.reconciler
            .save_progress(contest_id, user_id, question_id, answer)
            .await
    }

    pub async fn run_code(
        &self,
        question_id: QuestionId,
        source: &str,
        language_id: i32,
    ) -> Result<RunResult> {
        self.reconciler
            .run_code(question_id, source, language_id)
            .await
    }

    pub async fn submit_code(
        &self,
        contest_id: ContestId,
        user_id: UserId,
        question_id: QuestionId,
        source: String,
        language_id: i32,
    ) -> Result<SubmitOutcome> {
        self.reconciler
            .submit_code(contest_id, user_id, question_id, source, language_id)
            .await
    }

    pub async fn finish(&self, contest_id: ContestId, user_id: UserId) -> Result<Submission> {
        self.reconciler.finish(contest_id, user_id).await
    }

    pub async fn leaderboard(&self, contest_id: ContestId) -> Result<Vec<LeaderboardEntry>> {
        self.feed.snapshot(contest_id).await
    }

    pub async fn rebuild_leaderboard(&self, contest_id: ContestId) -> Result<usize> {
        self.reconciler.rebuild_leaderboard(contest_id).await
    }

    pub async fn remove_contest(&self, contest_id: ContestId) -> Result<()> {
        self.reconciler.remove_contest(contest_id).await
    }

    pub fn feed_session(&self) -> FeedSession {
        self.feed.session()
    }
}
