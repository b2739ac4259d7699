//! 比赛评测与排行榜 API 路由。

use std::sync::Arc;

use arena_api_types::{
    CodeRequest, LeaderboardResponse, ProgressRequest, ProgressResponse, RebuildResponse,
    SubmissionSummary, SubmitResponse,
};
use arena_core::domain::{ContestId, QuestionId, RunResult, UserId};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use super::error::ApiError;
use super::state::AppState;

/// 创建比赛相关 API 路由。
pub fn create_contest_router() -> Router<Arc<AppState>> {
    Router::new()
        // 开始作答
        .route(
            "/api/contests/{contest_id}/participants/{user_id}/start",
            post(start),
        )
        // 保存单题进度
        .route(
            "/api/contests/{contest_id}/participants/{user_id}/progress",
            post(save_progress),
        )
        // 针对可见用例试运行
        .route(
            "/api/contests/{contest_id}/participants/{user_id}/questions/{question_id}/run",
            post(run_code),
        )
        // 针对全部用例评分
        .route(
            "/api/contests/{contest_id}/participants/{user_id}/questions/{question_id}/submit",
            post(submit_code),
        )
        // 最终交卷
        .route(
            "/api/contests/{contest_id}/participants/{user_id}/finish",
            post(finish),
        )
        // 排行榜读取与删除
        .route(
            "/api/contests/{contest_id}/leaderboard",
            get(leaderboard).delete(remove_leaderboard),
        )
        // 从提交记录重建排行榜
        .route(
            "/api/contests/{contest_id}/leaderboard/rebuild",
            post(rebuild_leaderboard),
        )
}

async fn start(
    State(state): State<Arc<AppState>>,
    Path((contest_id, user_id)): Path<(ContestId, UserId)>,
) -> Result<Json<SubmissionSummary>, ApiError> {
    let submission = state.engine.start(contest_id, user_id).await?;
    Ok(Json(SubmissionSummary::from(&submission)))
}

async fn save_progress(
    State(state): State<Arc<AppState>>,
    Path((contest_id, user_id)): Path<(ContestId, UserId)>,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let outcome = state
        .engine
        .save_progress(contest_id, user_id, request.question_id, request.answer)
        .await?;
    Ok(Json(ProgressResponse {
        question_id: outcome.question_id,
        score: outcome.score,
    }))
}

async fn run_code(
    State(state): State<Arc<AppState>>,
    Path((_contest_id, _user_id, question_id)): Path<(ContestId, UserId, QuestionId)>,
    Json(request): Json<CodeRequest>,
) -> Result<Json<RunResult>, ApiError> {
    let result = state
        .engine
        .run_code(question_id, &request.source_code, request.language_id)
        .await?;
    Ok(Json(result))
}

async fn submit_code(
    State(state): State<Arc<AppState>>,
    Path((contest_id, user_id, question_id)): Path<(ContestId, UserId, QuestionId)>,
    Json(request): Json<CodeRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let outcome = state
        .engine
        .submit_code(
            contest_id,
            user_id,
            question_id,
            request.source_code,
            request.language_id,
        )
        .await?;
    Ok(Json(SubmitResponse {
        result: outcome.result,
        change: outcome.change,
        score: outcome.score,
    }))
}

async fn finish(
    State(state): State<Arc<AppState>>,
    Path((contest_id, user_id)): Path<(ContestId, UserId)>,
) -> Result<Json<SubmissionSummary>, ApiError> {
    let submission = state.engine.finish(contest_id, user_id).await?;
    Ok(Json(SubmissionSummary::from(&submission)))
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Path(contest_id): Path<ContestId>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let leaderboard = state.engine.leaderboard(contest_id).await?;
    Ok(Json(LeaderboardResponse {
        contest_id,
        leaderboard,
    }))
}

async fn remove_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(contest_id): Path<ContestId>,
) -> Result<StatusCode, ApiError> {
    state.engine.remove_contest(contest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn rebuild_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(contest_id): Path<ContestId>,
) -> Result<Json<RebuildResponse>, ApiError> {
    let ranked = state.engine.rebuild_leaderboard(contest_id).await?;
    Ok(Json(RebuildResponse { ranked }))
}
