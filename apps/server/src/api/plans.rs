use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use ahorros_core::plans::{
    Evaluation, MonthlyEntry, NewPlan, Plan, PlanInputs, PlanReadout, PlanUpdate, ProgressPoint,
    RecordedMonth,
};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct FinalizeRequest {
    amount: Decimal,
}

#[derive(Deserialize)]
struct EntriesQuery {
    from: Option<i32>,
    to: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletedPlans {
    deleted: usize,
}

async fn evaluate_inputs(
    State(state): State<Arc<AppState>>,
    Json(inputs): Json<PlanInputs>,
) -> ApiResult<Json<Evaluation>> {
    Ok(Json(state.plan_service.evaluate_inputs(&inputs)))
}

async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(new_plan): Json<NewPlan>,
) -> ApiResult<Json<Plan>> {
    let plan = state.plan_service.create_plan(new_plan).await?;
    Ok(Json(plan))
}

async fn get_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Plan>> {
    Ok(Json(state.plan_service.get_plan(&id)?))
}

async fn update_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<PlanUpdate>,
) -> ApiResult<Json<Plan>> {
    let plan = state.plan_service.update_plan(&id, update).await?;
    Ok(Json(plan))
}

async fn list_user_plans(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Plan>>> {
    Ok(Json(state.plan_service.list_plans_for_user(&user_id)?))
}

async fn latest_user_plan(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Plan>> {
    state
        .plan_service
        .get_latest_plan_for_user(&user_id)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn delete_user_plans(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DeletedPlans>> {
    let deleted = state.plan_service.delete_user_data(&user_id).await?;
    Ok(Json(DeletedPlans { deleted }))
}

async fn evaluate_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PlanReadout>> {
    Ok(Json(state.plan_service.evaluate_plan(&id)?))
}

async fn finalize_month(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<FinalizeRequest>,
) -> ApiResult<Json<RecordedMonth>> {
    let recorded = state.plan_service.finalize_month(&id, body.amount).await?;
    Ok(Json(recorded))
}

async fn reset_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Plan>> {
    Ok(Json(state.plan_service.reset_plan(&id).await?))
}

async fn get_entries(
    Path(id): Path<String>,
    Query(range): Query<EntriesQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MonthlyEntry>>> {
    let entries = match (range.from, range.to) {
        (None, None) => state.plan_service.get_entries(&id)?,
        (from, to) => state.plan_service.get_entries_in_range(
            &id,
            from.unwrap_or(i32::MIN),
            to.unwrap_or(i32::MAX),
        )?,
    };
    Ok(Json(entries))
}

async fn get_progress(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProgressPoint>>> {
    Ok(Json(state.plan_service.get_progress(&id)?))
}

async fn export_history(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let csv = state.plan_service.export_history_csv(&id)?;
    let disposition = format!("attachment; filename=\"plan-{}.csv\"", id);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans", post(create_plan))
        .route("/plans/evaluate", post(evaluate_inputs))
        .route("/plans/{id}", get(get_plan).put(update_plan))
        .route("/plans/{id}/evaluation", get(evaluate_plan))
        .route("/plans/{id}/finalize", post(finalize_month))
        .route("/plans/{id}/reset", post(reset_plan))
        .route("/plans/{id}/entries", get(get_entries))
        .route("/plans/{id}/progress", get(get_progress))
        .route("/plans/{id}/export", get(export_history))
        .route(
            "/users/{user_id}/plans",
            get(list_user_plans).delete(delete_user_plans),
        )
        .route("/users/{user_id}/plans/latest", get(latest_user_plan))
}
