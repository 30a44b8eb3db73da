//! Run-control endpoints

use axum::{extract::State, response::IntoResponse, Json};
use tracing::info;

use crate::{
    app::AppContext,
    errors::RestResult,
    models::{StartRunRequest, StartRunResponse},
};

/// Start a load-generator run
///
/// At most one run is active at a time; a request while one is active gets
/// a conflict, a target without a valid host gets a bad request. Acceptance
/// never waits for the spawned process.
pub async fn start_run(
    State(ctx): State<AppContext>,
    Json(request): Json<StartRunRequest>,
) -> RestResult<impl IntoResponse> {
    info!("Run requested against {}", request.url);

    ctx.runs.supervisor.start(&request.params, &request.url).await?;
    Ok(Json(StartRunResponse::started()))
}

/// Report the `{running, code}` snapshot of the run slot
pub async fn run_status(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.runs.supervisor.status().await)
}
