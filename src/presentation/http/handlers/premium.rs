//! Premium Handlers

use axum::{
    extract::{Extension, State},
    Json,
};

use crate::application::dto::request::SubscribeRequest;
use crate::application::dto::response::{PlansResponse, PremiumStatusResponse};
use crate::application::services::PremiumService;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Plans on offer
pub async fn plans(State(state): State<AppState>) -> Json<PlansResponse> {
    Json(PlansResponse {
        plans: state.premium_service().plans(),
    })
}

pub async fn status(Extension(auth): Extension<AuthUser>) -> Json<PremiumStatusResponse> {
    Json(PremiumStatusResponse::from(&auth.user))
}

/// Subscribe to (or extend) a plan
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SubscribeRequest>,
) -> Result<Json<PremiumStatusResponse>, AppError> {
    let user = state
        .premium_service()
        .subscribe(auth.user_id, body.plan)
        .await?;

    tracing::info!(user_id = user.id, plan = body.plan.as_str(), "Premium subscription");
    Ok(Json(PremiumStatusResponse::from(&user)))
}

pub async fn cancel(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<PremiumStatusResponse>, AppError> {
    let user = state.premium_service().cancel(auth.user_id).await?;
    tracing::info!(user_id = user.id, "Premium cancelled");
    Ok(Json(PremiumStatusResponse::from(&user)))
}
