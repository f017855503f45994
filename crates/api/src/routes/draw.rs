//! Draw endpoint handler.

use std::sync::Arc;

use axum::{extract::State, Json};
use domain::models::DrawResponse;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::services::draw::DrawService;
use crate::services::email::EmailNotifier;

/// POST /api/v1/draw
///
/// Draws a receiver for the authenticated caller. Re-entry returns the
/// existing assignment instead of drawing again.
pub async fn draw_name(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<DrawResponse>, ApiError> {
    let notifier = Arc::new(EmailNotifier::new(state.pool.clone()));
    let service = DrawService::new(state.pool.clone(), notifier);
    let response = service.draw(&caller.email).await?;

    tracing::info!(
        giver = %caller.email,
        already_assigned = response.already_assigned,
        "Draw completed"
    );
    Ok(Json(response))
}
