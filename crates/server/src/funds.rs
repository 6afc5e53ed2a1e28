//! Funds API endpoints.

use api_types::fund::{FundListQuery, FundNew, FundUpdate, FundView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::Fund;
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(fund: Fund) -> FundView {
    FundView {
        id: fund.id,
        name: fund.name,
        percentage_bp: fund.percentage_bp,
        active: fund.active,
        description: fund.description,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FundNew>,
) -> Result<(StatusCode, Json<FundView>), ServerError> {
    let fund = state
        .engine
        .create_fund(engine::FundNew {
            name: payload.name,
            percentage_bp: payload.percentage_bp,
            active: payload.active.unwrap_or(true),
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(fund))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FundView>, ServerError> {
    Ok(Json(view(state.engine.fund(id).await?)))
}

/// Active funds; inactive ones too with `include_inactive=true`.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FundListQuery>,
) -> Result<Json<Vec<FundView>>, ServerError> {
    let funds = state
        .engine
        .list_funds(query.include_inactive.unwrap_or(false))
        .await?;
    Ok(Json(funds.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FundUpdate>,
) -> Result<Json<FundView>, ServerError> {
    let cmd = engine::FundUpdate {
        name: payload.name,
        percentage_bp: payload.percentage_bp,
        active: payload.active,
        description: payload.description,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(view(state.engine.update_fund(id, cmd).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_fund(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
