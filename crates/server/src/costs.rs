//! Costs API endpoints.

use api_types::cost::{CostListQuery, CostNew, CostUpdate, CostView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Cost, DateRange};
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(cost: Cost) -> CostView {
    CostView {
        id: cost.id,
        amount_minor: cost.amount_minor,
        date: cost.date,
        category_id: cost.category_id,
        nomenclature_id: cost.nomenclature_id,
        fund_id: cost.fund_id,
        description: cost.description,
        created_at: cost.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CostNew>,
) -> Result<(StatusCode, Json<CostView>), ServerError> {
    let cost = state
        .engine
        .create_cost(engine::CostNew {
            amount_minor: payload.amount_minor,
            date: payload.date,
            category_id: payload.category_id,
            nomenclature_id: payload.nomenclature_id,
            fund_id: payload.fund_id,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(cost))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CostView>, ServerError> {
    Ok(Json(view(state.engine.cost(id).await?)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<CostListQuery>,
) -> Result<Json<Vec<CostView>>, ServerError> {
    let costs = state
        .engine
        .list_costs(DateRange::new(query.from, query.to), query.category_id)
        .await?;
    Ok(Json(costs.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CostUpdate>,
) -> Result<Json<CostView>, ServerError> {
    let cmd = engine::CostUpdate {
        amount_minor: payload.amount_minor,
        date: payload.date,
        category_id: payload.category_id,
        nomenclature_id: payload.nomenclature_id,
        fund_id: payload.fund_id,
        description: payload.description,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(view(state.engine.update_cost(id, cmd).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_cost(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
