//! Fund transfers API endpoints.

use api_types::{
    distribution::FundMovementQuery,
    transfer::{FundTransferNew, FundTransferUpdate, FundTransferView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{DateRange, FundTransfer};
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(transfer: FundTransfer) -> FundTransferView {
    FundTransferView {
        id: transfer.id,
        from_fund_id: transfer.from_fund_id,
        to_fund_id: transfer.to_fund_id,
        amount_minor: transfer.amount_minor,
        date: transfer.date,
        note: transfer.note,
        created_at: transfer.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FundTransferNew>,
) -> Result<(StatusCode, Json<FundTransferView>), ServerError> {
    let transfer = state
        .engine
        .create_fund_transfer(engine::FundTransferNew {
            from_fund_id: payload.from_fund_id,
            to_fund_id: payload.to_fund_id,
            amount_minor: payload.amount_minor,
            date: payload.date,
            note: payload.note,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(transfer))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FundTransferView>, ServerError> {
    Ok(Json(view(state.engine.fund_transfer(id).await?)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FundMovementQuery>,
) -> Result<Json<Vec<FundTransferView>>, ServerError> {
    let transfers = state
        .engine
        .list_fund_transfers(DateRange::new(query.from, query.to), query.fund_id)
        .await?;
    Ok(Json(transfers.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FundTransferUpdate>,
) -> Result<Json<FundTransferView>, ServerError> {
    let cmd = engine::FundTransferUpdate {
        from_fund_id: payload.from_fund_id,
        to_fund_id: payload.to_fund_id,
        amount_minor: payload.amount_minor,
        date: payload.date,
        note: payload.note,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(view(state.engine.update_fund_transfer(id, cmd).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_fund_transfer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
