//! Receipts API endpoints.
//!
//! Creating a receipt also distributes it across the active funds, so the
//! create/get/update responses carry the distributions.

use api_types::receipt::{
    DistributionView, ReceiptDetailView, ReceiptListQuery, ReceiptNew, ReceiptUpdate, ReceiptView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{DateRange, FundDistribution, Receipt, ReceiptDetail};
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(receipt: Receipt) -> ReceiptView {
    ReceiptView {
        id: receipt.id,
        amount_minor: receipt.amount_minor,
        date: receipt.date,
        sponsor_id: receipt.sponsor_id,
        description: receipt.description,
        created_at: receipt.created_at,
    }
}

fn distribution_view(distribution: FundDistribution) -> DistributionView {
    DistributionView {
        id: distribution.id,
        fund_id: distribution.fund_id,
        percentage_bp: distribution.percentage_bp,
        amount_minor: distribution.amount_minor,
    }
}

fn detail_view(detail: ReceiptDetail) -> ReceiptDetailView {
    let undistributed_minor = detail.undistributed_minor();
    ReceiptDetailView {
        receipt: view(detail.receipt),
        distributions: detail
            .distributions
            .into_iter()
            .map(distribution_view)
            .collect(),
        undistributed_minor,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReceiptNew>,
) -> Result<(StatusCode, Json<ReceiptDetailView>), ServerError> {
    let detail = state
        .engine
        .create_receipt(engine::ReceiptNew {
            amount_minor: payload.amount_minor,
            date: payload.date,
            sponsor_id: payload.sponsor_id,
            description: payload.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(detail_view(detail))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReceiptDetailView>, ServerError> {
    Ok(Json(detail_view(state.engine.receipt(id).await?)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReceiptListQuery>,
) -> Result<Json<Vec<ReceiptView>>, ServerError> {
    let receipts = state
        .engine
        .list_receipts(DateRange::new(query.from, query.to), query.sponsor_id)
        .await?;
    Ok(Json(receipts.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceiptUpdate>,
) -> Result<Json<ReceiptDetailView>, ServerError> {
    let cmd = engine::ReceiptUpdate {
        amount_minor: payload.amount_minor,
        date: payload.date,
        sponsor_id: payload.sponsor_id,
        description: payload.description,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(detail_view(state.engine.update_receipt(id, cmd).await?)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_receipt(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
