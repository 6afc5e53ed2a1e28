//! Unallocated balance and manual fund distributions endpoints.

use api_types::{
    distribution::{
        FundMovementQuery, ManualDistributionNew, ManualDistributionUpdate, ManualDistributionView,
    },
    fund::UnallocatedView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{DateRange, ManualDistribution};
use uuid::Uuid;

use crate::{ServerError, ensure_not_empty, server::ServerState};

fn view(distribution: ManualDistribution) -> ManualDistributionView {
    ManualDistributionView {
        id: distribution.id,
        fund_id: distribution.fund_id,
        amount_minor: distribution.amount_minor,
        date: distribution.date,
        note: distribution.note,
        created_at: distribution.created_at,
    }
}

pub async fn unallocated(
    State(state): State<ServerState>,
) -> Result<Json<UnallocatedView>, ServerError> {
    let balance = state.engine.unallocated_balance().await?;
    Ok(Json(UnallocatedView {
        receipts_minor: balance.receipts_minor,
        auto_distributed_minor: balance.auto_distributed_minor,
        manual_distributed_minor: balance.manual_distributed_minor,
        unallocated_minor: balance.unallocated_minor(),
        can_distribute: balance.can_distribute(),
    }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ManualDistributionNew>,
) -> Result<(StatusCode, Json<ManualDistributionView>), ServerError> {
    let distribution = state
        .engine
        .create_manual_distribution(engine::ManualDistributionNew {
            fund_id: payload.fund_id,
            amount_minor: payload.amount_minor,
            date: payload.date,
            note: payload.note,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view(distribution))))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ManualDistributionView>, ServerError> {
    Ok(Json(view(state.engine.manual_distribution(id).await?)))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<FundMovementQuery>,
) -> Result<Json<Vec<ManualDistributionView>>, ServerError> {
    let distributions = state
        .engine
        .list_manual_distributions(DateRange::new(query.from, query.to), query.fund_id)
        .await?;
    Ok(Json(distributions.into_iter().map(view).collect()))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ManualDistributionUpdate>,
) -> Result<Json<ManualDistributionView>, ServerError> {
    let cmd = engine::ManualDistributionUpdate {
        fund_id: payload.fund_id,
        amount_minor: payload.amount_minor,
        date: payload.date,
        note: payload.note,
    };
    ensure_not_empty(cmd.is_empty())?;

    Ok(Json(view(
        state.engine.update_manual_distribution(id, cmd).await?,
    )))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_manual_distribution(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
