//! Dashboard API endpoints.

use api_types::dashboard::{ActivityKind, ActivityQuery, ActivityView, DashboardStatsView};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};

fn kind_view(kind: engine::ActivityKind) -> ActivityKind {
    match kind {
        engine::ActivityKind::Receipt => ActivityKind::Receipt,
        engine::ActivityKind::Cost => ActivityKind::Cost,
        engine::ActivityKind::ManualDistribution => ActivityKind::ManualDistribution,
        engine::ActivityKind::FundTransfer => ActivityKind::FundTransfer,
    }
}

pub async fn stats(
    State(state): State<ServerState>,
) -> Result<Json<DashboardStatsView>, ServerError> {
    let stats = state.engine.dashboard_stats().await?;
    Ok(Json(DashboardStatsView {
        total_receipts_minor: stats.total_receipts_minor,
        total_costs_minor: stats.total_costs_minor,
        net_balance_minor: stats.net_balance_minor,
        unallocated_minor: stats.unallocated_minor,
        sponsors: stats.sponsors,
        active_funds: stats.active_funds,
        receipts: stats.receipts,
        costs: stats.costs,
        active_percentage_bp: stats.active_percentage_bp,
    }))
}

/// Recent receipts, costs, manual distributions and transfers, newest first.
pub async fn activity(
    State(state): State<ServerState>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityView>>, ServerError> {
    let entries = state.engine.recent_activity(query.limit).await?;
    Ok(Json(
        entries
            .into_iter()
            .map(|entry| ActivityView {
                kind: kind_view(entry.kind),
                id: entry.id,
                date: entry.date,
                amount_minor: entry.amount_minor,
                description: entry.description,
                created_at: entry.created_at,
            })
            .collect(),
    ))
}
