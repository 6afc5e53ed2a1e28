//! Reports API endpoints.

use api_types::{
    DateRangeQuery,
    report::{
        ExpenseReportView, FundBalanceReportView, FundBalanceRowView, GroupedReportView,
        ReportGroupView, SponsorReportView,
    },
};
use axum::{
    Json,
    extract::{Query, State},
};
use engine::{DateRange, FundBalanceReport, GroupedReport};

use crate::{ServerError, server::ServerState};

fn grouped_view<K>(report: GroupedReport<K>) -> GroupedReportView<K> {
    GroupedReportView {
        from: report.range.from,
        to: report.range.to,
        groups: report
            .groups
            .into_iter()
            .map(|group| ReportGroupView {
                key: group.key,
                label: group.label,
                count: group.count,
                total_minor: group.total_minor,
                share_bp: group.share_bp,
            })
            .collect(),
        total_minor: report.total_minor,
    }
}

fn fund_balance_view(report: FundBalanceReport) -> FundBalanceReportView {
    FundBalanceReportView {
        from: report.range.from,
        to: report.range.to,
        rows: report
            .rows
            .into_iter()
            .map(|row| FundBalanceRowView {
                balance_minor: row.balance_minor(),
                fund_id: row.fund_id,
                name: row.name,
                active: row.active,
                percentage_bp: row.percentage_bp,
                auto_minor: row.auto_minor,
                manual_minor: row.manual_minor,
                transfers_in_minor: row.transfers_in_minor,
                transfers_out_minor: row.transfers_out_minor,
                costs_minor: row.costs_minor,
            })
            .collect(),
        active_percentage_bp: report.active_percentage_bp,
        difference_bp: report.difference_bp,
        receipts_minor: report.receipts_minor,
        unallocated_minor: report.unallocated_minor,
        total_balance_minor: report.total_balance_minor,
    }
}

fn range(query: DateRangeQuery) -> DateRange {
    DateRange::new(query.from, query.to)
}

/// Costs grouped by expense category.
pub async fn expenses(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ExpenseReportView>, ServerError> {
    let report = state.engine.expense_report(range(query)).await?;
    Ok(Json(grouped_view(report)))
}

/// Receipts grouped by sponsor.
pub async fn sponsors(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<SponsorReportView>, ServerError> {
    let report = state.engine.sponsor_report(range(query)).await?;
    Ok(Json(grouped_view(report)))
}

pub async fn fund_balance(
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<FundBalanceReportView>, ServerError> {
    let report = state.engine.fund_balance_report(range(query)).await?;
    Ok(Json(fund_balance_view(report)))
}
