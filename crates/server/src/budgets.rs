//! Monthly budget endpoints.

use api_types::budget::{
    BudgetItemView, BudgetMonthResponse, BudgetPut, BudgetReportQuery, BudgetTotalsView,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use engine::{BudgetItem, MoneyCents, MonthReport, parse_month};

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
};

fn view(report: MonthReport) -> BudgetMonthResponse {
    BudgetMonthResponse {
        month: report.month,
        items: report
            .items
            .into_iter()
            .map(|item| BudgetItemView {
                category_id: item.category_id,
                planned: item.planned.to_string(),
                actual: item.actual.to_string(),
                delta: item.delta.to_string(),
            })
            .collect(),
        totals: BudgetTotalsView {
            planned: report.totals.planned.to_string(),
            actual: report.totals.actual.to_string(),
            delta: report.totals.delta.to_string(),
        },
    }
}

/// `PUT /budgets/{month}`: upsert the plan and return the refreshed report.
pub async fn put(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    month: Result<Path<String>, PathRejection>,
    payload: Result<Json<BudgetPut>, JsonRejection>,
) -> Result<Json<BudgetMonthResponse>, ServerError> {
    let Path(month) = month?;
    let Json(payload) = payload?;
    let month = parse_month(&month)?;

    let items = payload
        .items
        .into_iter()
        .map(|item| -> Result<BudgetItem, ServerError> {
            Ok(BudgetItem {
                category_id: item.category_id,
                amount: item.amount.parse::<MoneyCents>()?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let report = state
        .engine
        .put_month_budget(&user_id, month, &items)
        .await?;
    Ok(Json(view(report)))
}

pub async fn report(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    month: Result<Path<String>, PathRejection>,
    query: Result<Query<BudgetReportQuery>, QueryRejection>,
) -> Result<Json<BudgetMonthResponse>, ServerError> {
    let Path(month) = month?;
    let Query(query) = query?;
    let month = parse_month(&month)?;

    let report = state
        .engine
        .build_month_report(&user_id, month, query.account_id)
        .await?;
    Ok(Json(view(report)))
}
