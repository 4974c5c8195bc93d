use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};

use crate::{
    BudgetItem, CategoryKind, Direction, EngineError, MoneyCents, MonthReport, ResultEngine,
    budgets, transactions,
    util::{month_bounds, month_floor},
};

use super::{Engine, with_tx};

impl Engine {
    /// Upsert the planned amounts for `month` and return the month report.
    ///
    /// Every item must reference an owned, active expense category, at most
    /// once per call. Plans for categories not listed are left untouched.
    pub async fn put_month_budget(
        &self,
        user_id: &str,
        month: NaiveDate,
        items: &[BudgetItem],
    ) -> ResultEngine<MonthReport> {
        let month = floor_month(month)?;

        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if !item.amount.is_positive() {
                return Err(EngineError::Validation(
                    "budget amount must be > 0".to_string(),
                ));
            }
            if !seen.insert(item.category_id) {
                return Err(EngineError::Validation(format!(
                    "duplicate category in budget: {}",
                    item.category_id
                )));
            }
        }

        with_tx!(self, |db_tx| {
            for item in items {
                let category = self
                    .resolve_category(&db_tx, user_id, Some(item.category_id))
                    .await?;
                if category.is_some_and(|c| c.kind != CategoryKind::Expense) {
                    return Err(EngineError::Validation(
                        "budgets can only plan expense categories".to_string(),
                    ));
                }

                let row = budgets::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4()),
                    user_id: ActiveValue::Set(user_id.to_string()),
                    month: ActiveValue::Set(month),
                    category_id: ActiveValue::Set(item.category_id),
                    amount_minor: ActiveValue::Set(item.amount.cents()),
                };
                budgets::Entity::insert(row)
                    .on_conflict(
                        OnConflict::columns([
                            budgets::Column::UserId,
                            budgets::Column::Month,
                            budgets::Column::CategoryId,
                        ])
                        .update_column(budgets::Column::AmountMinor)
                        .to_owned(),
                    )
                    .exec_without_returning(&db_tx)
                    .await?;
            }
            tracing::debug!(%month, items = items.len(), "month budget saved");

            month_report(&db_tx, user_id, month, None).await
        })
    }

    /// Plan vs. actual outgoing spend per planned category for `month`.
    ///
    /// `month` is floored to its first day. With `account_id`, actuals only
    /// count transactions on that account.
    pub async fn build_month_report(
        &self,
        user_id: &str,
        month: NaiveDate,
        account_id: Option<Uuid>,
    ) -> ResultEngine<MonthReport> {
        let month = floor_month(month)?;
        with_tx!(self, |db_tx| {
            month_report(&db_tx, user_id, month, account_id).await
        })
    }
}

fn floor_month(month: NaiveDate) -> ResultEngine<NaiveDate> {
    month_floor(month)
        .ok_or_else(|| EngineError::Validation(format!("invalid month: {month}")))
}

async fn month_report(
    db_tx: &DatabaseTransaction,
    user_id: &str,
    month: NaiveDate,
    account_id: Option<Uuid>,
) -> ResultEngine<MonthReport> {
    let (start, end) = month_bounds(month)?;

    let planned: Vec<(Uuid, MoneyCents)> = budgets::Entity::find()
        .filter(budgets::Column::UserId.eq(user_id))
        .filter(budgets::Column::Month.eq(month))
        .order_by_asc(budgets::Column::CategoryId)
        .all(db_tx)
        .await?
        .into_iter()
        .map(|row| (row.category_id, MoneyCents::new(row.amount_minor)))
        .collect();

    let mut actuals = transactions::Entity::find()
        .select_only()
        .column(transactions::Column::CategoryId)
        .column_as(Expr::col(transactions::Column::AmountMinor).sum(), "total")
        .filter(transactions::Column::UserId.eq(user_id))
        .filter(transactions::Column::Direction.eq(Direction::Out.as_str()))
        .filter(transactions::Column::CategoryId.is_not_null())
        .filter(transactions::Column::OccurredAt.gte(start))
        .filter(transactions::Column::OccurredAt.lt(end))
        .group_by(transactions::Column::CategoryId);
    if let Some(account_id) = account_id {
        actuals = actuals.filter(transactions::Column::AccountId.eq(account_id));
    }

    let actuals: HashMap<Uuid, MoneyCents> = actuals
        .into_tuple::<(Option<Uuid>, Option<i64>)>()
        .all(db_tx)
        .await?
        .into_iter()
        .filter_map(|(category_id, total)| {
            Some((category_id?, MoneyCents::new(total.unwrap_or_default())))
        })
        .collect();

    Ok(MonthReport::merge(month, planned, |category_id| {
        actuals.get(&category_id).copied().unwrap_or_default()
    }))
}
