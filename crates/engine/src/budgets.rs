//! Monthly budget plans and the report merging them with actual spend.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::MoneyCents;

/// One planned line of a monthly budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetItem {
    pub category_id: Uuid,
    pub amount: MoneyCents,
}

/// Plan vs. actual for one category in a month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetReportItem {
    pub category_id: Uuid,
    pub planned: MoneyCents,
    pub actual: MoneyCents,
    /// `planned - actual`; negative means overspent.
    pub delta: MoneyCents,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BudgetTotals {
    pub planned: MoneyCents,
    pub actual: MoneyCents,
    pub delta: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthReport {
    /// First day of the reported month.
    pub month: NaiveDate,
    pub items: Vec<BudgetReportItem>,
    pub totals: BudgetTotals,
}

impl MonthReport {
    /// Merges plans with per-category actuals. Items keep the order of
    /// `planned`; categories without actuals report zero.
    pub(crate) fn merge(
        month: NaiveDate,
        planned: Vec<(Uuid, MoneyCents)>,
        actual_for: impl Fn(Uuid) -> MoneyCents,
    ) -> Self {
        let mut totals = BudgetTotals::default();
        let items = planned
            .into_iter()
            .map(|(category_id, planned)| {
                let actual = actual_for(category_id);
                let delta = planned - actual;
                totals.planned += planned;
                totals.actual += actual;
                totals.delta += delta;
                BudgetReportItem {
                    category_id,
                    planned,
                    actual,
                    delta,
                }
            })
            .collect();

        Self {
            month,
            items,
            totals,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub month: Date,
    pub category_id: Uuid,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
