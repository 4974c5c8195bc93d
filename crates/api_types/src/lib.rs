use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    /// Machine-readable code, e.g. `INSUFFICIENT_FUNDS`.
    pub code: String,
}

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountKind {
        Cash,
        Card,
        Deposit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        /// ISO-4217 code, e.g. `EUR`.
        pub currency: String,
        pub kind: AccountKind,
        /// Decimal string, defaults to `0.00`.
        pub initial_balance: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        pub archived: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountList {
        pub include_archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub currency: String,
        pub kind: AccountKind,
        /// Decimal string with two fraction digits.
        pub balance: String,
        pub archived: bool,
        pub created_at: DateTime<FixedOffset>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CategoryKind {
        Expense,
        Income,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
        pub parent_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        pub kind: Option<CategoryKind>,
        pub include_archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: CategoryKind,
        pub parent_id: Option<Uuid>,
        pub archived: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Direction {
        In,
        Out,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub direction: Direction,
        /// Strictly positive decimal string, at most two fraction digits.
        pub amount: String,
        pub note: Option<String>,
        /// RFC3339 timestamp, including timezone offset (local user time).
        pub occurred_at: DateTime<FixedOffset>,
    }

    /// Partial update; absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        /// Only accepted when equal to the stored direction.
        pub direction: Option<Direction>,
        pub amount: Option<String>,
        /// An empty string clears the note.
        pub note: Option<String>,
        pub occurred_at: Option<DateTime<FixedOffset>>,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub account_id: Option<Uuid>,
        pub category_id: Option<Uuid>,
        pub direction: Option<Direction>,
        /// Inclusive lower bound on `occurred_at`.
        pub from: Option<DateTime<FixedOffset>>,
        /// Exclusive upper bound on `occurred_at`.
        pub to: Option<DateTime<FixedOffset>>,
        pub min_amount: Option<String>,
        pub max_amount: Option<String>,
        /// Substring match on the note.
        pub q: Option<String>,
        /// Page size, clamped to `1..=100` (default 50).
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub account_id: Uuid,
        pub category_id: Option<Uuid>,
        pub direction: Direction,
        pub amount: String,
        pub note: Option<String>,
        pub occurred_at: DateTime<FixedOffset>,
        pub created_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub items: Vec<TransactionView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetItemNew {
        pub category_id: Uuid,
        pub amount: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetPut {
        pub items: Vec<BudgetItemNew>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetReportQuery {
        pub account_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetItemView {
        pub category_id: Uuid,
        pub planned: String,
        pub actual: String,
        pub delta: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetTotalsView {
        pub planned: String,
        pub actual: String,
        pub delta: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetMonthResponse {
        /// First day of the month, `YYYY-MM-DD`.
        pub month: NaiveDate,
        pub items: Vec<BudgetItemView>,
        pub totals: BudgetTotalsView,
    }
}
