//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{AccountKind, CategoryKind, Direction, MoneyCents};

/// Open a new account.
#[derive(Clone, Debug)]
pub struct CreateAccountCmd {
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub kind: AccountKind,
    pub initial_balance: MoneyCents,
}

impl CreateAccountCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        kind: AccountKind,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            currency: currency.into(),
            kind,
            initial_balance: MoneyCents::ZERO,
        }
    }

    #[must_use]
    pub fn initial_balance(mut self, balance: MoneyCents) -> Self {
        self.initial_balance = balance;
        self
    }
}

/// Rename or (un)archive an account. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateAccountCmd {
    pub name: Option<String>,
    pub archived: Option<bool>,
}

/// Create a category, optionally nested under a parent of the same kind.
#[derive(Clone, Debug)]
pub struct CreateCategoryCmd {
    pub user_id: String,
    pub name: String,
    pub kind: CategoryKind,
    pub parent_id: Option<Uuid>,
}

impl CreateCategoryCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            kind,
            parent_id: None,
        }
    }

    #[must_use]
    pub fn parent_id(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Record a transaction against an account.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub direction: Direction,
    pub amount: MoneyCents,
    pub note: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        account_id: Uuid,
        direction: Direction,
        amount: MoneyCents,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            account_id,
            category_id: None,
            direction,
            amount,
            note: None,
            occurred_at,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Patch an existing transaction.
///
/// Every field is optional; absent fields keep their stored value. A blank
/// `note` clears the note. `direction` may only repeat the stored value.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,

    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub direction: Option<Direction>,
    pub amount: Option<MoneyCents>,
    pub note: Option<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            account_id: None,
            category_id: None,
            direction: None,
            amount: None,
            note: None,
            occurred_at: None,
        }
    }

    #[must_use]
    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: MoneyCents) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }
}
