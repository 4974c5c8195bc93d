//! Ledger engine: accounts, categories, transactions and monthly budgets.
//!
//! All state lives in the database. [`Engine`] holds no per-request state and
//! every mutating operation runs inside a single database transaction, so a
//! rejected operation leaves no partial writes behind.

pub use accounts::{Account, AccountKind};
pub use budgets::{BudgetItem, BudgetReportItem, BudgetTotals, MonthReport};
pub use categories::{Category, CategoryKind};
pub use commands::{
    CreateAccountCmd, CreateCategoryCmd, CreateTransactionCmd, UpdateAccountCmd,
    UpdateTransactionCmd,
};
pub use currency::CurrencyCode;
pub use error::EngineError;
pub use money::{MAX_DIGITS, MoneyCents};
pub use ops::{Engine, EngineBuilder, TransactionListFilter, TransactionPage};
pub use transactions::{Direction, Transaction};
pub use util::parse_month;

mod accounts;
mod budgets;
mod categories;
mod commands;
mod currency;
mod error;
mod money;
mod ops;
mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
