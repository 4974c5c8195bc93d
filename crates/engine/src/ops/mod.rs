use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod accounts;
mod budgets;
mod categories;
mod transactions;

pub use transactions::{TransactionListFilter, TransactionPage};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// Early returns via `?` drop the open transaction, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    /// Floor-at-zero mode for user-facing create and update.
    enforce_non_negative: bool,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    enforce_non_negative: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            enforce_non_negative: true,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Reject outgoing deltas that would make a balance negative (default: on).
    pub fn enforce_non_negative(mut self, enforce: bool) -> EngineBuilder {
        self.enforce_non_negative = enforce;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            enforce_non_negative: self.enforce_non_negative,
        })
    }
}
