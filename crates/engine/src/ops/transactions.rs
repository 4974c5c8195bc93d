use uuid::Uuid;

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, Transaction, transactions};

use super::{Engine, with_tx};

mod helpers;
mod list;
mod write;

pub use list::{TransactionListFilter, TransactionPage};

impl Engine {
    /// Return a transaction owned by `user_id`.
    pub async fn transaction(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self.require_transaction(&db_tx, user_id, transaction_id).await?;
            Transaction::try_from(model)
        })
    }

    async fn require_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound("transaction".to_string()))
    }
}
