use uuid::Uuid;

use sea_orm::{EntityTrait, TransactionTrait};

use crate::{ResultEngine, Transaction, transactions};

use super::super::{
    super::{Engine, with_tx},
    helpers::BalanceAdjustment,
};

impl Engine {
    /// Delete a transaction, reversing its balance effect exactly.
    ///
    /// The reversal ignores non-negative mode: it always succeeds, even if
    /// it leaves the account below zero.
    pub async fn delete_transaction(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let tx = Transaction::try_from(model)?;

            self.apply_adjustments(
                &db_tx,
                user_id,
                &[BalanceAdjustment {
                    account_id: tx.account_id,
                    delta: -tx.direction.signed(tx.amount),
                    floored: false,
                }],
            )
            .await?;
            transactions::Entity::delete_by_id(tx.id)
                .exec(&db_tx)
                .await?;

            tracing::debug!(transaction_id = %tx.id, "transaction deleted");
            Ok(())
        })
    }
}
