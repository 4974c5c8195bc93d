use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveModelTrait, TransactionTrait};

use crate::{CreateTransactionCmd, ResultEngine, Transaction, transactions, util::normalize_note};

use super::super::{
    super::{Engine, categories::ensure_kind_matches, with_tx},
    helpers::{BalanceAdjustment, ensure_positive_amount},
};

impl Engine {
    /// Record a transaction and apply its effect to the account balance.
    ///
    /// The account must be active and owned by the user; the optional
    /// category must be active and match the direction. In non-negative mode
    /// an outgoing amount above the current balance fails with
    /// `InsufficientFunds` and nothing is persisted.
    pub async fn create_transaction(&self, cmd: CreateTransactionCmd) -> ResultEngine<Transaction> {
        ensure_positive_amount(cmd.amount)?;
        let note = normalize_note(cmd.note.as_deref())?;

        with_tx!(self, |db_tx| {
            let account = self
                .get_active(&db_tx, &cmd.user_id, cmd.account_id)
                .await?;
            if let Some(category) = self
                .resolve_category(&db_tx, &cmd.user_id, cmd.category_id)
                .await?
            {
                ensure_kind_matches(&category, cmd.direction)?;
            }

            let tx = Transaction {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                account_id: account.id,
                category_id: cmd.category_id,
                direction: cmd.direction,
                amount: cmd.amount,
                note,
                occurred_at: cmd.occurred_at,
                created_at: Utc::now(),
            };
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            self.apply_adjustments(
                &db_tx,
                &cmd.user_id,
                &[BalanceAdjustment {
                    account_id: account.id,
                    delta: tx.direction.signed(tx.amount),
                    floored: true,
                }],
            )
            .await?;

            tracing::debug!(
                transaction_id = %tx.id,
                account_id = %tx.account_id,
                direction = tx.direction.as_str(),
                amount = tx.amount.cents(),
                "transaction created"
            );
            Ok(tx)
        })
    }
}
