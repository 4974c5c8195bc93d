use sea_orm::{ActiveModelTrait, ActiveValue, TransactionTrait};

use crate::{EngineError, ResultEngine, Transaction, UpdateTransactionCmd, transactions};

use super::super::{
    super::{Engine, categories::ensure_kind_matches, with_tx},
    helpers::{apply_datetime_patch, apply_note_patch, balance_adjustments, ensure_positive_amount},
};

impl Engine {
    /// Patch a transaction and reconcile the balances it touches.
    ///
    /// The direction is immutable: asking for a different one fails with
    /// `Conflict` before anything is written. Moving the transaction to
    /// another account reverses its effect on the old account and applies
    /// it on the new one; both deltas and the row update commit together or
    /// not at all.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        if let Some(amount) = cmd.amount {
            ensure_positive_amount(amount)?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, &cmd.user_id, cmd.transaction_id)
                .await?;
            let current = Transaction::try_from(model)?;

            if let Some(direction) = cmd.direction
                && direction != current.direction
            {
                tracing::debug!(
                    transaction_id = %current.id,
                    "rejected direction change"
                );
                return Err(EngineError::Conflict(
                    "transaction direction cannot be changed".to_string(),
                ));
            }

            // Only a newly referenced account must be active.
            let account_id = match cmd.account_id {
                Some(account_id) => self.get_active(&db_tx, &cmd.user_id, account_id).await?.id,
                None => current.account_id,
            };

            let category_id = cmd.category_id.or(current.category_id);
            if let Some(category) = self
                .resolve_category(&db_tx, &cmd.user_id, category_id)
                .await?
            {
                ensure_kind_matches(&category, current.direction)?;
            }

            let amount = cmd.amount.unwrap_or(current.amount);
            let note = apply_note_patch(current.note.clone(), cmd.note.as_deref())?;
            let occurred_at = apply_datetime_patch(current.occurred_at, cmd.occurred_at);

            let updated = Transaction {
                account_id,
                category_id,
                amount,
                note,
                occurred_at,
                ..current.clone()
            };

            let active = transactions::ActiveModel {
                id: ActiveValue::Unchanged(updated.id),
                account_id: ActiveValue::Set(updated.account_id),
                category_id: ActiveValue::Set(updated.category_id),
                amount_minor: ActiveValue::Set(updated.amount.cents()),
                note: ActiveValue::Set(updated.note.clone()),
                occurred_at: ActiveValue::Set(updated.occurred_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            let adjustments = balance_adjustments(
                current.direction,
                current.account_id,
                current.amount,
                updated.account_id,
                updated.amount,
            )?;
            self.apply_adjustments(&db_tx, &cmd.user_id, &adjustments)
                .await?;

            tracing::debug!(
                transaction_id = %updated.id,
                adjustments = adjustments.len(),
                "transaction updated"
            );
            Ok(updated)
        })
    }
}
