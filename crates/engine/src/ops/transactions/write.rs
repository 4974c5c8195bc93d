use sea_orm::DatabaseTransaction;

use crate::ResultEngine;

use super::{super::Engine, helpers::BalanceAdjustment};

mod create;
mod delete;
mod update;

impl Engine {
    /// Apply balance adjustments in order, inside the caller's transaction.
    ///
    /// The first rejected delta aborts the sequence; since the caller's
    /// transaction is then dropped, earlier deltas roll back with it.
    async fn apply_adjustments(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        adjustments: &[BalanceAdjustment],
    ) -> ResultEngine<()> {
        for adjustment in adjustments {
            self.apply_balance_delta(
                db_tx,
                user_id,
                adjustment.account_id,
                adjustment.delta,
                adjustment.floored && self.enforce_non_negative,
            )
            .await?;
        }
        Ok(())
    }
}
