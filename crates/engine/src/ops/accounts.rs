use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    Account, CreateAccountCmd, CurrencyCode, EngineError, MoneyCents, ResultEngine,
    UpdateAccountCmd, accounts, util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    /// Open a new account and return it.
    pub async fn create_account(&self, cmd: CreateAccountCmd) -> ResultEngine<Account> {
        let name = normalize_required_name(&cmd.name, "account")?;
        let currency = CurrencyCode::try_from(cmd.currency.as_str())?;
        let account = Account::new(
            cmd.user_id,
            name,
            currency,
            cmd.kind,
            cmd.initial_balance,
        )?;

        with_tx!(self, |db_tx| {
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            tracing::debug!(account_id = %account.id, "account created");
            Ok(account)
        })
    }

    /// Return an account owned by `user_id`, archived ones included.
    pub async fn account(&self, user_id: &str, account_id: Uuid) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = accounts::Entity::find_by_id(account_id)
                .filter(accounts::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("account".to_string()))?;
            Account::try_from(model)
        })
    }

    pub async fn list_accounts(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> ResultEngine<Vec<Account>> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::CreatedAt)
            .order_by_asc(accounts::Column::Id);
        if !include_archived {
            query = query.filter(accounts::Column::Archived.eq(false));
        }

        with_tx!(self, |db_tx| {
            query
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Account::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Rename and/or (un)archive an account. The balance is never touched here.
    pub async fn update_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        cmd: UpdateAccountCmd,
    ) -> ResultEngine<Account> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "account"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = accounts::Entity::find_by_id(account_id)
                .filter(accounts::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("account".to_string()))?;

            let mut active = accounts::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                ..Default::default()
            };
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(archived) = cmd.archived {
                active.archived = ActiveValue::Set(archived);
            }

            let model = if active.is_changed() {
                active.update(&db_tx).await?
            } else {
                model
            };
            Account::try_from(model)
        })
    }

    /// Return the account only if it is owned by `user_id` and not archived.
    pub(super) async fn get_active(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        account_id: Uuid,
    ) -> ResultEngine<Account> {
        let model = accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::UserId.eq(user_id))
            .filter(accounts::Column::Archived.eq(false))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound("account".to_string()))?;
        Account::try_from(model)
    }

    /// Add `delta` to the account balance in a single conditional `UPDATE`.
    ///
    /// With `floor_at_zero` and a negative delta the row only matches while
    /// `balance + delta >= 0`; no match means `InsufficientFunds` and nothing
    /// is written.
    pub(super) async fn apply_balance_delta(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        account_id: Uuid,
        delta: MoneyCents,
        floor_at_zero: bool,
    ) -> ResultEngine<()> {
        let floored = floor_at_zero && delta.is_negative();

        let mut update = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::Balance,
                Expr::col(accounts::Column::Balance).add(delta.cents()),
            )
            .filter(accounts::Column::Id.eq(account_id))
            .filter(accounts::Column::UserId.eq(user_id));
        if floored {
            update = update.filter(accounts::Column::Balance.gte(-delta.cents()));
        }

        let result = update.exec(db_tx).await?;
        if result.rows_affected == 0 {
            if floored {
                tracing::debug!(%account_id, delta = delta.cents(), "balance floor rejected delta");
                return Err(EngineError::InsufficientFunds(account_id.to_string()));
            }
            return Err(EngineError::NotFound("account".to_string()));
        }
        Ok(())
    }
}
