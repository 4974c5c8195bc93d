//! The module contains the `Account` struct and its persistence model.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{CurrencyCode, EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountKind {
    Cash,
    Card,
    Deposit,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Deposit => "deposit",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "deposit" => Ok(Self::Deposit),
            other => Err(EngineError::Validation(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

/// An account.
///
/// An account is anywhere money is kept: a wallet, a bank deposit, a card.
/// Its `balance` is only ever changed by the transaction engine through
/// atomic deltas, never written back from a value read earlier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub currency: CurrencyCode,
    pub kind: AccountKind,
    pub balance: MoneyCents,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        user_id: String,
        name: String,
        currency: CurrencyCode,
        kind: AccountKind,
        balance: MoneyCents,
    ) -> ResultEngine<Self> {
        if balance.is_negative() {
            return Err(EngineError::Validation(
                "initial balance must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            currency,
            kind,
            balance,
            archived: false,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub currency: String,
    pub kind: String,
    pub balance: i64,
    pub archived: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            balance: ActiveValue::Set(value.balance.cents()),
            archived: ActiveValue::Set(value.archived),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            currency: CurrencyCode::try_from(model.currency.as_str())?,
            kind: AccountKind::try_from(model.kind.as_str())?,
            balance: MoneyCents::new(model.balance),
            archived: model.archived,
            created_at: model.created_at,
        })
    }
}
