//! Transaction primitives.
//!
//! A `Transaction` moves money into or out of exactly one account. Its
//! direction is fixed at creation; everything else may be edited, and every
//! edit is reconciled against the account balance by the engine.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }

    /// Balance effect of moving `amount` in this direction.
    pub fn signed(self, amount: MoneyCents) -> MoneyCents {
        match self {
            Self::In => amount,
            Self::Out => -amount,
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            other => Err(EngineError::Validation(format!(
                "invalid direction: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub direction: Direction,
    /// Always strictly positive; the sign comes from `direction`.
    pub amount: MoneyCents,
    pub note: Option<String>,
    /// When the event happened, as reported by the client.
    pub occurred_at: DateTime<Utc>,
    /// When the row was recorded; drives list ordering.
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub direction: String,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Account,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            account_id: ActiveValue::Set(tx.account_id),
            category_id: ActiveValue::Set(tx.category_id),
            direction: ActiveValue::Set(tx.direction.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            note: ActiveValue::Set(tx.note.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            account_id: model.account_id,
            category_id: model.category_id,
            direction: Direction::try_from(model.direction.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            note: model.note,
            occurred_at: model.occurred_at,
            created_at: model.created_at,
        })
    }
}
