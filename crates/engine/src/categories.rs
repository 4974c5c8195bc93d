//! Category registry per user.

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{Direction, EngineError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// The only direction a transaction of this kind may have.
    pub fn direction(self) -> Direction {
        match self {
            Self::Expense => Direction::Out,
            Self::Income => Direction::In,
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(EngineError::Validation(format!(
                "invalid category kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub kind: CategoryKind,
    pub parent_id: Option<Uuid>,
    pub archived: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub name_norm: String,
    pub kind: String,
    pub parent_id: Option<Uuid>,
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Parent,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(value: &Category) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            user_id: ActiveValue::Set(value.user_id.clone()),
            name: ActiveValue::Set(value.name.clone()),
            name_norm: ActiveValue::Set(crate::util::normalize_key(&value.name)),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            parent_id: ActiveValue::Set(value.parent_id),
            archived: ActiveValue::Set(value.archived),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: CategoryKind::try_from(model.kind.as_str())?,
            parent_id: model.parent_id,
            archived: model.archived,
        })
    }
}
