use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    Category, CategoryKind, CreateCategoryCmd, Direction, EngineError, ResultEngine, categories,
    util::{normalize_key, normalize_required_name},
};

use super::{Engine, with_tx};

/// `true` when a transaction moving money in `direction` may use `category`.
pub(super) fn kind_matches(category: &Category, direction: Direction) -> bool {
    category.kind.direction() == direction
}

pub(super) fn ensure_kind_matches(category: &Category, direction: Direction) -> ResultEngine<()> {
    if kind_matches(category, direction) {
        return Ok(());
    }
    Err(EngineError::Validation(format!(
        "{} category cannot be used for a transaction with direction '{}'",
        category.kind.as_str(),
        direction.as_str()
    )))
}

impl Engine {
    /// Resolve an optional category reference.
    ///
    /// `None` stays `None` (uncategorized). A given id must belong to
    /// `user_id` and be active.
    pub(super) async fn resolve_category(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Option<Category>> {
        let Some(category_id) = category_id else {
            return Ok(None);
        };

        let model = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Archived.eq(false))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound("category".to_string()))?;
        Category::try_from(model).map(Some)
    }

    pub async fn create_category(&self, cmd: CreateCategoryCmd) -> ResultEngine<Category> {
        let name = normalize_required_name(&cmd.name, "category")?;
        let name_norm = normalize_key(&name);
        if name_norm.is_empty() {
            return Err(EngineError::Validation(
                "category name must contain letters or digits".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            if let Some(parent) = self
                .resolve_category(&db_tx, &cmd.user_id, cmd.parent_id)
                .await?
                && parent.kind != cmd.kind
            {
                return Err(EngineError::Validation(
                    "parent category must have the same kind".to_string(),
                ));
            }

            let exists = categories::Entity::find()
                .filter(categories::Column::UserId.eq(cmd.user_id.as_str()))
                .filter(categories::Column::Kind.eq(cmd.kind.as_str()))
                .filter(categories::Column::NameNorm.eq(name_norm.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let category = Category {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                name,
                kind: cmd.kind,
                parent_id: cmd.parent_id,
                archived: false,
            };
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category)
        })
    }

    /// List categories ordered by name.
    pub async fn list_categories(
        &self,
        user_id: &str,
        kind: Option<CategoryKind>,
        include_archived: bool,
    ) -> ResultEngine<Vec<Category>> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_asc(categories::Column::NameNorm)
            .order_by_asc(categories::Column::Id);
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }
        if !include_archived {
            query = query.filter(categories::Column::Archived.eq(false));
        }

        with_tx!(self, |db_tx| {
            query
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Archive a category together with its direct children.
    ///
    /// Existing transactions keep their reference; new ones can no longer use
    /// the archived categories.
    pub async fn archive_category(&self, user_id: &str, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.resolve_category(&db_tx, user_id, Some(category_id))
                .await?;

            categories::Entity::update_many()
                .col_expr(categories::Column::Archived, Expr::value(true))
                .filter(categories::Column::UserId.eq(user_id))
                .filter(
                    Condition::any()
                        .add(categories::Column::Id.eq(category_id))
                        .add(categories::Column::ParentId.eq(category_id)),
                )
                .exec(&db_tx)
                .await?;
            tracing::debug!(%category_id, "category archived");
            Ok(())
        })
    }
}
