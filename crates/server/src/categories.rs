//! Categories API endpoints.

use api_types::category::{CategoryKind, CategoryList, CategoryNew, CategoryView};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::CreateCategoryCmd;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
};

fn map_kind(kind: engine::CategoryKind) -> CategoryKind {
    match kind {
        engine::CategoryKind::Expense => CategoryKind::Expense,
        engine::CategoryKind::Income => CategoryKind::Income,
    }
}

fn engine_kind(kind: CategoryKind) -> engine::CategoryKind {
    match kind {
        CategoryKind::Expense => engine::CategoryKind::Expense,
        CategoryKind::Income => engine::CategoryKind::Income,
    }
}

fn view(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        parent_id: category.parent_id,
        archived: category.archived,
    }
}

pub async fn category_new(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    payload: Result<Json<CategoryNew>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let Json(payload) = payload?;

    let mut cmd = CreateCategoryCmd::new(user_id, payload.name, engine_kind(payload.kind));
    if let Some(parent_id) = payload.parent_id {
        cmd = cmd.parent_id(parent_id);
    }

    let category = state.engine.create_category(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(category))))
}

pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    query: Result<Query<CategoryList>, QueryRejection>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let Query(query) = query?;

    let categories = state
        .engine
        .list_categories(
            &user_id,
            query.kind.map(engine_kind),
            query.include_archived.unwrap_or(false),
        )
        .await?;
    Ok(Json(categories.into_iter().map(view).collect()))
}

/// Archives the category and its direct children.
pub async fn archive(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    category_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(category_id) = category_id?;

    state.engine.archive_category(&user_id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
