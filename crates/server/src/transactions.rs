//! Transactions API endpoints

use api_types::transaction::{
    Direction, TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate,
    TransactionView,
};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::Utc;
use engine::{CreateTransactionCmd, MoneyCents, TransactionListFilter, UpdateTransactionCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
};

const DEFAULT_PAGE_SIZE: u64 = 50;

fn map_direction(direction: engine::Direction) -> Direction {
    match direction {
        engine::Direction::In => Direction::In,
        engine::Direction::Out => Direction::Out,
    }
}

fn engine_direction(direction: Direction) -> engine::Direction {
    match direction {
        Direction::In => engine::Direction::In,
        Direction::Out => engine::Direction::Out,
    }
}

fn parse_amount(value: &str) -> Result<MoneyCents, ServerError> {
    Ok(value.parse::<MoneyCents>()?)
}

fn view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        account_id: tx.account_id,
        category_id: tx.category_id,
        direction: map_direction(tx.direction),
        amount: tx.amount.to_string(),
        note: tx.note,
        occurred_at: tx.occurred_at.fixed_offset(),
        created_at: tx.created_at.fixed_offset(),
    }
}

pub async fn transaction_new(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Json(payload) = payload?;

    let mut cmd = CreateTransactionCmd::new(
        user_id,
        payload.account_id,
        engine_direction(payload.direction),
        parse_amount(&payload.amount)?,
        payload.occurred_at.with_timezone(&Utc),
    );
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(tx))))
}

pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    query: Result<Query<TransactionList>, QueryRejection>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let Query(query) = query?;

    let filter = TransactionListFilter {
        account_id: query.account_id,
        category_id: query.category_id,
        direction: query.direction.map(engine_direction),
        from: query.from.map(|dt| dt.with_timezone(&Utc)),
        to: query.to.map(|dt| dt.with_timezone(&Utc)),
        min_amount: query.min_amount.as_deref().map(parse_amount).transpose()?,
        max_amount: query.max_amount.as_deref().map(parse_amount).transpose()?,
        search: query.q,
    };

    let page = state
        .engine
        .list_transactions(
            &user_id,
            &filter,
            query.cursor.as_deref(),
            query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(Json(TransactionListResponse {
        items: page.items.into_iter().map(view).collect(),
        next_cursor: page.next_cursor,
    }))
}

pub async fn get(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    tx_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(tx_id) = tx_id?;

    let tx = state.engine.transaction(&user_id, tx_id).await?;
    Ok(Json(view(tx)))
}

pub async fn update(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    tx_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<TransactionView>, ServerError> {
    let Path(tx_id) = tx_id?;
    let Json(payload) = payload?;

    let mut cmd = UpdateTransactionCmd::new(user_id, tx_id);
    if let Some(account_id) = payload.account_id {
        cmd = cmd.account_id(account_id);
    }
    if let Some(category_id) = payload.category_id {
        cmd = cmd.category_id(category_id);
    }
    if let Some(direction) = payload.direction {
        cmd = cmd.direction(engine_direction(direction));
    }
    if let Some(amount) = payload.amount.as_deref() {
        cmd = cmd.amount(parse_amount(amount)?);
    }
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    if let Some(occurred_at) = payload.occurred_at {
        cmd = cmd.occurred_at(occurred_at.with_timezone(&Utc));
    }

    let tx = state.engine.update_transaction(cmd).await?;
    Ok(Json(view(tx)))
}

pub async fn delete(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    tx_id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ServerError> {
    let Path(tx_id) = tx_id?;

    state.engine.delete_transaction(&user_id, tx_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
