//! Accounts API endpoints.

use api_types::account::{AccountKind, AccountList, AccountNew, AccountUpdate, AccountView};
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{CreateAccountCmd, MoneyCents, UpdateAccountCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{CurrentUser, ServerState},
};

fn map_kind(kind: engine::AccountKind) -> AccountKind {
    match kind {
        engine::AccountKind::Cash => AccountKind::Cash,
        engine::AccountKind::Card => AccountKind::Card,
        engine::AccountKind::Deposit => AccountKind::Deposit,
    }
}

fn engine_kind(kind: AccountKind) -> engine::AccountKind {
    match kind {
        AccountKind::Cash => engine::AccountKind::Cash,
        AccountKind::Card => engine::AccountKind::Card,
        AccountKind::Deposit => engine::AccountKind::Deposit,
    }
}

fn view(account: engine::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        currency: account.currency.code().to_string(),
        kind: map_kind(account.kind),
        balance: account.balance.to_string(),
        archived: account.archived,
        created_at: account.created_at.fixed_offset(),
    }
}

pub async fn account_new(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    payload: Result<Json<AccountNew>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let Json(payload) = payload?;

    let mut cmd = CreateAccountCmd::new(
        user_id,
        payload.name,
        payload.currency,
        engine_kind(payload.kind),
    );
    if let Some(balance) = payload.initial_balance.as_deref() {
        cmd = cmd.initial_balance(balance.parse::<MoneyCents>()?);
    }

    let account = state.engine.create_account(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(account))))
}

pub async fn list(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    query: Result<Query<AccountList>, QueryRejection>,
) -> Result<Json<Vec<AccountView>>, ServerError> {
    let Query(query) = query?;

    let accounts = state
        .engine
        .list_accounts(&user_id, query.include_archived.unwrap_or(false))
        .await?;
    Ok(Json(accounts.into_iter().map(view).collect()))
}

pub async fn get(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    account_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AccountView>, ServerError> {
    let Path(account_id) = account_id?;

    let account = state.engine.account(&user_id, account_id).await?;
    Ok(Json(view(account)))
}

pub async fn account_update(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<ServerState>,
    account_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AccountUpdate>, JsonRejection>,
) -> Result<Json<AccountView>, ServerError> {
    let Path(account_id) = account_id?;
    let Json(payload) = payload?;
    if payload.name.is_none() && payload.archived.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or archived".to_string(),
        ));
    }

    let account = state
        .engine
        .update_account(
            &user_id,
            account_id,
            UpdateAccountCmd {
                name: payload.name,
                archived: payload.archived,
            },
        )
        .await?;
    Ok(Json(view(account)))
}
