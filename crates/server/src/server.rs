use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
    typed_header::TypedHeaderRejection,
};

use std::sync::Arc;

use crate::{ServerError, accounts, budgets, categories, transactions};
use engine::Engine;

static USER_ID_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Opaque user identifier injected in every request by the gateway.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

/// `TypedHeader` for the upstream identity header.
///
/// Every request must contain a non-blank "x-user-id" entry in the header.
#[derive(Debug)]
struct UserIdHeader(String);

impl Header for UserIdHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_ID_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(UserIdHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn identify(
    user_header: Result<TypedHeader<UserIdHeader>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(UserIdHeader(user_id))) = user_header else {
        return Err(ServerError::Unauthorized);
    };

    request.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(request).await)
}

/// Build the full API router for `engine`.
pub fn router(engine: Engine) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
    };

    Router::new()
        .route(
            "/accounts",
            get(accounts::list).post(accounts::account_new),
        )
        .route(
            "/accounts/{id}",
            get(accounts::get).patch(accounts::account_update),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::category_new),
        )
        .route(
            "/categories/{id}",
            axum::routing::delete(categories::archive),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::transaction_new),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/budgets/{month}",
            get(budgets::report).put(budgets::put),
        )
        .route_layer(middleware::from_fn(identify))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine)).await
}
