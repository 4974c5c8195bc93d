use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use api_types::ErrorBody;
pub use server::{router, run_with_listener};

mod accounts;
mod budgets;
mod categories;
mod server;
mod transactions;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountKind, AccountList, AccountNew, AccountUpdate, AccountView};
    }

    pub mod category {
        pub use api_types::category::{CategoryKind, CategoryList, CategoryNew, CategoryView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            Direction, TransactionList, TransactionListResponse, TransactionNew,
            TransactionUpdate, TransactionView,
        };
    }

    pub mod budget {
        pub use api_types::budget::{
            BudgetItemNew, BudgetItemView, BudgetMonthResponse, BudgetPut, BudgetReportQuery,
            BudgetTotalsView,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// The request never reached the engine (bad body, query or path).
    Generic(String),
    Unauthorized,
}

fn status_for_engine_error(err: &EngineError) -> (StatusCode, &'static str) {
    match err {
        EngineError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        EngineError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        EngineError::InvalidCursor(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CURSOR"),
        EngineError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
        EngineError::ExistingKey(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
        EngineError::InsufficientFunds(_) => (StatusCode::CONFLICT, "INSUFFICIENT_FUNDS"),
        EngineError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, error) = match self {
            ServerError::Engine(err) => {
                let (status, code) = status_for_engine_error(&err);
                (status, code, message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", err),
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "missing or invalid x-user-id header".to_string(),
            ),
        };

        let body = ErrorBody {
            error,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}
