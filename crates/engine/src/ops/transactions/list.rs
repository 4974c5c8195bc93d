use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{Direction, EngineError, MoneyCents, ResultEngine, Transaction, transactions};

use super::super::{Engine, with_tx};

pub(crate) const MAX_PAGE_SIZE: u64 = 100;

/// Filters for listing transactions. All present filters must match.
///
/// `from` is inclusive and `to` is exclusive (`[from, to)`) on `occurred_at`.
/// `min_amount`/`max_amount` are inclusive bounds on the unsigned amount.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub account_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub direction: Option<Direction>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub min_amount: Option<MoneyCents>,
    pub max_amount: Option<MoneyCents>,
    /// Substring match on the note.
    pub search: Option<String>,
}

/// One page of transactions, newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    /// Present only when more rows follow this page.
    pub next_cursor: Option<String>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.from, filter.to)
        && from >= to
    {
        return Err(EngineError::Validation(
            "invalid range: from must be < to".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (filter.min_amount, filter.max_amount)
        && min > max
    {
        return Err(EngineError::Validation(
            "invalid range: min_amount must be <= max_amount".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(account_id) = filter.account_id {
            self = self.filter(transactions::Column::AccountId.eq(account_id));
        }
        if let Some(category_id) = filter.category_id {
            self = self.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(direction) = filter.direction {
            self = self.filter(transactions::Column::Direction.eq(direction.as_str()));
        }
        if let Some(from) = filter.from {
            self = self.filter(transactions::Column::OccurredAt.gte(from));
        }
        if let Some(to) = filter.to {
            self = self.filter(transactions::Column::OccurredAt.lt(to));
        }
        if let Some(min) = filter.min_amount {
            self = self.filter(transactions::Column::AmountMinor.gte(min.cents()));
        }
        if let Some(max) = filter.max_amount {
            self = self.filter(transactions::Column::AmountMinor.lte(max.cents()));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            self = self.filter(transactions::Column::Note.contains(search));
        }

        self
    }
}

/// Watermark of the last row handed out: `(created_at, id)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct TransactionsCursor {
    created_at: DateTime<Utc>,
    transaction_id: Uuid,
}

impl TransactionsCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid transactions cursor".to_string()))
    }
}

impl Engine {
    /// Lists the user's transactions with cursor-based pagination.
    ///
    /// Pagination is newest → older by `(created_at DESC, id DESC)`. `limit`
    /// is clamped to `1..=100`.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
        cursor: Option<&str>,
        limit: u64,
    ) -> ResultEngine<TransactionPage> {
        validate_list_filter(filter)?;
        let cursor = cursor.map(TransactionsCursor::decode).transpose()?;
        let limit = limit.clamp(1, MAX_PAGE_SIZE);

        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .limit(limit + 1);

            if let Some(cursor) = cursor {
                query = query.filter(
                    Condition::any()
                        .add(transactions::Column::CreatedAt.lt(cursor.created_at))
                        .add(
                            Condition::all()
                                .add(transactions::Column::CreatedAt.eq(cursor.created_at))
                                .add(transactions::Column::Id.lt(cursor.transaction_id)),
                        ),
                );
            }
            query = query.apply_tx_filters(filter);

            let rows: Vec<transactions::Model> = query.all(&db_tx).await?;
            let has_more = rows.len() > limit as usize;

            let items = rows
                .into_iter()
                .take(limit as usize)
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let next_cursor = if has_more {
                items
                    .last()
                    .map(|tx| {
                        TransactionsCursor {
                            created_at: tx.created_at,
                            transaction_id: tx.id,
                        }
                        .encode()
                    })
                    .transpose()?
            } else {
                None
            };

            Ok(TransactionPage { items, next_cursor })
        })
    }
}
