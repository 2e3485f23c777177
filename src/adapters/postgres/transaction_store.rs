//! PostgreSQL implementation of TransactionStore.
//!
//! Inserts are idempotent on the `idempotency_key` column via
//! `ON CONFLICT DO NOTHING`: a redelivered webhook with a recorded key
//! affects zero rows and is reported as `CreateOutcome::Duplicate`.
//! Foreign-key violations are mapped to typed not-found errors by
//! constraint name.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::transaction::NewTransaction;
use crate::ports::{CreateOutcome, StoreError, TransactionStore};

/// Postgres `error_code` for foreign-key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Postgres `error_code` for unique violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of the TransactionStore port.
///
/// Uses sqlx with connection pooling. Rows are write-once; no update or
/// delete statements exist in this adapter.
pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    /// Creates a new store backed by the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn create(&self, record: NewTransaction) -> Result<CreateOutcome, StoreError> {
        let id = Uuid::new_v4();

        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                id,
                external_payment_id,
                amount,
                status,
                payment_time,
                currency,
                message,
                bank_reference,
                payment_method,
                payment_group,
                surcharge,
                gateway_details,
                offers,
                error_details,
                terminal_details,
                raw_payload,
                attempt,
                signature,
                received_at,
                version,
                idempotency_key,
                order_id,
                fee_plan_id,
                consumer_id
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            ON CONFLICT (idempotency_key) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(&record.external_payment_id)
        .bind(record.amount)
        .bind(&record.status)
        .bind(record.payment_time)
        .bind(&record.currency)
        .bind(&record.message)
        .bind(&record.bank_reference)
        .bind(&record.payment_method)
        .bind(&record.payment_group)
        .bind(&record.surcharge)
        .bind(&record.gateway_details)
        .bind(serde_json::Value::Array(record.offers.clone()))
        .bind(&record.error_details)
        .bind(&record.terminal_details)
        .bind(&record.raw_payload)
        .bind(record.attempt)
        .bind(&record.signature)
        .bind(record.received_at)
        .bind(&record.version)
        .bind(&record.idempotency_key)
        .bind(&record.order_id)
        .bind(&record.fee_plan_id)
        .bind(&record.consumer_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Ok(CreateOutcome::Duplicate),
            Ok(_) => Ok(CreateOutcome::Created(id)),
            Err(err) => {
                if is_unique_violation(&err) {
                    // Replays that race the ON CONFLICT clause still count as
                    // duplicates, not failures.
                    return Ok(CreateOutcome::Duplicate);
                }
                Err(map_insert_error(err, &record))
            }
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}

/// Maps an insert failure to a typed store error.
///
/// Foreign-key violations identify the missing relation by constraint name;
/// everything else collapses into `StoreError::Database`.
fn map_insert_error(err: sqlx::Error, record: &NewTransaction) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            let constraint = db.constraint().unwrap_or_default();
            if constraint.contains("fee_plan") {
                return StoreError::FeePlanNotFound(record.fee_plan_id.clone());
            }
            if constraint.contains("consumer") {
                return StoreError::ConsumerNotFound(
                    record.consumer_id.clone().unwrap_or_default(),
                );
            }
            if constraint.contains("order") {
                return StoreError::OrderNotFound(record.order_id.clone());
            }
        }
    }
    StoreError::Database(err.to_string())
}
