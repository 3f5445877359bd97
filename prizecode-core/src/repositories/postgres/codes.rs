// File: prizecode-core/src/repositories/postgres/codes.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;
use prizecode_common::error::Error;
use prizecode_common::models::code::{Code, CodeStatus};
use prizecode_common::models::outcome::RedemptionOutcome;
use prizecode_common::traits::repository_traits::{CodeRepository, UNIQUENESS_RETRY_LIMIT};
use prizecode_common::traits::selector_traits::PrizeDraw;

pub struct PostgresCodeRepository {
    pub pool: Pool<Postgres>,
}

impl PostgresCodeRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CodeRepository for PostgresCodeRepository {
    async fn insert_codes(
        &self,
        count: usize,
        next_value: &(dyn Fn() -> String + Send + Sync),
    ) -> Result<Vec<Code>, Error> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(count);

        for _ in 0..count {
            let mut inserted = false;
            for _ in 0..UNIQUENESS_RETRY_LIMIT {
                let code = Code {
                    code_id: Uuid::new_v4(),
                    value: next_value(),
                    status: CodeStatus::Unused,
                    created_at: Utc::now(),
                    used_at: None,
                };
                // DO NOTHING keeps the transaction alive on a collision so
                // the slot can regenerate; it also catches duplicates among
                // the batch's own uncommitted rows.
                let done = sqlx::query(
                    r#"
                    INSERT INTO codes (
                        code_id,
                        value,
                        status,
                        created_at,
                        used_at
                    )
                    VALUES ($1,$2,$3,$4,$5)
                    ON CONFLICT (value) DO NOTHING
                    "#,
                )
                    .bind(code.code_id)
                    .bind(&code.value)
                    .bind(code.status)
                    .bind(code.created_at)
                    .bind(code.used_at)
                    .execute(&mut *tx)
                    .await?;

                if done.rows_affected() == 1 {
                    created.push(code);
                    inserted = true;
                    break;
                }
                debug!("code value {} already taken, regenerating", code.value);
            }
            if !inserted {
                // Dropping the transaction rolls back the whole batch.
                return Err(Error::UniquenessConflict(
                    "could not find a free code value".to_string(),
                ));
            }
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn get_code_by_value(&self, value: &str) -> Result<Option<Code>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                code_id,
                value,
                status,
                created_at,
                used_at
            FROM codes
            WHERE value = $1
            "#,
        )
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            Ok(Some(Code {
                code_id: r.try_get("code_id")?,
                value: r.try_get("value")?,
                status: r.try_get("status")?,
                created_at: r.try_get("created_at")?,
                used_at: r.try_get("used_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn redeem_code(
        &self,
        value: &str,
        selector: &dyn PrizeDraw,
    ) -> Result<RedemptionOutcome, Error> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes concurrent redemptions of the same value;
        // different values proceed independently.
        let row_opt = sqlx::query(
            r#"
            SELECT code_id, status
            FROM codes
            WHERE value = $1
            FOR UPDATE
            "#,
        )
            .bind(value)
            .fetch_optional(&mut *tx)
            .await?;

        // Dropping the open transaction rolls it back, so both failure paths
        // leave the store untouched.
        let row = match row_opt {
            Some(r) => r,
            None => return Err(Error::NotFound(value.to_string())),
        };
        let status: CodeStatus = row.try_get("status")?;
        if status == CodeStatus::Used {
            return Err(Error::AlreadyUsed(value.to_string()));
        }
        let code_id: Uuid = row.try_get("code_id")?;

        // The code is locked and confirmed unused; draw its outcome.
        let tier = selector.draw();
        let now = Utc::now();

        sqlx::query(
            r#"
            UPDATE codes
            SET status = $1,
                used_at = $2
            WHERE code_id = $3
            "#,
        )
            .bind(CodeStatus::Used)
            .bind(now)
            .bind(code_id)
            .execute(&mut *tx)
            .await?;

        let outcome = RedemptionOutcome {
            outcome_id: Uuid::new_v4(),
            code_id,
            outcome_label: tier.label,
            prize_value_cents: tier.payout_cents,
            drawn_probability: tier.weight,
            recorded_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO redemption_outcomes (
                outcome_id,
                code_id,
                outcome_label,
                prize_value_cents,
                drawn_probability,
                recorded_at
            )
            VALUES ($1,$2,$3,$4,$5,$6)
            "#,
        )
            .bind(outcome.outcome_id)
            .bind(outcome.code_id)
            .bind(&outcome.outcome_label)
            .bind(outcome.prize_value_cents)
            .bind(outcome.drawn_probability)
            .bind(outcome.recorded_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(outcome)
    }

    async fn get_outcome_for_code(&self, code_id: Uuid) -> Result<Option<RedemptionOutcome>, Error> {
        let row_opt = sqlx::query(
            r#"
            SELECT
                outcome_id,
                code_id,
                outcome_label,
                prize_value_cents,
                drawn_probability,
                recorded_at
            FROM redemption_outcomes
            WHERE code_id = $1
            "#,
        )
            .bind(code_id)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row_opt {
            Ok(Some(RedemptionOutcome {
                outcome_id: r.try_get("outcome_id")?,
                code_id: r.try_get("code_id")?,
                outcome_label: r.try_get("outcome_label")?,
                prize_value_cents: r.try_get("prize_value_cents")?,
                drawn_probability: r.try_get("drawn_probability")?,
                recorded_at: r.try_get("recorded_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn list_codes(&self, status: Option<CodeStatus>) -> Result<Vec<Code>, Error> {
        let rows = match status {
            Some(s) => {
                sqlx::query(
                    r#"
                    SELECT code_id, value, status, created_at, used_at
                    FROM codes
                    WHERE status = $1
                    ORDER BY created_at ASC
                    "#,
                )
                    .bind(s)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT code_id, value, status, created_at, used_at
                    FROM codes
                    ORDER BY created_at ASC
                    "#,
                )
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let mut list = Vec::new();
        for r in rows {
            list.push(Code {
                code_id: r.try_get("code_id")?,
                value: r.try_get("value")?,
                status: r.try_get("status")?,
                created_at: r.try_get("created_at")?,
                used_at: r.try_get("used_at")?,
            });
        }
        Ok(list)
    }
}
