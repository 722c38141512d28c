use rand::Rng;
use sqlx::PgPool;
use std::time::Duration;
use time::Date;
use tracing::{debug, warn};
use uuid::Uuid;

use super::dto::{SlotState, SwapResponse};
use super::{engine, repo};
use crate::domain::{round2, MacroCategory, MealSlot, GRAM_UNIT};
use crate::error::ApiError;
use crate::state::AppState;

const MAX_ATTEMPTS: u32 = 3;

enum TxError {
    /// Lost a row-lock race; the whole transaction is safe to retry.
    Conflict,
    Api(ApiError),
}

impl From<sqlx::Error> for TxError {
    fn from(e: sqlx::Error) -> Self {
        if is_retryable_conflict(&e) {
            TxError::Conflict
        } else {
            TxError::Api(ApiError::Internal(e.into()))
        }
    }
}

// 40001 serialization_failure, 40P01 deadlock_detected, 23505 unique_violation
// (two swaps racing to create the same missing slot row).
fn is_retryable_conflict(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some("40001") | Some("40P01") | Some("23505")
        ),
        _ => false,
    }
}

/// Swap `amount_g` of `category` between two slots of one user-day,
/// serialized against concurrent swaps and meal logs via row locks, with
/// bounded retry on conflict.
#[allow(clippy::too_many_arguments)]
pub async fn perform_swap(
    state: &AppState,
    user_id: Uuid,
    day: Date,
    from_slot: MealSlot,
    to_slot: MealSlot,
    category: MacroCategory,
    amount_g: f64,
) -> Result<SwapResponse, ApiError> {
    if from_slot == to_slot {
        return Err(ApiError::Validation {
            field: "to_slot",
            message: "must differ from from_slot".into(),
        });
    }
    if !amount_g.is_finite() || amount_g <= 0.0 {
        return Err(ApiError::Validation {
            field: "amount_g",
            message: format!("must be a positive number, got {amount_g}"),
        });
    }
    let amount_g = round2(amount_g);
    if amount_g < GRAM_UNIT {
        return Err(ApiError::Validation {
            field: "amount_g",
            message: format!("must be at least {GRAM_UNIT} g"),
        });
    }

    let mut attempt = 1;
    loop {
        match swap_once(&state.db, user_id, day, from_slot, to_slot, category, amount_g).await {
            Ok(resp) => {
                debug!(%from_slot, %to_slot, %category, amount_g, "swap applied");
                return Ok(resp);
            }
            Err(TxError::Conflict) if attempt < MAX_ATTEMPTS => {
                let backoff_ms = rand::thread_rng().gen_range(10..50) * u64::from(attempt);
                warn!(attempt, backoff_ms, "swap conflict, retrying");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
            }
            Err(TxError::Conflict) => return Err(ApiError::Conflict),
            Err(TxError::Api(e)) => return Err(e),
        }
    }
}

/// One transactional attempt: lock both slot rows, apply, persist, assert
/// conservation. Any error path drops the transaction, rolling it back, so
/// a half-applied swap can never be observed.
#[allow(clippy::too_many_arguments)]
async fn swap_once(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
    from_slot: MealSlot,
    to_slot: MealSlot,
    category: MacroCategory,
    amount_g: f64,
) -> Result<SwapResponse, TxError> {
    let mut tx = db.begin().await?;

    // lock in slot-enum order, not request order, so two concurrent swaps
    // of the same pair cannot deadlock
    let (first, second) = if from_slot < to_slot {
        (from_slot, to_slot)
    } else {
        (to_slot, from_slot)
    };
    let first_macros = repo::lock_slot_tx(&mut tx, user_id, day, first).await?;
    let second_macros = repo::lock_slot_tx(&mut tx, user_id, day, second).await?;
    let (from_macros, to_macros) = if first == from_slot {
        (first_macros, second_macros)
    } else {
        (second_macros, first_macros)
    };

    // a missing row means nothing logged or planned there yet
    let from_macros = from_macros.unwrap_or_default();
    let to_macros = to_macros.unwrap_or_default();

    let pre = repo::day_macro_sums_tx(&mut tx, user_id, day).await?;

    let (new_from, new_to) = engine::apply_swap(&from_macros, &to_macros, category, amount_g)
        .map_err(|s| {
            TxError::Api(ApiError::InsufficientAmount {
                slot: from_slot,
                category,
                requested_g: amount_g,
                available_g: s.available_g,
            })
        })?;

    repo::upsert_slot_tx(&mut tx, user_id, day, from_slot, &new_from).await?;
    repo::upsert_slot_tx(&mut tx, user_id, day, to_slot, &new_to).await?;
    repo::insert_swap_tx(
        &mut tx,
        Uuid::new_v4(),
        user_id,
        day,
        from_slot,
        to_slot,
        category,
        amount_g,
    )
    .await?;

    let post = repo::day_macro_sums_tx(&mut tx, user_id, day).await?;
    if !engine::conserves(pre, post) {
        // engine bug, not user error: roll back and refuse to persist
        return Err(TxError::Api(ApiError::Consistency {
            detail: format!("pre-swap sums {pre:?}, post-swap sums {post:?}"),
        }));
    }

    tx.commit().await?;

    Ok(SwapResponse {
        from: SlotState::new(from_slot, new_from),
        to: SlotState::new(to_slot, new_to),
    })
}
