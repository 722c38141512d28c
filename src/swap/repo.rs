use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::{MacroCategory, MacroSet, MealSlot};

// These return sqlx::Error rather than anyhow so the service layer can
// recognize serialization conflicts and retry.

#[derive(Debug, FromRow)]
struct SlotRow {
    calories: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
}

/// Row-lock one slot's composition for the duration of the transaction.
pub async fn lock_slot_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
) -> Result<Option<MacroSet>, sqlx::Error> {
    let row = sqlx::query_as::<_, SlotRow>(
        r#"
        SELECT calories, protein_g, carbs_g, fat_g
          FROM day_slots
         WHERE user_id = $1 AND day = $2 AND slot = $3
         FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(day)
    .bind(slot.as_str())
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|r| MacroSet::new(r.calories, r.protein_g, r.carbs_g, r.fat_g)))
}

pub async fn upsert_slot_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
    macros: &MacroSet,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO day_slots (user_id, day, slot, calories, protein_g, carbs_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, day, slot) DO UPDATE SET
            calories = EXCLUDED.calories,
            protein_g = EXCLUDED.protein_g,
            carbs_g = EXCLUDED.carbs_g,
            fat_g = EXCLUDED.fat_g,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(day)
    .bind(slot.as_str())
    .bind(macros.calories)
    .bind(macros.protein_g)
    .bind(macros.carbs_g)
    .bind(macros.fat_g)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Day-level macro sums across all slots, read inside the transaction.
pub async fn day_macro_sums_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: Date,
) -> Result<(f64, f64, f64), sqlx::Error> {
    let sums: (f64, f64, f64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(protein_g), 0), COALESCE(SUM(carbs_g), 0), COALESCE(SUM(fat_g), 0)
          FROM day_slots
         WHERE user_id = $1 AND day = $2
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_one(&mut **tx)
    .await?;

    Ok(sums)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_swap_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    user_id: Uuid,
    day: Date,
    from_slot: MealSlot,
    to_slot: MealSlot,
    category: MacroCategory,
    amount_g: f64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO swap_log (id, user_id, day, from_slot, to_slot, category, amount_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(day)
    .bind(from_slot.as_str())
    .bind(to_slot.as_str())
    .bind(category.as_str())
    .bind(amount_g)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[derive(Debug, FromRow)]
pub struct SwapRow {
    pub id: Uuid,
    pub from_slot: String,
    pub to_slot: String,
    pub category: String,
    pub amount_g: f64,
    pub created_at: OffsetDateTime,
}

pub async fn list_for_day(
    db: &PgPool,
    user_id: Uuid,
    day: Date,
) -> Result<Vec<SwapRow>, sqlx::Error> {
    sqlx::query_as::<_, SwapRow>(
        r#"
        SELECT id, from_slot, to_slot, category, amount_g, created_at
          FROM swap_log
         WHERE user_id = $1 AND day = $2
         ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await
}
