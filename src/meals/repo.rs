use anyhow::Context;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::{MacroSet, MealSlot};

#[derive(Debug, Clone, FromRow)]
pub struct LoggedMealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day: Date,
    pub slot: String,
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub logged_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct LoggedMeal {
    pub id: Uuid,
    pub day: Date,
    pub slot: MealSlot,
    pub name: String,
    pub macros: MacroSet,
    pub logged_at: OffsetDateTime,
}

impl TryFrom<LoggedMealRow> for LoggedMeal {
    type Error = anyhow::Error;

    fn try_from(r: LoggedMealRow) -> anyhow::Result<Self> {
        let slot = MealSlot::parse(&r.slot)
            .with_context(|| format!("meal {} has unknown slot {:?}", r.id, r.slot))?;
        Ok(Self {
            id: r.id,
            day: r.day,
            slot,
            name: r.name,
            macros: MacroSet::new(r.calories, r.protein_g, r.carbs_g, r.fat_g),
            logged_at: r.logged_at,
        })
    }
}

/// All meals a user logged on `day`, oldest first.
pub async fn list_for_day(db: &PgPool, user_id: Uuid, day: Date) -> anyhow::Result<Vec<LoggedMeal>> {
    let rows = sqlx::query_as::<_, LoggedMealRow>(
        r#"
        SELECT id, user_id, day, slot, name, calories, protein_g, carbs_g, fat_g, logged_at
          FROM logged_meals
         WHERE user_id = $1 AND day = $2
         ORDER BY logged_at ASC
        "#,
    )
    .bind(user_id)
    .bind(day)
    .fetch_all(db)
    .await
    .context("list logged meals")?;

    rows.into_iter().map(LoggedMeal::try_from).collect()
}

pub async fn get_by_id(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<LoggedMeal>> {
    let row = sqlx::query_as::<_, LoggedMealRow>(
        r#"
        SELECT id, user_id, day, slot, name, calories, protein_g, carbs_g, fat_g, logged_at
          FROM logged_meals
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get logged meal")?;

    row.map(LoggedMeal::try_from).transpose()
}

/// Insert a logged meal within a transaction.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    id: Uuid,
    day: Date,
    slot: MealSlot,
    name: &str,
    macros: &MacroSet,
) -> anyhow::Result<OffsetDateTime> {
    let (logged_at,): (OffsetDateTime,) = sqlx::query_as(
        r#"
        INSERT INTO logged_meals (id, user_id, day, slot, name, calories, protein_g, carbs_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING logged_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(day)
    .bind(slot.as_str())
    .bind(name)
    .bind(macros.calories)
    .bind(macros.protein_g)
    .bind(macros.carbs_g)
    .bind(macros.fat_g)
    .fetch_one(&mut **tx)
    .await
    .context("insert logged meal")?;

    Ok(logged_at)
}

pub async fn delete_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    id: Uuid,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM logged_meals WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .context("delete logged meal")?;

    Ok(result.rows_affected() > 0)
}

/// Add `delta` to the slot's planned composition, creating the row if
/// missing. Pass negated values to subtract (meal deletion).
pub async fn adjust_day_slot_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    day: Date,
    slot: MealSlot,
    delta: &MacroSet,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO day_slots (user_id, day, slot, calories, protein_g, carbs_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, day, slot) DO UPDATE SET
            calories = day_slots.calories + EXCLUDED.calories,
            protein_g = day_slots.protein_g + EXCLUDED.protein_g,
            carbs_g = day_slots.carbs_g + EXCLUDED.carbs_g,
            fat_g = day_slots.fat_g + EXCLUDED.fat_g,
            updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(day)
    .bind(slot.as_str())
    .bind(delta.calories)
    .bind(delta.protein_g)
    .bind(delta.carbs_g)
    .bind(delta.fat_g)
    .execute(&mut **tx)
    .await
    .context("adjust day slot")?;

    Ok(())
}
