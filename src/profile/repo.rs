use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub sex: Option<String>,
    pub age: Option<i32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub updated_at: OffsetDateTime,
}

pub async fn get_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<UserProfile>> {
    let row = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT user_id, sex, age, height_cm, weight_kg, activity_level, goal,
               dietary_restrictions, updated_at
          FROM user_profiles
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    sex: Option<&str>,
    age: Option<i32>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    activity_level: Option<&str>,
    goal: Option<&str>,
    dietary_restrictions: &[String],
) -> anyhow::Result<UserProfile> {
    let row = sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles
            (user_id, sex, age, height_cm, weight_kg, activity_level, goal,
             dietary_restrictions, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
        ON CONFLICT (user_id) DO UPDATE SET
            sex = EXCLUDED.sex,
            age = EXCLUDED.age,
            height_cm = EXCLUDED.height_cm,
            weight_kg = EXCLUDED.weight_kg,
            activity_level = EXCLUDED.activity_level,
            goal = EXCLUDED.goal,
            dietary_restrictions = EXCLUDED.dietary_restrictions,
            updated_at = now()
        RETURNING user_id, sex, age, height_cm, weight_kg, activity_level, goal,
                  dietary_restrictions, updated_at
        "#,
    )
    .bind(user_id)
    .bind(sex)
    .bind(age)
    .bind(height_cm)
    .bind(weight_kg)
    .bind(activity_level)
    .bind(goal)
    .bind(dietary_restrictions)
    .fetch_one(db)
    .await?;
    Ok(row)
}
