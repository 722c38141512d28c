use serde::Deserialize;

use crate::domain::MealSlot;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// AI backend: OpenAI-compatible chat endpoint with an ordered list of
/// model candidates, tried first-success-wins.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub models: Vec<String>,
    pub timeout_secs: u64,
}

/// Share of the daily targets allocated to each slot, in percent.
/// Must sum to exactly 100.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AllocationConfig {
    pub breakfast_pct: f64,
    pub lunch_pct: f64,
    pub dinner_pct: f64,
    pub snack_pct: f64,
}

impl AllocationConfig {
    pub fn pct(&self, slot: MealSlot) -> f64 {
        match slot {
            MealSlot::Breakfast => self.breakfast_pct,
            MealSlot::Lunch => self.lunch_pct,
            MealSlot::Dinner => self.dinner_pct,
            MealSlot::Snack => self.snack_pct,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let sum = self.breakfast_pct + self.lunch_pct + self.dinner_pct + self.snack_pct;
        anyhow::ensure!(
            (sum - 100.0).abs() < 1e-9,
            "slot allocation must sum to 100, got {sum}"
        );
        let all = [
            self.breakfast_pct,
            self.lunch_pct,
            self.dinner_pct,
            self.snack_pct,
        ];
        anyhow::ensure!(
            all.iter().all(|p| *p > 0.0),
            "every slot allocation must be positive"
        );
        Ok(())
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            breakfast_pct: 25.0,
            lunch_pct: 35.0,
            dinner_pct: 30.0,
            snack_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
    pub allocation: AllocationConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "macroplan".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "macroplan-users".into()),
        };
        let ai = AiConfig {
            base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            api_key: std::env::var("AI_API_KEY").unwrap_or_default(),
            models: std::env::var("AI_MODELS")
                .unwrap_or_else(|_| "gpt-4o-mini,gpt-3.5-turbo".into())
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            timeout_secs: env_parsed("AI_TIMEOUT_SECS", 15),
        };
        let allocation = AllocationConfig {
            breakfast_pct: env_parsed("ALLOC_BREAKFAST_PCT", 25.0),
            lunch_pct: env_parsed("ALLOC_LUNCH_PCT", 35.0),
            dinner_pct: env_parsed("ALLOC_DINNER_PCT", 30.0),
            snack_pct: env_parsed("ALLOC_SNACK_PCT", 10.0),
        };
        let rate_limit = RateLimitConfig {
            max_requests: env_parsed("RECOMMEND_RATE_LIMIT", 20),
            window_secs: env_parsed("RECOMMEND_RATE_WINDOW_SECS", 3600),
        };
        Ok(Self {
            database_url,
            jwt,
            ai,
            allocation,
            rate_limit,
        })
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allocation_is_valid() {
        AllocationConfig::default().validate().expect("25/35/30/10");
    }

    #[test]
    fn allocation_must_sum_to_100() {
        let bad = AllocationConfig {
            breakfast_pct: 25.0,
            lunch_pct: 35.0,
            dinner_pct: 30.0,
            snack_pct: 11.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn allocation_rejects_zero_slot() {
        let bad = AllocationConfig {
            breakfast_pct: 0.0,
            lunch_pct: 40.0,
            dinner_pct: 40.0,
            snack_pct: 20.0,
        };
        assert!(bad.validate().is_err());
    }
}
