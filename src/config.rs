use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub search_limit: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub recipe_api: RecipeApiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));

        let database_url = required("DATABASE_URL")?;
        let session = SessionConfig {
            secret: required("SESSION_SECRET")?,
            issuer: lookup("SESSION_ISSUER").unwrap_or_else(|| "recipe-box".into()),
            audience: lookup("SESSION_AUDIENCE").unwrap_or_else(|| "recipe-box-users".into()),
            ttl_minutes: parsed(&lookup, "SESSION_TTL_MINUTES").unwrap_or(60 * 24),
            cookie_secure: lookup("COOKIE_SECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };
        let recipe_api = RecipeApiConfig {
            api_key: required("SPOONACULAR_API_KEY")?,
            base_url: lookup("SPOONACULAR_BASE_URL")
                .unwrap_or_else(|| "https://api.spoonacular.com".into())
                .trim_end_matches('/')
                .to_string(),
            search_limit: parsed(&lookup, "RECIPE_SEARCH_LIMIT").unwrap_or(10),
            timeout_secs: parsed(&lookup, "RECIPE_API_TIMEOUT_SECS").unwrap_or(10),
        };
        Ok(Self {
            database_url,
            session,
            recipe_api,
        })
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
