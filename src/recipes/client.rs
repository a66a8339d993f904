use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::dto::{RandomRecipes, Recipe};
use crate::config::RecipeApiConfig;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe api request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("recipe api returned status {0}")]
    Status(u16),
}

/// Read-only access to the third-party recipe catalogue.
#[async_trait]
pub trait RecipeClient: Send + Sync {
    async fn random(&self) -> Result<Option<Recipe>, RecipeError>;
    async fn search(&self, query: &str) -> Result<Value, RecipeError>;
    async fn details(&self, recipe_id: i64) -> Result<Recipe, RecipeError>;
}

#[derive(Clone)]
pub struct SpoonacularClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    search_limit: u32,
}

impl SpoonacularClient {
    pub fn new(cfg: &RecipeApiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build recipe api http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            api_key: cfg.api_key.clone(),
            search_limit: cfg.search_limit,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RecipeError> {
        let url = format!("{}{}", self.base_url, path);
        let res = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = res.status();
        debug!(%path, status = status.as_u16(), "recipe api response");
        if !status.is_success() {
            return Err(RecipeError::Status(status.as_u16()));
        }
        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl RecipeClient for SpoonacularClient {
    async fn random(&self) -> Result<Option<Recipe>, RecipeError> {
        let body: RandomRecipes = self
            .get_json("/recipes/random", &[("number", "1".to_string())])
            .await?;
        Ok(body.recipes.into_iter().next())
    }

    async fn search(&self, query: &str) -> Result<Value, RecipeError> {
        self.get_json(
            "/recipes/complexSearch",
            &[
                ("query", query.to_string()),
                ("number", self.search_limit.to_string()),
            ],
        )
        .await
    }

    async fn details(&self, recipe_id: i64) -> Result<Recipe, RecipeError> {
        self.get_json(
            &format!("/recipes/{recipe_id}/information"),
            &[("includeNutrition", "true".to_string())],
        )
        .await
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;

    use super::*;

    /// In-memory catalogue. Unknown ids answer 404; `failing` makes every call answer 503.
    #[derive(Default)]
    pub struct FakeRecipes {
        pub recipes: HashMap<i64, Recipe>,
        pub search_results: Option<Value>,
        pub failing: bool,
    }

    impl FakeRecipes {
        pub fn with(recipes: Vec<Recipe>) -> Self {
            Self {
                recipes: recipes.into_iter().map(|r| (r.id, r)).collect(),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl RecipeClient for FakeRecipes {
        async fn random(&self) -> Result<Option<Recipe>, RecipeError> {
            if self.failing {
                return Err(RecipeError::Status(503));
            }
            Ok(self.recipes.values().min_by_key(|r| r.id).cloned())
        }

        async fn search(&self, _query: &str) -> Result<Value, RecipeError> {
            if self.failing {
                return Err(RecipeError::Status(503));
            }
            Ok(self
                .search_results
                .clone()
                .unwrap_or_else(|| serde_json::json!({ "results": [] })))
        }

        async fn details(&self, recipe_id: i64) -> Result<Recipe, RecipeError> {
            if self.failing {
                return Err(RecipeError::Status(503));
            }
            self.recipes
                .get(&recipe_id)
                .cloned()
                .ok_or(RecipeError::Status(404))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_base_url_and_limit() {
        let client = SpoonacularClient::new(&RecipeApiConfig {
            api_key: "k".into(),
            base_url: "http://localhost:1".into(),
            search_limit: 7,
            timeout_secs: 1,
        })
        .expect("client builds");
        assert_eq!(client.base_url, "http://localhost:1");
        assert_eq!(client.search_limit, 7);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_a_transport_error() {
        let client = SpoonacularClient::new(&RecipeApiConfig {
            api_key: "k".into(),
            base_url: "http://127.0.0.1:9".into(),
            search_limit: 10,
            timeout_secs: 1,
        })
        .expect("client builds");
        let err = client.details(1).await.unwrap_err();
        assert!(matches!(err, RecipeError::Transport(_)));
    }
}
