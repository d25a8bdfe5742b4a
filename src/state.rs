use std::env;

use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: reqwest::Client,
    pub llm: LlmConfig,
    pub stripe: StripeConfig,
    pub notify: NotifyConfig,
    pub owner_open_id: String,
}

impl AppState {
    pub fn from_env(db: SqlitePool) -> Self {
        Self {
            db,
            http: reqwest::Client::new(),
            llm: LlmConfig::from_env(),
            stripe: StripeConfig::from_env(),
            notify: NotifyConfig::from_env(),
            owner_open_id: env::var("OWNER_OPEN_ID").unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("LLM_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("LLM_API_KEY").unwrap_or_default(),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
}

impl StripeConfig {
    pub fn from_env() -> Self {
        Self {
            secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            webhook_secret: env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NotifyConfig {
    pub url: String,
    pub token: String,
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("NOTIFY_URL").unwrap_or_default(),
            token: env::var("NOTIFY_TOKEN").unwrap_or_default(),
        }
    }

    pub fn enabled(&self) -> bool {
        !self.url.trim().is_empty()
    }
}
