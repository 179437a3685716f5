//! Configuration fixtures for tests across the workspace.

use std::{collections::HashMap, sync::Arc};

use crate::env_config::Config;

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Minimal valid environment. `pro` has no yearly price and `agency` has none.
pub fn base_env() -> HashMap<String, String> {
    [
        ("APP_BASE_URL", "https://www.example.com"),
        ("STRIPE_SECRET_KEY", "sk_test_123"),
        ("STRIPE_PUBLISHABLE_KEY", "pk_test_123"),
        ("STRIPE_WEBHOOK_SECRET", TEST_WEBHOOK_SECRET),
        ("WEBHOOKS_API_BASE_URL", "http://127.0.0.1:9"),
        ("SUPABASE_URL", "https://project.supabase.example"),
        ("SUPABASE_ANON_KEY", "anon_key"),
        ("STRIPE_PRICE_STARTER_MONTHLY", "price_starter_monthly"),
        ("STRIPE_PRICE_STARTER_YEARLY", "price_starter_yearly"),
        ("STRIPE_PRICE_PRO_MONTHLY", "price_pro_monthly"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect()
}

/// Builds a config from [`base_env`] with `overrides` applied on top.
pub fn config_with(overrides: &[(&str, &str)]) -> Arc<Config> {
    let mut vars = base_env();
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test configuration must be valid")
}

pub fn test_config() -> Arc<Config> {
    config_with(&[])
}
