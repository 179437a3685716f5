use common::env_config::Config;
use serde::Serialize;

/// Browser-safe configuration. Never carries secret keys.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub stripe_publishable_key: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl From<&Config> for PublicConfig {
    fn from(config: &Config) -> Self {
        PublicConfig {
            stripe_publishable_key: config.stripe.publishable_key.clone(),
            supabase_url: config.supabase.url.clone(),
            supabase_anon_key: config.supabase.anon_key.clone(),
        }
    }
}
