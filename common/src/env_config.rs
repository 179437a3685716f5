use std::{collections::HashMap, env, num::NonZeroU32, str::FromStr, sync::Arc, time::Duration};

use i18n::Locale;
use thiserror::Error;

/// Plan ids offered by the site. Prices are attached through the environment.
pub const PLAN_IDS: [&str; 3] = ["starter", "pro", "agency"];

const DEFAULT_RATE_LIMIT: NonZeroU32 = NonZeroU32::new(10).unwrap();

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(String),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything the site reads from its environment at startup:
/// server binding, logging, the public base URL, Stripe credentials and
/// prices, the external webhooks API and the Supabase project.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// File the logger mirrors console output into.
    pub log_file: String,
    /// Requests per second admitted on the `/api` scope.
    pub rate_limit_per_second: NonZeroU32,
    /// Canonical public URL of the site, without a trailing slash.
    pub app_base_url: String,
    /// Identifier attached to Stripe metadata and webhook records.
    pub site_id: String,
    pub stripe: StripeConfig,
    pub pricing: PricingConfig,
    pub webhooks_api: WebhooksApiConfig,
    pub supabase: SupabaseConfig,
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    /// Stripe secret key
    pub secret_key: String,
    /// Stripe publishable key, safe to hand to browsers
    pub publishable_key: String,
    /// Stripe webhook secret
    pub webhook_secret: String,
    /// Allowed clock skew for signed webhook timestamps, in seconds
    pub webhook_tolerance_secs: u64,
}

#[derive(Clone, Debug)]
pub struct PlanPrices {
    pub plan_id: String,
    pub monthly: Option<String>,
    pub yearly: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PricingConfig {
    pub plans: Vec<PlanPrices>,
    /// Stripe pricing table per locale.
    pub pricing_table_ids: HashMap<Locale, String>,
    /// Pricing table used when a locale has none of its own.
    pub pricing_table_fallback: Option<String>,
}

#[derive(Clone, Debug)]
pub struct WebhooksApiConfig {
    pub base_url: String,
    /// Hard limit for one outbound call, body included.
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: Option<String>,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Reads `.env` first when present. See [`Config::from_lookup`] for the keys.
    pub fn from_env() -> Result<Arc<Self>, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `APP_BASE_URL`: Absolute URL the site is served from
    /// - `STRIPE_SECRET_KEY`, `STRIPE_PUBLISHABLE_KEY`, `STRIPE_WEBHOOK_SECRET`
    /// - `WEBHOOKS_API_BASE_URL`: External API behind the preview/claim proxy
    /// - `SUPABASE_URL`, `SUPABASE_ANON_KEY`
    ///
    /// Optional (with defaults):
    /// - `ENVIRONMENT` (default: "development")
    /// - `IP` (default: "127.0.0.1"), `PORT` (default: 8080), `WORKERS` (default: 4)
    /// - `ENABLE_CONSOLE_LOGGING` (default: true), `LOG_FILE` (default: "site.log")
    /// - `RATE_LIMIT_PER_SECOND` (default: 10)
    /// - `SITE_ID` (default: "marketing")
    /// - `STRIPE_WEBHOOK_TOLERANCE_SECS` (default: 300)
    /// - `WEBHOOKS_API_TIMEOUT_MS` (default: 10000, positive integer)
    /// - `SUPABASE_SERVICE_ROLE_KEY`
    /// - `STRIPE_PRICING_TABLE_ID` and `STRIPE_PRICING_TABLE_ID_<LOCALE>`
    /// - `STRIPE_PRICE_<PLAN>_MONTHLY`, `STRIPE_PRICE_<PLAN>_YEARLY`
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Arc<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let plans = PLAN_IDS
            .iter()
            .map(|plan_id| {
                let upper = plan_id.to_ascii_uppercase();
                PlanPrices {
                    plan_id: plan_id.to_string(),
                    monthly: vars.optional(&format!("STRIPE_PRICE_{}_MONTHLY", upper)),
                    yearly: vars.optional(&format!("STRIPE_PRICE_{}_YEARLY", upper)),
                }
            })
            .collect();

        let pricing_table_ids = Locale::ALL
            .into_iter()
            .filter_map(|locale| {
                let key = format!("STRIPE_PRICING_TABLE_ID_{}", locale.as_str().to_ascii_uppercase());
                vars.optional(&key).map(|id| (locale, id))
            })
            .collect();

        let timeout_ms = vars.optional("WEBHOOKS_API_TIMEOUT_MS");
        let timeout = parse_timeout_ms(timeout_ms.as_deref().unwrap_or("10000")).map_err(
            |reason| ConfigError::Invalid {
                key: "WEBHOOKS_API_TIMEOUT_MS".to_string(),
                reason,
            },
        )?;

        Ok(Arc::new(Config {
            environment: vars
                .optional("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
            server_host: vars
                .optional("IP")
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: vars.parsed("PORT", 8080)?,
            num_workers: vars.parsed("WORKERS", 4)?,
            console_logging_enabled: vars
                .optional("ENABLE_CONSOLE_LOGGING")
                .map_or(true, |v| v.to_lowercase() == "true"),
            log_file: vars
                .optional("LOG_FILE")
                .unwrap_or_else(|| "site.log".to_string()),
            rate_limit_per_second: vars.parsed("RATE_LIMIT_PER_SECOND", DEFAULT_RATE_LIMIT)?,
            app_base_url: vars.base_url("APP_BASE_URL")?,
            site_id: vars
                .optional("SITE_ID")
                .unwrap_or_else(|| "marketing".to_string()),
            stripe: StripeConfig {
                secret_key: vars.required("STRIPE_SECRET_KEY")?,
                publishable_key: vars.required("STRIPE_PUBLISHABLE_KEY")?,
                webhook_secret: vars.required("STRIPE_WEBHOOK_SECRET")?,
                webhook_tolerance_secs: vars.parsed("STRIPE_WEBHOOK_TOLERANCE_SECS", 300)?,
            },
            pricing: PricingConfig {
                plans,
                pricing_table_ids,
                pricing_table_fallback: vars.optional("STRIPE_PRICING_TABLE_ID"),
            },
            webhooks_api: WebhooksApiConfig {
                base_url: vars.base_url("WEBHOOKS_API_BASE_URL")?,
                timeout,
            },
            supabase: SupabaseConfig {
                url: vars.base_url("SUPABASE_URL")?,
                anon_key: vars.required("SUPABASE_ANON_KEY")?,
                service_role_key: vars.optional("SUPABASE_SERVICE_ROLE_KEY"),
            },
        }))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Canonical URL of the locale's home page, e.g. `https://example.com/fr`.
    pub fn locale_base_url(&self, locale: Locale) -> String {
        format!("{}/{}", self.app_base_url, locale)
    }

    pub fn pricing_table_id(&self, locale: Locale) -> Option<&str> {
        self.pricing
            .pricing_table_ids
            .get(&locale)
            .or(self.pricing.pricing_table_fallback.as_ref())
            .map(String::as_str)
    }
}

/// Parses a millisecond timeout that must be a positive integer.
pub fn parse_timeout_ms(raw: &str) -> Result<Duration, String> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(_) => Err(format!("'{}' is not a whole number of milliseconds", raw)),
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn base_url(&self, key: &str) -> Result<String, ConfigError> {
        let raw = self.required(key)?;
        let url = url::Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use rstest::rstest;

    fn load(overrides: &[(&str, &str)]) -> Result<Arc<Config>, ConfigError> {
        let mut vars = testing::base_env();
        for (key, value) in overrides {
            vars.insert(key.to_string(), value.to_string());
        }
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_to_optional_keys() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.num_workers, 4);
        assert_eq!(config.rate_limit_per_second.get(), 10);
        assert_eq!(config.webhooks_api.timeout, Duration::from_millis(10_000));
        assert_eq!(config.site_id, "marketing");
        assert_eq!(config.stripe.webhook_tolerance_secs, 300);
        assert!(!config.is_production());
    }

    #[test]
    fn webhook_tolerance_must_be_a_whole_number() {
        let config = load(&[("STRIPE_WEBHOOK_TOLERANCE_SECS", "60")]).unwrap();
        assert_eq!(config.stripe.webhook_tolerance_secs, 60);

        let err = load(&[("STRIPE_WEBHOOK_TOLERANCE_SECS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "STRIPE_WEBHOOK_TOLERANCE_SECS"));
    }

    #[rstest]
    #[case("APP_BASE_URL")]
    #[case("STRIPE_SECRET_KEY")]
    #[case("STRIPE_WEBHOOK_SECRET")]
    #[case("WEBHOOKS_API_BASE_URL")]
    #[case("SUPABASE_ANON_KEY")]
    fn missing_required_key_fails_fast(#[case] key: &str) {
        let err = load(&[(key, "")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing(key.to_string()));
    }

    #[rstest]
    #[case("0")]
    #[case("-5")]
    #[case("1.5")]
    #[case("inf")]
    #[case("soon")]
    fn invalid_timeout_is_rejected_at_startup(#[case] raw: &str) {
        let err = load(&[("WEBHOOKS_API_TIMEOUT_MS", raw)]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "WEBHOOKS_API_TIMEOUT_MS"));
    }

    #[test]
    fn base_urls_lose_their_trailing_slash() {
        let config = load(&[("APP_BASE_URL", "https://www.example.com/")]).unwrap();
        assert_eq!(config.app_base_url, "https://www.example.com");
        assert_eq!(config.locale_base_url(Locale::Es), "https://www.example.com/es");
    }

    #[test]
    fn relative_or_non_http_base_url_is_invalid() {
        assert!(matches!(
            load(&[("APP_BASE_URL", "/just/a/path")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load(&[("SUPABASE_URL", "ftp://files.example.com")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn plan_prices_come_from_per_plan_keys() {
        let config = load(&[("STRIPE_PRICE_AGENCY_YEARLY", "price_agency_y")]).unwrap();
        let agency = config
            .pricing
            .plans
            .iter()
            .find(|p| p.plan_id == "agency")
            .unwrap();
        assert_eq!(agency.yearly.as_deref(), Some("price_agency_y"));
        assert_eq!(agency.monthly, None);
    }

    #[test]
    fn pricing_table_falls_back_to_shared_id() {
        let config = load(&[
            ("STRIPE_PRICING_TABLE_ID", "prctbl_shared"),
            ("STRIPE_PRICING_TABLE_ID_DE", "prctbl_de"),
        ])
        .unwrap();
        assert_eq!(config.pricing_table_id(Locale::De), Some("prctbl_de"));
        assert_eq!(config.pricing_table_id(Locale::Fr), Some("prctbl_shared"));
    }
}
