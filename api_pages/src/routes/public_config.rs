use std::sync::Arc;

use actix_web::{Responder, get, web};
use common::{env_config::Config, error::Res, http::Success};

use crate::dtos::public_config::PublicConfig;

/// Keys the browser needs for Stripe.js and the Supabase client.
///
/// # Output
/// - Success: 200 `{ stripePublishableKey, supabaseUrl, supabaseAnonKey }`
///
/// # Frontend Example
/// ```javascript
/// const config = await (await fetch('/api/public-config')).json();
/// const supabase = createClient(config.supabaseUrl, config.supabaseAnonKey);
/// ```
#[get("/public-config")]
pub async fn get_public_config(config: web::Data<Arc<Config>>) -> Res<impl Responder> {
    Success::ok(PublicConfig::from(config.get_ref().as_ref()))
}
