use stripe::Client;

/// Builds the Stripe API client.
///
/// `main` calls this once and shares the client through `web::Data`; handlers
/// must not construct their own.
pub fn create_client(secret_key: &str) -> Client {
    Client::new(secret_key)
}
