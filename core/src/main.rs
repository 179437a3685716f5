mod cors;

use actix_web::{
    App, HttpResponse, HttpServer,
    web::{self},
};
use api_billing::models::plan::PricingCatalog;
use api_claim::WebhooksApiClient;
use api_pages::PageRenderer;
use common::{env_config::Config, error::{AppError, Res}};
use i18n::{CatalogStore, Locale};
use tokio_util::sync::CancellationToken;

async fn not_found() -> Res<HttpResponse> {
    Err(AppError::NotFound("No such route".to_string()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env().expect("Failed to load configuration");

    // init logger
    logger::setup(&config).expect("Failed to set up logger");

    // every catalog is parsed once up front, a broken locale file stops startup
    let catalogs = CatalogStore::embedded();
    for locale in Locale::ALL {
        catalogs
            .load(locale)
            .expect("Failed to load message catalog");
    }

    // shared clients
    let stripe_client = web::Data::new(common::stripe::create_client(&config.stripe.secret_key));
    let pricing = web::Data::new(PricingCatalog::from_config(&config.pricing));
    let webhooks_api = web::Data::new(WebhooksApiClient::from_config(&config.webhooks_api));
    let renderer = web::Data::new(PageRenderer::new().expect("Failed to compile page templates"));
    let catalogs = web::Data::new(catalogs);
    let shutdown = web::Data::new(CancellationToken::new());
    let config_data = web::Data::new(config.clone());

    // one bucket across workers
    let limiter = limiter::global_middleware(config.rate_limit_per_second);

    log::info!(
        "Starting {} on {}:{} ({} workers, {})",
        config.site_id,
        config.server_host,
        config.server_port,
        config.num_workers,
        config.environment
    );

    let server = {
        let shutdown = shutdown.clone();
        HttpServer::new(move || {
            App::new()
                .app_data(config_data.clone())
                .app_data(stripe_client.clone())
                .app_data(pricing.clone())
                .app_data(webhooks_api.clone())
                .app_data(renderer.clone())
                .app_data(catalogs.clone())
                .app_data(shutdown.clone())
                .wrap(logger::middleware(&config_data)) // 2nd
                .wrap(cors::middleware(&config_data.app_base_url)) // 1st
                .service(
                    web::scope("/api")
                        // Stripe retries on 429, keep it outside the limiter
                        .service(api_billing::mount_webhook())
                        .service(
                            web::scope("")
                                .wrap(limiter.clone())
                                .service(api_billing::mount_checkout())
                                .service(api_pages::routes::public_config::get_public_config)
                                .configure(api_claim::configure),
                        ),
                )
                .configure(api_pages::configure)
                .default_service(web::to(not_found))
        })
        .bind((config.server_host.as_str(), config.server_port))?
        .workers(config.num_workers)
        .run()
    };

    // in-flight proxy calls stop waiting on upstream once shutdown starts
    let token = shutdown.get_ref().clone();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    server.await
}
