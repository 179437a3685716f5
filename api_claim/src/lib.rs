use actix_web::web;

pub mod routes {
    pub mod claim;
    pub mod preview;
}

pub mod services {
    pub mod claim;
    pub mod client;
}

pub mod dtos {
    pub mod claim;
}

mod misc {
    pub(crate) mod bearer;
}

pub use services::client::{ProxyError, ProxyResponse, WebhooksApiClient};

/// Registers `/preview` and `/claim` on the enclosing scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(common::http::json_config())
        .service(routes::preview::post_preview)
        .service(routes::claim::post_claim);
}
