use actix_web::web;

pub mod routes {
    pub mod pages;
    pub mod public_config;
    pub mod root;
}

pub mod services {
    pub mod render;
    pub mod seo;
    pub mod view;
}

pub mod models {
    pub mod content;
}

pub mod dtos {
    pub mod public_config;
}

mod misc {
    pub(crate) mod locale;
}

pub use services::render::{PageError, PageRenderer};

/// Site-wide routes plus every locale-prefixed page.
///
/// Register after `/api`: the `/{locale}` scope claims every other first segment.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(routes::root::get_root)
        .service(routes::root::get_sitemap)
        .service(routes::root::get_robots)
        .service(
            web::scope("/{locale}")
                .service(routes::pages::get_home)
                .service(routes::pages::get_checkout_outcome)
                .service(routes::pages::get_entry)
                .service(routes::pages::get_page),
        );
}
