use actix_web::web::{self};

pub mod routes {
    pub mod checkout;
    pub mod webhook;
}

pub mod services {
    pub mod checkout;
    pub mod webhook;
}

pub mod dtos {
    pub mod checkout;
    pub mod webhook;
}

pub mod models {
    pub mod event;
    pub mod plan;
}

mod misc {
    pub(crate) mod locale;
}

pub fn mount_checkout() -> actix_web::Scope {
    web::scope("/checkout")
        .app_data(common::http::json_config())
        .service(routes::checkout::post_session)
        .service(routes::checkout::get_plans)
}
pub fn mount_webhook() -> actix_web::Scope {
    web::scope("/webhooks").service(routes::webhook::post_stripe_webhook)
}
