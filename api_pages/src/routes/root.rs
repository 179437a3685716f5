use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, get, http::header, web};
use common::{env_config::Config, error::Res};
use i18n::negotiate_locale;

use crate::services::{render::PageRenderer, seo};

/// Sends `/` to the best supported locale for the browser's Accept-Language.
#[get("/")]
pub async fn get_root(req: HttpRequest) -> HttpResponse {
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let locale = negotiate_locale(accept_language);

    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, format!("/{}", locale)))
        .insert_header((header::VARY, "Accept-Language"))
        .finish()
}

#[get("/sitemap.xml")]
pub async fn get_sitemap(
    config: web::Data<Arc<Config>>,
    renderer: web::Data<PageRenderer>,
) -> Res<HttpResponse> {
    let xml = renderer.render_sitemap(&seo::sitemap_urls(&config))?;
    Ok(HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(xml))
}

#[get("/robots.txt")]
pub async fn get_robots(config: web::Data<Arc<Config>>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(seo::robots_txt(&config))
}
