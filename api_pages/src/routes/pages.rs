use std::sync::Arc;

use actix_web::{HttpResponse, get, web};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
};
use i18n::CatalogStore;
use serde::Deserialize;

use crate::{
    misc::locale::path_locale,
    models::content::{CheckoutOutcome, Section, StaticPage},
    services::{
        render::PageRenderer,
        view::{PageContext, PageView},
    },
};

#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub session_id: Option<String>,
}

/// Resolves the locale segment, then renders whatever `build` produces for it.
fn render_localized<F>(
    segment: &str,
    store: &CatalogStore,
    config: &Config,
    renderer: &PageRenderer,
    build: F,
) -> Res<HttpResponse>
where
    F: FnOnce(&PageContext) -> Res<PageView>,
{
    let locale = path_locale(segment)?;
    let translator = store.translator(locale)?;
    let view = build(&PageContext::new(config, &translator))?;
    Success::html(renderer.render_page(&view)?)
}

fn not_found(what: &str) -> AppError {
    AppError::NotFound(format!("No page at '{}'", what))
}

/// Locale home page, `/{locale}`.
#[get("")]
pub async fn get_home(
    locale: web::Path<String>,
    store: web::Data<CatalogStore>,
    config: web::Data<Arc<Config>>,
    renderer: web::Data<PageRenderer>,
) -> Res<HttpResponse> {
    render_localized(&locale, &store, &config, &renderer, |ctx| {
        Ok(ctx.static_page(StaticPage::Home))
    })
}

/// Stripe redirects here after checkout. The success URL carries `session_id`.
#[get("/checkout/{outcome}")]
pub async fn get_checkout_outcome(
    path: web::Path<(String, String)>,
    query: web::Query<CheckoutQuery>,
    store: web::Data<CatalogStore>,
    config: web::Data<Arc<Config>>,
    renderer: web::Data<PageRenderer>,
) -> Res<HttpResponse> {
    let (locale, outcome) = path.into_inner();
    render_localized(&locale, &store, &config, &renderer, |ctx| {
        let outcome = CheckoutOutcome::parse(&outcome).ok_or_else(|| not_found(&outcome))?;
        Ok(ctx.checkout(outcome, query.session_id.as_deref()))
    })
}

/// A docs or blog entry, `/{locale}/{section}/{slug}`. Unknown slugs are 404s.
#[get("/{section}/{slug}")]
pub async fn get_entry(
    path: web::Path<(String, String, String)>,
    store: web::Data<CatalogStore>,
    config: web::Data<Arc<Config>>,
    renderer: web::Data<PageRenderer>,
) -> Res<HttpResponse> {
    let (locale, section, slug) = path.into_inner();
    render_localized(&locale, &store, &config, &renderer, |ctx| {
        let section = Section::parse(&section)
            .filter(|candidate| candidate.contains(&slug))
            .ok_or_else(|| not_found(&format!("{}/{}", section, slug)))?;
        Ok(ctx.entry(section, &slug))
    })
}

#[get("/{page}")]
pub async fn get_page(
    path: web::Path<(String, String)>,
    store: web::Data<CatalogStore>,
    config: web::Data<Arc<Config>>,
    renderer: web::Data<PageRenderer>,
) -> Res<HttpResponse> {
    let (locale, page) = path.into_inner();
    render_localized(&locale, &store, &config, &renderer, |ctx| {
        let page = StaticPage::from_segment(&page).ok_or_else(|| not_found(&page))?;
        Ok(ctx.static_page(page))
    })
}
