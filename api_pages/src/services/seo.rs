use common::env_config::Config;
use i18n::Locale;

use crate::models::content::indexable_paths;

/// Absolute URL of every indexable page in every locale.
pub fn sitemap_urls(config: &Config) -> Vec<String> {
    let paths = indexable_paths();
    Locale::ALL
        .iter()
        .flat_map(|locale| {
            let base = config.locale_base_url(*locale);
            paths.iter().map(move |path| format!("{}{}", base, path))
        })
        .collect()
}

pub fn robots_txt(config: &Config) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
        config.app_base_url
    )
}
