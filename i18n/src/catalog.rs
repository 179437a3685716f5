use std::{borrow::Cow, collections::HashMap, sync::Arc};

use dashmap::DashMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    locale::{Locale, normalize_locale},
    translator::Translator,
};

const EMBEDDED: [(Locale, &str); 4] = [
    (Locale::En, include_str!("../locales/en.json")),
    (Locale::Es, include_str!("../locales/es.json")),
    (Locale::Fr, include_str!("../locales/fr.json")),
    (Locale::De, include_str!("../locales/de.json")),
];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("No message catalog for locale '{0}'")]
    Missing(Locale),

    #[error("Message catalog for locale '{locale}' is corrupt: {source}")]
    Corrupt {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    #[error("Message catalog for locale '{0}' is not a JSON object")]
    NotAnObject(Locale),
}

/// Flattened key → template mapping for one locale.
///
/// Nested JSON objects become dot-separated keys, so `{"home": {"title": ".."}}`
/// is looked up as `home.title`.
#[derive(Debug)]
pub struct Catalog {
    locale: Locale,
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn parse(locale: Locale, source: &str) -> Result<Self, CatalogError> {
        let root: Value = serde_json::from_str(source)
            .map_err(|source| CatalogError::Corrupt { locale, source })?;
        let Value::Object(map) = root else {
            return Err(CatalogError::NotAnObject(locale));
        };

        let mut messages = HashMap::new();
        flatten(locale, "", &map, &mut messages);
        Ok(Self { locale, messages })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn flatten(
    locale: Locale,
    prefix: &str,
    map: &Map<String, Value>,
    out: &mut HashMap<String, String>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::String(text) => {
                out.insert(path, text.clone());
            }
            Value::Number(number) => {
                out.insert(path, number.to_string());
            }
            Value::Bool(flag) => {
                out.insert(path, flag.to_string());
            }
            Value::Object(nested) => flatten(locale, &path, nested, out),
            Value::Array(_) | Value::Null => {
                log::warn!("Skipping non-scalar message '{}' in '{}' catalog", path, locale);
            }
        }
    }
}

/// Lazily parsed, process-wide message catalogs.
///
/// Entries are immutable once inserted. Two requests racing on the first load of
/// a locale may both parse it; the first insert wins and the other copy is dropped.
pub struct CatalogStore {
    sources: HashMap<Locale, Cow<'static, str>>,
    cache: DashMap<Locale, Arc<Catalog>>,
}

impl CatalogStore {
    /// Store backed by the catalogs compiled into the binary.
    pub fn embedded() -> Self {
        Self::from_sources(EMBEDDED)
    }

    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = (Locale, S)>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            sources: sources
                .into_iter()
                .map(|(locale, source)| (locale, source.into()))
                .collect(),
            cache: DashMap::new(),
        }
    }

    /// Loads the catalog for an arbitrary locale string after normalizing it.
    pub fn get_messages(&self, locale: &str) -> Result<Arc<Catalog>, CatalogError> {
        self.load(normalize_locale(locale))
    }

    pub fn load(&self, locale: Locale) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(cached) = self.cache.get(&locale) {
            return Ok(Arc::clone(cached.value()));
        }

        let source = self
            .sources
            .get(&locale)
            .ok_or(CatalogError::Missing(locale))?;
        let catalog = Arc::new(Catalog::parse(locale, source)?);
        log::debug!("Loaded '{}' catalog with {} messages", locale, catalog.len());

        let entry = self.cache.entry(locale).or_insert(catalog);
        Ok(Arc::clone(entry.value()))
    }

    pub fn translator(&self, locale: Locale) -> Result<Translator, CatalogError> {
        self.load(locale).map(Translator::new)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::embedded()
    }
}
