pub mod catalog;
pub mod locale;
pub mod translator;

pub use catalog::{Catalog, CatalogError, CatalogStore};
pub use locale::{Locale, canonical_locale, negotiate_locale, normalize_locale};
pub use translator::Translator;
