use common::error::AppError;
use i18n::{Locale, canonical_locale};

/// Locale named by a path segment. Anything but the canonical code is a 404,
/// so `/EN` never serves the `/en` page.
pub(crate) fn path_locale(segment: &str) -> Result<Locale, AppError> {
    canonical_locale(segment)
        .ok_or_else(|| AppError::NotFound(format!("No page for locale segment '{}'", segment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_canonical_segments_resolve() {
        assert_eq!(path_locale("es").unwrap(), Locale::Es);
        for segment in ["EN", "En", "en-US", "it", ""] {
            assert!(matches!(path_locale(segment), Err(AppError::NotFound(_))));
        }
    }
}
