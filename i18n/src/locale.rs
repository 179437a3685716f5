use std::fmt;

/// Display languages the site is published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    En,
    Es,
    Fr,
    De,
}

impl Locale {
    /// Every supported locale, default first.
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Es, Locale::Fr, Locale::De];

    pub const DEFAULT: Locale = Locale::En;

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::De => "de",
        }
    }

    /// Exact, case-sensitive lookup of a locale code.
    pub fn parse(code: &str) -> Option<Locale> {
        Self::ALL.into_iter().find(|locale| locale.as_str() == code)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps any input to a supported locale, falling back to the default.
pub fn normalize_locale(input: &str) -> Locale {
    Locale::parse(input).unwrap_or(Locale::DEFAULT)
}

/// Returns the locale only when `segment` is already in canonical form.
///
/// Locale-prefixed routes answer 404 on `None` so every page keeps a single URL:
/// `/EN/pricing` is not an alias of `/en/pricing`.
pub fn canonical_locale(segment: &str) -> Option<Locale> {
    let locale = normalize_locale(segment);
    (locale.as_str() == segment).then_some(locale)
}

/// Picks the preferred supported locale from an `Accept-Language` header.
///
/// Region subtags are ignored (`fr-CA` counts as `fr`). Entries with a zero or
/// unparsable `q` weight are skipped; ties keep header order.
pub fn negotiate_locale(accept_language: Option<&str>) -> Locale {
    let Some(header) = accept_language else {
        return Locale::DEFAULT;
    };

    let mut best: Option<(Locale, f32)> = None;
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();

        let weight = match parts.find_map(|p| p.trim().strip_prefix("q=")) {
            Some(q) => match q.trim().parse::<f32>() {
                Ok(q) if q > 0.0 => q,
                _ => continue,
            },
            None => 1.0,
        };

        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        let Some(locale) = Locale::parse(&primary.to_ascii_lowercase()) else {
            continue;
        };

        if best.is_none_or(|(_, w)| weight > w) {
            best = Some((locale, weight));
        }
    }

    best.map(|(locale, _)| locale).unwrap_or(Locale::DEFAULT)
}
