//! Registry of everything the site publishes under a locale prefix.

pub const DOC_SLUGS: [&str; 3] = ["getting-started", "custom-domains", "claiming-your-site"];
pub const BLOG_SLUGS: [&str; 2] = ["launch-announcement", "choosing-a-plan"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    Home,
    Pricing,
    About,
    Contact,
    Docs,
    Blog,
    Privacy,
    Terms,
}

impl StaticPage {
    pub const ALL: [StaticPage; 8] = [
        StaticPage::Home,
        StaticPage::Pricing,
        StaticPage::About,
        StaticPage::Contact,
        StaticPage::Docs,
        StaticPage::Blog,
        StaticPage::Privacy,
        StaticPage::Terms,
    ];

    /// Catalog key segment under `pages.` and `nav.`.
    pub fn key(&self) -> &'static str {
        match self {
            StaticPage::Home => "home",
            StaticPage::Pricing => "pricing",
            StaticPage::About => "about",
            StaticPage::Contact => "contact",
            StaticPage::Docs => "docs",
            StaticPage::Blog => "blog",
            StaticPage::Privacy => "privacy",
            StaticPage::Terms => "terms",
        }
    }

    /// Path below the locale prefix; empty for the home page.
    pub fn path(&self) -> String {
        match self {
            StaticPage::Home => String::new(),
            page => format!("/{}", page.key()),
        }
    }

    /// Page served at `/{locale}/{segment}`. The home page has no segment.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|page| *page != StaticPage::Home)
            .find(|page| page.key() == segment)
    }
}

/// Sections whose entries live at `/{locale}/{section}/{slug}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Docs,
    Blog,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Docs, Section::Blog];

    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "docs" => Some(Section::Docs),
            "blog" => Some(Section::Blog),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Docs => "docs",
            Section::Blog => "blog",
        }
    }

    pub fn slugs(&self) -> &'static [&'static str] {
        match self {
            Section::Docs => &DOC_SLUGS,
            Section::Blog => &BLOG_SLUGS,
        }
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs().contains(&slug)
    }

    pub fn index(&self) -> StaticPage {
        match self {
            Section::Docs => StaticPage::Docs,
            Section::Blog => StaticPage::Blog,
        }
    }

    pub fn entry_path(&self, slug: &str) -> String {
        format!("/{}/{}", self.as_str(), slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Success,
    Cancel,
}

impl CheckoutOutcome {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "success" => Some(CheckoutOutcome::Success),
            "cancel" => Some(CheckoutOutcome::Cancel),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            CheckoutOutcome::Success => "checkoutSuccess",
            CheckoutOutcome::Cancel => "checkoutCancel",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            CheckoutOutcome::Success => "/checkout/success",
            CheckoutOutcome::Cancel => "/checkout/cancel",
        }
    }
}

/// Every indexable path below a locale prefix: static pages, then entries.
pub fn indexable_paths() -> Vec<String> {
    let pages = StaticPage::ALL.iter().map(StaticPage::path);
    let entries = Section::ALL.iter().flat_map(|section| {
        section
            .slugs()
            .iter()
            .map(move |slug| section.entry_path(slug))
    });
    pages.chain(entries).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("pricing", Some(StaticPage::Pricing))]
    #[case("terms", Some(StaticPage::Terms))]
    #[case("home", None)]
    #[case("", None)]
    #[case("Pricing", None)]
    fn segments_resolve_exactly(#[case] segment: &str, #[case] expected: Option<StaticPage>) {
        assert_eq!(StaticPage::from_segment(segment), expected);
    }

    #[test]
    fn unknown_slugs_are_not_in_a_section() {
        assert!(Section::Docs.contains("custom-domains"));
        assert!(!Section::Docs.contains("launch-announcement"));
        assert!(!Section::Blog.contains("missing"));
    }

    #[test]
    fn indexable_paths_cover_pages_and_entries() {
        let paths = indexable_paths();
        assert_eq!(paths.len(), StaticPage::ALL.len() + DOC_SLUGS.len() + BLOG_SLUGS.len());
        assert_eq!(paths[0], "");
        assert!(paths.contains(&"/docs/getting-started".to_string()));
        assert!(paths.contains(&"/blog/choosing-a-plan".to_string()));
        assert!(!paths.iter().any(|path| path.starts_with("/checkout")));
    }
}
