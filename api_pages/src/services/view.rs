use chrono::Datelike;
use common::env_config::Config;
use i18n::{Locale, Translator};
use serde::Serialize;

use crate::models::content::{CheckoutOutcome, Section, StaticPage};

const NAV_PAGES: [StaticPage; 6] = [
    StaticPage::Home,
    StaticPage::Pricing,
    StaticPage::Docs,
    StaticPage::Blog,
    StaticPage::About,
    StaticPage::Contact,
];

#[derive(Debug, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub title: String,
    pub summary: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct PlanCard {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub cadences: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PricingTable {
    pub id: String,
    pub publishable_key: String,
}

/// Everything the page templates read.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub lang: &'static str,
    pub site_name: String,
    pub title: String,
    pub description: String,
    pub heading: String,
    pub body: String,
    pub canonical_url: String,
    pub alternates: Vec<Alternate>,
    pub nav: Vec<Link>,
    pub footer: String,
    pub entries: Vec<EntrySummary>,
    pub plans: Vec<PlanCard>,
    pub pricing_table: Option<PricingTable>,
}

/// The locale's translator plus the configuration every page needs.
pub struct PageContext<'a> {
    pub config: &'a Config,
    pub translator: &'a Translator,
}

impl<'a> PageContext<'a> {
    pub fn new(config: &'a Config, translator: &'a Translator) -> Self {
        PageContext { config, translator }
    }

    fn locale(&self) -> Locale {
        self.translator.locale()
    }

    fn url(&self, locale: Locale, path: &str) -> String {
        format!("{}{}", self.config.locale_base_url(locale), path)
    }

    fn page_copy(&self, key: &str) -> [String; 4] {
        ["title", "description", "heading", "body"]
            .map(|field| self.translator.t(&format!("pages.{}.{}", key, field)))
    }

    fn view(&self, path: &str, [title, description, heading, body]: [String; 4]) -> PageView {
        let t = self.translator;
        let site_name = t.t("meta.siteName");
        let year = chrono::Utc::now().year().to_string();

        // x-default points at the default locale
        let alternates = Locale::ALL
            .iter()
            .map(|locale| Alternate {
                hreflang: locale.to_string(),
                href: self.url(*locale, path),
            })
            .chain(std::iter::once(Alternate {
                hreflang: "x-default".to_string(),
                href: self.url(Locale::DEFAULT, path),
            }))
            .collect();

        let nav = NAV_PAGES
            .iter()
            .map(|page| Link {
                label: t.t(&format!("nav.{}", page.key())),
                href: format!("/{}{}", self.locale(), page.path()),
            })
            .collect();

        PageView {
            lang: self.locale().as_str(),
            footer: t.translate(
                "footer.copyright",
                None,
                &[("year", &year), ("siteName", &site_name)],
            ),
            site_name,
            title,
            description,
            heading,
            body,
            canonical_url: self.url(self.locale(), path),
            alternates,
            nav,
            entries: Vec::new(),
            plans: Vec::new(),
            pricing_table: None,
        }
    }

    pub fn static_page(&self, page: StaticPage) -> PageView {
        let mut view = self.view(&page.path(), self.page_copy(page.key()));
        match page {
            StaticPage::Docs => view.entries = self.entries(Section::Docs),
            StaticPage::Blog => view.entries = self.entries(Section::Blog),
            StaticPage::Pricing => {
                view.plans = self.plans();
                view.pricing_table = self.pricing_table();
            }
            _ => {}
        }
        view
    }

    /// `slug` must belong to `section`.
    pub fn entry(&self, section: Section, slug: &str) -> PageView {
        let t = self.translator;
        let title = t.t(&format!("{}.{}.title", section.as_str(), slug));
        let summary = t.t(&format!("{}.{}.summary", section.as_str(), slug));
        let page_title = format!("{} | {}", title, t.t("meta.siteName"));
        self.view(
            &section.entry_path(slug),
            [page_title, summary.clone(), title, summary],
        )
    }

    pub fn checkout(&self, outcome: CheckoutOutcome, session_id: Option<&str>) -> PageView {
        let [title, description, heading, _] = self.page_copy(outcome.key());
        let body = self.translator.translate(
            &format!("pages.{}.body", outcome.key()),
            None,
            &[("sessionId", session_id.unwrap_or("-"))],
        );
        self.view(outcome.path(), [title, description, heading, body])
    }

    fn entries(&self, section: Section) -> Vec<EntrySummary> {
        section
            .slugs()
            .iter()
            .map(|slug| EntrySummary {
                title: self.translator.t(&format!("{}.{}.title", section.as_str(), slug)),
                summary: self.translator.t(&format!("{}.{}.summary", section.as_str(), slug)),
                href: format!("/{}{}", self.locale(), section.entry_path(slug)),
            })
            .collect()
    }

    fn plans(&self) -> Vec<PlanCard> {
        let t = self.translator;
        self.config
            .pricing
            .plans
            .iter()
            .map(|plan| {
                let cadences = [("monthly", &plan.monthly), ("yearly", &plan.yearly)]
                    .into_iter()
                    .filter(|(_, price)| price.is_some())
                    .map(|(cadence, _)| t.t(&format!("plans.cadence.{}", cadence)))
                    .collect();
                PlanCard {
                    id: plan.plan_id.clone(),
                    name: t.t_or(&format!("plans.{}.name", plan.plan_id), &plan.plan_id),
                    summary: t.t_or(&format!("plans.{}.summary", plan.plan_id), ""),
                    cadences,
                }
            })
            .collect()
    }

    fn pricing_table(&self) -> Option<PricingTable> {
        let id = self.config.pricing_table_id(self.locale())?;
        Some(PricingTable {
            id: id.to_string(),
            publishable_key: self.config.stripe.publishable_key.clone(),
        })
    }
}
