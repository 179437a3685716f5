use common::error::AppError;
use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::services::view::PageView;

const TEMPLATES: [(&str, &str); 3] = [
    ("layout.html", include_str!("../../templates/layout.html")),
    ("page.html", include_str!("../../templates/page.html")),
    ("sitemap.xml", include_str!("../../templates/sitemap.xml")),
];

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

impl From<PageError> for AppError {
    fn from(err: PageError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Compiled page templates, built once at startup. Output is HTML/XML escaped.
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, PageError> {
        let mut tera = Tera::default();
        tera.set_escape_fn(escape_markup);
        tera.add_raw_templates(TEMPLATES)?;
        Ok(PageRenderer { tera })
    }

    pub fn render_page(&self, view: &PageView) -> Result<String, PageError> {
        self.render("page.html", view)
    }

    pub fn render_sitemap(&self, urls: &[String]) -> Result<String, PageError> {
        #[derive(Serialize)]
        struct Sitemap<'a> {
            urls: &'a [String],
        }
        self.render("sitemap.xml", &Sitemap { urls })
    }

    fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, PageError> {
        let context = Context::from_serialize(data)?;
        Ok(self.tera.render(template, &context)?)
    }
}

// Like tera's default minus the `/` rule, so URLs stay readable in hrefs and <loc>.
fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
