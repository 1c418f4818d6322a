//! Readable content extraction from HTML pages.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static HEADINGS: Lazy<Selector> = Lazy::new(|| selector("h1, h2, h3"));
static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| selector("p"));
static LINKS: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid static selector")
}

/// What a visited page contributes to the model's context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `h1`-`h3` texts in document order
    pub headings: Vec<String>,
    pub paragraphs: Vec<String>,
    /// Raw `href` targets, unresolved
    pub links: Vec<String>,
}

impl PageContent {
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty());

        let description = document
            .select(&DESCRIPTION)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(|c| c.trim().to_string());

        let headings = document.select(&HEADINGS).map(element_text).collect();
        let paragraphs = document.select(&PARAGRAPHS).map(element_text).collect();
        let links = document
            .select(&LINKS)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect();

        Self {
            title,
            description,
            headings,
            paragraphs,
            links,
        }
    }
}

/// Text of an element with runs of whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
