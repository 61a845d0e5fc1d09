use serde::Serialize;
use url::Url;

use crate::config::META_CONTENT_PREVIEW_CHARS;
use crate::probe::dom::{Document, Element};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkCounts {
    pub total: usize,
    pub internal: usize,
    pub external: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StylesheetRef {
    pub href: String,
    pub media: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptRef {
    pub src: String,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub defer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgTag {
    pub property: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterTag {
    pub name: String,
    pub content: String,
}

/// Declared image dimension: a pixel count, or `"auto"` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(u32),
    Keyword(&'static str),
}

impl Dimension {
    fn from_attr(value: Option<&str>) -> Self {
        match value.and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok()) {
            Some(px) if px > 0 => Dimension::Pixels(px),
            _ => Dimension::Keyword("auto"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
    pub width: Dimension,
    pub height: Dimension,
    pub loading: String,
}

/// Structural summary of the page shown next to the scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteOverview {
    pub total_elements: usize,
    pub links: LinkCounts,
    pub forms: usize,
    pub buttons: usize,
    pub headings: HeadingCounts,
    pub meta_tags: Vec<MetaTag>,
    pub language: String,
    pub charset: String,
    pub css_files: Vec<StylesheetRef>,
    pub js_files: Vec<ScriptRef>,
    pub inline_scripts: usize,
    pub favicon: String,
    pub schema_markup: usize,
    pub og_tags: Vec<OgTag>,
    pub twitter_tags: Vec<TwitterTag>,
    pub images: Vec<ImageRef>,
    pub lazy_loaded_images: usize,
}

impl Default for SiteOverview {
    fn default() -> Self {
        Self {
            total_elements: 0,
            links: LinkCounts::default(),
            forms: 0,
            buttons: 0,
            headings: HeadingCounts::default(),
            meta_tags: Vec::new(),
            language: "not detected".to_string(),
            charset: "not detected".to_string(),
            css_files: Vec::new(),
            js_files: Vec::new(),
            inline_scripts: 0,
            favicon: "none".to_string(),
            schema_markup: 0,
            og_tags: Vec::new(),
            twitter_tags: Vec::new(),
            images: Vec::new(),
            lazy_loaded_images: 0,
        }
    }
}

/// Resolve a URL-valued attribute the way the DOM's `href`/`src` properties
/// do; an unparseable value is returned as written.
fn resolve(base: &Url, raw: &str) -> String {
    base.join(raw.trim())
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn preview(content: &str) -> String {
    content.chars().take(META_CONTENT_PREVIEW_CHARS).collect()
}

fn link_counts(doc: &Document, base: &Url) -> LinkCounts {
    let origin = base.origin();
    let mut counts = LinkCounts::default();
    for anchor in doc.select("a") {
        counts.total += 1;
        let same_origin = anchor
            .non_empty_attr("href")
            .and_then(|href| base.join(href.trim()).ok())
            .is_some_and(|u| u.origin() == origin);
        if same_origin {
            counts.internal += 1;
        }
    }
    counts.external = counts.total - counts.internal;
    counts
}

fn is_submit_input(element: &Element) -> bool {
    element.tag == "input"
        && element
            .attr("type")
            .is_some_and(|t| t.eq_ignore_ascii_case("submit"))
}

fn meta_tags(doc: &Document) -> Vec<MetaTag> {
    doc.select("meta")
        .map(|meta| MetaTag {
            name: meta
                .non_empty_attr("name")
                .or_else(|| meta.non_empty_attr("property"))
                .unwrap_or("http-equiv")
                .to_string(),
            content: preview(meta.attr("content").unwrap_or("")),
        })
        .collect()
}

fn images(doc: &Document, base: &Url) -> Vec<ImageRef> {
    doc.select("img")
        .map(|img| ImageRef {
            src: img.non_empty_attr("src").map(|s| resolve(base, s)).unwrap_or_default(),
            alt: img.non_empty_attr("alt").unwrap_or("missing").to_string(),
            width: Dimension::from_attr(img.attr("width")),
            height: Dimension::from_attr(img.attr("height")),
            loading: img
                .non_empty_attr("loading")
                .map(str::to_ascii_lowercase)
                .unwrap_or_else(|| "eager".to_string()),
        })
        .collect()
}

pub fn site_overview(doc: &Document, base: &Url) -> SiteOverview {
    let images = images(doc, base);
    let lazy_loaded_images = images.iter().filter(|i| i.loading == "lazy").count();

    SiteOverview {
        total_elements: doc.elements().len(),
        links: link_counts(doc, base),
        forms: doc.count("form"),
        buttons: doc.count("button") + doc.elements().iter().filter(|e| is_submit_input(e)).count(),
        headings: HeadingCounts {
            h1: doc.count("h1"),
            h2: doc.count("h2"),
            h3: doc.count("h3"),
            h4: doc.count("h4"),
            h5: doc.count("h5"),
            h6: doc.count("h6"),
        },
        meta_tags: meta_tags(doc),
        language: doc.lang().unwrap_or("not specified").to_string(),
        charset: doc.charset().unwrap_or_else(|| "not specified".to_string()),
        css_files: doc
            .select("link")
            .filter(|l| l.has_token("rel", "stylesheet"))
            .map(|l| StylesheetRef {
                href: l.non_empty_attr("href").map(|h| resolve(base, h)).unwrap_or_default(),
                media: l.non_empty_attr("media").unwrap_or("all").to_string(),
            })
            .collect(),
        js_files: doc
            .select("script")
            .filter_map(|s| {
                s.attr("src").map(|src| ScriptRef {
                    src: resolve(base, src),
                    is_async: s.has_attr("async"),
                    defer: s.has_attr("defer"),
                })
            })
            .collect(),
        inline_scripts: doc.select("script").filter(|s| !s.has_attr("src")).count(),
        favicon: doc
            .icon_link()
            .and_then(|l| l.non_empty_attr("href"))
            .map(|h| resolve(base, h))
            .unwrap_or_else(|| "none".to_string()),
        schema_markup: doc
            .select("script")
            .filter(|s| s.attr("type") == Some("application/ld+json"))
            .count(),
        og_tags: doc
            .select("meta")
            .filter_map(|m| {
                let property = m.attr("property")?;
                property.starts_with("og:").then(|| OgTag {
                    property: property.to_string(),
                    content: m.attr("content").unwrap_or("").to_string(),
                })
            })
            .collect(),
        twitter_tags: doc
            .select("meta")
            .filter_map(|m| {
                let name = m.attr("name")?;
                name.starts_with("twitter:").then(|| TwitterTag {
                    name: name.to_string(),
                    content: m.attr("content").unwrap_or("").to_string(),
                })
            })
            .collect(),
        images,
        lazy_loaded_images,
    }
}
