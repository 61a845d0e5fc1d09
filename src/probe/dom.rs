//! Minimal HTML tag scanner.
//!
//! Not a conforming HTML parser: it finds start tags and their attributes,
//! which is all the page checks query. Script and style bodies are skipped so
//! markup inside them is not counted.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Attribute value, treating an empty value as absent.
    pub fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }

    /// Whether a space-separated attribute (e.g. `rel`) contains `token`.
    pub fn has_token(&self, name: &str, token: &str) -> bool {
        self.attr(name).is_some_and(|v| {
            v.split_ascii_whitespace()
                .any(|t| t.eq_ignore_ascii_case(token))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    elements: Vec<Element>,
    title: Option<String>,
    first_h1: Option<String>,
}

fn raw_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<(script|style)\b((?:[^>"']|"[^"]*"|'[^']*')*)>.*?</(?:script|style)\s*>"#)
            .expect("raw text regex compiles")
    })
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex compiles"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("tag regex compiles")
    })
}

fn attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([^\s"'=/<>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .expect("attribute regex compiles")
    })
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("title regex compiles"))
}

fn h1_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").expect("h1 regex compiles"))
}

fn markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup regex compiles"))
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let without_comments = comment_re().replace_all(html, "");
        // Keep the opening tag so inline scripts and JSON-LD blocks still count
        let source = raw_text_re().replace_all(&without_comments, "<$1$2></$1>");

        let elements = tag_re()
            .captures_iter(&source)
            .map(|caps| Element {
                tag: caps[1].to_ascii_lowercase(),
                attrs: parse_attrs(caps.get(2).map_or("", |m| m.as_str())),
            })
            .collect();

        let title = title_re()
            .captures(&source)
            .map(|caps| collapse_whitespace(&decode_entities(&caps[1])));

        let first_h1 = h1_re()
            .captures(&source)
            .map(|caps| text_content(&caps[1]));

        Self {
            elements,
            title,
            first_h1,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn select<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.tag == tag)
    }

    pub fn count(&self, tag: &str) -> usize {
        self.select(tag).count()
    }

    /// `document.title`: whitespace-collapsed text of the first `<title>`,
    /// or empty when there is none.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Trimmed text content of the first `<h1>`.
    pub fn first_h1_text(&self) -> Option<&str> {
        self.first_h1.as_deref()
    }

    pub fn meta_named(&self, name: &str) -> Option<&Element> {
        self.select("meta")
            .find(|m| m.attr("name").is_some_and(|n| n.eq_ignore_ascii_case(name)))
    }

    pub fn meta_property(&self, property: &str) -> Option<&Element> {
        self.select("meta")
            .find(|m| m.attr("property") == Some(property))
    }

    pub fn link_rel(&self, rel: &str) -> Option<&Element> {
        self.select("link").find(|l| l.has_token("rel", rel))
    }

    /// First `<link>` whose rel mentions "icon" (`icon`, `shortcut icon`,
    /// `apple-touch-icon`, ...).
    pub fn icon_link(&self) -> Option<&Element> {
        self.select("link").find(|l| {
            l.attr("rel")
                .is_some_and(|rel| rel.to_ascii_lowercase().contains("icon"))
        })
    }

    pub fn lang(&self) -> Option<&str> {
        self.select("html").next().and_then(|h| h.non_empty_attr("lang"))
    }

    /// Declared character encoding from `<meta charset>` or an http-equiv
    /// content-type.
    pub fn charset(&self) -> Option<String> {
        for meta in self.select("meta") {
            if let Some(charset) = meta.non_empty_attr("charset") {
                return Some(charset.to_ascii_uppercase());
            }
            let is_content_type = meta
                .attr("http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("content-type"));
            if is_content_type {
                if let Some(charset) = meta.attr("content").and_then(charset_from_content_type) {
                    return Some(charset);
                }
            }
        }
        None
    }
}

pub fn charset_from_content_type(value: &str) -> Option<String> {
    value.split(';').find_map(|part| {
        let (key, val) = part.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| val.trim().trim_matches('"').to_ascii_uppercase())
    })
}

fn parse_attrs(raw: &str) -> Vec<(String, String)> {
    attr_re()
        .captures_iter(raw)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or(String::new(), |m| decode_entities(m.as_str()));
            (name, value)
        })
        .collect()
}

fn text_content(fragment: &str) -> String {
    collapse_whitespace(&decode_entities(&markup_re().replace_all(fragment, " ")))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>
    Rust &amp; Friends
  </title>
  <meta name="Description" content="A page">
  <meta property="og:image" content='https://x.test/a.png'>
  <link rel="shortcut icon" href="/favicon.ico">
  <!-- <img src="commented.png"> -->
  <script>if (a < b) { document.write("<img src=x>"); }</script>
  <script type="application/ld+json">{"@type": "Thing"}</script>
</head>
<body>
  <h1 class="hero"> Hello <em>world</em> </h1>
  <img src="a.png" alt="A" data-x="1>2">
  <img src="b.png">
  <input type=submit disabled>
</body>
</html>"#;

    #[test]
    fn test_parse_skips_comments_and_script_bodies() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.count("img"), 2);
        assert_eq!(doc.count("script"), 2);
    }

    #[test]
    fn test_title_and_h1_text() {
        let doc = Document::parse(PAGE);
        assert_eq!(doc.title(), "Rust & Friends");
        assert_eq!(doc.first_h1_text(), Some("Hello world"));
    }

    #[test]
    fn test_attribute_forms() {
        let doc = Document::parse(PAGE);
        let imgs: Vec<_> = doc.select("img").collect();
        assert_eq!(imgs[0].attr("data-x"), Some("1>2"));
        assert_eq!(imgs[1].attr("alt"), None);

        let input = doc.select("input").next().unwrap();
        assert_eq!(input.attr("type"), Some("submit"));
        assert!(input.has_attr("disabled"));
    }

    #[test]
    fn test_meta_and_link_queries() {
        let doc = Document::parse(PAGE);
        assert_eq!(
            doc.meta_named("description").and_then(|m| m.attr("content")),
            Some("A page")
        );
        assert!(doc.meta_property("og:image").is_some());
        assert!(doc.meta_property("og:title").is_none());
        assert_eq!(
            doc.icon_link().and_then(|l| l.attr("href")),
            Some("/favicon.ico")
        );
        assert_eq!(doc.lang(), Some("en"));
        assert_eq!(doc.charset().as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_charset_from_content_type() {
        assert_eq!(
            charset_from_content_type("text/html; charset=iso-8859-1").as_deref(),
            Some("ISO-8859-1")
        );
        assert_eq!(charset_from_content_type("text/html"), None);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::parse("");
        assert_eq!(doc.title(), "");
        assert!(doc.first_h1_text().is_none());
        assert!(doc.elements().is_empty());
    }
}
