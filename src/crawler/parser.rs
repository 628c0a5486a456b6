//! HTML link extraction
//!
//! This module extracts `<a href>` links from a page body in document order.
//! Hrefs are passed through unresolved; resolution and host filtering happen
//! in the crawler so there is a single place that decides what a key is.

use scraper::{Html, Selector};

/// A hyperlink found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// Raw href attribute value
    pub href: String,

    /// Anchor text with whitespace collapsed, or the href if there is none
    pub text: String,
}

/// Decodes a response body as UTF-8 text
///
/// # Returns
///
/// * `Ok(&str)` - The body as text
/// * `Err(String)` - The body is not valid UTF-8
pub fn decode_body(body: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(body).map_err(|e| format!("response body is not valid UTF-8: {}", e))
}

/// Extracts all hyperlinks from an HTML document
///
/// # Extraction Rules
///
/// - Every `<a>` element with a non-empty `href` yields one link, in
///   document order; repeated hrefs are kept
/// - The link text is the element's text content with runs of whitespace
///   collapsed to one space
/// - An anchor without text (e.g. wrapping only an image) uses its href as
///   the text
///
/// # Example
///
/// ```
/// use sitegraph::crawler::extract_links;
///
/// let html = r#"<a href="/about">About  us</a><a href="/img"><img src="x.png"></a>"#;
/// let links = extract_links(html);
/// assert_eq!(links[0].text, "About us");
/// assert_eq!(links[1].text, "/img");
/// ```
pub fn extract_links(html: &str) -> Vec<ExtractedLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        let text = collapse_whitespace(&element.text().collect::<String>());
        let text = if text.is_empty() {
            href.to_string()
        } else {
            text
        };

        links.push(ExtractedLink {
            href: href.to_string(),
            text,
        });
    }

    links
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
