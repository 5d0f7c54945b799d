//! Markdown rendering for post messages.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};
use url::{ParseError, Url};

/// Schemes a link or image may point at. Relative references are always
/// allowed.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Render a post message to HTML.
///
/// Raw HTML in the source is escaped rather than passed through. Links and
/// images whose destination uses any other scheme (`javascript:`, `data:`,
/// ...) lose their markup and keep only their text.
pub fn render(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    // One entry per open link or image: whether its tags were dropped.
    let mut dropped: Vec<bool> = Vec::new();

    let parser = Parser::new_ext(source, options).filter_map(|event| {
        if let Some(dest) = link_destination(&event) {
            let keep = is_allowed_destination(dest);
            dropped.push(!keep);
            return keep.then_some(event);
        }
        match event {
            Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                if dropped.pop().unwrap_or(false) {
                    None
                } else {
                    Some(event)
                }
            }
            other => Some(other),
        }
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn link_destination<'a>(event: &'a Event<'_>) -> Option<&'a str> {
    match event {
        Event::Start(Tag::Link { dest_url, .. }) | Event::Start(Tag::Image { dest_url, .. }) => {
            Some(&**dest_url)
        }
        _ => None,
    }
}

/// Whether a link destination is relative or uses an allowed scheme.
///
/// Parsing follows the URL standard browsers use, so tabs, newlines and
/// leading spaces cannot hide a scheme.
fn is_allowed_destination(dest: &str) -> bool {
    match Url::parse(dest) {
        Ok(url) => ALLOWED_SCHEMES.contains(&url.scheme()),
        Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_emphasis() {
        assert_eq!(render("**bold**"), "<p><strong>bold</strong></p>\n");
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));

        let inline = render("hi <b>there</b>");
        assert!(!inline.contains("<b>"));
    }

    #[test]
    fn test_script_links_lose_markup() {
        let html = render("[click](javascript:alert(1))");
        assert!(!html.contains("href"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));

        let html = render("[x](JavaScript:alert(1)) [y](data:text/html,hi)");
        assert!(!html.contains("<a"));

        let html = render("![alt text](javascript:alert(1))");
        assert!(!html.contains("<img"));
        assert!(html.contains("alt text"));
    }

    #[test]
    fn test_safe_links_kept() {
        let html =
            render("[docs](https://example.com/a) [home](/boards/1/) [me](mailto:j@doe.com)");
        assert!(html.contains(r#"<a href="https://example.com/a">docs</a>"#));
        assert!(html.contains(r#"<a href="/boards/1/">home</a>"#));
        assert!(html.contains(r#"<a href="mailto:j@doe.com">me</a>"#));

        let html = render("![logo](/static/logo.png)");
        assert!(html.contains(r#"<img src="/static/logo.png" alt="logo""#));
    }

    #[test]
    fn test_allowed_destination() {
        assert!(is_allowed_destination("http://example.com"));
        assert!(is_allowed_destination("#top"));
        assert!(is_allowed_destination("?page=2"));
        assert!(!is_allowed_destination("java\tscript:alert(1)"));
        assert!(!is_allowed_destination(" javascript:alert(1)"));
        assert!(!is_allowed_destination("vbscript:msgbox"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert!(render("a & b").contains("a &amp; b"));
    }
}
