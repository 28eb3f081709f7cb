//! Merges caller markup into the built `index.html`.

use std::cell::Cell;

use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::error::{Error, Result};

/// A built HTML document plus the fragments to splice into it.
#[derive(Debug, Clone, Copy)]
pub struct HtmlPage<'a> {
    content: &'a str,
    head: &'a str,
    body: &'a str,
}

impl<'a> HtmlPage<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            head: "",
            body: "",
        }
    }

    /// Fragment appended to the end of `<head>`.
    pub fn with_head(mut self, head: &'a str) -> Self {
        self.head = head;
        self
    }

    /// Fragment appended to the end of `<body>`.
    pub fn with_body(mut self, body: &'a str) -> Self {
        self.body = body;
        self
    }

    /// Parse the document, append the fragments and serialize it again.
    ///
    /// Existing content of both regions is preserved. A region missing from
    /// the document leaves its fragment unused.
    pub fn render(&self) -> Result<String> {
        let head = self.head;
        let body = self.body;
        let saw_head = Cell::new(false);
        let saw_body = Cell::new(false);

        let rendered = rewrite_str(
            self.content,
            RewriteStrSettings {
                element_content_handlers: vec![
                    element!("head", |el| {
                        saw_head.set(true);
                        if !head.is_empty() {
                            el.append(head, ContentType::Html);
                        }
                        Ok(())
                    }),
                    element!("body", |el| {
                        saw_body.set(true);
                        if !body.is_empty() {
                            el.append(body, ContentType::Html);
                        }
                        Ok(())
                    }),
                ],
                ..RewriteStrSettings::default()
            },
        )
        .map_err(|e| Error::Markup(e.to_string()))?;

        if !saw_head.get() && !head.is_empty() {
            tracing::warn!("index.html has no <head>; dropping head fragment");
        }
        if !saw_body.get() && !body.is_empty() {
            tracing::warn!("index.html has no <body>; dropping body fragment");
        }

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_to_empty_regions() {
        let page = HtmlPage::new("<html><head></head><body></body></html>")
            .with_head("<meta>")
            .with_body("<div>");

        assert_eq!(
            page.render().unwrap(),
            "<html><head><meta></head><body><div></body></html>"
        );
    }

    #[test]
    fn test_preserves_existing_content() {
        let content = r#"<!DOCTYPE html>
<html>
  <head><title>Frontend</title><link rel="stylesheet" href="/assets/app.css"></head>
  <body><script src="/assets/app.js"></script></body>
</html>"#;
        let rendered = HtmlPage::new(content)
            .with_head(r#"<meta name="csrf-token" content="abc">"#)
            .with_body("<p>footer</p>")
            .render()
            .unwrap();

        assert!(rendered.starts_with("<!DOCTYPE html>"));
        assert!(rendered.contains(
            r#"<link rel="stylesheet" href="/assets/app.css"><meta name="csrf-token" content="abc"></head>"#
        ));
        assert!(rendered.contains(r#"<script src="/assets/app.js"></script><p>footer</p></body>"#));
    }

    #[test]
    fn test_empty_fragments_leave_document_unchanged() {
        let content = "<html><head><title>x</title></head><body><main></main></body></html>";
        assert_eq!(HtmlPage::new(content).render().unwrap(), content);
    }

    #[test]
    fn test_missing_regions_are_tolerated() {
        let rendered = HtmlPage::new("<p>fragment only</p>")
            .with_head("<meta>")
            .with_body("<div>")
            .render()
            .unwrap();

        assert_eq!(rendered, "<p>fragment only</p>");
    }

    #[test]
    fn test_fragments_are_inserted_unescaped() {
        let rendered = HtmlPage::new("<html><head></head><body></body></html>")
            .with_body(r#"<script>window.ENV = {"a": 1};</script>"#)
            .render()
            .unwrap();

        assert!(rendered.contains(r#"<script>window.ENV = {"a": 1};</script></body>"#));
    }
}
