//! Pluggable markup-to-plain-text conversion.
//!
//! The indexer only ever sees a flat string of searchable text; which markup
//! dialect produced it is decided by the extractor handed in at build time.

use anyhow::{Context, Result};
use pulldown_cmark::{Event, Parser, Tag};
use scraper::{Html, Selector};

/// A document-format reader that turns raw file bytes into a flat searchable
/// string. Failure means the document is skipped, not that the build aborts.
pub trait TextExtractor {
    fn extract_text(&self, raw: &[u8]) -> Result<String>;
}

/// Markdown extractor: collects text runs, inline code, raw HTML and link
/// destinations, dropping all structural markup.
pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract_text(&self, raw: &[u8]) -> Result<String> {
        let source = std::str::from_utf8(raw).context("document is not valid UTF-8")?;
        let mut out = String::with_capacity(source.len());
        for event in Parser::new(source) {
            match event {
                Event::Text(t) | Event::Code(t) | Event::Html(t) | Event::InlineHtml(t) => {
                    out.push_str(&t);
                }
                Event::Start(Tag::Link { dest_url, .. }) => out.push_str(&dest_url),
                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                _ => {}
            }
        }
        Ok(out)
    }
}

/// HTML extractor: the visible text of the page body.
pub struct HtmlExtractor;

impl TextExtractor for HtmlExtractor {
    fn extract_text(&self, raw: &[u8]) -> Result<String> {
        let source = std::str::from_utf8(raw).context("document is not valid UTF-8")?;
        let doc = Html::parse_document(source);
        let body = Selector::parse("body").unwrap();
        let text = doc
            .select(&body)
            .flat_map(|el| el.text())
            .collect::<Vec<_>>()
            .join(" ");
        Ok(text)
    }
}

/// Passthrough for documents that carry no markup at all.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, raw: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(raw).into_owned())
    }
}
