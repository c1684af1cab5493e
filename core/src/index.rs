//! Corpus-wide index build: one term-frequency map per document, keyed by a
//! configurable document id, persisted as a single JSON artifact.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::extract::TextExtractor;
use crate::persist;
use crate::tf::{self, TermFrequency};

/// Everything the index stores about one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    pub term_frequency_map: TermFrequency,
}

/// Whole-corpus index, document id to entry. Rebuilt from scratch on every
/// indexing run and loaded whole on every query.
pub type CorpusIndex = BTreeMap<String, DocumentEntry>;

/// Document id derivation from a file name. A directory of markdown chapters
/// can be indexed under the published site's URLs, e.g. `<chapter>.md` on
/// disk becoming `example.com/<chapter>.html`; both the prefix and the
/// extension rewrite are configuration, not built-in behavior.
#[derive(Debug, Clone, Default)]
pub struct DocIdScheme {
    /// Prepended verbatim to every id, e.g. `example.com/`.
    pub prefix: Option<String>,
    /// Replaces everything after the file name's first `.` when set.
    pub rewrite_extension: Option<String>,
}

impl DocIdScheme {
    pub fn document_id(&self, file_name: &str) -> String {
        let id = match &self.rewrite_extension {
            Some(ext) => {
                let stem = file_name
                    .split_once('.')
                    .map_or(file_name, |(stem, _)| stem);
                format!("{stem}.{ext}")
            }
            None => file_name.to_string(),
        };
        match &self.prefix {
            Some(prefix) => format!("{prefix}{id}"),
            None => id,
        }
    }
}

const PREVIEW_SHORT: usize = 80;
const PREVIEW_MEDIUM: usize = 160;
const PREVIEW_LONG: usize = 240;

const MEDIUM_DOC_CHARS: usize = 240;
const LONG_DOC_CHARS: usize = 2000;

/// Newline-flattened excerpt of a document's plain text. Longer documents
/// earn a longer excerpt; the tier sizes are a presentation choice.
pub fn make_preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let total = flat.chars().count();
    let keep = if total <= MEDIUM_DOC_CHARS {
        PREVIEW_SHORT
    } else if total <= LONG_DOC_CHARS {
        PREVIEW_MEDIUM
    } else {
        PREVIEW_LONG
    };
    flat.chars().take(keep).collect()
}

/// Result of `build_and_save`. `persisted` is false when the artifact write
/// failed; the in-memory index is still valid, it just is not durable.
pub struct BuildOutcome {
    pub index: CorpusIndex,
    pub persisted: bool,
}

pub struct IndexBuilder {
    extractor: Box<dyn TextExtractor>,
    scheme: DocIdScheme,
    previews: bool,
    log_top_terms: usize,
}

impl IndexBuilder {
    pub fn new(extractor: Box<dyn TextExtractor>) -> Self {
        Self {
            extractor,
            scheme: DocIdScheme::default(),
            previews: true,
            log_top_terms: 0,
        }
    }

    pub fn with_scheme(mut self, scheme: DocIdScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_previews(mut self, previews: bool) -> Self {
        self.previews = previews;
        self
    }

    /// Log this many of each document's most frequent terms at debug level.
    pub fn with_top_terms(mut self, n: usize) -> Self {
        self.log_top_terms = n;
        self
    }

    /// Indexes every file directly under `dir`. Subdirectories are skipped,
    /// not recursed into. A document that cannot be read or extracted is
    /// logged and skipped; an unreadable directory fails the whole build.
    pub fn build(&self, dir: &Path) -> Result<CorpusIndex> {
        let mut index = CorpusIndex::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry =
                entry.with_context(|| format!("reading directory {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            tracing::info!(path = %path.display(), "indexing");

            let text = match self.extract(path) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %format!("{err:#}"),
                        "skipping document"
                    );
                    continue;
                }
            };

            let doc_id = self
                .scheme
                .document_id(&entry.file_name().to_string_lossy());
            let term_frequency_map = tf::term_frequencies(&text);
            if self.log_top_terms > 0 {
                for (term, count) in tf::top_terms(&term_frequency_map, self.log_top_terms) {
                    tracing::debug!(%doc_id, term, count, "top term");
                }
            }
            let preview = self.previews.then(|| make_preview(&text));

            let doc_entry = DocumentEntry {
                preview,
                term_frequency_map,
            };
            if index.insert(doc_id.clone(), doc_entry).is_some() {
                tracing::warn!(%doc_id, "duplicate document id, keeping the later file");
            }
        }
        Ok(index)
    }

    /// Builds the index and then writes the artifact. A write failure is
    /// logged and reported through the outcome, not returned as an error:
    /// the in-memory index is complete either way.
    pub fn build_and_save(&self, dir: &Path, artifact: &Path) -> Result<BuildOutcome> {
        let index = self.build(dir)?;
        tracing::info!(path = %artifact.display(), documents = index.len(), "saving index");
        let persisted = match persist::save_index(artifact, &index) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    path = %artifact.display(),
                    error = %format!("{err:#}"),
                    "could not persist index; the returned index is not durable"
                );
                false
            }
        };
        Ok(BuildOutcome { index, persisted })
    }

    fn extract(&self, path: &Path) -> Result<String> {
        let raw =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        self.extractor.extract_text(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_id_passthrough_by_default() {
        let scheme = DocIdScheme::default();
        assert_eq!(scheme.document_id("chapter.md"), "chapter.md");
    }

    #[test]
    fn doc_id_rewrites_extension_at_first_dot() {
        let scheme = DocIdScheme {
            prefix: None,
            rewrite_extension: Some("html".into()),
        };
        assert_eq!(scheme.document_id("chapter.md"), "chapter.html");
        assert_eq!(scheme.document_id("notes.old.md"), "notes.html");
        assert_eq!(scheme.document_id("nodot"), "nodot.html");
    }

    #[test]
    fn doc_id_prefix_is_prepended() {
        let scheme = DocIdScheme {
            prefix: Some("example.com/".into()),
            rewrite_extension: Some("html".into()),
        };
        assert_eq!(
            scheme.document_id("closures.md"),
            "example.com/closures.html"
        );
    }

    #[test]
    fn preview_is_newline_free() {
        let preview = make_preview("line one\nline two\r\n\tline three");
        assert!(!preview.contains('\n'));
        assert!(!preview.contains('\r'));
        assert!(!preview.contains('\t'));
        assert_eq!(preview, "line one line two line three");
    }

    #[test]
    fn preview_tiers_are_deterministic() {
        let short = "word ".repeat(20); // ~100 chars
        let medium = "word ".repeat(100); // ~500 chars
        let long = "word ".repeat(1000); // ~5000 chars
        assert_eq!(make_preview(&short).chars().count(), PREVIEW_SHORT);
        assert_eq!(make_preview(&medium).chars().count(), PREVIEW_MEDIUM);
        assert_eq!(make_preview(&long).chars().count(), PREVIEW_LONG);
        assert_eq!(make_preview(&long), make_preview(&long));
    }

    #[test]
    fn tiny_documents_keep_everything_they_have() {
        assert_eq!(make_preview("just a few words"), "just a few words");
    }
}
