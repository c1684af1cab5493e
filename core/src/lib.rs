pub mod extract;
pub mod index;
pub mod persist;
pub mod query;
pub mod tf;
pub mod tokenizer;

pub use extract::{HtmlExtractor, MarkdownExtractor, PlainTextExtractor, TextExtractor};
pub use index::{BuildOutcome, CorpusIndex, DocIdScheme, DocumentEntry, IndexBuilder};
pub use query::{score_query, search, ScoredTerm, SearchResults};
pub use tf::TermFrequency;
pub use tokenizer::{Token, TokenKind, Tokenizer};
