use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use mdsearch_core::extract::{HtmlExtractor, MarkdownExtractor, PlainTextExtractor, TextExtractor};
use mdsearch_core::index::{DocIdScheme, IndexBuilder};
use mdsearch_core::query::search;
use mdsearch_server::{build_app, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "mdsearch")]
#[command(about = "Build and query a TF-IDF index over a directory of documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every document directly under a directory
    Index {
        /// Directory of source documents
        #[arg(long)]
        dir: PathBuf,
        /// Where to write the index artifact
        #[arg(long, default_value = "index.json")]
        index: PathBuf,
        /// Markup format handed to the text extractor
        #[arg(long, value_enum, default_value_t = Format::Markdown)]
        format: Format,
        /// Prefix prepended to every document id, e.g. a site domain
        #[arg(long)]
        id_prefix: Option<String>,
        /// Replace each file's extension with this one in its document id
        #[arg(long)]
        rewrite_ext: Option<String>,
        /// Skip storing content previews
        #[arg(long, default_value_t = false)]
        no_previews: bool,
        /// Log this many of each document's most frequent terms at debug level
        #[arg(long, default_value_t = 0)]
        top_terms: usize,
    },
    /// Rank indexed documents against a free-text query
    Search {
        /// Free-text query
        query: String,
        /// Index artifact to load
        #[arg(long, default_value = "index.json")]
        index: PathBuf,
    },
    /// Serve the static corpus and a JSON search endpoint
    Serve {
        /// Index artifact to load per request
        #[arg(long, default_value = "index.json")]
        index: PathBuf,
        /// Directory of static assets to expose
        #[arg(long, default_value = "./static")]
        static_dir: PathBuf,
        /// Host to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Html,
    Text,
}

impl Format {
    fn extractor(self) -> Box<dyn TextExtractor> {
        match self {
            Format::Markdown => Box::new(MarkdownExtractor),
            Format::Html => Box::new(HtmlExtractor),
            Format::Text => Box::new(PlainTextExtractor),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            dir,
            index,
            format,
            id_prefix,
            rewrite_ext,
            no_previews,
            top_terms,
        } => {
            let builder = IndexBuilder::new(format.extractor())
                .with_scheme(DocIdScheme {
                    prefix: id_prefix,
                    rewrite_extension: rewrite_ext,
                })
                .with_previews(!no_previews)
                .with_top_terms(top_terms);
            let outcome = builder.build_and_save(&dir, &index)?;
            tracing::info!(
                documents = outcome.index.len(),
                persisted = outcome.persisted,
                "index build complete"
            );
        }
        Commands::Search { query, index } => {
            let results = search(&index, &query)?;
            if results.is_empty() {
                println!("no results");
                return Ok(());
            }
            for (term, hits) in &results {
                println!("{term}");
                for hit in hits {
                    println!(
                        "  {} => tf: {} idf: {:.4} tfidf: {:.4}",
                        hit.doc, hit.tf, hit.idf, hit.tfidf
                    );
                }
            }
        }
        Commands::Serve {
            index,
            static_dir,
            host,
            port,
        } => {
            let app = build_app(ServerConfig {
                index_path: index,
                static_dir,
            });
            let addr: SocketAddr = format!("{host}:{port}").parse()?;
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(%addr, "serving corpus and search endpoint");
            axum::serve(listener, app).await?;
        }
    }
    Ok(())
}
