//! Index artifact persistence: one pretty-printed JSON object per corpus.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::index::CorpusIndex;

/// Serializes the whole index to `path`, replacing any existing artifact.
pub fn save_index(path: &Path, index: &CorpusIndex) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating index artifact {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, index)
        .with_context(|| format!("writing index artifact {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing index artifact {}", path.display()))?;
    Ok(())
}

/// Loads the whole index from `path`. `Ok(None)` means no artifact exists;
/// an artifact that is present but unreadable or malformed is an error and
/// must never be treated as an empty index.
pub fn load_index(path: &Path) -> Result<Option<CorpusIndex>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("opening index artifact {}", path.display()))
        }
    };
    let index = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing index artifact {}", path.display()))?;
    Ok(Some(index))
}
