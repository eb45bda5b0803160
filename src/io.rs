/*! Persistence of chain definitions.

A single chain is stored as one JSON object,

```json
{ "ID": 42, "tasks": [ { "phase": 0, "period": 10, "deadline": 10 } ] }
```

with an integer or string `ID`; collections are stored as JSONL, one
such object per line with no enclosing array. Only the chain definition
is persisted, never computed analysis state. Loading validates through
[CEChain::new], so a malformed record fails fast instead of entering the
analysis with defaulted fields.
*/

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::{CEChain, ChainId};
use crate::error::Error as AnalysisError;
use crate::task::Task;

/// Error type returned when reading or writing chain definitions fails.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed chain definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] AnalysisError),
}

/// The wire representation of one chain.
#[derive(Serialize, Deserialize)]
struct ChainRecord {
    #[serde(rename = "ID")]
    id: ChainId,
    tasks: Vec<Task>,
}

impl From<&CEChain> for ChainRecord {
    fn from(chain: &CEChain) -> Self {
        ChainRecord {
            id: chain.id().clone(),
            tasks: chain.tasks().to_vec(),
        }
    }
}

impl TryFrom<ChainRecord> for CEChain {
    type Error = AnalysisError;

    fn try_from(record: ChainRecord) -> Result<Self, Self::Error> {
        CEChain::new(record.id, record.tasks)
    }
}

/// Render a chain as a pretty-printed JSON document.
pub fn chain_to_json(chain: &CEChain) -> String {
    // A ChainRecord contains nothing a serializer can reject.
    serde_json::to_string_pretty(&ChainRecord::from(chain)).expect("chain serialization")
}

/// Parse and validate a chain from a JSON document.
pub fn chain_from_json(json: &str) -> Result<CEChain, LoadError> {
    let record: ChainRecord = serde_json::from_str(json)?;
    Ok(CEChain::try_from(record)?)
}

/// Write a single chain definition, creating parent directories as
/// needed.
pub fn save_chain(chain: &CEChain, path: impl AsRef<Path>) -> Result<(), LoadError> {
    ensure_parent_exists(path.as_ref())?;
    fs::write(path, chain_to_json(chain))?;
    Ok(())
}

/// Load a single chain definition.
pub fn load_chain(path: impl AsRef<Path>) -> Result<CEChain, LoadError> {
    chain_from_json(&fs::read_to_string(path)?)
}

/// Write a collection of chains as JSONL, one chain per line.
pub fn save_chains(chains: &[CEChain], path: impl AsRef<Path>) -> Result<(), LoadError> {
    ensure_parent_exists(path.as_ref())?;
    let mut file = fs::File::create(path)?;
    for chain in chains {
        serde_json::to_writer(&mut file, &ChainRecord::from(chain))?;
        writeln!(file)?;
    }
    Ok(())
}

/// Load a collection of chains from JSONL; blank lines are ignored.
pub fn load_chains(path: impl AsRef<Path>) -> Result<Vec<CEChain>, LoadError> {
    let file = BufReader::new(fs::File::open(path)?);
    let mut chains = Vec::new();
    for line in file.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ChainRecord = serde_json::from_str(&line)?;
        chains.push(CEChain::try_from(record)?);
    }
    Ok(chains)
}

fn ensure_parent_exists(path: &Path) -> Result<(), LoadError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
