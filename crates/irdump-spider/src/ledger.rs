use crate::fs::{read_optional, write_json};
use crate::SpiderError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error, trace};

/// Ledger filename inside each company directory.
pub const LEDGER_FILE: &str = "downloaded.json";

/// Metadata filename inside each company directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Already-downloaded source URLs, mapped to the local filename each was stored under.
///
/// Keys are only ever added; a URL present here is never fetched again for that company.
/// Serialized as a plain JSON object:
///
/// ```json
/// {
///   "https://investors.dave.com/static-files/q1.pdf": "q1.pdf"
/// }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger(BTreeMap<String, String>);

impl Ledger {
    /// Load the ledger from `company_dir`, or an empty ledger if none has been written yet.
    ///
    /// A ledger that exists but does not parse is [`SpiderError::LedgerCorrupt`].
    pub async fn load(company_dir: &Path) -> Result<Self, SpiderError> {
        let path = company_dir.join(LEDGER_FILE);
        let Some(bytes) = read_optional(&path).await? else {
            trace!("no ledger at {}; starting empty", path.display());
            return Ok(Self::default());
        };

        let ledger: Self = serde_json::from_slice(&bytes).map_err(|source| {
            error!("ledger at {} does not parse, error({source})", path.display());
            SpiderError::LedgerCorrupt {
                path: path.clone(),
                source,
            }
        })?;
        debug!("loaded {} ledger entries from {}", ledger.len(), path.display());
        Ok(ledger)
    }

    /// Overwrite the ledger in `company_dir` with the full mapping.
    pub async fn save(&self, company_dir: &Path) -> Result<(), SpiderError> {
        let path = company_dir.join(LEDGER_FILE);
        debug!("saving {} ledger entries to {}", self.len(), path.display());
        write_json(&path, self, true).await
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.0.get(url).map(String::as_str)
    }

    /// Record a downloaded `url`; existing entries are left as they are.
    pub fn insert(&mut self, url: String, filename: String) {
        self.0.entry(url).or_insert(filename);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }
}

/// Small per-company record the front end reads to find the ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub name: String,
    pub ticker: Option<String>,
}

impl Metadata {
    /// Rewrite the metadata record in `company_dir` in full.
    pub async fn write(&self, company_dir: &Path) -> Result<(), SpiderError> {
        let path = company_dir.join(METADATA_FILE);
        trace!("writing metadata to {}", path.display());
        write_json(&path, self, false).await
    }
}
