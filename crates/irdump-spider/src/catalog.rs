//! The read side of the data root: which companies have been scraped, which files each holds,
//! and their metadata. Nothing here writes.

use crate::fs::read_json;
use crate::ledger::{Ledger, Metadata};
use crate::SpiderError;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Sorted names of the company directories under `data_root`; empty if it does not exist.
pub async fn list_companies(data_root: &Path) -> Result<Vec<String>, SpiderError> {
    let mut entries = match tokio::fs::read_dir(data_root).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut companies = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                companies.push(name.to_string());
            }
        }
    }
    companies.sort();
    Ok(companies)
}

/// `<data_root>/<slug>`, or `None` for a slug that is empty or could escape the data root.
pub fn company_dir(data_root: &Path, slug: &str) -> Option<PathBuf> {
    let unsafe_slug = slug.is_empty()
        || slug == "."
        || slug == ".."
        || slug.contains(['/', '\\'])
        || slug.contains('\0');
    (!unsafe_slug).then(|| data_root.join(slug))
}

/// Sorted filenames recorded in the company's ledger; `None` if the company is unknown.
pub async fn company_files(
    data_root: &Path,
    slug: &str,
) -> Result<Option<Vec<String>>, SpiderError> {
    let Some(dir) = company_dir(data_root, slug) else {
        return Ok(None);
    };
    if !tokio::fs::try_exists(&dir).await? {
        return Ok(None);
    }

    let ledger = Ledger::load(&dir).await?;
    let mut files: Vec<String> = ledger.filenames().map(str::to_string).collect();
    files.sort();
    files.dedup();
    Ok(Some(files))
}

/// The metadata record of a company directory, if present and readable.
pub async fn read_metadata(company_dir: &Path) -> Option<Metadata> {
    let path = company_dir.join(crate::ledger::METADATA_FILE);
    match read_json(&path).await {
        Ok(metadata) => metadata,
        Err(err) => {
            warn!("unreadable metadata at {}, error({err})", path.display());
            None
        }
    }
}

/// Human-readable company name from a slug: underscores become spaces, and every letter that
/// follows a non-letter is upper-cased while the rest are lower-cased.
///
/// ```rust
/// use irdump_spider::catalog::display_name;
///
/// assert_eq!(display_name("sofi_technologies"), "Sofi Technologies");
/// ```
pub fn display_name(slug: &str) -> String {
    let mut title = String::with_capacity(slug.len());
    let mut in_word = false;
    for ch in slug.chars().map(|ch| if ch == '_' { ' ' } else { ch }) {
        if in_word {
            title.extend(ch.to_lowercase());
        } else {
            title.extend(ch.to_uppercase());
        }
        in_word = ch.is_alphabetic();
    }
    title
}
