use crate::extract::{self, DiscoveredLink, Renderer};
use crate::fetch::Fetch;
use crate::fs::{ensure_dir, write_atomic};
use crate::ledger::{Ledger, Metadata, LEDGER_FILE, METADATA_FILE};
use crate::publish::{LogPublisher, Publish};
use crate::roster::Company;
use crate::SpiderError;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};
use url::Url;

/// Which extractor produced the candidate links of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    Static,
    Dynamic,
}

/// How a company's pass ended. Early endings are soft: the next batch run tries again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// The IR page could not be fetched.
    PageUnavailable,
    /// Neither extractor found a candidate link.
    NoLinks,
    Completed(PassReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub extraction: Extraction,
    /// Hrefs returned by the extractor, duplicates included.
    pub found: usize,
    /// Resolved URLs already present in the ledger.
    pub skipped: usize,
    /// Newly downloaded files, in download order.
    pub downloaded: Vec<PathBuf>,
    /// Source URLs whose download failed.
    pub failed: Vec<String>,
}

/// Runs one scrape pass per company: fetch the IR page, discover document links, download the
/// ones the ledger has not seen, persist the ledger, then publish the new files.
///
/// Each company's directory under `data_root` is owned by its pass; passes are never run
/// concurrently.
pub struct Spider<F, P = LogPublisher> {
    fetcher: F,
    renderer: Renderer,
    publisher: P,
    data_root: PathBuf,
}

impl<F: Fetch> Spider<F> {
    /// A spider with no dynamic renderer and the logging publish hook.
    pub fn new(fetcher: F, data_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            renderer: Renderer::Unavailable,
            publisher: LogPublisher,
            data_root: data_root.into(),
        }
    }
}

impl<F: Fetch, P: Publish> Spider<F, P> {
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_publisher<Q: Publish>(self, publisher: Q) -> Spider<F, Q> {
        Spider {
            fetcher: self.fetcher,
            renderer: self.renderer,
            publisher,
            data_root: self.data_root,
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// One pass for `company`.
    ///
    /// Page-fetch failures, empty extractions and per-file download failures are logged and
    /// reported through the outcome. `Err` is reserved for a corrupt ledger and for I/O
    /// failures on the company directory itself.
    pub async fn scrape(&self, company: &Company) -> Result<ScrapeOutcome, SpiderError> {
        info!("scraping {}: {}", company.name, company.ir_url);

        let dir = company.dir(&self.data_root);
        ensure_dir(&dir).await?;
        debug!("company directory: {}", dir.display());

        Metadata {
            name: company.name.clone(),
            ticker: company.ticker.clone(),
        }
        .write(&dir)
        .await?;

        let mut ledger = Ledger::load(&dir).await?;

        // -- FETCH IR PAGE --
        let base = match Url::parse(&company.ir_url) {
            Ok(base) => base,
            Err(err) => {
                error!("invalid IR url for {}: {}, error({err})", company.name, company.ir_url);
                return Ok(ScrapeOutcome::PageUnavailable);
            }
        };
        let html = match self.fetcher.fetch_page(&company.ir_url).await {
            Ok(html) => html,
            Err(err) => {
                error!("failed to download {}, error({err})", company.ir_url);
                return Ok(ScrapeOutcome::PageUnavailable);
            }
        };

        // -- EXTRACT --
        let Some((extraction, hrefs)) = self.discover(&company.ir_url, &html).await else {
            warn!("no document links found for {} on {}", company.name, company.ir_url);
            return Ok(ScrapeOutcome::NoLinks);
        };
        debug!("found {} links on IR page ({extraction:?})", hrefs.len());

        // -- FILTER --
        let found = hrefs.len();
        let (candidates, skipped) = filter_new(&base, hrefs, &ledger);

        // -- DOWNLOAD --
        let mut downloaded = Vec::new();
        let mut entries = Vec::new();
        let mut failed = Vec::new();
        let mut written: HashMap<String, String> = ledger
            .urls()
            .zip(ledger.filenames())
            .map(|(url, filename)| (filename.to_string(), url.to_string()))
            .collect();

        for (link, filename) in candidates {
            let url = link.url.to_string();
            if let Some(previous) = written.get(&filename).filter(|previous| **previous != url) {
                warn!("{filename} from {url} overwrites the copy downloaded from {previous}");
            }

            let dest = dir.join(&filename);
            info!("  downloading {url}");
            match self.download(&url, &dest).await {
                Ok(()) => {
                    written.insert(filename.clone(), url.clone());
                    entries.push((url, filename));
                    downloaded.push(dest);
                }
                Err(err) => {
                    error!("  failed {url}, error({err})");
                    failed.push(url);
                }
            }
        }

        // -- PERSIST & PUBLISH --
        if !downloaded.is_empty() {
            for (url, filename) in entries {
                ledger.insert(url, filename);
            }
            ledger.save(&dir).await?;

            for path in &downloaded {
                self.publisher.publish(path).await;
            }
        } else {
            trace!("nothing new for {}; ledger left untouched", company.name);
        }

        info!(
            "{}: {} downloaded, {} failed, {} already held",
            company.name,
            downloaded.len(),
            failed.len(),
            skipped
        );

        Ok(ScrapeOutcome::Completed(PassReport {
            extraction,
            found,
            skipped,
            downloaded,
            failed,
        }))
    }

    /// Static extraction first; the renderer only runs when the delivered HTML has no
    /// candidate links.
    async fn discover(&self, url: &str, html: &str) -> Option<(Extraction, Vec<String>)> {
        let links = extract::extract_links(html);
        if !links.is_empty() {
            return Some((Extraction::Static, links));
        }

        trace!("static extraction found nothing on {url}; trying dynamic");
        match self.renderer.extract_links(url).await {
            Ok(Some(links)) if !links.is_empty() => Some((Extraction::Dynamic, links)),
            Ok(_) => None,
            Err(err) => {
                warn!("dynamic extraction of {url} failed, error({err})");
                None
            }
        }
    }

    /// Fetch the whole body, then write it; a failed fetch never touches `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), SpiderError> {
        trace!("downloading {url} -> {}", dest.display());
        let bytes = self.fetcher.fetch_binary(url).await?;
        write_atomic(dest, &bytes)
            .await
            .map_err(|err| SpiderError::FileDownload {
                url: url.to_string(),
                reason: err.to_string(),
            })?;
        trace!("wrote {} bytes to {}", bytes.len(), dest.display());
        Ok(())
    }
}

/// Resolve `hrefs` against `base` and keep the URLs that are new to the ledger, have a
/// filename the spider does not reserve for itself, and have not already been queued in this
/// pass. Returns the candidates with their
/// filenames, and the number of URLs the ledger already held.
fn filter_new(
    base: &Url,
    hrefs: Vec<String>,
    ledger: &Ledger,
) -> (Vec<(DiscoveredLink, String)>, usize) {
    let mut queued = HashSet::new();
    let mut candidates = Vec::new();
    let mut skipped = 0;

    for href in hrefs {
        let Some(link) = DiscoveredLink::resolve(base, &href) else {
            trace!("unresolvable href {href:?}");
            continue;
        };
        if ledger.contains(link.url.as_str()) {
            debug!("skipping already downloaded {}", link.url);
            skipped += 1;
            continue;
        }
        let Some(filename) = link.filename().map(str::to_string) else {
            trace!("no filename in {}", link.url);
            continue;
        };
        if is_reserved(&filename) {
            warn!("skipping {}: {filename} would clobber a bookkeeping file", link.url);
            continue;
        }
        if queued.insert(link.url.to_string()) {
            candidates.push((link, filename));
        }
    }

    (candidates, skipped)
}

/// Names the spider itself keeps in a company directory.
fn is_reserved(filename: &str) -> bool {
    filename == LEDGER_FILE || filename == METADATA_FILE || filename.ends_with(".part")
}
