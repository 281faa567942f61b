use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::USER_AGENT;
use select::document::Document;
use select::predicate::Name;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::ToolsError;
use crate::tabular::{self, Cell};

const FETCH_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:78.0) Gecko/20100101 Firefox/78.0";

/// Fixed retry parameters for HTTP fetches.
const MAX_RETRIES: u32 = 5;
const RETRY_WAIT_MS: u64 = 1000;

/// Read genome-directory URLs from column 0 of a spreadsheet.
///
/// Cells whose text does not look like a URL are skipped; an empty result
/// is not an error.
pub fn read_genome_urls(path: &Path) -> Result<Vec<String>, ToolsError> {
    let table = tabular::load(path)?;
    let urls: Vec<String> = table
        .rows
        .iter()
        .filter_map(|row| row.first())
        .filter_map(|cell| match cell {
            Cell::Text(s) if s.starts_with("http") => Some(s.clone()),
            _ => None,
        })
        .collect();
    info!("Read {} genome links from {:?}", urls.len(), path);
    Ok(urls)
}

/// Crawler over NCBI's FTP-style assembly directory listings.
pub struct AssemblyCrawler {
    client: reqwest::Client,
}

impl Default for AssemblyCrawler {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyCrawler {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// URLs of the `genomic.fna.gz` files under one genome directory: one
    /// per assembly version, shortest candidate each.
    ///
    /// The genome URL must carry its trailing slash, as listed in the input
    /// spreadsheet.
    pub async fn genomic_fna_urls(&self, genome_url: &str) -> Result<Vec<String>, ToolsError> {
        let body = self.fetch_text(genome_url).await?;
        let versions_url = format!("{genome_url}{}", versions_suffix(&body));
        let listing = self.fetch_text(&versions_url).await?;

        let subdirs = parse_listing(&listing, &versions_url);
        debug!("Assembly versions under {}: {:?}", genome_url, subdirs);

        let mut urls = Vec::new();
        for subdir in subdirs {
            let page = self.fetch_text(&subdir).await?;
            if let Some(target) = pick_genomic_fna(&page, &subdir) {
                urls.push(target);
            }
        }
        Ok(urls)
    }

    /// Download one file into `output_dir`, keeping the remote file name.
    pub async fn download(&self, url: &str, output_dir: &Path) -> Result<PathBuf, ToolsError> {
        let target = output_dir.join(filename_from_url(url));

        let mut last_error = None;
        for attempt in 0..MAX_RETRIES {
            match self.try_download(url, &target).await {
                Ok(()) => {
                    info!("Downloaded {} to {:?}", url, target);
                    return Ok(target);
                }
                Err(e) if e.is_retryable() => {
                    warn!(
                        "Download attempt {} failed for {}, retrying in {}ms: {}",
                        attempt + 1,
                        url,
                        RETRY_WAIT_MS,
                        e
                    );
                    sleep(Duration::from_millis(RETRY_WAIT_MS)).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ToolsError::Timeout(format!("max retries exceeded for {url}"))))
    }

    async fn try_download(&self, url: &str, target: &Path) -> Result<(), ToolsError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, FETCH_USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(target, &bytes).await?;
        Ok(())
    }

    /// GET a page as text, retrying with the fixed parameters.
    async fn fetch_text(&self, url: &str) -> Result<String, ToolsError> {
        let mut last_error = None;
        for attempt in 0..MAX_RETRIES {
            match self.try_fetch(url).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() => {
                    warn!(
                        "Fetch attempt {} failed for {}, retrying in {}ms: {}",
                        attempt + 1,
                        url,
                        RETRY_WAIT_MS,
                        e
                    );
                    sleep(Duration::from_millis(RETRY_WAIT_MS)).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| ToolsError::Timeout(format!("max retries exceeded for {url}"))))
    }

    async fn try_fetch(&self, url: &str) -> Result<String, ToolsError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, FETCH_USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Which versions directory a genome listing advertises.
fn versions_suffix(body: &str) -> &'static str {
    if body.contains("latest_assembly_versions") {
        "latest_assembly_versions/"
    } else {
        "all_assembly_versions/"
    }
}

/// Entries of an FTP-style directory listing: anchors inside the first
/// `<pre>`, skipping the parent-directory entry.
fn parse_listing(html: &str, base_url: &str) -> Vec<String> {
    let document = Document::from(html);
    let Some(pre) = document.find(Name("pre")).next() else {
        return Vec::new();
    };
    pre.find(Name("a"))
        .skip(1)
        .filter_map(|a| a.attr("href"))
        .map(|href| format!("{base_url}{href}"))
        .collect()
}

/// The shortest `genomic.fna.gz` URL in one version directory, if any.
fn pick_genomic_fna(html: &str, base_url: &str) -> Option<String> {
    let document = Document::from(html);
    let pre = document.find(Name("pre")).next()?;
    pre.find(Name("a"))
        .skip(1)
        .filter_map(|a| a.attr("href"))
        .filter(|href| href.ends_with("genomic.fna.gz"))
        .map(|href| format!("{base_url}{href}"))
        .min_by_key(|url| url.len())
}

fn filename_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}
