use std::fs;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::{classify_io_error, LoadError, ResourceDownloadError};
use crate::fetch;
use crate::naming::{self, DerivedNames};
use crate::resources::{self, CandidateResource};

/// Result of one candidate's download, positionally matched to the candidate
/// list produced by discovery.
#[derive(Debug)]
pub enum DownloadOutcome {
    Success { filename: String },
    Failure(ResourceDownloadError),
}

/// Downloads a single page and its local resources into `output_dir`,
/// rewriting the saved markup to reference the local copies. Returns the
/// absolute path of the saved page file.
///
/// Individual resource failures are logged and leave the original reference
/// untouched; only page-level failures abort the call.
pub async fn load_page(url: &str, output_dir: &Path) -> Result<PathBuf, LoadError> {
    let page_url = parse_page_url(url)?;
    let output_dir = check_output_dir(output_dir)?;
    let names = DerivedNames::new(&page_url, &output_dir);

    debug!("starting page download: {url} to {}", output_dir.display());
    debug!("generated filename: {}", names.page_filename);
    debug!("files directory: {}", names.resource_dir_path.display());

    let client = fetch::build_http_client()?;
    let body = fetch::fetch_page(&client, &page_url).await?;

    let candidates = resources::discover(&body, &page_url);
    if candidates.is_empty() {
        debug!("no local resources found, saving page directly");
        write_page(&names.page_path, body.as_bytes())?;
        return Ok(names.page_path);
    }

    debug!("found {} local resources", candidates.len());
    fs::create_dir_all(&names.resource_dir_path)
        .map_err(|e| classify_io_error(e, &names.resource_dir_path))?;

    let outcomes = download_resources(&client, &candidates, &names).await;
    let rewritten = apply_rewrites(&body, &candidates, &outcomes, &names.resource_dir_name);
    write_page(&names.page_path, rewritten.as_bytes())?;

    debug!("page saved successfully: {}", names.page_path.display());
    Ok(names.page_path)
}

/// Fan-out/fan-in over all candidates: every download runs concurrently and
/// the call returns once each one has settled. A failed candidate never
/// aborts its siblings.
pub async fn download_resources(
    client: &Client,
    candidates: &[CandidateResource],
    names: &DerivedNames,
) -> Vec<DownloadOutcome> {
    let downloads = candidates
        .iter()
        .map(|candidate| download_one(client, candidate, &names.resource_dir_path));
    join_all(downloads).await
}

async fn download_one(
    client: &Client,
    candidate: &CandidateResource,
    resource_dir: &Path,
) -> DownloadOutcome {
    match try_download(client, candidate, resource_dir).await {
        Ok(filename) => {
            debug!("resource saved: {filename}");
            DownloadOutcome::Success { filename }
        }
        Err(err) => {
            warn!("{err}");
            DownloadOutcome::Failure(err)
        }
    }
}

async fn try_download(
    client: &Client,
    candidate: &CandidateResource,
    resource_dir: &Path,
) -> Result<String, ResourceDownloadError> {
    let payload = fetch::fetch_resource(client, candidate).await?;

    let filename = naming::resource_filename(&candidate.url);
    let path = resource_dir.join(&filename);

    // Safe to race with sibling downloads; creation is idempotent.
    fs::create_dir_all(resource_dir).map_err(|e| store_error(candidate, &path, &e))?;
    fs::write(&path, payload.as_bytes()).map_err(|e| store_error(candidate, &path, &e))?;

    // A reference is only rewritten to a file that actually materialized.
    let verified = fs::metadata(&path)
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !verified {
        return Err(ResourceDownloadError {
            url: candidate.url.to_string(),
            reason: format!("written file did not materialize: {}", path.display()),
        });
    }

    Ok(filename)
}

fn store_error(
    candidate: &CandidateResource,
    path: &Path,
    error: &std::io::Error,
) -> ResourceDownloadError {
    ResourceDownloadError {
        url: candidate.url.to_string(),
        reason: format!("failed to store {}: {error}", path.display()),
    }
}

/// Single-threaded reconciliation pass run after every download has settled:
/// successful, rewritable candidates get their attribute pointed at
/// `resource_dir_name/filename`; everything else stays byte-identical.
pub fn apply_rewrites(
    html: &str,
    candidates: &[CandidateResource],
    outcomes: &[DownloadOutcome],
    resource_dir_name: &str,
) -> String {
    let mut rewritten = html.to_string();

    // Replacement is document-wide per attribute string, so any string owned
    // by a download-only candidate must survive verbatim even when a
    // rewritable candidate carries the same value.
    let protected: Vec<(&str, &str)> = candidates
        .iter()
        .filter(|c| !c.rewritable)
        .map(|c| (c.attribute, c.original.as_str()))
        .collect();

    for (candidate, outcome) in candidates.iter().zip(outcomes) {
        let filename = match outcome {
            DownloadOutcome::Success { filename } => filename,
            DownloadOutcome::Failure(_) => continue,
        };
        if !candidate.rewritable {
            continue;
        }
        if protected
            .iter()
            .any(|&(attr, original)| attr == candidate.attribute && original == candidate.original)
        {
            debug!(
                "leaving {} {} unchanged, value shared with a download-only reference",
                candidate.attribute, candidate.original
            );
            continue;
        }
        // Forward-slash join: this path lands in markup, not in an OS path.
        let local = format!("{resource_dir_name}/{filename}");
        rewritten = rewritten.replace(
            &format!("{}=\"{}\"", candidate.attribute, candidate.original),
            &format!("{}=\"{}\"", candidate.attribute, local),
        );
        debug!(
            "updated {} {} to: {local}",
            candidate.attribute, candidate.original
        );
    }

    rewritten
}

fn parse_page_url(input: &str) -> Result<Url, LoadError> {
    let parsed = Url::parse(input).map_err(|_| LoadError::InvalidUrl(input.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(LoadError::InvalidUrl(input.to_string()));
    }
    Ok(parsed)
}

fn check_output_dir(dir: &Path) -> Result<PathBuf, LoadError> {
    let metadata = match fs::metadata(dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::DirectoryNotFound(dir.to_path_buf()))
        }
        Err(e) => return Err(classify_io_error(e, dir)),
    };
    if !metadata.is_dir() {
        return Err(LoadError::NotADirectory(dir.to_path_buf()));
    }
    // Canonicalized so the returned page path is absolute.
    fs::canonicalize(dir).map_err(|e| classify_io_error(e, dir))
}

fn write_page(path: &Path, contents: &[u8]) -> Result<(), LoadError> {
    fs::write(path, contents).map_err(|e| classify_io_error(e, path))
}
