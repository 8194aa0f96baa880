use std::path::{Path, PathBuf};

use url::Url;

/// Cap on derived resource filenames; longer names risk filesystem
/// path-length limits. Truncation keeps the extension suffix.
const MAX_RESOURCE_FILENAME_LEN: usize = 200;

const PAGE_EXTENSION: &str = ".html";
const RESOURCE_DIR_SUFFIX: &str = "_files";

/// Filenames and paths derived once per page run, all deterministic
/// functions of the page URL and the output directory.
#[derive(Debug, Clone)]
pub struct DerivedNames {
    pub page_filename: String,
    pub resource_dir_name: String,
    pub page_path: PathBuf,
    pub resource_dir_path: PathBuf,
}

impl DerivedNames {
    pub fn new(url: &Url, output_dir: &Path) -> Self {
        let page_filename = page_filename(url);
        let stem = page_filename
            .strip_suffix(PAGE_EXTENSION)
            .unwrap_or(&page_filename);
        let resource_dir_name = format!("{stem}{RESOURCE_DIR_SUFFIX}");
        let page_path = output_dir.join(&page_filename);
        let resource_dir_path = output_dir.join(&resource_dir_name);

        Self {
            page_filename,
            resource_dir_name,
            page_path,
            resource_dir_path,
        }
    }
}

/// Derives the saved page's filename: host and path with every
/// non-alphanumeric run collapsed to a single `-`, plus an `.html` extension.
/// `https://example.com/test` becomes `example-com-test.html`.
pub fn page_filename(url: &Url) -> String {
    let raw = format!("{}{}", url.host_str().unwrap_or_default(), url.path());
    format!("{}{}", sanitize(&raw, false), PAGE_EXTENSION)
}

/// Derives a downloaded resource's filename. Same transform as
/// [`page_filename`] except dots in the path survive, so file extensions do
/// too: `/assets/app.css` under `example.com` becomes
/// `example-com-assets-app.css`.
pub fn resource_filename(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().replace('.', "-");
    let raw = format!("{}{}", host, url.path());
    truncate_preserving_extension(sanitize(&raw, true))
}

fn sanitize(input: &str, keep_dots: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() || (keep_dots && c == '.') {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

fn truncate_preserving_extension(name: String) -> String {
    if name.len() <= MAX_RESOURCE_FILENAME_LEN {
        return name;
    }
    let extension = name.rfind('.').map(|i| &name[i..]).unwrap_or("");
    let stem = &name[..name.len() - extension.len()];
    let keep = MAX_RESOURCE_FILENAME_LEN
        .saturating_sub(extension.len())
        .min(stem.len());
    format!("{}{}", &stem[..keep], extension)
}
