use select::document::Document;
use select::predicate::Name;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Image,
    Stylesheet,
    Script,
    HtmlLink,
}

/// A reference discovered in the page that qualifies for download.
///
/// `original` is the attribute value exactly as it appears in the markup; it
/// doubles as the rewrite key, so the post-download reconciliation pass can
/// swap the attribute without holding any reference into the parsed tree.
#[derive(Debug, Clone)]
pub struct CandidateResource {
    pub url: Url,
    pub resource_type: ResourceType,
    pub attribute: &'static str,
    pub original: String,
    /// Canonical links are downloaded but their attribute stays untouched.
    pub rewritable: bool,
}

/// Returns true iff `reference` resolves against `base` to the same host.
/// Unresolvable or host-less references are simply not local; classification
/// never fails.
pub fn is_local(reference: &str, base: &Url) -> bool {
    match resolve(reference, base) {
        Some(resolved) => same_host(&resolved, base),
        None => false,
    }
}

fn same_host(candidate: &Url, base: &Url) -> bool {
    match (candidate.host_str(), base.host_str()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn resolve(reference: &str, base: &Url) -> Option<Url> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        Url::parse(reference).ok()
    } else if let Some(rest) = reference.strip_prefix("//") {
        // Protocol-relative URL
        Url::parse(&format!("{}://{}", base.scheme(), rest)).ok()
    } else {
        base.join(reference).ok()
    }
}

/// Walks the parsed document and emits every local reference eligible for
/// download, in document order per category: images, stylesheet/canonical
/// links, scripts, then anchors to HTML pages. Read-only; no I/O.
pub fn discover(html: &str, base: &Url) -> Vec<CandidateResource> {
    let document = Document::from(html);
    let mut candidates = Vec::new();

    for img in document.find(Name("img")) {
        if let Some(src) = img.attr("src") {
            push_local(&mut candidates, src, "src", ResourceType::Image, true, base);
        }
    }

    for link in document.find(Name("link")) {
        let (href, rel) = match (link.attr("href"), link.attr("rel")) {
            (Some(href), Some(rel)) => (href, rel),
            _ => continue,
        };
        if rel.contains("stylesheet") {
            push_local(
                &mut candidates,
                href,
                "href",
                ResourceType::Stylesheet,
                true,
                base,
            );
        } else if rel.contains("canonical") {
            push_local(
                &mut candidates,
                href,
                "href",
                ResourceType::HtmlLink,
                false,
                base,
            );
        }
    }

    for script in document.find(Name("script")) {
        if let Some(src) = script.attr("src") {
            push_local(&mut candidates, src, "src", ResourceType::Script, true, base);
        }
    }

    for anchor in document.find(Name("a")) {
        let href = match anchor.attr("href") {
            Some(href) => href,
            None => continue,
        };
        // Same-document fragment references are not resources.
        if href.starts_with('#') {
            continue;
        }
        if let Some(resolved) = resolve(href, base) {
            if same_host(&resolved, base) && looks_like_html_page(resolved.path()) {
                candidates.push(CandidateResource {
                    url: resolved,
                    resource_type: ResourceType::HtmlLink,
                    attribute: "href",
                    original: href.to_string(),
                    rewritable: true,
                });
            }
        }
    }

    candidates
}

fn push_local(
    out: &mut Vec<CandidateResource>,
    reference: &str,
    attribute: &'static str,
    resource_type: ResourceType,
    rewritable: bool,
    base: &Url,
) {
    let resolved = match resolve(reference, base) {
        Some(resolved) => resolved,
        None => return,
    };
    if !same_host(&resolved, base) {
        return;
    }
    out.push(CandidateResource {
        url: resolved,
        resource_type,
        attribute,
        original: reference.to_string(),
        rewritable,
    });
}

/// Anchor targets count as downloadable pages when the path ends in
/// `.html`/`.htm`, has no extension in its final segment, or is
/// directory-style (trailing slash).
fn looks_like_html_page(path: &str) -> bool {
    if path.ends_with(".html") || path.ends_with(".htm") || path.ends_with('/') {
        return true;
    }
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    !last_segment.contains('.')
}
