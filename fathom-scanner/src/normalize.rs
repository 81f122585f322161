use crate::error::{Result, ScanError};
use crate::fetch::Fetcher;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Timeout for the existence probe used during scheme resolution.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// An absolute URL with an explicit scheme and no fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn host_str(&self) -> Option<&str> {
        self.0.host_str()
    }

    pub fn into_inner(self) -> Url {
        self.0
    }
}

impl From<Url> for NormalizedUrl {
    fn from(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NormalizedUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Parse a URL that is expected to carry a scheme and drop its fragment.
pub fn parse_absolute(raw: &str) -> Result<NormalizedUrl> {
    Url::parse(raw.trim())
        .map(NormalizedUrl::from)
        .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))
}

/// Whether `raw` starts with a real scheme.
///
/// `Url::parse` happily reads `localhost:8080` as scheme `localhost`, so a
/// "scheme" followed by a digit is treated as a host and port instead.
pub fn has_scheme(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => {
            let rest = raw.get(url.scheme().len()..).unwrap_or("");
            let after_colon = rest.strip_prefix(':').unwrap_or(rest);
            !after_colon.starts_with(|c: char| c.is_ascii_digit())
        }
        Err(_) => false,
    }
}

/// Ordered scheme candidates for a scheme-less input.
pub fn scheme_candidates(raw: &str) -> Vec<Url> {
    let bare = raw.strip_prefix("www.").unwrap_or(raw);
    let mut candidates: Vec<Url> = Vec::with_capacity(4);

    for candidate in [
        format!("http://{}", raw),
        format!("https://{}", raw),
        format!("http://{}", bare),
        format!("https://{}", bare),
    ] {
        if let Ok(url) = Url::parse(&candidate)
            && !candidates.contains(&url)
        {
            candidates.push(url);
        }
    }

    candidates
}

/// Resolve `raw` into a [`NormalizedUrl`].
///
/// Inputs with a scheme only lose their fragment. Scheme-less inputs are
/// probed as `http://`, `https://`, then the same two without a leading
/// `www.`; the first candidate answering below 400 wins.
pub async fn normalize<F: Fetcher>(raw: &str, fetcher: &F) -> Result<NormalizedUrl> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScanError::InvalidUrl("empty URL".to_string()));
    }

    if has_scheme(raw) {
        return parse_absolute(raw);
    }

    for candidate in scheme_candidates(raw) {
        match fetcher.probe(&candidate, PROBE_TIMEOUT).await {
            Ok(status) if status < 400 => {
                info!("No scheme provided. Using URL: {}", candidate);
                return Ok(NormalizedUrl::from(candidate));
            }
            Ok(status) => debug!("Probe of {} returned {}", candidate, status),
            Err(e) => debug!("Probe of {} failed: {}", candidate, e),
        }
    }

    Err(ScanError::InvalidUrl(format!(
        "{}: no reachable http(s) variant",
        raw
    )))
}
