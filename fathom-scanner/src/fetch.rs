use crate::error::{Result, ScanError};
use reqwest::Client;
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A fully received response, after redirects have been followed.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: Url,
    pub status: u16,
    /// Header names are lower-cased. Repeated headers are joined with `", "`.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl FetchedPage {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(|s| s.as_str())
    }

    pub fn is_html(&self) -> bool {
        self.content_type()
            .map(|ct| ct.to_ascii_lowercase().contains("text/html"))
            .unwrap_or(false)
    }
}

/// Transport used by the crawler.
///
/// `fetch` must follow redirects and report only the final URL. Any status
/// outside 2xx/3xx is an error. `probe` is a cheap existence check used when
/// resolving scheme-less seeds.
pub trait Fetcher {
    fn fetch(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> impl Future<Output = Result<FetchedPage>> + Send;

    fn probe(&self, url: &Url, timeout: Duration) -> impl Future<Output = Result<u16>> + Send;
}

/// `Fetcher` backed by pooled reqwest clients. The pools live as long as
/// the fetcher, so one fetcher is built per crawl.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    /// Never follows redirects; a probe is judged by its first hop.
    probe_client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("fathom/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(Policy::limited(10))
            .build()?;

        let probe_client = Client::builder()
            .user_agent(concat!("fathom/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            probe_client,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            headers
                .entry(name.as_str().to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        let body = response.text().await?;

        Ok(FetchedPage {
            final_url,
            status,
            headers,
            body,
        })
    }

    async fn probe(&self, url: &Url, timeout: Duration) -> Result<u16> {
        debug!("HEAD {}", url);

        let response = self
            .probe_client
            .head(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ScanError::FetchError(format!("probe of {} failed: {}", url, e)))?;

        Ok(response.status().as_u16())
    }
}
