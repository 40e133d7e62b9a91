//! Retrieval of the raw CSV text from its published locations.
//!
//! The `Source` trait is the seam between the program and the network. `HttpSource` talks to the
//! real published sheet while `TestSource` serves canned responses from memory, so the whole
//! program can run top-to-bottom without network access.

mod http_source;
mod test_source;

use crate::Result;
use anyhow::anyhow;
use tracing::{debug, warn};
use url::Url;

pub(crate) use http_source::HttpSource;
pub use test_source::{TestResponse, TestSource, TEST_SOURCE_URL};

/// The environment variable that switches the program into `Mode::Testing`.
pub const TEST_MODE_ENV: &str = "CASH_AUDIT_IN_TEST_MODE";

/// Retrieves the text body published at a URL.
#[async_trait::async_trait]
pub trait Source {
    /// Returns the body of a successful (2xx) response. Any other status, or a transport failure,
    /// is an error.
    async fn get(&mut self, url: &Url) -> Result<String>;
}

/// Selects which `Source` implementation the program uses.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Fetch over HTTP.
    #[default]
    Http,
    /// Serve seeded data from memory.
    Testing,
}

impl Mode {
    /// `Mode::Testing` when `CASH_AUDIT_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Http,
        }
    }
}

/// Creates the `Source` for `mode`.
pub fn source(mode: Mode) -> Result<Box<dyn Source + Send>> {
    Ok(match mode {
        Mode::Http => Box::new(HttpSource::new()?),
        Mode::Testing => Box::new(TestSource::default()),
    })
}

/// Tries each of `urls` in order and returns the body of the first one that succeeds.
///
/// Failures are logged and the next URL is tried. There are no retries beyond the list. When every
/// URL fails, the last failure is returned, or a generic `fetch failed` error if `urls` is empty.
pub async fn fetch_first_available(
    source: &mut (dyn Source + Send),
    urls: &[Url],
) -> Result<String> {
    let mut last_error = None;
    for url in urls {
        match source.get(url).await {
            Ok(text) => {
                debug!("Fetched {} bytes from {url}", text.len());
                return Ok(text);
            }
            Err(e) => {
                warn!("Failed to fetch {url}: {e:#}");
                last_error = Some(e);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| anyhow!("fetch failed")))
}
