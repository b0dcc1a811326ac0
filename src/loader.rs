//! Fetches a published sheet and normalizes it into typed rows.
//!
//! [`load`] never fails. Any [`LoadError`] (no URL configured, transport
//! failure, non-2xx status, timeout, unreadable local input, undecodable or
//! unparseable text) is logged and replaced by the dataset's built-in sample
//! rows, and the returned [`Loaded::origin`] says so.
//!
//! [`Session`] holds the current collection and applies last-load-wins: a
//! refresh that finishes after a newer one has started is discarded.

use std::{
    fmt,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use anyhow::{Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::{
    error::LoadError,
    event::{MaintenanceEvent, sample_events},
    io_utils,
    parser::parse_csv,
    quotation::{Quotation, sample_quotations},
    record::Tabular,
};

/// A row type that can be loaded from a published sheet.
pub trait Dataset: Tabular + Send + Sync + 'static {
    /// Section of the config file holding this dataset's URL.
    const CONFIG_KEY: &'static str;

    /// Built-in rows used when loading fails. Never empty.
    fn sample() -> Vec<Self>;
}

impl Dataset for Quotation {
    const CONFIG_KEY: &'static str = "quotations";

    fn sample() -> Vec<Self> {
        sample_quotations()
    }
}

impl Dataset for MaintenanceEvent {
    const CONFIG_KEY: &'static str = "events";

    fn sample() -> Vec<Self> {
        sample_events()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    /// A local file, or stdin when the path is `-`.
    File {
        path: PathBuf,
        encoding: &'static Encoding,
    },
}

impl Source {
    /// Picks the first available of: local input, explicit URL, configured URL.
    pub fn resolve(
        input: Option<PathBuf>,
        encoding: &'static Encoding,
        url: Option<String>,
        configured: Option<&str>,
    ) -> Option<Source> {
        if let Some(path) = input {
            return Some(Source::File { path, encoding });
        }
        url.or_else(|| configured.map(str::to_string))
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .map(Source::Url)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File { path, .. } if io_utils::is_dash(path) => f.write_str("stdin"),
            Source::File { path, .. } => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug)]
pub enum Origin {
    /// Rows came from the requested source.
    Live,
    /// Loading failed and the built-in sample rows were substituted.
    Sample { reason: LoadError },
}

#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub origin: Origin,
}

impl<T> Loaded<T> {
    pub fn is_sample(&self) -> bool {
        matches!(self.origin, Origin::Sample { .. })
    }

    pub fn fallback_reason(&self) -> Option<&LoadError> {
        match &self.origin {
            Origin::Sample { reason } => Some(reason),
            Origin::Live => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Loader {
    client: reqwest::Client,
    timeout: Duration,
}

impl Loader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Building HTTP client")?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whole-body text of `source`.
    pub async fn fetch(&self, source: &Source) -> Result<String, LoadError> {
        match source {
            Source::Url(url) => self.fetch_url(url).await,
            Source::File { path, encoding } => {
                info!("Reading CSV from {source}");
                io_utils::read_input(path, *encoding)
            }
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String, LoadError> {
        info!("Fetching CSV from {url}");
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|source| LoadError::Request {
                    url: url.to_string(),
                    source,
                })?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            response.bytes().await.map_err(|source| LoadError::Request {
                url: url.to_string(),
                source,
            })
        };
        let bytes = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| LoadError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            })??;
        debug!("Received {} byte(s) from {url}", bytes.len());
        io_utils::decode_bytes(&bytes, UTF_8)
    }
}

/// Loads and normalizes a dataset, surfacing every failure.
pub async fn try_load<T: Dataset>(
    loader: &Loader,
    source: Option<&Source>,
) -> Result<Vec<T>, LoadError> {
    let source = source.ok_or(LoadError::Unconfigured {
        dataset: T::CONFIG_KEY,
    })?;
    let text = loader.fetch(source).await?;
    let records = parse_csv(&text)?;
    let rows = T::from_records(&records);
    info!("Loaded {} {}(s) from {source}", rows.len(), T::NAME);
    Ok(rows)
}

/// Loads a dataset, substituting sample rows on any failure.
pub async fn load<T: Dataset>(loader: &Loader, source: Option<&Source>) -> Loaded<T> {
    match try_load(loader, source).await {
        Ok(records) => Loaded {
            records,
            origin: Origin::Live,
        },
        Err(reason) => {
            warn!("Falling back to sample {} data: {reason}", T::NAME);
            Loaded {
                records: T::sample(),
                origin: Origin::Sample { reason },
            }
        }
    }
}

#[derive(Debug)]
pub enum Refresh<T> {
    /// This load is now the session's current collection.
    Applied(Arc<Loaded<T>>),
    /// A newer refresh started while this one was in flight; its result was dropped.
    Superseded,
}

/// Holder of the single raw collection a dashboard works from.
#[derive(Debug)]
pub struct Session<T> {
    generation: AtomicU64,
    current: RwLock<Option<Arc<Loaded<T>>>>,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }
}

impl<T: Dataset> Session<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<Loaded<T>>> {
        self.current.read().await.clone()
    }

    pub async fn refresh(&self, loader: &Loader, source: Option<&Source>) -> Refresh<T> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let loaded = load::<T>(loader, source).await;

        let mut current = self.current.write().await;
        let latest = self.generation.load(Ordering::SeqCst);
        if latest != ticket {
            debug!("Discarding {} load #{ticket}; load #{latest} is newer", T::NAME);
            return Refresh::Superseded;
        }
        let loaded = Arc::new(loaded);
        *current = Some(Arc::clone(&loaded));
        Refresh::Applied(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn loader() -> Loader {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Loader::with_client(client, Duration::from_secs(2))
    }

    #[test]
    fn resolve_prefers_input_then_url_then_config() {
        let from_file = Source::resolve(
            Some(PathBuf::from("q.csv")),
            UTF_8,
            Some("https://a".into()),
            Some("https://b"),
        );
        assert!(matches!(from_file, Some(Source::File { .. })));
        assert_eq!(
            Source::resolve(None, UTF_8, Some("https://a".into()), Some("https://b")),
            Some(Source::Url("https://a".into()))
        );
        assert_eq!(
            Source::resolve(None, UTF_8, None, Some("https://b")),
            Some(Source::Url("https://b".into()))
        );
        assert_eq!(Source::resolve(None, UTF_8, None, None), None);
    }

    #[tokio::test]
    async fn unconfigured_source_falls_back_to_sample() {
        let loaded = load::<Quotation>(&loader(), None).await;
        assert!(loaded.is_sample());
        assert!(!loaded.records.is_empty());
        assert!(matches!(
            loaded.fallback_reason(),
            Some(LoadError::Unconfigured {
                dataset: "quotations"
            })
        ));
    }

    #[tokio::test]
    async fn local_file_loads_live_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Fecha,Prioridad,Estado").unwrap();
        writeln!(file, "01-03-2025,Alta,Pendiente").unwrap();
        let source = Source::File {
            path: file.path().to_path_buf(),
            encoding: UTF_8,
        };
        let loaded = load::<MaintenanceEvent>(&loader(), Some(&source)).await;
        assert!(!loaded.is_sample());
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].priority, "Alta");
    }

    #[tokio::test]
    async fn header_only_file_is_an_empty_success() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Fecha,Prioridad").unwrap();
        let source = Source::File {
            path: file.path().to_path_buf(),
            encoding: UTF_8,
        };
        let loaded = load::<MaintenanceEvent>(&loader(), Some(&source)).await;
        assert!(!loaded.is_sample());
        assert!(loaded.records.is_empty());
    }

    #[tokio::test]
    async fn empty_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        let source = Source::File {
            path: file.path().to_path_buf(),
            encoding: UTF_8,
        };
        let loaded = load::<MaintenanceEvent>(&loader(), Some(&source)).await;
        assert!(matches!(
            loaded.fallback_reason(),
            Some(LoadError::Parse(crate::error::ParseError::Empty))
        ));
    }

    #[tokio::test]
    async fn session_keeps_latest_result() {
        let session = Session::<Quotation>::new();
        assert!(session.current().await.is_none());
        let refresh = session.refresh(&loader(), None).await;
        assert!(matches!(refresh, Refresh::Applied(_)));
        let current = session.current().await.unwrap();
        assert!(current.is_sample());
    }
}
