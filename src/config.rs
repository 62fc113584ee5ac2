// Configuration for the upload client.
//
// `ClientConfig` is the explicit value handed to `api::DeckClient`; nothing
// in the core reads the environment or the filesystem for settings. The
// caller layer resolves it from (in order) command-line flags, the
// `DECK_UPLOAD_SERVER` environment variable, an optional JSON file in the
// user's config directory, and the defaults below.

use crate::errors::{UploadError, UploadResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "https://localhost:5001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Largest accepted timeout (one day); it must stay addable to `Instant::now()`.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;
pub const SERVER_ENV: &str = "DECK_UPLOAD_SERVER";
pub const UPLOAD_PATH: &str = "/deck/upload";

/// Settings the client needs for a request: where to send it, how long to
/// wait, and whether to validate the server certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_base: String,
    pub timeout: Duration,
    pub verify_tls: bool,
}

impl ClientConfig {
    pub fn new(server_base: impl Into<String>, timeout_secs: u64, verify_tls: bool) -> Self {
        Self {
            server_base: server_base.into(),
            timeout: Duration::from_secs(timeout_secs),
            verify_tls,
        }
    }

    /// Full upload endpoint: the base with one trailing slash removed,
    /// followed by `/deck/upload`.
    pub fn upload_url(&self) -> String {
        let base = self
            .server_base
            .strip_suffix('/')
            .unwrap_or(&self.server_base);
        format!("{}{}", base, UPLOAD_PATH)
    }

    /// Check the values before anything touches the network.
    pub fn validate(&self) -> UploadResult<reqwest::Url> {
        if self.timeout.is_zero() {
            return Err(UploadError::argument("timeout must be greater than zero"));
        }
        if self.timeout > Duration::from_secs(MAX_TIMEOUT_SECS) {
            return Err(UploadError::argument(format!(
                "timeout of {}s exceeds the maximum of {}s",
                self.timeout.as_secs(),
                MAX_TIMEOUT_SECS
            )));
        }
        let url = self.upload_url();
        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| UploadError::argument(format!("invalid server URL '{}': {}", self.server_base, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(UploadError::argument(format!(
                "unsupported URL scheme '{}' in '{}'",
                other, self.server_base
            ))),
        }
    }

    /// Whether the server base points at this machine. Turning off TLS
    /// verification for anything else needs explicit confirmation.
    pub fn is_local_host(&self) -> bool {
        match reqwest::Url::parse(&self.server_base) {
            Ok(url) => matches!(
                url.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]") | Some("::1")
            ),
            Err(_) => false,
        }
    }
}

/// Optional on-disk defaults, read from `<config_dir>/deck-upload/config.json`.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FileConfig {
    pub server: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Location of the config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deck-upload").join("config.json"))
    }

    /// Load the file at `path`. A missing file yields the empty config; a
    /// file that exists but does not parse is an argument error.
    pub fn load(path: &Path) -> UploadResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(UploadError::argument(format!(
                    "cannot read config file {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        serde_json::from_str(&text).map_err(|e| {
            UploadError::argument(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    pub fn load_default() -> UploadResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Pick the server base: flag, then environment, then file, then default.
pub fn resolve_server(flag: Option<&str>, env: Option<&str>, file: &FileConfig) -> String {
    flag.or(env)
        .or(file.server.as_deref())
        .unwrap_or(DEFAULT_SERVER)
        .to_string()
}

/// Pick the timeout in seconds: flag, then file, then default.
pub fn resolve_timeout(flag: Option<u64>, file: &FileConfig) -> u64 {
    flag.or(file.timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_url_strips_one_trailing_slash() {
        let cfg = ClientConfig::new("https://host:5001/", 30, true);
        assert_eq!(cfg.upload_url(), "https://host:5001/deck/upload");

        let cfg = ClientConfig::new("https://host:5001", 30, true);
        assert_eq!(cfg.upload_url(), "https://host:5001/deck/upload");

        let cfg = ClientConfig::new("http://host/api/", 30, true);
        assert_eq!(cfg.upload_url(), "http://host/api/deck/upload");
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero = ClientConfig::new("https://host", 0, true);
        assert!(matches!(zero.validate(), Err(UploadError::Argument(_))));

        let garbage = ClientConfig::new("not a url", 30, true);
        assert!(matches!(garbage.validate(), Err(UploadError::Argument(_))));

        let ftp = ClientConfig::new("ftp://host", 30, true);
        assert!(matches!(ftp.validate(), Err(UploadError::Argument(_))));

        let ok = ClientConfig::new("http://127.0.0.1:8080", 5, true);
        assert_eq!(
            ok.validate().unwrap().as_str(),
            "http://127.0.0.1:8080/deck/upload"
        );
    }

    #[test]
    fn oversized_timeout_is_rejected() {
        let huge = ClientConfig::new("https://host", u64::MAX, true);
        match huge.validate() {
            Err(UploadError::Argument(msg)) => assert!(msg.contains("maximum")),
            other => panic!("expected argument error, got {:?}", other),
        }

        let just_over = ClientConfig::new("https://host", MAX_TIMEOUT_SECS + 1, true);
        assert!(matches!(just_over.validate(), Err(UploadError::Argument(_))));

        let at_limit = ClientConfig::new("https://host", MAX_TIMEOUT_SECS, true);
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn local_host_detection() {
        assert!(ClientConfig::new("https://localhost:5001", 30, true).is_local_host());
        assert!(ClientConfig::new("https://127.0.0.1:7298/", 30, true).is_local_host());
        assert!(ClientConfig::new("http://[::1]:8080", 30, true).is_local_host());
        assert!(!ClientConfig::new("https://decks.example.com", 30, true).is_local_host());
        assert!(!ClientConfig::new("garbage", 30, true).is_local_host());
    }

    #[test]
    fn resolution_order() {
        let file = FileConfig {
            server: Some("https://from-file".into()),
            timeout_secs: Some(12),
        };
        assert_eq!(
            resolve_server(Some("https://flag"), Some("https://env"), &file),
            "https://flag"
        );
        assert_eq!(resolve_server(None, Some("https://env"), &file), "https://env");
        assert_eq!(resolve_server(None, None, &file), "https://from-file");
        assert_eq!(resolve_server(None, None, &FileConfig::default()), DEFAULT_SERVER);

        assert_eq!(resolve_timeout(Some(5), &file), 5);
        assert_eq!(resolve_timeout(None, &file), 12);
        assert_eq!(resolve_timeout(None, &FileConfig::default()), DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn config_file_loading() {
        let dir = std::env::temp_dir().join(format!("deck-upload-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("missing.json");
        assert_eq!(FileConfig::load(&missing).unwrap(), FileConfig::default());

        let good = dir.join("good.json");
        fs::write(&good, r#"{"server": "https://decks.local"}"#).unwrap();
        let cfg = FileConfig::load(&good).unwrap();
        assert_eq!(cfg.server.as_deref(), Some("https://decks.local"));
        assert_eq!(cfg.timeout_secs, None);

        let bad = dir.join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(FileConfig::load(&bad), Err(UploadError::Argument(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
