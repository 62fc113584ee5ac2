// Upload client: a small blocking HTTP client that posts one image to the
// deck server's `/deck/upload` endpoint and classifies the answer.
//
// One attempt per call, no retries. The source file is only read; removing
// temporary files is up to the caller.

use crate::config::ClientConfig;
use crate::errors::{UploadError, UploadResult};
use crate::mime::guess_mime;
use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Multipart field the server reads the image from.
pub const FILE_FIELD: &str = "file";

/// Everything one invocation needs: which file, and where/how to send it.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_path: PathBuf,
    pub server_base: String,
    pub timeout_secs: u64,
    pub verify_tls: bool,
}

impl UploadRequest {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.server_base.clone(), self.timeout_secs, self.verify_tls)
    }
}

/// Build a client from the request's settings and upload its file.
/// Returns the URL reported by the server.
pub fn upload(request: &UploadRequest) -> UploadResult<String> {
    // Check the file first so a bad path never costs a client build.
    check_file(&request.file_path)?;
    DeckClient::new(request.config())?.upload_image(&request.file_path)
}

/// Blocking client bound to one server configuration.
#[derive(Clone)]
pub struct DeckClient {
    client: Client,
    config: ClientConfig,
    endpoint: reqwest::Url,
}

impl DeckClient {
    /// Validate `config` and build the underlying reqwest client with its
    /// timeout and certificate policy.
    pub fn new(config: ClientConfig) -> UploadResult<Self> {
        let endpoint = config.validate()?;
        if !config.verify_tls {
            log::warn!(
                "TLS certificate verification disabled for {}",
                config.server_base
            );
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| UploadError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(DeckClient {
            client,
            config,
            endpoint,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Upload `file_path` as the `file` part of a multipart form.
    ///
    /// The opened file is moved into the request body, so it is closed once
    /// the request is sent or dropped, whichever way this function returns.
    pub fn upload_image(&self, file_path: &Path) -> UploadResult<String> {
        let part = file_part(file_path)?;
        let form = multipart::Form::new().part(FILE_FIELD, part);

        log::info!("Uploading {} to {}", file_path.display(), self.endpoint);
        let res = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()?;

        let status = res.status();
        log::debug!("Server answered {}", status);
        if !status.is_success() {
            // Best effort: an unreadable body is reported as empty.
            let body = res.text().unwrap_or_default();
            return Err(UploadError::Http {
                status: status.as_u16(),
                body,
            });
        }
        let body = res.text()?;
        parse_upload_response(status, &body)
    }
}

/// Open `file_path` and wrap it in a multipart part carrying its base name
/// and inferred MIME type.
fn file_part(file_path: &Path) -> UploadResult<multipart::Part> {
    check_file(file_path)?;
    let file_name = upload_file_name(file_path)?;
    let mime = guess_mime(file_path);
    log::debug!("{} -> {} ({})", file_path.display(), file_name, mime);

    let file = File::open(file_path).map_err(|e| {
        UploadError::argument(format!("cannot read {}: {}", file_path.display(), e))
    })?;
    let len = file
        .metadata()
        .map_err(|e| UploadError::argument(format!("cannot stat {}: {}", file_path.display(), e)))?
        .len();

    multipart::Part::reader_with_length(file, len)
        .file_name(file_name)
        .mime_str(&mime)
        .map_err(|e| UploadError::argument(format!("invalid MIME type '{}': {}", mime, e)))
}

/// The path must name an existing regular file.
pub fn check_file(file_path: &Path) -> UploadResult<()> {
    if file_path.is_file() {
        Ok(())
    } else {
        Err(UploadError::file_not_found(&file_path.display().to_string()))
    }
}

/// Filename sent in the multipart part: the last path component only.
pub fn upload_file_name(file_path: &Path) -> UploadResult<String> {
    file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            UploadError::argument(format!("no file name in path {}", file_path.display()))
        })
}

/// Interpret a 2xx body. The server must answer with a JSON object that
/// carries a non-empty string `url`, which is returned untouched.
pub fn parse_upload_response(status: StatusCode, body: &str) -> UploadResult<String> {
    let data: Value = serde_json::from_str(body).map_err(|_| {
        UploadError::Protocol(format!(
            "server did not return JSON (status {}). Raw response: {}",
            status, body
        ))
    })?;
    let Value::Object(map) = &data else {
        return Err(UploadError::Protocol(format!(
            "server did not return a JSON object. Raw response: {}",
            body
        )));
    };
    match map.get("url") {
        Some(Value::String(url)) if !url.is_empty() => Ok(url.clone()),
        _ => Err(UploadError::Protocol(format!(
            "unexpected JSON payload, expected object with string 'url'. Got: {}",
            data
        ))),
    }
}
