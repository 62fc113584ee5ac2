// Library root
// ------------
// This crate exposes the upload core and the pieces both binaries share.
//
// Module responsibilities:
// - `api`: builds the multipart request for `/deck/upload`, sends it and
//   classifies the answer.
// - `mime`: content type inference from the file extension.
// - `config`: the explicit client configuration and how the CLI resolves it.
// - `errors`: the upload error taxonomy and its exit codes.
// - `cli`: clap definitions for `upload-deck-image` and `deck-screen`.
// - `ui`: spinner, TLS confirmation prompt and the final report.
// - `capture` (feature `screen`): primary-monitor screenshots.
pub mod api;
#[cfg(feature = "screen")]
pub mod capture;
pub mod cli;
pub mod config;
pub mod errors;
pub mod mime;
pub mod ui;

pub use api::{upload, DeckClient, UploadRequest};
pub use config::ClientConfig;
pub use errors::{UploadError, UploadResult};
