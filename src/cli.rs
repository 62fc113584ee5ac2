// Command-line surface shared by both binaries. `UploadArgs` holds the
// connection flags and is flattened into each binary's own parser.

use crate::config::{self, ClientConfig, FileConfig};
use crate::errors::UploadResult;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Server base URL [default: https://localhost:5001]
    #[arg(long, env = config::SERVER_ENV)]
    pub server: Option<String>,

    /// HTTP timeout in seconds [default: 30]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable TLS certificate verification (use ONLY for local dev)
    #[arg(long)]
    pub insecure: bool,

    /// Do not ask before disabling TLS verification for a non-local server
    #[arg(short, long)]
    pub yes: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl UploadArgs {
    /// Resolve the client configuration against the optional config file.
    /// The environment is already folded into `server` by clap.
    pub fn client_config(&self, file: &FileConfig) -> ClientConfig {
        ClientConfig::new(
            config::resolve_server(self.server.as_deref(), None, file),
            config::resolve_timeout(self.timeout, file),
            !self.insecure,
        )
    }

    /// Same as `client_config`, reading the config file from its default location.
    pub fn load_client_config(&self) -> UploadResult<ClientConfig> {
        let file = FileConfig::load_default()?;
        Ok(self.client_config(&file))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}

/// Upload a deck image to the deck server and print the URL it returns.
#[derive(Parser, Debug)]
#[command(name = "upload-deck-image", version, about)]
pub struct UploadCli {
    /// Path to the image file to upload
    pub image: PathBuf,

    #[command(flatten)]
    pub upload: UploadArgs,
}

/// Capture the primary screen, upload it, and remove the temporary PNG.
#[derive(Parser, Debug)]
#[command(name = "deck-screen", version, about)]
pub struct ScreenCli {
    /// Directory for the temporary capture [default: system temp dir]
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Keep the captured PNG after uploading
    #[arg(long)]
    pub keep: bool,

    #[command(flatten)]
    pub upload: UploadArgs,
}

/// Parse argv, exiting with code 1 on bad arguments (help and version still exit 0).
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definitions_are_valid() {
        UploadCli::command().debug_assert();
        ScreenCli::command().debug_assert();
    }

    #[test]
    fn parses_all_upload_flags() {
        let cli = UploadCli::try_parse_from([
            "upload-deck-image",
            "shots/deck.png",
            "--server",
            "https://decks.example.com/",
            "--timeout",
            "5",
            "--insecure",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.image, PathBuf::from("shots/deck.png"));
        assert!(cli.upload.insecure);
        assert_eq!(cli.upload.log_level(), log::LevelFilter::Debug);

        let cfg = cli.upload.client_config(&FileConfig::default());
        assert_eq!(cfg.server_base, "https://decks.example.com/");
        assert_eq!(cfg.timeout.as_secs(), 5);
        assert!(!cfg.verify_tls);
    }

    #[test]
    fn verification_is_on_unless_insecure() {
        let cli = UploadCli::try_parse_from(["upload-deck-image", "deck.png", "--server", "https://x"]).unwrap();
        let cfg = cli.upload.client_config(&FileConfig::default());
        assert!(cfg.verify_tls);
        assert_eq!(cfg.timeout.as_secs(), config::DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn image_is_required() {
        assert!(UploadCli::try_parse_from(["upload-deck-image"]).is_err());
        assert!(UploadCli::try_parse_from(["upload-deck-image", "a.png", "--timeout", "soon"]).is_err());
    }
}
