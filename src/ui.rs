// UI layer: everything the binaries show on the terminal. The upload itself
// lives in `api`; this module wraps it with a spinner, the TLS confirmation
// prompt and the final one-line report.

use crate::api::DeckClient;
use crate::cli::UploadArgs;
use crate::config::ClientConfig;
use crate::errors::{UploadError, UploadResult};
use crossterm::style::{Color, Stylize};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

/// Set up `env_logger` at the level picked by `-v`. `RUST_LOG` still wins
/// for individual modules.
pub fn init_logging(args: &UploadArgs) {
    let _ = env_logger::Builder::new()
        .filter_level(args.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

/// Resolve the configuration, confirm an insecure non-local target, upload
/// `image` and report. Returns the exit code for the process.
pub fn run_upload(args: &UploadArgs, image: &Path) -> u8 {
    let outcome = args
        .load_client_config()
        .and_then(|config| confirm_insecure(&config, args.yes).map(|_| config))
        .and_then(|config| upload_with_spinner(config, image));
    report(outcome)
}

/// Print the URL or the diagnostic and map the outcome to an exit code.
pub fn report(outcome: UploadResult<String>) -> u8 {
    match outcome {
        Ok(url) => {
            println!("{}", url);
            0
        }
        Err(e) => {
            log::debug!("Upload failed: {:?}", e);
            eprintln!("{}", paint(one_line(&e), Color::Red, stderr_is_terminal()));
            e.exit_code()
        }
    }
}

fn stderr_is_terminal() -> bool {
    std::io::stderr().is_terminal()
}

/// Color `text` only when it is headed for a terminal; piped stderr gets
/// plain text.
fn paint(text: String, color: Color, colored: bool) -> String {
    if colored {
        text.with(color).to_string()
    } else {
        text
    }
}

/// Diagnostics go to stderr as a single line; multi-line server bodies are
/// folded.
fn one_line(err: &UploadError) -> String {
    err.to_string().lines().map(str::trim).collect::<Vec<_>>().join(" ")
}

fn upload_with_spinner(config: ClientConfig, image: &Path) -> UploadResult<String> {
    let client = DeckClient::new(config)?;

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Uploading to {} ...", client.endpoint()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.upload_image(image);
    spinner.finish_and_clear();
    result
}

/// Turning off certificate checks for anything but this machine has to be
/// confirmed, either with `--yes` or at an interactive prompt.
fn confirm_insecure(config: &ClientConfig, assume_yes: bool) -> UploadResult<()> {
    let interactive = stderr_is_terminal();
    match insecure_check(config, assume_yes, interactive)? {
        InsecureCheck::Proceed => Ok(()),
        InsecureCheck::Ask => {
            let accepted = Confirm::new()
                .with_prompt(format!(
                    "Send the upload to {} without verifying its certificate?",
                    config.server_base
                ))
                .default(false)
                .interact()
                .map_err(|e| UploadError::argument(format!("confirmation failed: {}", e)))?;
            confirmation_answer(accepted)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum InsecureCheck {
    Proceed,
    Ask,
}

/// Decide whether an upload may go ahead as configured, needs the prompt,
/// or is refused because nobody is there to answer it.
fn insecure_check(
    config: &ClientConfig,
    assume_yes: bool,
    interactive: bool,
) -> UploadResult<InsecureCheck> {
    if config.verify_tls {
        return Ok(InsecureCheck::Proceed);
    }
    eprintln!(
        "{}",
        paint(
            "Warning: TLS certificate verification is disabled.".to_string(),
            Color::Yellow,
            interactive
        )
    );
    if config.is_local_host() || assume_yes {
        return Ok(InsecureCheck::Proceed);
    }
    if !interactive {
        return Err(UploadError::argument(format!(
            "refusing --insecure for non-local server {} without --yes",
            config.server_base
        )));
    }
    Ok(InsecureCheck::Ask)
}

fn confirmation_answer(accepted: bool) -> UploadResult<()> {
    if accepted {
        Ok(())
    } else {
        Err(UploadError::argument("aborted: TLS verification left enabled"))
    }
}
