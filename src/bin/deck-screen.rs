// Entrypoint for `deck-screen`: capture the primary screen, upload the PNG
// and remove it again. Exit codes match `upload-deck-image`; a failed
// capture exits 3.

use deck_upload::capture::capture_fullscreen;
use deck_upload::cli::{parse_or_exit, ScreenCli};
use deck_upload::ui;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli: ScreenCli = parse_or_exit();
    ui::init_logging(&cli.upload);

    let dir = cli.dir.clone().unwrap_or_else(std::env::temp_dir);
    let mut capture = match capture_fullscreen(&dir) {
        Ok(capture) => capture,
        Err(e) => {
            eprintln!("Capture failed: {:#}", e);
            return ExitCode::from(3);
        }
    };
    if cli.keep {
        capture.keep();
    }
    eprintln!("Captured {}", capture.path().display());

    // `capture` is dropped after the upload returns, removing the PNG.
    let code = ui::run_upload(&cli.upload, capture.path());
    ExitCode::from(code)
}
