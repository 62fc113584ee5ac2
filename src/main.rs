// Entrypoint for `upload-deck-image`.
// - Parses arguments (exit 1 on bad input) and sets up logging.
// - Hands the image path to the UI layer, which returns the exit code.

use deck_upload::cli::{parse_or_exit, UploadCli};
use deck_upload::ui;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli: UploadCli = parse_or_exit();
    ui::init_logging(&cli.upload);

    ExitCode::from(ui::run_upload(&cli.upload, &cli.image))
}
