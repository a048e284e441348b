use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "repeat-install",
    version,
    about = "Install the latest repeat release onto your PATH"
)]
pub struct Args {
    /// Directory to install into (default: /usr/local/bin, or ~/.local/bin on Windows)
    #[arg(long, env = "REPEAT_INSTALL_DIR", value_name = "DIR")]
    pub install_dir: Option<PathBuf>,
}
