mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use repeat_install::{InstallConfig, run_install};
use termcolor::{ColorChoice, StandardStream};

/// Conventional exit status for termination by SIGINT
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    env_logger::Builder::new()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = cli::Args::parse();

    match real_main(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn real_main(args: cli::Args) -> Result<ExitCode> {
    // The pipeline is strictly sequential, so a single-threaded runtime is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    let config = InstallConfig::default().with_install_dir(args.install_dir);
    debug!("Using configuration: {config:?}");

    Ok(rt.block_on(async {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);

        // Dropping the pipeline future on interrupt releases its workspace. A blocking
        // step still in flight holds the last reference, and the runtime waits for it
        // on shutdown, so the directory is gone before the process exits.
        tokio::select! {
            result = run_install(&config, &mut stdout) => match result {
                Ok(report) => {
                    println!("{} ({}) sha256:{}", report.tag, report.target_triple, report.digest);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("error: [{}] {e}", e.stage());
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                eprintln!("error: interrupted; temporary files removed");
                ExitCode::from(EXIT_INTERRUPTED)
            }
        }
    }))
}
