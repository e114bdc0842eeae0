//! deploy_dir command-line tool
//!
//! Bundles a directory into one edge script and writes it to a file or
//! stdout. All bundling logic lives in the `deploy_dir` library.

mod args;
mod output;

use anyhow::Context;
use clap::Parser;
use deploy_dir::{build_bundle, LocalFs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::Cli;
use crate::output::{resolve_color_choice, StatusOutput};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut status = StatusOutput::new(resolve_color_choice(cli.color.as_deref()));
    if let Err(e) = run(&cli, &mut status) {
        status.error("error: ");
        status.line(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli, status: &mut StatusOutput) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let config = args::load_config(cli, &cwd)?;
    let plan = args::resolve(cli, &config)?;

    let bundle = build_bundle(&LocalFs, &plan.dir, plan.root.as_deref(), &plan.options)
        .with_context(|| format!("Failed to bundle {}", plan.dir.display()))?;

    match &plan.output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", bundle.source))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            status.success("Bundled ");
            status.line(&format!(
                "{} files ({} bytes) from {}",
                bundle.assets.len(),
                bundle.raw_bytes,
                plan.dir.display()
            ));
            status.info("  Output: ");
            status.line(&path.display().to_string());
        }
        None => println!("{}", bundle.source),
    }

    Ok(())
}
