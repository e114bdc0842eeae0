//! Command-line arguments and their merge with `deploy_dir.toml`.

use anyhow::{bail, Context};
use clap::Parser;
use deploy_dir::config::CONFIG_FILE_NAME;
use deploy_dir::{BundleConfig, BundleOptions, Dialect};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "deploy_dir")]
#[command(about = "Bundle a directory into a single self-serving edge script", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory to bundle
    pub dir: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Mount root the files are served under, e.g. "/static"
    #[arg(short, long)]
    pub root: Option<String>,

    /// Emit JavaScript instead of TypeScript
    #[arg(long, conflicts_with = "ts")]
    pub js: bool,

    /// Emit TypeScript even if the config asks for JavaScript
    #[arg(long)]
    pub ts: bool,

    /// Protect the site with basic auth ("user:password")
    #[arg(long, value_name = "USER:PW")]
    pub basic_auth: Option<String>,

    /// Fixed gzip timestamp for reproducible output
    #[arg(long, value_name = "SECS")]
    pub gzip_timestamp: Option<u32>,

    /// Deflate level
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: Option<u32>,

    /// Compress files in parallel
    #[arg(long, conflicts_with = "no_parallel")]
    pub parallel: bool,

    /// Compress files one by one even if the config enables parallel
    #[arg(long)]
    pub no_parallel: bool,

    /// Config file (defaults to ./deploy_dir.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Colorize status output
    #[arg(long, value_name = "WHEN", value_parser = ["auto", "always", "never"])]
    pub color: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Everything needed for one build, after merging flags over config
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub dir: PathBuf,
    pub root: Option<String>,
    pub output: Option<PathBuf>,
    pub options: BundleOptions,
}

/// Load the config named by `--config`, or `deploy_dir.toml` in `cwd` if it exists.
pub fn load_config(cli: &Cli, cwd: &Path) -> anyhow::Result<BundleConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => {
            let default = cwd.join(CONFIG_FILE_NAME);
            if !default.is_file() {
                return Ok(BundleConfig::default());
            }
            default
        }
    };

    tracing::debug!("Loading config from {}", path.display());
    BundleConfig::from_file(&path)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Merge flags over config; flags win.
pub fn resolve(cli: &Cli, config: &BundleConfig) -> anyhow::Result<BuildPlan> {
    let dir = match cli.dir.clone().or_else(|| config.bundle.dir.clone()) {
        Some(dir) => dir,
        None => bail!("No directory given (pass DIR or set bundle.dir in {})", CONFIG_FILE_NAME),
    };

    let mut options = config.to_options();
    if cli.js {
        options.dialect = Dialect::JavaScript;
    } else if cli.ts {
        options.dialect = Dialect::TypeScript;
    }
    if let Some(credentials) = &cli.basic_auth {
        options.basic_auth = Some(credentials.clone());
    }
    if let Some(timestamp) = cli.gzip_timestamp {
        options.gzip_timestamp = Some(timestamp);
    }
    if let Some(level) = cli.level {
        options.compression_level = level;
    }
    if cli.parallel {
        options.parallel = true;
    } else if cli.no_parallel {
        options.parallel = false;
    }

    Ok(BuildPlan {
        dir,
        root: cli.root.clone().or_else(|| config.bundle.root.clone()),
        output: cli.output.clone().or_else(|| config.bundle.output.clone()),
        options,
    })
}
