//! deploy_dir
//!
//! Bundles a directory tree into a single self-contained edge script that
//! serves the files from memory:
//! - Recursive, deterministic directory walk (symlinks are never followed)
//! - Gzip compression with a pinnable header timestamp, base64 encoded
//! - Media type lookup by extension
//! - TypeScript or JavaScript output, optional basic-auth guard
//!
//! ```no_run
//! use deploy_dir::{read_dir_create_source, BundleOptions};
//!
//! let options = BundleOptions::new().with_gzip_timestamp(0);
//! let source = read_dir_create_source("dist", Some("/app"), &options).unwrap();
//! std::fs::write("deploy.ts", source).unwrap();
//! ```

pub mod assemble;
pub mod compress;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fs;
pub mod media_type;
pub mod walker;

pub use assemble::{
    assemble, encode_assets, normalize_root, AssembleOptions, EncodedAsset, GENERATOR_BANNER,
};
pub use compress::{compress, decompress};
pub use config::{BundleConfig, BundleOptions, ConfigError, Dialect, ImportSpecifiers};
pub use credentials::Credentials;
pub use error::{BundleError, Result};
pub use fs::{LocalFs, MemoryFs, SourceFs};
pub use media_type::get_media_type;
pub use walker::{walk, FileEntry};

use std::path::Path;

/// A generated script plus what went into it
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Generated script text
    pub source: String,
    /// Embedded assets, in walk order
    pub assets: Vec<EncodedAsset>,
    /// Total size of the original files
    pub raw_bytes: u64,
}

/// Bundle a directory on the local filesystem and return the script text.
///
/// `root` is the mount root every path is served under (`None` for `/`).
pub fn read_dir_create_source(
    dir: impl AsRef<Path>,
    root: Option<&str>,
    options: &BundleOptions,
) -> Result<String> {
    build_bundle(&LocalFs, dir.as_ref(), root, options).map(|bundle| bundle.source)
}

/// Bundle a directory from any [`SourceFs`].
///
/// Credentials are validated before the tree is touched, and any error
/// aborts the build without producing output.
pub fn build_bundle<F: SourceFs + ?Sized>(
    fs: &F,
    dir: &Path,
    root: Option<&str>,
    options: &BundleOptions,
) -> Result<Bundle> {
    let assemble_options = AssembleOptions::from_bundle_options(options)?;

    let entries = walk(fs, dir)?;
    let raw_bytes = entries.iter().map(|e| e.raw_bytes.len() as u64).sum();
    let assets = encode_assets(&entries, root, options)?;
    let source = assemble(&assets, &assemble_options);

    tracing::info!(
        "Bundled {} files from {} ({} bytes in, {} bytes out)",
        assets.len(),
        dir.display(),
        raw_bytes,
        source.len()
    );

    Ok(Bundle {
        source,
        assets,
        raw_bytes,
    })
}
