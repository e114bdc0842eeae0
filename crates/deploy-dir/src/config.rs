//! Bundle options and the optional `deploy_dir.toml` config file

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::compress::DEFAULT_LEVEL;

/// Default config file name looked up by the CLI
pub const CONFIG_FILE_NAME: &str = "deploy_dir.toml";

/// Errors that can occur while loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Output flavour of the generated script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Data map declared with a `Record<string, [Uint8Array, string]>` annotation
    #[default]
    TypeScript,
    /// Plain `const dirData = {};`
    JavaScript,
}

/// Module specifiers the generated script imports its helpers from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImportSpecifiers {
    /// Module exporting `decode` (base64 string to bytes)
    #[serde(default = "default_decode_import")]
    pub decode: String,

    /// Module exporting `gunzip`
    #[serde(default = "default_gunzip_import")]
    pub gunzip: String,

    /// Module exporting `basicAuth`, only imported when auth is configured
    #[serde(default = "default_basic_auth_import")]
    pub basic_auth: String,
}

fn default_decode_import() -> String {
    "https://deno.land/std@0.97.0/encoding/base64.ts".to_string()
}

fn default_gunzip_import() -> String {
    "https://raw.githubusercontent.com/kt3k/compress/bbe0a818d2acd399350b30036ff8772354b1c2df/gzip/gzip.ts"
        .to_string()
}

fn default_basic_auth_import() -> String {
    "https://deno.land/x/basic_auth@v1.0.0/mod.ts".to_string()
}

impl Default for ImportSpecifiers {
    fn default() -> Self {
        Self {
            decode: default_decode_import(),
            gunzip: default_gunzip_import(),
            basic_auth: default_basic_auth_import(),
        }
    }
}

/// Options for one bundle build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Fixed gzip MTIME; `None` stamps the current time
    pub gzip_timestamp: Option<u32>,
    pub dialect: Dialect,
    /// Raw `user:password` string, validated at build time
    pub basic_auth: Option<String>,
    /// Deflate level 0-9
    pub compression_level: u32,
    /// Compress files on the rayon thread pool
    pub parallel: bool,
    pub imports: ImportSpecifiers,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            gzip_timestamp: None,
            dialect: Dialect::default(),
            basic_auth: None,
            compression_level: DEFAULT_LEVEL,
            parallel: false,
            imports: ImportSpecifiers::default(),
        }
    }
}

impl BundleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gzip_timestamp(mut self, timestamp: u32) -> Self {
        self.gzip_timestamp = Some(timestamp);
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Shorthand for `with_dialect(Dialect::JavaScript)`
    pub fn with_javascript(self) -> Self {
        self.with_dialect(Dialect::JavaScript)
    }

    pub fn with_basic_auth(mut self, credentials: impl Into<String>) -> Self {
        self.basic_auth = Some(credentials.into());
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.min(9);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_imports(mut self, imports: ImportSpecifiers) -> Self {
        self.imports = imports;
        self
    }
}

/// Contents of `deploy_dir.toml`
///
/// ```toml
/// [bundle]
/// dir = "dist"
/// root = "/static"
/// output = "deploy.ts"
/// gzip-timestamp = 0
/// javascript = false
/// basic-auth = "user:pw"
/// compression-level = 9
/// parallel = true
///
/// [imports]
/// decode = "./vendor/base64.ts"
/// gunzip = "./vendor/gzip.ts"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BundleConfig {
    #[serde(default)]
    pub bundle: BundleSection,

    #[serde(default)]
    pub imports: ImportSpecifiers,
}

/// `[bundle]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BundleSection {
    /// Directory to bundle
    pub dir: Option<PathBuf>,

    /// Mount root prefixed to every served path
    pub root: Option<String>,

    /// Output file; stdout when absent
    pub output: Option<PathBuf>,

    pub gzip_timestamp: Option<u32>,

    #[serde(default)]
    pub javascript: bool,

    pub basic_auth: Option<String>,

    pub compression_level: Option<u32>,

    #[serde(default)]
    pub parallel: bool,
}

impl BundleConfig {
    /// Parse a config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a config from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: BundleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = self.bundle.compression_level {
            if level > 9 {
                return Err(ConfigError::ValidationError(format!(
                    "compression-level must be between 0 and 9, got {}",
                    level
                )));
            }
        }

        for (key, value) in [
            ("decode", &self.imports.decode),
            ("gunzip", &self.imports.gunzip),
            ("basic-auth", &self.imports.basic_auth),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "imports.{} cannot be empty",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Build-time options described by this config
    pub fn to_options(&self) -> BundleOptions {
        let dialect = if self.bundle.javascript {
            Dialect::JavaScript
        } else {
            Dialect::TypeScript
        };

        BundleOptions {
            gzip_timestamp: self.bundle.gzip_timestamp,
            dialect,
            basic_auth: self.bundle.basic_auth.clone(),
            compression_level: self.bundle.compression_level.unwrap_or(DEFAULT_LEVEL),
            parallel: self.bundle.parallel,
            imports: self.imports.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = BundleConfig::from_str("").unwrap();
        assert_eq!(config, BundleConfig::default());
        assert_eq!(config.to_options(), BundleOptions::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[bundle]
dir = "dist"
root = "/static"
output = "deploy.js"
gzip-timestamp = 0
javascript = true
basic-auth = "user:pw"
compression-level = 9
parallel = true

[imports]
decode = "./vendor/base64.ts"
"#;
        let config = BundleConfig::from_str(toml).unwrap();
        assert_eq!(config.bundle.dir, Some(PathBuf::from("dist")));
        assert_eq!(config.bundle.root.as_deref(), Some("/static"));
        assert_eq!(config.bundle.output, Some(PathBuf::from("deploy.js")));

        let options = config.to_options();
        assert_eq!(options.gzip_timestamp, Some(0));
        assert_eq!(options.dialect, Dialect::JavaScript);
        assert_eq!(options.basic_auth.as_deref(), Some("user:pw"));
        assert_eq!(options.compression_level, 9);
        assert!(options.parallel);
        assert_eq!(options.imports.decode, "./vendor/base64.ts");
        assert_eq!(options.imports.gunzip, default_gunzip_import());
    }

    #[test]
    fn test_level_out_of_range() {
        let result = BundleConfig::from_str("[bundle]\ncompression-level = 10\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_empty_import_rejected() {
        let result = BundleConfig::from_str("[imports]\ngunzip = \"  \"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_wrong_value_type_is_parse_error() {
        let result = BundleConfig::from_str("[bundle]\njavascript = \"yes\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_builder() {
        let options = BundleOptions::new()
            .with_gzip_timestamp(5)
            .with_javascript()
            .with_basic_auth("a:b")
            .with_compression_level(12)
            .with_parallel(true);

        assert_eq!(options.gzip_timestamp, Some(5));
        assert_eq!(options.dialect, Dialect::JavaScript);
        assert_eq!(options.basic_auth.as_deref(), Some("a:b"));
        assert_eq!(options.compression_level, 9);
        assert!(options.parallel);
    }

    #[test]
    fn test_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[bundle]\nroot = \"app\"\n").unwrap();

        let config = BundleConfig::from_file(&path).unwrap();
        assert_eq!(config.bundle.root.as_deref(), Some("app"));

        let missing = BundleConfig::from_file(&temp.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::IoError(_))));
    }
}
