//! Bundle assembly
//!
//! Turns walked files into [`EncodedAsset`]s and folds them into the text of
//! the generated edge script. The script layout is:
//!
//! ```text
//! banner comment
//! helper imports (decode, gunzip, and basicAuth when auth is configured)
//! data map declaration (typed or untyped)
//! dirData["<mount path>"] = [decode("<base64 gzip>"), "<media type>"];   one per file
//! fetch handler (index.html fallback, auth guard, .html fallback, gzip negotiation, 404)
//! ```
//!
//! Every string spliced into the script is written as a JSON string literal,
//! which is also a valid JavaScript/TypeScript string literal.

use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::compress::{compress_with_level, now_timestamp};
use crate::config::{BundleOptions, Dialect, ImportSpecifiers};
use crate::credentials::Credentials;
use crate::error::Result;
use crate::media_type::get_media_type;
use crate::walker::FileEntry;

/// First line of every generated script
pub const GENERATOR_BANNER: &str = concat!(
    "// This script is generated by deploy_dir v",
    env!("CARGO_PKG_VERSION")
);

/// Realm announced in the `WWW-Authenticate` challenge
pub const AUTH_REALM: &str = "Access to the site";

const TYPED_DECLARATION: &str = "const dirData: Record<string, [Uint8Array, string]> = {};";
const UNTYPED_DECLARATION: &str = "const dirData = {};";

const HANDLER_HEAD: &str = r#"addEventListener("fetch", (e) => {
  let { pathname } = new URL(e.request.url);
  if (pathname.endsWith("/")) {
    pathname += "index.html";
  }"#;

const HANDLER_TAIL: &str = r#"  let data = dirData[pathname];
  if (!data) {
    data = dirData[pathname + '.html'];
  }
  if (data) {
    const [bytes, mediaType] = data;
    const acceptsGzip = e.request.headers.get("accept-encoding")?.split(/[,;]\s*/).includes("gzip");
    if (acceptsGzip) {
      e.respondWith(new Response(bytes, { headers: {
        "content-type": mediaType,
        "content-encoding": "gzip",
      } }));
    } else {
      e.respondWith(new Response(gunzip(bytes), { headers: { "content-type": mediaType } }));
    }
    return;
  }
  e.respondWith(new Response("404 Not Found", { status: 404 }));
});"#;

/// A file ready to be embedded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAsset {
    /// Path the file is served under; always starts with `/`
    pub mount_path: String,
    /// Standard base64 of the gzip stream
    pub base64_gzip: String,
    pub media_type: String,
}

/// Settings that shape the generated text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    pub dialect: Dialect,
    /// Emit the basic-auth guard for these credentials
    pub credentials: Option<Credentials>,
    pub imports: ImportSpecifiers,
}

impl AssembleOptions {
    /// Derive assembly settings from build options, validating `basic_auth`.
    pub fn from_bundle_options(options: &BundleOptions) -> Result<Self> {
        let credentials = options
            .basic_auth
            .as_deref()
            .map(Credentials::parse)
            .transpose()?;

        Ok(Self {
            dialect: options.dialect,
            credentials,
            imports: options.imports.clone(),
        })
    }
}

// ============================================================================
// Mount paths
// ============================================================================

/// Normalize a mount root to `""` or `/segment[/segment...]`.
///
/// Leading and trailing slashes are collapsed, so `root`, `/root` and
/// `/root/` all become `/root`. `None`, `""` and `/` mean no prefix.
pub fn normalize_root(root: Option<&str>) -> String {
    let trimmed = root.unwrap_or("").trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Join a normalized root and a walker-relative path into a mount path
pub fn mount_path(normalized_root: &str, relative_path: &str) -> String {
    format!("{}/{}", normalized_root, relative_path)
}

// ============================================================================
// Encoding
// ============================================================================

/// Compress one file and attach its mount path and media type
pub fn encode_asset(
    entry: &FileEntry,
    normalized_root: &str,
    gzip_timestamp: Option<u32>,
    level: u32,
) -> Result<EncodedAsset> {
    let asset = EncodedAsset {
        mount_path: mount_path(normalized_root, &entry.relative_path),
        base64_gzip: compress_with_level(&entry.raw_bytes, gzip_timestamp, level)?,
        media_type: get_media_type(&entry.relative_path).to_string(),
    };
    tracing::debug!(
        "Encoded {} ({} bytes -> {} base64 chars, {})",
        asset.mount_path,
        entry.raw_bytes.len(),
        asset.base64_gzip.len(),
        asset.media_type
    );
    Ok(asset)
}

/// Encode all walked files, keeping walker order.
///
/// With `options.parallel` the work runs on rayon's pool; the indexed
/// collect puts results back in input order. When no fixed timestamp is
/// given, one timestamp is taken for the whole bundle.
pub fn encode_assets(
    entries: &[FileEntry],
    root: Option<&str>,
    options: &BundleOptions,
) -> Result<Vec<EncodedAsset>> {
    let normalized_root = normalize_root(root);
    let timestamp = Some(options.gzip_timestamp.unwrap_or_else(now_timestamp));
    let level = options.compression_level;

    if options.parallel {
        entries
            .par_iter()
            .map(|entry| encode_asset(entry, &normalized_root, timestamp, level))
            .collect()
    } else {
        entries
            .iter()
            .map(|entry| encode_asset(entry, &normalized_root, timestamp, level))
            .collect()
    }
}

// ============================================================================
// Script text
// ============================================================================

/// Render the complete script for `assets`, in the order given.
///
/// The result has no leading or trailing newline.
pub fn assemble(assets: &[EncodedAsset], options: &AssembleOptions) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(assets.len() + 12);

    lines.push(GENERATOR_BANNER.to_string());
    lines.push(import_line("decode", &options.imports.decode));
    lines.push(import_line("gunzip", &options.imports.gunzip));
    if options.credentials.is_some() {
        lines.push(import_line("basicAuth", &options.imports.basic_auth));
    }
    lines.push(r#"console.log("init");"#.to_string());
    lines.push(
        match options.dialect {
            Dialect::TypeScript => TYPED_DECLARATION,
            Dialect::JavaScript => UNTYPED_DECLARATION,
        }
        .to_string(),
    );

    lines.extend(assets.iter().map(asset_line));

    lines.push(HANDLER_HEAD.to_string());
    if let Some(credentials) = &options.credentials {
        lines.push(auth_guard(credentials));
    }
    lines.push(HANDLER_TAIL.to_string());

    lines.join("\n")
}

/// `dirData["<mount>"] = [decode("<base64>"), "<type>"];`
pub fn asset_line(asset: &EncodedAsset) -> String {
    format!(
        "dirData[{}] = [decode({}), {}];",
        js_string(&asset.mount_path),
        js_string(&asset.base64_gzip),
        js_string(&asset.media_type)
    )
}

fn import_line(name: &str, specifier: &str) -> String {
    format!("import {{ {} }} from {};", name, js_string(specifier))
}

fn auth_guard(credentials: &Credentials) -> String {
    let mut users = Map::new();
    users.insert(
        credentials.username.clone(),
        Value::String(credentials.password.clone()),
    );

    format!(
        "  const unauthorized = basicAuth(e.request, {}, {});\n  if (unauthorized) {{\n    e.respondWith(unauthorized);\n    return;\n  }}",
        js_string(AUTH_REALM),
        Value::Object(users)
    )
}

fn js_string(s: &str) -> String {
    Value::from(s).to_string()
}
