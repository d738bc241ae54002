//! Production page build.
//!
//! # Data Flow
//! ```text
//! page root
//!     → discover (walk, skip hidden entries and the output directory)
//!     → entry pages ──→ one blocking task per page
//!     │                   → plugin pipeline (html-minifier last)
//!     │                   → out_dir/<same relative path>
//!     → scripts/styles → lightningcss / oxc (minify, source map)
//!     → other files ──→ copied unchanged
//!     → BuildReport
//! ```
//!
//! # Design Decisions
//! - Fail fast: the first failing page aborts the build, nothing is retried
//! - The output directory is emptied first, unless it contains the page root
//! - `build.minify` and `build.sourcemap` apply to standalone `.css`/`.js` assets;
//!   with both off every asset is copied verbatim

mod assets;
mod discover;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinSet;

use crate::config::{BuildConfig, BuildOptions};
use crate::plugin::{HtmlContext, Invocation, PluginContainer, PluginError};

pub use assets::{emit_asset, process_css, process_js, Processed};
pub use discover::{discover, Entries};

/// Error type for the page build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk page root: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("page {page}: {source}")]
    Page {
        page: String,
        #[source]
        source: PluginError,
    },

    #[error("asset {asset}: {message}")]
    Asset { asset: String, message: String },

    #[error("refusing to empty output directory {} which contains the page root", .0.display())]
    UnsafeOutDir(PathBuf),

    #[error("build task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl BuildError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> BuildError + '_ {
        move |source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Output directory the files were written to.
    pub out_dir: PathBuf,
    /// Entry pages written, relative to the output directory.
    pub pages: Vec<PathBuf>,
    /// Assets written, relative to the output directory.
    pub assets: Vec<PathBuf>,
    /// Source maps written next to their scripts and stylesheets.
    pub source_maps: Vec<PathBuf>,
}

/// Run the page build.
pub async fn run(config: Arc<BuildConfig>, plugins: Arc<PluginContainer>) -> Result<BuildReport, BuildError> {
    tracing::info!(
        root = %config.root.display(),
        out_dir = %config.build.out_dir.display(),
        base = %config.base,
        minify = config.build.minify,
        sourcemap = config.build.sourcemap,
        "Build starting"
    );

    let prepared = config.clone();
    let (entries, out_dir) = tokio::task::spawn_blocking(move || prepare(&prepared)).await??;

    let mut report = BuildReport {
        out_dir: out_dir.clone(),
        ..BuildReport::default()
    };

    let mut tasks = JoinSet::new();
    for page in entries.pages {
        let plugins = plugins.clone();
        let src = entries.root.join(&page);
        let dst = out_dir.join(&page);
        tasks.spawn_blocking(move || emit_page(&plugins, &page, &src, &dst).map(|_| page));
    }

    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(page) => {
                tracing::debug!(page = %page.display(), "Page written");
                report.pages.push(page);
            }
            Err(e) => {
                tasks.abort_all();
                tracing::error!(error = %e, "Build aborted");
                return Err(e);
            }
        }
    }

    let root = entries.root.clone();
    let assets = entries.assets;
    let asset_out = out_dir.clone();
    let options = config.build.clone();
    let (assets, source_maps) =
        tokio::task::spawn_blocking(move || emit_assets(&options, &root, &asset_out, assets)).await??;
    report.assets = assets;
    report.source_maps = source_maps;

    report.pages.sort();
    tracing::info!(
        pages = report.pages.len(),
        assets = report.assets.len(),
        source_maps = report.source_maps.len(),
        out_dir = %report.out_dir.display(),
        "Build complete"
    );
    Ok(report)
}

/// Empty and recreate the output directory, then discover entries.
fn prepare(config: &BuildConfig) -> Result<(Entries, PathBuf), BuildError> {
    let root = config
        .root
        .canonicalize()
        .map_err(BuildError::io(&config.root))?;

    let out_dir = &config.build.out_dir;
    if out_dir.exists() {
        let out_abs = out_dir.canonicalize().map_err(BuildError::io(out_dir))?;
        if root.starts_with(&out_abs) {
            return Err(BuildError::UnsafeOutDir(out_dir.clone()));
        }
        std::fs::remove_dir_all(&out_abs).map_err(BuildError::io(&out_abs))?;
    }
    std::fs::create_dir_all(out_dir).map_err(BuildError::io(out_dir))?;
    let out_abs = out_dir.canonicalize().map_err(BuildError::io(out_dir))?;

    let entries = discover(&root, &out_abs, config.app_type)?;
    Ok((entries, out_abs))
}

fn emit_page(plugins: &PluginContainer, page: &Path, src: &Path, dst: &Path) -> Result<(), BuildError> {
    let html = std::fs::read_to_string(src).map_err(BuildError::io(src))?;

    let page_name = page.to_string_lossy().replace('\\', "/");
    let ctx = HtmlContext::new(page_name.clone(), Invocation::Build);
    let html = plugins
        .transform_index_html(html, &ctx)
        .map_err(|source| BuildError::Page {
            page: page_name,
            source,
        })?;

    write_file(dst, html.as_bytes())
}

fn emit_assets(
    options: &BuildOptions,
    root: &Path,
    out_dir: &Path,
    assets: Vec<PathBuf>,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), BuildError> {
    let mut source_maps = Vec::new();
    for asset in &assets {
        let src = root.join(asset);
        let dst = out_dir.join(asset);
        if let Some(map) = emit_asset(options, asset, &src, &dst)? {
            tracing::debug!(asset = %asset.display(), map = %map.display(), "Source map written");
            source_maps.push(map);
        }
    }
    Ok((assets, source_maps))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
    }
    std::fs::write(path, contents).map_err(BuildError::io(path))
}
