//! Script and style emission.
//!
//! Stylesheets go through lightningcss and scripts through the oxc
//! parser/minifier/codegen. With both `build.minify` and `build.sourcemap`
//! off, or for any other file type, the asset is copied byte for byte.

use std::path::{Path, PathBuf};

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use parcel_sourcemap::SourceMap;

use crate::build::BuildError;
use crate::config::BuildOptions;

/// Output of a processed script or stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub code: String,
    pub map: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Style,
    Script,
    Other,
}

impl AssetKind {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("css") => Self::Style,
            Some("js" | "mjs" | "cjs") => Self::Script,
            _ => Self::Other,
        }
    }
}

/// Write one asset into the output directory.
///
/// Returns the path of the emitted source map, relative to the output
/// directory, when one was written.
pub fn emit_asset(
    options: &BuildOptions,
    asset: &Path,
    src: &Path,
    dst: &Path,
) -> Result<Option<PathBuf>, BuildError> {
    let kind = AssetKind::of(asset);
    if kind == AssetKind::Other || !(options.minify || options.sourcemap) {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
        }
        std::fs::copy(src, dst).map_err(BuildError::io(src))?;
        return Ok(None);
    }

    let source = std::fs::read_to_string(src).map_err(BuildError::io(src))?;
    let file_name = asset
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let processed = match kind {
        AssetKind::Style => process_css(&file_name, &source, options),
        _ => process_js(asset, &file_name, &source, options),
    }
    .map_err(|message| BuildError::Asset {
        asset: asset.to_string_lossy().replace('\\', "/"),
        message,
    })?;

    let Some(map) = processed.map else {
        super::write_file(dst, processed.code.as_bytes())?;
        return Ok(None);
    };

    let map_name = format!("{file_name}.map");
    let comment = match kind {
        AssetKind::Style => format!("\n/*# sourceMappingURL={map_name} */\n"),
        _ => format!("\n//# sourceMappingURL={map_name}\n"),
    };
    super::write_file(dst, format!("{}{comment}", processed.code).as_bytes())?;

    let map_path = asset.with_file_name(&map_name);
    super::write_file(&dst.with_file_name(&map_name), map.as_bytes())?;
    Ok(Some(map_path))
}

/// Parse, optionally minify, and print a stylesheet.
pub fn process_css(file_name: &str, source: &str, options: &BuildOptions) -> Result<Processed, String> {
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: file_name.to_string(),
            ..Default::default()
        },
    )
    .map_err(|e| e.to_string())?;

    if options.minify {
        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| e.to_string())?;
    }

    let mut source_map = if options.sourcemap {
        let mut sm = SourceMap::new("/");
        sm.add_source(file_name);
        sm.set_source_content(0, source).map_err(|e| e.to_string())?;
        Some(sm)
    } else {
        None
    };

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: options.minify,
            source_map: source_map.as_mut(),
            ..Default::default()
        })
        .map_err(|e| e.to_string())?;

    let map = match source_map.as_mut() {
        Some(sm) => Some(sm.to_json(None).map_err(|e| e.to_string())?),
        None => None,
    };

    Ok(Processed {
        code: result.code,
        map,
    })
}

/// Parse, optionally minify, and print a script.
pub fn process_js(
    path: &Path,
    file_name: &str,
    source: &str,
    options: &BuildOptions,
) -> Result<Processed, String> {
    let allocator = Allocator::default();
    let source_type = SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs());

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        let messages: Vec<String> = parsed.errors.iter().map(|e| e.to_string()).collect();
        return Err(messages.join(", "));
    }
    let mut program = parsed.program;

    let scoping = if options.minify {
        Minifier::new(MinifierOptions::default())
            .minify(&allocator, &mut program)
            .scoping
    } else {
        None
    };

    let base = if options.minify {
        CodegenOptions::minify()
    } else {
        CodegenOptions::default()
    };
    let generated = Codegen::new()
        .with_options(CodegenOptions {
            source_map_path: options.sourcemap.then(|| PathBuf::from(file_name)),
            ..base
        })
        .with_scoping(scoping)
        .build(&program);

    Ok(Processed {
        code: generated.code,
        map: generated.map.map(|map| map.to_json_string()),
    })
}
