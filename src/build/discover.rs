//! Entry page discovery.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::build::BuildError;
use crate::config::AppType;

/// Files found under the page root, relative to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    pub root: PathBuf,
    pub pages: Vec<PathBuf>,
    pub assets: Vec<PathBuf>,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Walk `root`, skipping hidden entries and `out_dir`, and split files into
/// entry pages and assets. Both paths must be canonical.
pub fn discover(root: &Path, out_dir: &Path, app_type: AppType) -> Result<Entries, BuildError> {
    let mut entries = Entries {
        root: root.to_path_buf(),
        ..Entries::default()
    };

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && e.path() != out_dir));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel.to_path_buf(),
            Err(_) => continue,
        };

        let is_entry = is_html(&rel)
            && match app_type {
                AppType::Mpa => true,
                AppType::Spa => rel == Path::new("index.html"),
            };

        if is_entry {
            entries.pages.push(rel);
        } else {
            entries.assets.push(rel);
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("index.html"), "<p>home</p>").unwrap();
        fs::create_dir_all(root.join("share")).unwrap();
        fs::write(root.join("share/index.html"), "<p>share</p>").unwrap();
        fs::write(root.join("main.js"), "console.log(1)").unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join(".cache/x.html"), "<p>x</p>").unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("dist/old.html"), "<p>old</p>").unwrap();
        dir
    }

    #[test]
    fn mpa_treats_every_html_file_as_entry() {
        let dir = tree();
        let root = dir.path().canonicalize().unwrap();
        let entries = discover(&root, &root.join("dist"), AppType::Mpa).unwrap();

        assert_eq!(
            entries.pages,
            vec![PathBuf::from("index.html"), PathBuf::from("share/index.html")]
        );
        assert_eq!(entries.assets, vec![PathBuf::from("main.js")]);
    }

    #[test]
    fn spa_has_single_entry() {
        let dir = tree();
        let root = dir.path().canonicalize().unwrap();
        let entries = discover(&root, &root.join("dist"), AppType::Spa).unwrap();

        assert_eq!(entries.pages, vec![PathBuf::from("index.html")]);
        assert!(entries.assets.contains(&PathBuf::from("share/index.html")));
    }
}
