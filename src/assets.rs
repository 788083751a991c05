//! Media directory scanning and asset name resolution.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::AssetSettings;

fn has_media_extension(path: &Path, settings: &AssetSettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Media files found under a directory.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl AssetIndex {
    pub fn scan(dir: &Path, settings: &AssetSettings) -> Self {
        let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && has_media_extension(p, settings))
            .collect();

        files.sort_by_key(|p| p.to_string_lossy().to_lowercase());
        debug!(dir = %dir.display(), count = files.len(), "scanned media directory");

        Self {
            root: dir.to_path_buf(),
            files,
        }
    }

    /// Find the file for asset `name`. An exact path under the root wins; otherwise
    /// the first scanned file whose name or relative path matches ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim().trim_start_matches("./").trim_start_matches('/');
        if name.is_empty() {
            return None;
        }

        let exact = self.root.join(name);
        if exact.is_file() {
            return Some(exact);
        }

        self.files
            .iter()
            .find(|p| {
                let by_name = p
                    .file_name()
                    .and_then(|s| s.to_str())
                    .is_some_and(|f| f.eq_ignore_ascii_case(name));
                let by_rel = p
                    .strip_prefix(&self.root)
                    .ok()
                    .and_then(|r| r.to_str())
                    .is_some_and(|r| r.eq_ignore_ascii_case(name));
                by_name || by_rel
            })
            .cloned()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    #[cfg(test)]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
