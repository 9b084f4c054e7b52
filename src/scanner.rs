//! Project scanner
//!
//! Walks the project tree and selects the files to extract. Include patterns
//! match the file name; exclude patterns match either the relative path or
//! the file name. Hidden directories are never entered.

use crate::config::{FilesystemConfig, ParserConfig};
use crate::utils::paths::to_relative_unix_style;
use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A file selected for extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Relative to the project root, `/`-separated
    pub relative_path: String,
    pub size: u64,
}

pub struct Scanner {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    max_depth: usize,
    max_file_size: u64,
}

impl Scanner {
    pub fn new(filesystem: &FilesystemConfig, parser: &ParserConfig) -> Result<Self> {
        Ok(Self {
            include: compile(&filesystem.include_patterns)?,
            exclude: compile(&filesystem.exclude_patterns)?,
            max_depth: filesystem.max_depth,
            max_file_size: parser.max_file_size,
        })
    }

    /// Selected files sorted by relative path
    pub fn scan(&self, root: &Path) -> Result<Vec<SourceFile>> {
        if !root.is_dir() {
            bail!("Project path {} is not a directory", root.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.max_depth)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_pruned_dir(e, root));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("⚠️  Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = to_relative_unix_style(entry.path(), root)
                .with_context(|| format!("Failed to relativize {}", entry.path().display()))?;
            let file_name = entry.file_name().to_string_lossy();

            if !self.include.iter().any(|p| p.matches(&file_name)) {
                continue;
            }
            if self.is_excluded(&relative_path, &file_name) {
                debug!("Excluded {}", relative_path);
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    warn!("⚠️  Cannot stat {}: {}", relative_path, e);
                    continue;
                }
            };
            if size > self.max_file_size {
                debug!(
                    "Skipping {} ({} bytes exceeds limit of {})",
                    relative_path, size, self.max_file_size
                );
                continue;
            }

            files.push(SourceFile {
                path: entry.path().to_path_buf(),
                relative_path,
                size,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        debug!("Scanned {} file(s) under {}", files.len(), root.display());
        Ok(files)
    }

    fn is_excluded(&self, relative_path: &str, file_name: &str) -> bool {
        self.exclude
            .iter()
            .any(|p| p.matches(relative_path) || p.matches(file_name))
    }

    /// Hidden directories, and directories whose contents every exclude
    /// pattern of the `dir/**` form would reject
    fn is_pruned_dir(&self, entry: &walkdir::DirEntry, root: &Path) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            return true;
        }
        let Ok(relative) = to_relative_unix_style(entry.path(), root) else {
            return false;
        };
        // Any file inside the directory would match
        let sample = format!("{}/_", relative);
        self.exclude
            .iter()
            .any(|p| p.as_str().ends_with("/**") && p.matches(&sample))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid file pattern '{}'", p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scan(root: &Path, filesystem: FilesystemConfig, parser: ParserConfig) -> Vec<String> {
        Scanner::new(&filesystem, &parser)
            .unwrap()
            .scan(root)
            .unwrap()
            .into_iter()
            .map(|f| f.relative_path)
            .collect()
    }

    #[test]
    fn default_patterns_select_sources() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "main.go", "package main");
        touch(root, "main_test.go", "package main");
        touch(root, "pkg/server/server.go", "package server");
        touch(root, "web/app.ts", "export {}");
        touch(root, "web/node_modules/lib/index.js", "");
        touch(root, "scripts/tool.py", "");
        touch(root, "scripts/test_tool.py", "");
        touch(root, "README.md", "# readme");
        touch(root, ".git/hooks/pre-commit.py", "");
        touch(root, "pkg/vendor/dep/dep.go", "package dep");

        let files = scan(root, FilesystemConfig::default(), ParserConfig::default());
        assert_eq!(
            files,
            vec!["main.go", "pkg/server/server.go", "scripts/tool.py", "web/app.ts"]
        );
    }

    #[test]
    fn depth_and_size_limits() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "a.go", "package a");
        touch(root, "x/b.go", "package b");
        touch(root, "x/y/c.go", "package c");
        touch(root, "big.go", &"/".repeat(200));

        let filesystem = FilesystemConfig {
            max_depth: 2,
            ..Default::default()
        };
        let parser = ParserConfig {
            max_file_size: 100,
            ..Default::default()
        };
        assert_eq!(scan(root, filesystem, parser), vec!["a.go", "x/b.go"]);
    }

    #[test]
    fn custom_patterns() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/app.js", "");
        touch(root, "src/app.min.js", "");
        touch(root, "src/generated/api.js", "");

        let filesystem = FilesystemConfig {
            include_patterns: vec!["*.js".to_string()],
            exclude_patterns: vec!["*.min.js".to_string(), "src/generated/*".to_string()],
            max_depth: 10,
        };
        assert_eq!(
            scan(root, filesystem, ParserConfig::default()),
            vec!["src/app.js"]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let scanner = Scanner::new(&FilesystemConfig::default(), &ParserConfig::default()).unwrap();
        assert!(scanner.scan(&dir.path().join("absent")).is_err());
    }
}
