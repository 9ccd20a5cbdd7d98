//! Input discovery and loading.
//!
//! A source argument is one of:
//! - a directory: its regular files, one level deep, sorted by name
//! - a glob pattern (`*`, `?`, `[`): files under the pattern's literal prefix
//! - anything else: taken as a file path verbatim
//!
//! Sources are read whole; nothing is streamed.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use dmerge_record::SourceFormat;
use ignore::overrides::OverrideBuilder;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FoldError, FoldResult};

const GLOB_CHARS: &[char] = &['*', '?', '['];

/// One input file held in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn read(path: &Path) -> FoldResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FoldError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = content.len(), "read source");
        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Whether the file only carries aggregate counts. Such files are not
    /// parsed into records.
    pub fn is_count_only(&self, marker: &str) -> bool {
        !marker.is_empty() && self.content.contains(marker)
    }
}

/// Expand source arguments into a de-duplicated, ordered list of files.
///
/// `exclude` (normally the output path) is dropped from the result so a rerun
/// never folds its own previous output.
pub fn resolve_sources(args: &[String], exclude: Option<&Path>) -> FoldResult<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for arg in args {
        let path = Path::new(arg);
        let expanded = if path.is_dir() {
            list_directory(path)?
        } else if arg.contains(GLOB_CHARS) {
            expand_glob(arg)?
        } else {
            vec![path.to_path_buf()]
        };

        for file in expanded {
            if exclude.is_some_and(|out| same_path(&file, out)) {
                debug!(path = %file.display(), "excluding output path from sources");
                continue;
            }
            if seen.insert(file.clone()) {
                resolved.push(file);
            }
        }
    }

    if resolved.is_empty() {
        return Err(FoldError::NoSources);
    }
    Ok(resolved)
}

/// Pick the format for a set of paths from their extensions.
///
/// All `.toml` means TOML, none means text; a mix is rejected because the
/// two formats are never folded together.
pub fn infer_format(paths: &[PathBuf]) -> FoldResult<SourceFormat> {
    let text = paths.iter().find(|p| SourceFormat::for_path(p) == SourceFormat::Text);
    let toml = paths.iter().find(|p| SourceFormat::for_path(p) == SourceFormat::Toml);
    match (text, toml) {
        (Some(text), Some(toml)) => Err(FoldError::MixedFormats {
            text: text.clone(),
            toml: toml.clone(),
        }),
        (None, Some(_)) => Ok(SourceFormat::Toml),
        _ => Ok(SourceFormat::Text),
    }
}

fn list_directory(dir: &Path) -> FoldResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn expand_glob(pattern: &str) -> FoldResult<Vec<PathBuf>> {
    // Split into the literal directory prefix and the glob tail.
    let mut base = PathBuf::new();
    let mut tail = Vec::new();
    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if tail.is_empty() && !text.contains(GLOB_CHARS) {
            base.push(component.as_os_str());
        } else if !matches!(component, Component::CurDir) {
            tail.push(text.into_owned());
        }
    }
    if base.as_os_str().is_empty() {
        base.push(".");
    }

    let glob = tail.join("/");
    let recursive = tail.iter().any(|part| part == "**");
    let to_pattern_err = |source| FoldError::Pattern {
        pattern: pattern.to_string(),
        source,
    };
    let overrides = OverrideBuilder::new(&base)
        .add(&format!("/{glob}"))
        .map_err(to_pattern_err)?
        .build()
        .map_err(to_pattern_err)?;

    let mut walker = WalkDir::new(&base).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(tail.len());
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && overrides.matched(entry.path(), false).is_whitelist() {
            files.push(entry.into_path());
        }
    }
    debug!(pattern, matched = files.len(), "expanded source pattern");
    Ok(files)
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, "h\nh\n").unwrap();
        path
    }

    fn arg(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn directory_lists_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let b = touch(dir.path(), "b.txt");
        let a = touch(dir.path(), "a.txt");
        touch(dir.path(), "nested/c.txt");
        let files = resolve_sources(&[arg(dir.path())], None).unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn glob_matches_extension() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "run1.toml");
        let b = touch(dir.path(), "run2.toml");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "deeper/run3.toml");
        let pattern = arg(&dir.path().join("*.toml"));
        let files = resolve_sources(&[pattern], None).unwrap();
        assert_eq!(files, vec![a, b]);
    }

    #[test]
    fn explicit_files_keep_order_and_dedupe() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.txt");
        let b = touch(dir.path(), "b.txt");
        let files = resolve_sources(&[arg(&b), arg(&a), arg(&b)], None).unwrap();
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn output_path_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.txt");
        let out = touch(dir.path(), "out.txt");
        let files = resolve_sources(&[arg(dir.path())], Some(&out)).unwrap();
        assert_eq!(files, vec![a]);
    }

    #[test]
    fn nothing_matched_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = arg(&dir.path().join("*.toml"));
        assert!(matches!(resolve_sources(&[pattern], None), Err(FoldError::NoSources)));
    }

    #[test]
    fn infer_formats() {
        let text = vec![PathBuf::from("a.txt"), PathBuf::from("b")];
        let toml = vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")];
        let mixed = vec![PathBuf::from("a.toml"), PathBuf::from("b.txt")];
        assert_eq!(infer_format(&text).unwrap(), SourceFormat::Text);
        assert_eq!(infer_format(&toml).unwrap(), SourceFormat::Toml);
        assert!(matches!(infer_format(&mixed), Err(FoldError::MixedFormats { .. })));
    }

    #[test]
    fn count_only_marker() {
        let file = SourceFile {
            path: PathBuf::from("counts.txt"),
            content: "RUN\nPARTICLE COUNT\npion\t4\n".into(),
        };
        assert!(file.is_count_only("PARTICLE COUNT"));
        assert!(!file.is_count_only("SOMETHING ELSE"));
        assert!(!file.is_count_only(""));
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceFile::read(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, FoldError::Read { .. }));
    }
}
