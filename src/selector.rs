use crate::errors::Result;
use globset::Glob;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Builds the list of files a sync run will process.
///
/// When `includes` is present (the configuration carried an `[include]`
/// section, even an empty one) it is returned verbatim and no traversal
/// happens. Otherwise `root` is walked recursively in sorted path order,
/// collecting every regular file whose base name matches the shell glob
/// `pattern` and which passes the extension, hidden-file, and ignore-list
/// filters. Any traversal failure aborts
/// the walk and surfaces to the caller rather than yielding a silently
/// partial list.
pub fn select_files(
    root: &Path,
    pattern: &str,
    extensions: &[String],
    ignored: &[String],
    includes: Option<&Vec<String>>,
) -> Result<Vec<PathBuf>> {
    if let Some(includes) = includes {
        return Ok(includes.iter().map(PathBuf::from).collect());
    }

    let matcher = Glob::new(pattern)?.compile_matcher();
    let mut selected = Vec::new();

    let mut walker = WalkBuilder::new(root);
    // The spec's own hidden/ignore rules apply instead of gitignore filtering.
    walker.standard_filters(false);
    walker.sort_by_file_path(|a, b| a.cmp(b));

    for entry in walker.build() {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if matcher.is_match(name) && keep_file(path, name, extensions, ignored) {
            selected.push(path.to_path_buf());
        }
    }

    Ok(selected)
}

/// Applies the extension allow-list, hidden-file, and ignore-list filters.
///
/// A file survives if all hold: its dotted extension is in `extensions` (or
/// the list is empty, or it has no extension); its base name does not start
/// with `.`; and neither its base name nor its containing directory's name
/// appears in `ignored` (whitespace-trimmed comparison).
fn keep_file(path: &Path, name: &str, extensions: &[String], ignored: &[String]) -> bool {
    if name.starts_with('.') {
        return false;
    }

    if !extensions.is_empty() {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if !in_list(&format!(".{ext}"), extensions) {
                return false;
            }
        }
    }

    if in_list(name, ignored) {
        return false;
    }
    if let Some(dir) = path.parent().and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
        if in_list(dir, ignored) {
            return false;
        }
    }

    true
}

fn in_list(value: &str, list: &[String]) -> bool {
    list.iter().any(|entry| entry.trim() == value.trim())
}
