use crate::config::{ConfigParser, SyncConfig};
use crate::errors::Result;
use crate::selector::select_files;
use crate::substituter::Substituter;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

/// Options controlling the apply-and-write stage.
pub struct SyncOptions {
    /// If `false`, changes are computed and reported but never written.
    pub write_enabled: bool,
    /// Print per-file progress information.
    pub verbose: bool,
    /// Indent prefix for verbose display of file contents.
    pub prefix: String,
}

/// Counters collected over a whole run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Files read and run through the substitution engine.
    pub processed: usize,
    /// Files whose substituted output differed from their contents.
    pub changed: usize,
    /// Files whose new contents were written back to disk.
    pub written: usize,
    /// Files that could not be read or written.
    pub failed: usize,
}

/// Runs the whole sync pipeline: parse configuration, select files, apply
/// tokens, write back, and print the summary.
///
/// Per-file errors, a missing configuration file, and traversal failures are
/// all reported to stderr and absorbed; the run always completes.
pub fn run_sync(
    root: &Path,
    config_path: Option<&Path>,
    unsync: bool,
    pattern: &str,
    verbose: bool,
    unwrite: bool,
    prefix: &str,
) -> SyncStats {
    let config = match ConfigParser::new(unsync).parse(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[error] Error parsing config file: {e}");
            SyncConfig::trivial()
        }
    };
    if verbose {
        print_config(&config, prefix);
    }

    let files = match select_files(
        root,
        pattern,
        config.extensions(),
        config.ignored(),
        config.includes(),
    ) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("[error] Error globbing files: {e}");
            Vec::new()
        }
    };

    let substituter = Substituter::new(config.tokens().cloned().unwrap_or_default());
    let options = SyncOptions {
        write_enabled: !unwrite,
        verbose,
        prefix: prefix.to_string(),
    };
    let stats = apply_files(&files, &substituter, &options);

    println!("\n{}", "-".repeat(50));
    println!("Files processed : {}", stats.processed);
    println!("Files changed   : {}", stats.changed);
    println!("Files written   : {}", stats.written);
    println!("Files failed    : {}", stats.failed);

    stats
}

/// Applies the substituter to every file in `files`.
///
/// Reads and substitution run on the calling thread in list order; only the
/// write-back (or dry-run report) of each changed file is dispatched onto the
/// Rayon pool, and the surrounding scope waits for every dispatched task
/// before returning. No state is shared between files beyond the read-only
/// token mapping and the counters.
pub fn apply_files(files: &[PathBuf], substituter: &Substituter, options: &SyncOptions) -> SyncStats {
    let processed = AtomicUsize::new(0);
    let changed = AtomicUsize::new(0);
    let written = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    rayon::scope(|s| {
        for path in files {
            if !path.exists() {
                eprintln!("[error] File not found: {}", path.display());
                failed.fetch_add(1, Ordering::Relaxed);
                continue;
            }
            if options.verbose {
                println!("[info] Processing file: {}", path.display());
            }
            let original = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("[error] Error reading file to sync {}: {}", path.display(), e);
                    failed.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };
            processed.fetch_add(1, Ordering::Relaxed);

            let updated = substituter.substitute(&original);
            if updated == original {
                if options.verbose {
                    println!("[info] File not modified: {}", path.display());
                }
                continue;
            }
            changed.fetch_add(1, Ordering::Relaxed);

            let path = path.clone();
            let written = &written;
            let failed = &failed;
            s.spawn(move |_| {
                if options.write_enabled {
                    match write_back(&path, &updated) {
                        Ok(()) => {
                            if options.verbose {
                                println!("[info] Writing file: {}", path.display());
                            }
                            written.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            eprintln!(
                                "[error] Error processing file {}: {}",
                                path.display(),
                                e
                            );
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                } else {
                    println!("[info] Unwritten file change: {}", path.display());
                    if options.verbose {
                        println!("\n{}\n", indent_with_prefix(&updated, &options.prefix));
                    }
                }
            });
        }
    });

    SyncStats {
        processed: processed.into_inner(),
        changed: changed.into_inner(),
        written: written.into_inner(),
        failed: failed.into_inner(),
    }
}

/// Atomically replaces `path`'s contents with `text`.
///
/// Writes to a sibling temporary file, carries over the original permissions,
/// and persists over the target so a crash mid-write cannot truncate it.
fn write_back(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(text.as_bytes())?;

    let perms = fs::metadata(path)?.permissions();
    fs::set_permissions(temp_file.path(), perms)?;

    temp_file.persist(path)?;
    Ok(())
}

/// Prepends `prefix` to every line of `text`, stripping carriage returns.
pub fn indent_with_prefix(text: &str, prefix: &str) -> String {
    let cleaned = text.replace('\r', "");
    let mut out = String::with_capacity(cleaned.len() + prefix.len());
    out.push_str(prefix);
    out.push_str(&cleaned.replace('\n', &format!("\n{prefix}")));
    out
}

/// Pretty-prints the parsed configuration for verbose mode.
fn print_config(config: &SyncConfig, prefix: &str) {
    println!("[info] Configs:");
    if let Ok(rendered) = serde_json::to_string_pretty(&config.sections) {
        println!("\n{}\n", indent_with_prefix(&rendered, prefix));
    }
    println!("[info] Config Lists:");
    if let Ok(rendered) = serde_json::to_string_pretty(&config.lists) {
        println!("\n{}\n", indent_with_prefix(&rendered, prefix));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn substituter(pairs: &[(&str, &str)]) -> Substituter {
        Substituter::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn options(write_enabled: bool) -> SyncOptions {
        SyncOptions {
            write_enabled,
            verbose: false,
            prefix: "   ".to_string(),
        }
    }

    #[test]
    fn test_changed_file_is_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pet.py");
        fs::write(&path, "from shane import dog\n\nprint(dog.speak())").unwrap();

        let stats = apply_files(
            &[path.clone()],
            &substituter(&[("shane", "pet")]),
            &options(true),
        );

        assert_eq!(stats.processed, 1);
        assert_eq!(stats.changed, 1);
        assert_eq!(stats.written, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "from pet import dog\n\nprint(dog.speak())"
        );
    }

    #[test]
    fn test_dry_run_never_touches_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pet.py");
        let original = "from shane import dog\n";
        fs::write(&path, original).unwrap();

        let stats = apply_files(
            &[path.clone()],
            &substituter(&[("shane", "pet")]),
            &options(false),
        );

        assert_eq!(stats.changed, 1);
        assert_eq!(stats.written, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_unchanged_file_is_never_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pet.py");
        fs::write(&path, "nothing relevant here\n").unwrap();

        let stats = apply_files(
            &[path.clone()],
            &substituter(&[("shane", "pet")]),
            &options(true),
        );

        assert_eq!(stats.processed, 1);
        assert_eq!(stats.changed, 0);
        assert_eq!(stats.written, 0);
    }

    #[test]
    fn test_missing_file_does_not_stop_siblings() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("here.py");
        fs::write(&present, "shane was here\n").unwrap();
        let missing = dir.path().join("gone.py");

        let stats = apply_files(
            &[missing, present.clone()],
            &substituter(&[("shane", "pet")]),
            &options(true),
        );

        assert_eq!(stats.failed, 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(fs::read_to_string(&present).unwrap(), "pet was here\n");
    }

    #[test]
    fn test_indent_with_prefix() {
        assert_eq!(indent_with_prefix("a\nb\r\nc", " . "), " . a\n . b\n . c");
    }

    #[test]
    fn test_run_sync_end_to_end() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::create_dir(dir.path().join("build")).unwrap();
        fs::write(dir.path().join("src/main.py"), "from shane import dog\n").unwrap();
        fs::write(dir.path().join("build/out.py"), "from shane import dog\n").unwrap();
        fs::write(dir.path().join("src/readme.txt"), "shane notes\n").unwrap();

        let config_path = dir.path().join(".sync");
        fs::write(
            &config_path,
            "[tokens]\nshane = pet\n[extensions]\n.py\n[ignore]\nbuild\n",
        )
        .unwrap();

        let stats = run_sync(
            dir.path(),
            Some(&config_path),
            false,
            "**",
            false,
            false,
            "   ",
        );

        assert_eq!(stats.changed, 1);
        assert_eq!(stats.written, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("src/main.py")).unwrap(),
            "from pet import dog\n"
        );
        // Ignored directory and filtered extension stay untouched.
        assert_eq!(
            fs::read_to_string(dir.path().join("build/out.py")).unwrap(),
            "from shane import dog\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("src/readme.txt")).unwrap(),
            "shane notes\n"
        );
    }

    #[test]
    fn test_unsync_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.py");
        let original = "from shane import dog\n";
        fs::write(&file, original).unwrap();

        let config_path = dir.path().join(".sync");
        fs::write(&config_path, "[tokens]\nshane = pet\n").unwrap();

        run_sync(dir.path(), Some(&config_path), false, "*.py", false, false, "   ");
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "from pet import dog\n"
        );

        run_sync(dir.path(), Some(&config_path), true, "*.py", false, false, "   ");
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn test_missing_config_yields_quiet_empty_run() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.py");
        fs::write(&file, "shane\n").unwrap();

        let missing = dir.path().join("nope.sync");
        let stats = run_sync(dir.path(), Some(&missing), false, "**", false, false, "   ");

        // No tokens, so the file is read but unchanged.
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.changed, 0);
        assert_eq!(fs::read_to_string(&file).unwrap(), "shane\n");
    }

    #[test]
    fn test_include_list_drives_the_run() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "shane\n").unwrap();
        fs::write(dir.path().join("b.py"), "shane\n").unwrap();

        let config_path = dir.path().join(".sync");
        let included = dir.path().join("a.py");
        fs::write(
            &config_path,
            format!("[tokens]\nshane = pet\n[include]\n{}\n", included.display()),
        )
        .unwrap();

        let stats = run_sync(dir.path(), Some(&config_path), false, "**", false, false, "   ");

        assert_eq!(stats.processed, 1);
        assert_eq!(fs::read_to_string(dir.path().join("a.py")).unwrap(), "pet\n");
        assert_eq!(fs::read_to_string(dir.path().join("b.py")).unwrap(), "shane\n");
    }
}
