use clap::Parser;
use std::path::PathBuf;

/// Configuration-driven token substitution across a directory tree.
///
/// `toksync` reads a token -> replacement mapping from a sync configuration
/// file and applies it to every selected file under the current directory,
/// writing changed files back in place. The same mapping applied with
/// `--unsync` restores the original names.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Sync tokens across a directory tree from a config file",
    long_about = "toksync - configuration-driven token substitution across a directory tree.

Reads a token mapping plus file selection rules from a line-oriented config
file and rewrites every occurrence of each token that sits on a word
boundary. Running again with --unsync applies the mapping in reverse.

Config file format (.sync):
  [tokens]
  oldName = newName
  [extensions]
  .py
  .md
  [ignore]
  build
  .git
  [include]
  src/main.py

QUICK EXAMPLES:
  toksync                          # Apply .sync to the current tree
  toksync --unsync                 # Reverse a previous sync
  toksync -f '*.py' -v             # Only .py files, with progress output
  toksync --unwrite -v             # Preview changes without writing"
)]
pub struct Args {
    /// Sync config file.
    #[arg(short, long, default_value = ".sync")]
    pub config: PathBuf,

    /// Apply the token mapping in reverse, restoring original names.
    #[arg(short, long)]
    pub unsync: bool,

    /// Glob pattern matched against file base names during traversal.
    #[arg(short, long, default_value = "**")]
    pub file: String,

    /// Print info about the sync.
    #[arg(short, long)]
    pub verbose: bool,

    /// Compute and report changes without writing them back to disk.
    #[arg(long)]
    pub unwrite: bool,

    /// Indent prefix for verbose display of information.
    #[arg(short, long, default_value = "   ")]
    pub prefix: String,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
