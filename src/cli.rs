use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

/// sidetree - Changed-file panel against the main branch, with side-by-side diffs
#[derive(Parser, Debug)]
#[command(name = "sidetree", version, about, long_about = None)]
pub struct Args {
    /// Repository to inspect. Defaults to the current directory.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub repo: Option<PathBuf>,

    /// Compare against this branch instead of the detected one.
    #[arg(long)]
    pub branch: Option<String>,

    /// Show changed files as a flat list instead of a folder tree.
    #[arg(long)]
    pub flat: bool,

    /// Emit the panel as JSON instead of rendering it.
    #[arg(long)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Generate shell completions
    #[arg(long, value_enum)]
    pub completions: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the changed-file panel (the default).
    Tree,
    /// Open a side-by-side comparison for one file.
    Open {
        /// Repo-relative path of the file to compare.
        path: String,
    },
    /// Print the config file path, writing defaults if it does not exist.
    Config,
}

/// Generate shell completions to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    generate(shell, &mut cmd, "sidetree", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["sidetree"]).unwrap();
        assert!(args.repo.is_none());
        assert!(args.branch.is_none());
        assert!(!args.flat);
        assert!(!args.json);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from(["sidetree", "--flat", "--json", "--branch", "develop"])
            .unwrap();
        assert!(args.flat);
        assert!(args.json);
        assert_eq!(args.branch.as_deref(), Some("develop"));
    }

    #[test]
    fn test_parse_open() {
        let args = Args::try_parse_from(["sidetree", "open", "src/main.rs"]).unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Open { path }) if path == "src/main.rs"
        ));
    }

    #[test]
    fn test_parse_tree_subcommand() {
        let args = Args::try_parse_from(["sidetree", "tree"]).unwrap();
        assert!(matches!(args.command, Some(Command::Tree)));
    }

    #[test]
    fn test_parse_config_subcommand() {
        let args = Args::try_parse_from(["sidetree", "config"]).unwrap();
        assert!(matches!(args.command, Some(Command::Config)));
    }

    #[test]
    fn test_open_requires_a_path() {
        assert!(Args::try_parse_from(["sidetree", "open"]).is_err());
    }
}
