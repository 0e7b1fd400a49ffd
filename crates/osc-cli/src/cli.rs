use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "osc",
    about = "Semantic diffs of map entity snapshots as osmChange documents",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff two snapshots and write the changeset
    Diff(DiffArgs),
    /// Rewrite a record stream
    Rewrite(RewriteArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// Snapshot before the change
    pub original: PathBuf,
    /// Snapshot after the change
    pub modified: PathBuf,
    /// Where to write the changeset
    pub output: PathBuf,
}

#[derive(Args)]
pub struct RewriteArgs {
    #[command(subcommand)]
    pub action: RewriteAction,
}

#[derive(Subcommand)]
pub enum RewriteAction {
    /// Merge configured tags onto selected entities
    Overrides {
        input: PathBuf,
        output: PathBuf,
    },
    /// Strip route network tagging from highways
    Networks {
        input: PathBuf,
        output: PathBuf,
        /// Network to strip; repeat for several. Replaces configured targets.
        #[arg(long = "target")]
        targets: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["osc", "diff", "a.jsonl", "b.jsonl", "out.osc"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.original, PathBuf::from("a.jsonl"));
            assert_eq!(args.modified, PathBuf::from("b.jsonl"));
            assert_eq!(args.output, PathBuf::from("out.osc"));
        } else {
            panic!("wrong command");
        }
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn diff_requires_three_paths() {
        assert!(Cli::try_parse_from(["osc", "diff", "a.jsonl", "b.jsonl"]).is_err());
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "osc", "diff", "a", "b", "c", "-v", "--config", "osc.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("osc.toml")));
    }

    #[test]
    fn parse_rewrite_overrides() {
        let cli = Cli::try_parse_from(["osc", "rewrite", "overrides", "in", "out"]).unwrap();
        if let Command::Rewrite(args) = cli.command {
            assert!(matches!(args.action, RewriteAction::Overrides { .. }));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_rewrite_networks_targets() {
        let cli = Cli::try_parse_from([
            "osc", "rewrite", "networks", "in", "out", "--target", "AU:QLD:S", "--target",
            "AU:NR",
        ])
        .unwrap();
        if let Command::Rewrite(RewriteArgs {
            action: RewriteAction::Networks { targets, .. },
        }) = cli.command
        {
            assert_eq!(targets, vec!["AU:QLD:S", "AU:NR"]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_rewrite_networks_without_targets() {
        let cli = Cli::try_parse_from(["osc", "rewrite", "networks", "in", "out"]).unwrap();
        if let Command::Rewrite(RewriteArgs {
            action: RewriteAction::Networks { targets, .. },
        }) = cli.command
        {
            assert!(targets.is_empty());
        } else {
            panic!("wrong command");
        }
    }
}
