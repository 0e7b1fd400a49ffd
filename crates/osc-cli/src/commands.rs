use std::path::Path;

use anyhow::Context;
use colored::{ColoredString, Colorize};
use osc_changeset::{ChangesetSerializer, RenderedChangeset, SerializerOptions};
use osc_diff::{diff_snapshots, ChangeAction, DiffSummary};
use osc_rewrite::{
    rewrite_file, NetworkStripConfig, NetworkTagStripper, RewriteStats, Rewriter, TagOverrides,
};
use osc_snapshot::{build_pair, load_snapshot};
use osc_types::EntityKind;

use crate::cli::{Cli, Command, DiffArgs, RewriteAction, RewriteArgs};
use crate::config::OscConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = OscConfig::load_or_default(cli.config.as_deref())?;
    match cli.command {
        Command::Diff(args) => cmd_diff(args, &config),
        Command::Rewrite(args) => cmd_rewrite(args, &config),
    }
}

fn cmd_diff(args: DiffArgs, config: &OscConfig) -> anyhow::Result<()> {
    let rendered = diff_files(&args.original, &args.modified, &args.output, config)?;
    println!(
        "{} Wrote changeset to {} ({} bytes)",
        "✓".green().bold(),
        args.output.display().to_string().bold(),
        rendered.changeset.len()
    );
    print_summary(&rendered.summary);
    println!("  blake3: {}", rendered.changeset.content_hash_hex().yellow());
    Ok(())
}

#[derive(Debug)]
struct DiffOutcome {
    summary: DiffSummary,
    changeset: RenderedChangeset,
}

fn diff_files(
    original: &Path,
    modified: &Path,
    output: &Path,
    config: &OscConfig,
) -> anyhow::Result<DiffOutcome> {
    let policy = config.snapshot.duplicates;
    let (original, modified) = build_pair(
        || load_snapshot(original, policy),
        || load_snapshot(modified, policy),
        config.snapshot.parallel,
    )
    .context("loading snapshots")?;

    let partition = diff_snapshots(&original, &modified);
    let summary = partition.summary();
    tracing::info!(%summary, "diff computed");

    let serializer = ChangesetSerializer::new(SerializerOptions::from(&config.changeset));
    let root = serializer.serialize(&partition, &original, &modified)?;
    let changeset = RenderedChangeset::render(&root)?;
    changeset
        .persist(output)
        .with_context(|| format!("writing changeset {}", output.display()))?;

    Ok(DiffOutcome { summary, changeset })
}

fn print_summary(summary: &DiffSummary) {
    for action in ChangeAction::ALL {
        let counts: Vec<String> = EntityKind::ALL
            .iter()
            .map(|&kind| format!("{} {}s", summary.count(action, kind), kind.element_name()))
            .collect();
        println!("  {} {}", summary_label(action), counts.join(", "));
    }
}

/// Section label padded to a fixed width. Padding happens before
/// colouring so escape codes do not count towards the width.
fn padded_label(action: ChangeAction) -> String {
    format!("{:<8}", format!("{}:", action.section_name()))
}

fn summary_label(action: ChangeAction) -> ColoredString {
    let label = padded_label(action);
    match action {
        ChangeAction::Create => label.green(),
        ChangeAction::Modify => label.yellow(),
        ChangeAction::Delete => label.red(),
    }
}

fn cmd_rewrite(args: RewriteArgs, config: &OscConfig) -> anyhow::Result<()> {
    let (input, output, stats) = match args.action {
        RewriteAction::Overrides { input, output } => {
            let overrides = TagOverrides::new(&config.rewrite.overrides)?;
            if overrides.is_empty() {
                println!("{} no tag overrides configured", "!".yellow().bold());
            }
            let stats = run_rewriter(&input, &output, &overrides)?;
            (input, output, stats)
        }
        RewriteAction::Networks {
            input,
            output,
            targets,
        } => {
            let strip = if targets.is_empty() {
                config.rewrite.networks.clone()
            } else {
                NetworkStripConfig { targets }
            };
            let stats = run_rewriter(&input, &output, &NetworkTagStripper::new(&strip))?;
            println!("  highway ways: {}", stats.highway_polylines);
            (input, output, stats)
        }
    };

    println!(
        "{} Rewrote {} -> {}",
        "✓".green().bold(),
        input.display(),
        output.display().to_string().bold()
    );
    for kind in EntityKind::ALL {
        let counts = stats.kind(kind);
        println!(
            "  {}s: {} seen, {} modified, {} deleted",
            kind.element_name(),
            counts.seen,
            counts.modified.to_string().yellow(),
            counts.dropped.to_string().red()
        );
    }
    Ok(())
}

fn run_rewriter<R: Rewriter>(
    input: &Path,
    output: &Path,
    rewriter: &R,
) -> anyhow::Result<RewriteStats> {
    rewrite_file(input, output, rewriter)
        .with_context(|| format!("{} rewrite of {}", rewriter.name(), input.display()))
}
