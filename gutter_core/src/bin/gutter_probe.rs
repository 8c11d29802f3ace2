//! Runs the gutter pipeline for one file and prints what a host would draw.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use gutter_core::show_diff::STATUS_KEY;
use gutter_core::{
    disabled_message, Action, EnablementState, Events, GitGutterCommand, MemoryView, RegionKind,
    RunArgs, Settings,
};

#[derive(Parser)]
#[command(
    name = "gutter-probe",
    version,
    about = "Print the change markers git gutter would draw for a file"
)]
struct Cli {
    #[arg(index = 1, help = "File inside a git working tree")]
    file: Utf8PathBuf,
    #[arg(short, long, help = "JSON settings file")]
    settings: Option<Utf8PathBuf>,
    #[arg(
        short,
        long,
        help = "Revision to compare against (HEAD, origin, refs/heads/<name>, refs/tags/<name> or a commit)"
    )]
    compare: Option<String>,
    #[arg(short, long, help = "Print the diff popup for this zero-based row")]
    row: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {path}"))?,
        None => Settings::default(),
    };
    if let Some(compare) = cli.compare {
        settings.compare_against = compare;
    }

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read {}", cli.file))?;
    let file = cli
        .file
        .canonicalize_utf8()
        .with_context(|| format!("failed to resolve {}", cli.file))?;
    let view = MemoryView::new(text).with_file_name(file.as_std_path());

    let mut cmd = GitGutterCommand::new(view, Arc::new(settings));
    if !cmd.is_enabled(Some(Events::LOAD)) {
        if let Some(EnablementState::Disabled(reason)) = cmd.state() {
            bail!("{}", disabled_message(Some(file.as_std_path()), reason));
        }
        bail!("change tracking is disabled for {file}");
    }
    cmd.run(&RunArgs::events(Events::LOAD))?;

    let view = cmd.view();
    for kind in RegionKind::ALL {
        let rows = view.regions(kind.key());
        if !rows.is_empty() {
            let rows: Vec<String> = rows.iter().map(|row| (row + 1).to_string()).collect();
            println!("{:<14} {}", kind_label(kind), rows.join(","));
        }
    }
    if let Some(status) = view.status(STATUS_KEY) {
        println!("status         {status}");
    }

    if let Some(row) = cli.row {
        let args = RunArgs::action(Action::ShowDiffPopup).with_kwarg("row", row);
        cmd.run(&args)?;
        match cmd.view().popups().last() {
            Some((content, _)) => println!("{content}"),
            None => println!("no change at row {row}"),
        }
    }

    Ok(())
}

const fn kind_label(kind: RegionKind) -> &'static str {
    match kind {
        RegionKind::Inserted => "inserted",
        RegionKind::Modified => "modified",
        RegionKind::DeletedTop => "deleted-top",
        RegionKind::DeletedBottom => "deleted-bottom",
        RegionKind::DeletedDual => "deleted-dual",
        RegionKind::Untracked => "untracked",
        RegionKind::Ignored => "ignored",
    }
}
