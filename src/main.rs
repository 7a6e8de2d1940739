//! Tandem - a split-view terminal markdown editor.
//!
//! # Usage
//!
//! ```bash
//! tandem notes.md
//! tandem --view edit notes.md
//! tandem --no-sync --outline notes.md
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use tandem::app::{App, ViewMode};
use tandem::config::{
    ConfigFlags, ViewModeArg, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};

/// A split-view terminal markdown editor
#[derive(Parser, Debug)]
#[command(name = "tandem", version, about, long_about = None)]
struct Cli {
    /// Markdown file to edit (omit for a scratch buffer)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Initial view: edit, split, or preview
    #[arg(long, value_enum)]
    view: Option<ViewModeArg>,

    /// Enable synchronized scrolling in split view
    #[arg(long)]
    sync: bool,

    /// Disable synchronized scrolling
    #[arg(long, conflicts_with = "sync")]
    no_sync: bool,

    /// Start with the outline sidebar visible
    #[arg(long)]
    outline: bool,

    /// Hide the outline sidebar
    #[arg(long, conflicts_with = "outline")]
    no_outline: bool,

    /// Disable draft autosave
    #[arg(long)]
    no_autosave: bool,

    /// Word-count goal shown in the status bar
    #[arg(long, value_name = "WORDS")]
    word_goal: Option<usize>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let view = effective.view.map_or(ViewMode::Split, ViewMode::from);

    let mut app = App::new(cli.file)
        .with_view(view)
        .with_outline_visible(effective.outline && !effective.no_outline)
        .with_scroll_lock(effective.scroll_lock_enabled())
        .with_autosave(!effective.no_autosave)
        .with_word_goal(effective.word_goal)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
