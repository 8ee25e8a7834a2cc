mod action;
mod app;
mod async_diff;
mod cli;
mod compare;
mod components;
mod config;
mod diff;
mod display_map;
mod document;
mod error;
mod event;
mod logging;
mod markdown;
mod print;
mod state;
mod theme;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use tracing::info;

use crate::app::App;
use crate::cli::Cli;
use crate::compare::compare_files;
use crate::config::MdcompareConfig;
use crate::state::DiffOptions;
use crate::theme::Theme;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore so the user gets their shell back
        let _ = tui::restore();
        default_hook(panic_info);
    }));
}

fn run_print(cli: &Cli, config: &MdcompareConfig, options: &DiffOptions) -> Result<()> {
    let output = compare_files(&cli.old, &cli.new, config.max_line_cells).with_context(|| {
        format!(
            "could not compare {} with {}",
            cli.old.display(),
            cli.new.display()
        )
    })?;
    let format = print::resolve_format(cli.format, io::stdout().is_terminal());
    let rendered = print::render(&output, options, format)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

async fn run_tui(cli: &Cli, config: MdcompareConfig, options: DiffOptions) -> Result<()> {
    let mut app = App::new(
        options,
        config.theme,
        cli.old.clone(),
        cli.new.clone(),
        config.max_line_cells,
    );

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.log.as_deref(), cli.print)?;

    // Load config, apply CLI overrides
    let mut config = config::load_config();
    if let Some(ref theme_name) = cli.theme {
        config.theme = Theme::from_name(theme_name);
    }

    // Merge CLI flags with config-file settings (CLI wins)
    let unified = cli.unified || config.unified.unwrap_or(false);
    let diff_only = cli.diff_only || config.diff_only.unwrap_or(false);
    let mut diff_options = DiffOptions::new(unified, diff_only);
    if let Some(radius) = cli.context.or(config.context_lines) {
        diff_options.context_radius = radius;
    }
    if let Some(limit) = config.char_diff_limit {
        diff_options.char_diff_limit = limit;
    }
    diff_options.edge_gaps = config.edge_gaps.unwrap_or(false);
    info!(
        old = %cli.old.display(),
        new = %cli.new.display(),
        view = diff_options.view_mode.label(),
        diff_only = diff_options.diff_only,
        "starting"
    );

    let result = if cli.print {
        run_print(&cli, &config, &diff_options)
    } else {
        run_tui(&cli, config, diff_options).await
    };

    if let Err(ref e) = result {
        eprintln!("mdcompare: {e:#}");
    }

    result
}
