//! Project Carousel - Kiosk Launcher
//!
//! Shows the projects found in the configured folder (default `Jogos` next to
//! this executable) and launches the selected one.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use project_carousel::{config, gui};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Project Carousel starting...");

    let mut launcher_config = config::load_config();
    launcher_config
        .apply_args(std::env::args().skip(1))
        .context("Invalid command line")?;

    tracing::info!(
        "Projects directory: {:?}",
        launcher_config.resolve_projects_dir()
    );

    gui::run(launcher_config).context("Launcher window failed")?;

    Ok(())
}
