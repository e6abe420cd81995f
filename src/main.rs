use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use air_quality_dashboard::config::Config;
use air_quality_dashboard::data::loader;
use air_quality_dashboard::DashboardState;

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::parse();

    let dataset = loader::load_file(&config.data)
        .with_context(|| format!("loading {}", config.data.display()))?;
    let dataset = Arc::new(dataset);

    let criteria = config
        .criteria(&dataset)
        .context("invalid filter criteria")?;
    let state = DashboardState::with_criteria(Arc::clone(&dataset), criteria)
        .context("invalid filter criteria")?;

    let view = state.view();
    match view.status {
        Some(msg) => log::warn!("{msg}"),
        None => log::info!("{} observations selected", view.row_count),
    }

    let json = if config.pretty {
        serde_json::to_string_pretty(view)
    } else {
        serde_json::to_string(view)
    }
    .context("serializing dashboard view")?;
    println!("{json}");

    Ok(())
}
