// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing::debug;

use smartbudget::{cli, commands, config, store::HttpStore, utils};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();
    if matches.subcommand().is_none() {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    }

    let cfg = config::load().context("Failed to load configuration")?;
    debug!(api_url = %cfg.api_url, "configuration loaded");
    let store = HttpStore::new(&cfg).context("Failed to build HTTP client")?;
    let ccy = cfg.currency.as_str();

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&store, sub, ccy)?,
        Some(("budget", sub)) => commands::budgets::handle(&store, sub, ccy)?,
        Some(("category", sub)) => commands::categories::handle(&store, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&store, sub, ccy)?,
        Some(("account", sub)) => commands::accounts::handle(&store, sub, ccy)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub, ccy)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {}
    }
    Ok(())
}
