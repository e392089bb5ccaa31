// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use serde_json::json;

use super::settle;
use crate::models::Transaction;
use crate::services::Transactions;
use crate::store::RecordStore;

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions<S: RecordStore + ?Sized>(store: &S, sub: &ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".into());
    let out = sub.get_one::<String>("out").context("--out is required")?;

    let mut txs = settle(Transactions::new(store).get_all());
    // oldest first, like a ledger
    txs.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    write_transactions(&txs, &fmt, out)?;
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}

pub fn write_transactions(txs: &[Transaction], fmt: &str, out: &str) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Failed to create {}", out))?;
            wtr.write_record(["id", "date", "type", "category", "amount", "description"])?;
            for t in txs {
                wtr.write_record([
                    t.id.map(|id| id.to_string()).unwrap_or_default(),
                    t.date.map(|d| d.to_string()).unwrap_or_default(),
                    t.kind.to_string(),
                    t.category.clone(),
                    t.amount.to_string(),
                    t.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.date, "type": t.kind, "category": t.category,
                        "amount": t.amount.to_string(), "description": t.description
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)
                .with_context(|| format!("Failed to write {}", out))?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
