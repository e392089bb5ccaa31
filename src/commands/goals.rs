// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use rust_decimal::Decimal;

use super::{confirm, delete_report, ids_of, settle};
use crate::models::SavingsGoal;
use crate::services::SavingsGoals;
use crate::store::RecordStore;
use crate::utils::{format_currency, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &ArgMatches, ccy: &str) -> Result<()> {
    let goals = SavingsGoals::new(store);
    match m.subcommand() {
        Some(("add", sub)) => add(&goals, sub)?,
        Some(("list", sub)) => {
            let data = settle(goals.get_all());
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|g| {
                        vec![
                            g.id.map(|id| id.to_string()).unwrap_or_default(),
                            g.title.clone(),
                            format_currency(g.current_amount, ccy),
                            format_currency(g.target_amount, ccy),
                            g.deadline.map(|d| d.to_string()).unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Title", "Saved", "Target", "Deadline"], rows)
                );
            }
        }
        Some(("contribute", sub)) => {
            let id = *sub.get_one::<i64>("id").context("missing id")?;
            let delta = parse_decimal(sub.get_one::<String>("amount").context("missing amount")?)?;
            if let Some(goal) = settle(goals.update_amount(id, delta)) {
                println!(
                    "Savings goal updated: {} now at {}",
                    goal.title,
                    format_currency(goal.current_amount, ccy)
                );
            }
        }
        Some(("rm", sub)) => {
            delete_report("Savings goal", settle(goals.delete_many(&ids_of(sub))));
        }
        _ => {}
    }
    Ok(())
}

fn add<S: RecordStore + ?Sized>(goals: &SavingsGoals<'_, S>, sub: &ArgMatches) -> Result<()> {
    let title = sub
        .get_one::<String>("title")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        bail!("Goal title is required");
    }
    let target = parse_decimal(sub.get_one::<String>("target").context("--target is required")?)?;
    if target <= Decimal::ZERO {
        bail!("Target amount must be positive");
    }
    let current = match sub.get_one::<String>("current") {
        Some(v) => parse_decimal(v)?.max(Decimal::ZERO),
        None => Decimal::ZERO,
    };
    let deadline = sub
        .get_one::<String>("deadline")
        .map(|d| parse_date(d))
        .transpose()?;
    let goal = SavingsGoal {
        title,
        target_amount: target,
        current_amount: current,
        deadline,
        ..SavingsGoal::default()
    };
    confirm(&settle(goals.create(&goal)), "Savings goal created successfully");
    Ok(())
}
