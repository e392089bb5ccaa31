// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use super::{confirm, delete_report, ids_of, settle};
use crate::reports::budget_status;
use crate::services::{Budgets, Transactions};
use crate::store::RecordStore;
use crate::utils::{format_currency, maybe_print_json, parse_decimal, parse_month, pretty_table};

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &ArgMatches, ccy: &str) -> Result<()> {
    let budgets = Budgets::new(store);
    match m.subcommand() {
        Some(("set", sub)) => set(&budgets, sub, ccy)?,
        Some(("list", sub)) => list(&budgets, sub, ccy)?,
        Some(("status", sub)) => status(store, sub, ccy)?,
        Some(("rm", sub)) => delete_report("Budget", settle(budgets.delete_many(&ids_of(sub)))),
        _ => {}
    }
    Ok(())
}

/// Year part of a `YYYY-MM` month.
pub fn year_of(month: &str) -> Result<i32> {
    month
        .split('-')
        .next()
        .and_then(|y| y.parse().ok())
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", month))
}

fn set<S: RecordStore + ?Sized>(budgets: &Budgets<'_, S>, sub: &ArgMatches, ccy: &str) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").context("--month is required")?)?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if category.is_empty() {
        bail!("Category is required");
    }
    let limit = parse_decimal(sub.get_one::<String>("limit").context("--limit is required")?)?;
    if limit.is_sign_negative() {
        bail!("Monthly limit must not be negative");
    }
    let year = match sub.get_one::<i32>("year") {
        Some(y) => *y,
        None => year_of(&month)?,
    };

    let saved = settle(budgets.upsert_budget(&category, limit, &month, year));
    confirm(
        &saved,
        &format!(
            "Budget set for {} / {} = {}",
            month,
            category,
            format_currency(limit, ccy)
        ),
    );
    Ok(())
}

fn list<S: RecordStore + ?Sized>(budgets: &Budgets<'_, S>, sub: &ArgMatches, ccy: &str) -> Result<()> {
    let data = match sub.get_one::<String>("month") {
        Some(month) => settle(budgets.get_by_month(&parse_month(month)?)),
        None => {
            let mut all = settle(budgets.get_all());
            all.sort_by(|a, b| b.month.cmp(&a.month).then_with(|| a.category.cmp(&b.category)));
            all
        }
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.id.map(|id| id.to_string()).unwrap_or_default(),
                    b.month.clone(),
                    b.category.clone(),
                    format_currency(b.monthly_limit, ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Month", "Category", "Limit"], rows));
    }
    Ok(())
}

fn status<S: RecordStore + ?Sized>(store: &S, sub: &ArgMatches, ccy: &str) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").context("--month is required")?)?;
    let budgets = settle(Budgets::new(store).get_by_month(&month));
    let txs = settle(Transactions::new(store).get_by_month(&month));
    let data = budget_status(&budgets, &txs, &month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    format_currency(s.limit, ccy),
                    format_currency(s.spent, ccy),
                    format_currency(s.remaining, ccy),
                    format!("{}%", s.percent_used),
                    if s.over_budget { "OVER".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Remaining", "Used", ""], rows)
        );
    }
    Ok(())
}
