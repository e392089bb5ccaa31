// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::Local;
use clap::ArgMatches;

use super::settle;
use crate::reports;
use crate::services::{BankAccounts, Budgets, SavingsGoals, Transactions};
use crate::store::RecordStore;
use crate::utils::{format_currency, maybe_print_json, parse_month, pretty_table};

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &ArgMatches, ccy: &str) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(store, sub, ccy)?,
        Some(("spend-by-category", sub)) => spend_by_category(store, sub, ccy)?,
        Some(("budgets", sub)) => budgets(store, sub, ccy)?,
        Some(("goals", sub)) => goals(store, sub, ccy)?,
        Some(("dashboard", sub)) => dashboard(store, sub, ccy)?,
        _ => {}
    }
    Ok(())
}

fn required_month(sub: &ArgMatches) -> Result<String> {
    parse_month(sub.get_one::<String>("month").context("--month is required")?)
}

fn current_month() -> String {
    Local::now().date_naive().format("%Y-%m").to_string()
}

fn cashflow<S: RecordStore + ?Sized>(store: &S, sub: &ArgMatches, ccy: &str) -> Result<()> {
    let months = *sub.get_one::<usize>("months").unwrap_or(&12);
    let txs = settle(Transactions::new(store).get_all());
    let data = reports::cashflow(&txs, Some(months));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.month.clone(),
                    format_currency(c.income, ccy),
                    format_currency(c.expense, ccy),
                    format_currency(c.net, ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));
    }
    Ok(())
}

fn spend_by_category<S: RecordStore + ?Sized>(
    store: &S,
    sub: &ArgMatches,
    ccy: &str,
) -> Result<()> {
    let month = required_month(sub)?;
    let txs = settle(Transactions::new(store).get_by_month(&month));
    let data = reports::spending_by_category(&txs, &month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|(cat, amt)| vec![cat.clone(), format_currency(*amt, ccy)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn budgets<S: RecordStore + ?Sized>(store: &S, sub: &ArgMatches, ccy: &str) -> Result<()> {
    let month = required_month(sub)?;
    let budgets = settle(Budgets::new(store).get_by_month(&month));
    let txs = settle(Transactions::new(store).get_by_month(&month));
    let data = reports::budget_status(&budgets, &txs, &month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    format_currency(s.spent, ccy),
                    format_currency(s.limit, ccy),
                    format!("{}%", s.percent_used),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Spent", "Limit", "Used"], rows));
    }
    Ok(())
}

fn goals<S: RecordStore + ?Sized>(store: &S, sub: &ArgMatches, ccy: &str) -> Result<()> {
    let today = Local::now().date_naive();
    let data: Vec<_> = settle(SavingsGoals::new(store).get_all())
        .iter()
        .map(|g| reports::goal_progress(g, today))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|p| {
                vec![
                    p.title.clone(),
                    format!("{}%", p.percent),
                    format_currency(p.remaining, ccy),
                    match p.days_left {
                        Some(d) if d < 0 => format!("{} days overdue", -d),
                        Some(d) => format!("{} days", d),
                        None => String::new(),
                    },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Goal", "Progress", "Remaining", "Deadline"], rows)
        );
    }
    Ok(())
}

fn dashboard<S: RecordStore + ?Sized>(store: &S, sub: &ArgMatches, ccy: &str) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => current_month(),
    };
    let total = settle(BankAccounts::new(store).get_total_balance());
    let txs = settle(Transactions::new(store).get_by_month(&month));
    let summary = reports::dashboard_summary(total, &txs, &month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let rows = vec![
            vec!["Total balance".into(), format_currency(summary.total_balance, ccy)],
            vec![format!("Income {}", month), format_currency(summary.month_income, ccy)],
            vec![format!("Expenses {}", month), format_currency(summary.month_expense, ccy)],
            vec!["Net".into(), format_currency(summary.month_net, ccy)],
            vec!["Savings rate".into(), format!("{}%", summary.savings_rate)],
        ];
        println!("{}", pretty_table(&["", ""], rows));
    }
    Ok(())
}
