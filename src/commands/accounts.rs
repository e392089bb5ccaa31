// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use super::{confirm, delete_report, ids_of, settle};
use crate::models::BankAccount;
use crate::services::BankAccounts;
use crate::store::RecordStore;
use crate::utils::{
    format_currency, mask_account_number, maybe_print_json, parse_decimal, pretty_table,
};

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &ArgMatches, ccy: &str) -> Result<()> {
    let accounts = BankAccounts::new(store);
    match m.subcommand() {
        Some(("add", sub)) => {
            let mut account = BankAccount::default();
            apply_fields(&mut account, sub)?;
            validate(&account)?;
            confirm(
                &settle(accounts.create(&account)),
                "Bank account created successfully",
            );
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").context("missing id")?;
            if let Some(mut account) = settle(accounts.get_by_id(id)) {
                apply_fields(&mut account, sub)?;
                validate(&account)?;
                confirm(
                    &settle(accounts.update(id, &account)),
                    "Bank account updated successfully",
                );
            }
        }
        Some(("list", sub)) => {
            let data = settle(accounts.get_all());
            let show_numbers = sub.get_flag("show-numbers");
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.map(|id| id.to_string()).unwrap_or_default(),
                            a.account_name.clone(),
                            a.bank_name.clone(),
                            if show_numbers {
                                a.account_number.clone()
                            } else {
                                mask_account_number(&a.account_number)
                            },
                            format_currency(a.balance, ccy),
                            a.tag_list().join(", "),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Account", "Bank", "Number", "Balance", "Tags"], rows)
                );
            }
        }
        Some(("total", _)) => {
            let total = settle(accounts.get_total_balance());
            println!("Total balance: {}", format_currency(total, ccy));
        }
        Some(("rm", sub)) => {
            delete_report("Bank account", settle(accounts.delete_many(&ids_of(sub))));
        }
        _ => {}
    }
    Ok(())
}

fn apply_fields(account: &mut BankAccount, sub: &ArgMatches) -> Result<()> {
    if let Some(v) = sub.get_one::<String>("name") {
        account.account_name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("bank") {
        account.bank_name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("number") {
        account.account_number = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("balance") {
        account.balance = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("tags") {
        account.tags = v.clone();
    }
    Ok(())
}

pub fn validate(account: &BankAccount) -> Result<()> {
    if account.account_name.trim().is_empty() {
        bail!("Account name is required");
    }
    if account.bank_name.trim().is_empty() {
        bail!("Bank name is required");
    }
    Ok(())
}
