// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use clap::ArgMatches;

use super::{confirm, delete_report, ids_of, settle};
use crate::models::{Category, EntryKind};
use crate::services::Categories;
use crate::store::RecordStore;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle<S: RecordStore + ?Sized>(store: &S, m: &ArgMatches) -> Result<()> {
    let categories = Categories::new(store);
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            if name.is_empty() {
                bail!("Category name is required");
            }
            let kind: EntryKind = sub
                .get_one::<String>("type")
                .map(String::as_str)
                .unwrap_or_default()
                .parse()
                .map_err(anyhow::Error::msg)?;
            let category = Category {
                name,
                kind,
                color: sub.get_one::<String>("color").cloned().unwrap_or_default(),
                ..Category::default()
            };
            confirm(
                &settle(categories.create(&category)),
                "Category created successfully",
            );
        }
        Some(("list", sub)) => {
            let data = match sub.get_one::<String>("type") {
                Some(t) => {
                    let kind: EntryKind = t.parse().map_err(anyhow::Error::msg)?;
                    settle(categories.get_by_type(kind))
                }
                None => settle(categories.get_all()),
            };
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.map(|id| id.to_string()).unwrap_or_default(),
                            c.name.clone(),
                            c.kind.to_string(),
                            c.color.clone(),
                            if c.is_custom { "yes".into() } else { "no".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Type", "Color", "Custom"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            delete_report("Category", settle(categories.delete_many(&ids_of(sub))));
        }
        _ => {}
    }
    Ok(())
}
