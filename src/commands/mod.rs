// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod reports;
pub mod transactions;

use clap::ArgMatches;

use crate::gateway::{DeleteSummary, Notice, Outcome};
use crate::wire::RecordId;

/// Writes one stderr line per notice.
pub fn print_notices(notices: &[Notice]) {
    for n in notices {
        let level = if n.is_error() { "error" } else { "warning" };
        eprintln!("{}: {}", level, n);
    }
}

/// Prints the outcome's notices and hands back its value.
pub fn settle<T>(outcome: Outcome<T>) -> T {
    print_notices(&outcome.notices);
    outcome.value
}

/// Confirmation for a single-record write, printed only when the store
/// returned the record.
pub(crate) fn confirm<T>(written: &Option<T>, message: &str) {
    if written.is_some() {
        println!("{}", message);
    }
}

pub(crate) fn delete_report(noun: &str, summary: DeleteSummary) {
    match summary.deleted {
        0 => {}
        1 if summary.requested == 1 => println!("{} deleted successfully", noun),
        n => println!("Deleted {} of {} records", n, summary.requested),
    }
}

pub(crate) fn ids_of(sub: &ArgMatches) -> Vec<RecordId> {
    sub.get_many::<i64>("ids")
        .into_iter()
        .flatten()
        .copied()
        .collect()
}
