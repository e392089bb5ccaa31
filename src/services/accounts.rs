// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use super::BankAccounts;
use crate::gateway::Outcome;
use crate::models::BankAccount;
use crate::store::RecordStore;

pub fn total_balance(accounts: &[BankAccount]) -> Decimal {
    accounts.iter().map(|a| a.balance).sum()
}

impl<S: RecordStore + ?Sized> BankAccounts<'_, S> {
    /// Sum of all account balances; zero when the list cannot be fetched.
    pub fn get_total_balance(&self) -> Outcome<Decimal> {
        self.get_all().map(|accounts| total_balance(&accounts))
    }
}
