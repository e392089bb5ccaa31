// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-entity gateways and the queries specific to each table.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod goals;
pub mod transactions;

use crate::gateway::Gateway;
use crate::models::{BankAccount, Budget, Category, SavingsGoal, Transaction};

pub type Transactions<'s, S> = Gateway<'s, S, Transaction>;
pub type Budgets<'s, S> = Gateway<'s, S, Budget>;
pub type Categories<'s, S> = Gateway<'s, S, Category>;
pub type SavingsGoals<'s, S> = Gateway<'s, S, SavingsGoal>;
pub type BankAccounts<'s, S> = Gateway<'s, S, BankAccount>;
