// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod reports;
pub mod schema;
pub mod services;
pub mod store;
pub mod utils;
pub mod wire;
