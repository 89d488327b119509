// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod interest;
pub mod ledger;
pub mod models;
pub mod repo;
pub mod rewards;
pub mod rollover;
pub mod scheduler;
pub mod settings;
pub mod utils;
