// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod intent;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod narrative;
pub mod router;
pub mod utils;

pub use error::{ComputationFailure, LedgerError};
pub use router::{Copilot, QueryResponse};
