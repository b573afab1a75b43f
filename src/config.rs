// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! by the wallet core. Configuration is loaded from the environment once by
//! the host application and passed down explicitly.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `POWM_DATA_DIR` | Directory holding the sealed blob files | `./powm-data` |
//! | `POWM_HISTORY_LIMIT` | Number of history records kept on disk | `100` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the sealed blob directory.
///
/// Only ciphertext is ever written here; the keys protecting it live in
/// secure OS storage.
pub const DATA_DIR_ENV: &str = "POWM_DATA_DIR";

/// Environment variable name for the history cap.
pub const HISTORY_LIMIT_ENV: &str = "POWM_HISTORY_LIMIT";

/// Environment variable selecting the log formatter.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default data directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "./powm-data";

/// Most recent history entries kept; older ones are evicted first.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Resolved configuration for the storage side of the wallet core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// Root directory for sealed blob files.
    pub data_dir: PathBuf,
    /// History cap.
    pub history_limit: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl WalletConfig {
    /// Load configuration from the process environment.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let history_limit = match lookup(HISTORY_LIMIT_ENV) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = DEFAULT_HISTORY_LIMIT,
                        "Ignoring invalid {HISTORY_LIMIT_ENV}"
                    );
                    DEFAULT_HISTORY_LIMIT
                }
            },
            None => DEFAULT_HISTORY_LIMIT,
        };

        Self {
            data_dir,
            history_limit,
        }
    }
}
