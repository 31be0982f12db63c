// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Agent configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for both halves of the agent: the PPD index and the CUPS client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Directory tree of PPD driver files to index.
    pub ppd_dir: PathBuf,
    /// Where the serialized vendor/model database is written.
    pub db_path: PathBuf,
    /// Hostname of the CUPS server to administer.
    pub server: String,
    /// IPP port of the CUPS server (default 631).
    pub port: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ppd_dir: PathBuf::from("/usr/share/cups/model"),
            db_path: PathBuf::from("/var/lib/setzkasten/ppd_db.json"),
            server: "localhost".into(),
            port: 631,
        }
    }
}

impl AgentConfig {
    /// Build a configuration from the environment, falling back to defaults.
    ///
    /// `CUPS_SERVER` and `IPP_PORT` are the variables cupsd's own client
    /// tools honour; `SETZKASTEN_PPD_DIR` and `SETZKASTEN_DB` override the
    /// index locations.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ppd_dir: std::env::var_os("SETZKASTEN_PPD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.ppd_dir),
            db_path: std::env::var_os("SETZKASTEN_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            server: std::env::var("CUPS_SERVER").unwrap_or(defaults.server),
            port: std::env::var("IPP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }
}
