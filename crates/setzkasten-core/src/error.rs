// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Setzkasten.

use thiserror::Error;

/// Top-level error type for all Setzkasten operations.
#[derive(Debug, Error)]
pub enum SetzkastenError {
    // -- IPP / CUPS errors --
    #[error("IPP request failed: {0}")]
    IppRequest(String),

    // -- PPD index errors --
    #[error("not a PPD file: {0}")]
    NotPpd(String),

    #[error("PPD scan failed: {0}")]
    Scan(String),

    #[error("database write failed: {0}")]
    DbWrite(String),

    #[error("database read failed: {0}")]
    DbRead(String),

    // -- Ambient --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SetzkastenError>;
