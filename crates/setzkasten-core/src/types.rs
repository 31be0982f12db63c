// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for CUPS destination administration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Printer state as carried in the IPP `printer-state` enum attribute.
///
/// CUPS accepts only idle and stopped when modifying a queue; "processing"
/// is a runtime state the scheduler assigns itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrinterState {
    Idle,
    Stopped,
}

impl PrinterState {
    /// The IPP enum value (RFC 8011 §5.4.11).
    pub fn ipp_enum(&self) -> i32 {
        match self {
            Self::Idle => 3,
            Self::Stopped => 5,
        }
    }

    /// Parse the keyword form used in configuration ("idle"/"stopped",
    /// case-insensitive). Unknown keywords map to `None`.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Some(Self::Idle),
            "stopped" => Some(Self::Stopped),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrinterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Banner page pair for the two-valued `job-sheets-default` attribute.
///
/// "none" is the conventional no-banner value on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSheets {
    pub start: String,
    pub end: String,
}

impl Default for JobSheets {
    fn default() -> Self {
        Self {
            start: "none".into(),
            end: "none".into(),
        }
    }
}

/// Everything a CUPS-Add-Modify-Printer request can carry.
///
/// Only `name` is mandatory; every `None`/empty field is simply left out of
/// the request, so modifying a single attribute does not reset the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterSettings {
    pub name: String,
    pub info: Option<String>,
    pub location: Option<String>,
    pub device_uri: Option<String>,
    /// Name of a PPD already known to cupsd (`ppd-name`).
    pub ppd_name: Option<String>,
    pub state: Option<PrinterState>,
    pub state_message: Option<String>,
    pub accepting: Option<bool>,
    pub banners: Option<JobSheets>,
    /// User ACL. When `allow_users` is non-empty it wins over `deny_users`;
    /// when both are empty the queue's ACL is reset to allow everyone.
    pub allow_users: BTreeSet<String>,
    pub deny_users: BTreeSet<String>,
}

impl PrinterSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Everything a CUPS-Add-Modify-Class request can carry.
///
/// Classes have no device URI or PPD of their own; they aggregate member
/// printers instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassSettings {
    pub name: String,
    pub info: Option<String>,
    pub location: Option<String>,
    pub state: Option<PrinterState>,
    pub state_message: Option<String>,
    pub accepting: Option<bool>,
    pub banners: Option<JobSheets>,
    pub allow_users: BTreeSet<String>,
    pub deny_users: BTreeSet<String>,
    /// Member printer names (not URIs; the client builds the URIs).
    pub members: BTreeSet<String>,
}

impl ClassSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A class as reported by CUPS-Get-Classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub members: Vec<String>,
}

/// Which destination kind an enumeration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestKind {
    Printers,
    Classes,
}
