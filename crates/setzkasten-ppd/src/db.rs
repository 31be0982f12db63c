// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The three-level vendor → model → driver index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::info::DriverInfo;

/// On-disk format version, bumped on incompatible layout changes.
pub const DB_FORMAT_VERSION: u32 = 1;

pub type Drivers = BTreeMap<String, DriverInfo>;
pub type Models = BTreeMap<String, Drivers>;
pub type Vendors = BTreeMap<String, Models>;

/// Ordered index of every PPD found under the scan root.
///
/// `BTreeMap` at all three levels keeps iteration (and the serialized
/// form) deterministic: building twice over an unchanged tree must yield
/// byte-identical output. Each (vendor, model, driver) triple holds
/// exactly one file's info; inserting the same triple again replaces the
/// entry wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpdDb {
    pub version: u32,
    pub vendors: Vendors,
}

impl Default for PpdDb {
    fn default() -> Self {
        Self::new()
    }
}

impl PpdDb {
    pub fn new() -> Self {
        Self {
            version: DB_FORMAT_VERSION,
            vendors: Vendors::new(),
        }
    }

    /// Insert one file's record under its derived (vendor, model, driver)
    /// key, replacing any previous holder of that key.
    pub fn insert(&mut self, info: DriverInfo) {
        self.vendors
            .entry(info.vendor.clone())
            .or_default()
            .entry(info.model.clone())
            .or_default()
            .insert(info.driver.clone(), info);
    }

    /// All models of one vendor, or `None` for an unknown vendor.
    pub fn models(&self, vendor: &str) -> Option<&Models> {
        self.vendors.get(vendor)
    }

    /// All drivers of one (vendor, model) pair.
    pub fn drivers(&self, vendor: &str, model: &str) -> Option<&Drivers> {
        self.vendors.get(vendor)?.get(model)
    }

    /// Total number of driver entries across all vendors.
    pub fn len(&self) -> usize {
        self.vendors
            .values()
            .flat_map(|models| models.values())
            .map(|drivers| drivers.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}
