// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Setzkasten PPD — parses PostScript Printer Description files and builds
// an ordered vendor → model → driver index over a directory tree of them.
// The index is what lets a frontend offer "pick your printer" without
// opening a few thousand PPDs on every start.

pub mod db;
pub mod indexer;
pub mod info;
pub mod normalize;
pub mod parser;

pub use db::PpdDb;
pub use indexer::{BuildOutcome, PpdIndexer};
pub use info::DriverInfo;
pub use parser::PpdHeader;
