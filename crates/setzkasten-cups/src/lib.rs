// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Setzkasten CUPS — administration glue over IPP. The `ipp` crate owns
// framing and transport; this crate only marshals cupsd's administrative
// attribute sets and interprets the answers.

pub mod client;
pub mod marshal;

pub use client::CupsClient;
