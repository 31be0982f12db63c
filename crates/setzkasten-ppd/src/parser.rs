// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line-oriented parser for the PPD header keywords the index cares about.
//
// A PPD is a keyword-per-line text format: `*Keyword: "value"` or a
// bareword value. Only a handful of header fields matter for indexing;
// everything else (the actual printer capability description) is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::trace;

use setzkasten_core::error::{Result, SetzkastenError};

use crate::normalize::clean;

/// The magic every conforming PPD starts with.
const PPD_MAGIC: &str = "*PPD-Adobe";

/// Raw header fields of one PPD file, values cleaned but not yet
/// normalized into index keys (that is [`crate::info::DriverInfo::derive`]).
///
/// Missing fields stay empty; a missing keyword is never a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PpdHeader {
    pub manufacturer: String,
    pub model_name: String,
    pub product: String,
    pub nick_name: String,
    pub language: String,
    pub pnp_manufacturer: String,
    pub pnp_model: String,
}

impl PpdHeader {
    fn is_complete(&self) -> bool {
        !self.manufacturer.is_empty()
            && !self.model_name.is_empty()
            && !self.product.is_empty()
            && !self.nick_name.is_empty()
            && !self.language.is_empty()
            && !self.pnp_manufacturer.is_empty()
            && !self.pnp_model.is_empty()
    }

    /// Store `value` under `keyword` if it is one we recognize and not
    /// already set (first occurrence wins).
    fn absorb(&mut self, keyword: &str, value: &str) {
        let slot = match keyword {
            "*Manufacturer" => &mut self.manufacturer,
            "*ModelName" => &mut self.model_name,
            "*Product" => &mut self.product,
            "*NickName" => &mut self.nick_name,
            "*LanguageVersion" => &mut self.language,
            "*pnpManufacturer" => &mut self.pnp_manufacturer,
            "*pnpModel" => &mut self.pnp_model,
            _ => return,
        };
        if slot.is_empty() {
            *slot = clean(value);
        }
    }
}

/// Parse the header of the PPD file at `path`.
///
/// Returns [`SetzkastenError::NotPpd`] when the file does not carry the
/// `*PPD-Adobe` magic — the typical offender is the HTML error page cupsd
/// hands out in place of a missing PPD.
pub fn parse_ppd(path: &Path) -> Result<PpdHeader> {
    let file = File::open(path)?;
    parse_ppd_reader(BufReader::new(file), &path.display().to_string())
}

/// Parse a PPD header from any buffered reader.
///
/// `origin` only labels errors and trace output.
pub fn parse_ppd_reader<R: BufRead>(mut reader: R, origin: &str) -> Result<PpdHeader> {
    let mut header = PpdHeader::default();
    let mut saw_magic = false;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // Vendors ship PPDs in assorted legacy encodings; a lossy view is
        // fine since the header keywords themselves are plain ASCII.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);

        if !saw_magic {
            if line.trim().is_empty() {
                continue;
            }
            if !line.starts_with(PPD_MAGIC) {
                return Err(SetzkastenError::NotPpd(origin.to_string()));
            }
            saw_magic = true;
            continue;
        }

        if let Some((keyword, value)) = line.split_once(':') {
            header.absorb(keyword, value);
            if header.is_complete() {
                break;
            }
        }
    }

    if !saw_magic {
        return Err(SetzkastenError::NotPpd(origin.to_string()));
    }

    trace!(origin, ?header, "parsed PPD header");
    Ok(header)
}
