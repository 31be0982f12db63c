// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Derivation of index records from raw PPD headers.

use serde::{Deserialize, Serialize};

use crate::normalize::{first_word, killbraces, killspaces, strupper};
use crate::parser::PpdHeader;

/// Vendors whose `*Manufacturer` strings do not reduce to the index name
/// by the first-word rule. Whole-string match against the uppercased,
/// debraced manufacturer.
const VENDOR_ALIASES: &[(&str, &str)] = &[
    ("HEWLETT-PACKARD", "HP"),
    ("HEWLETT PACKARD", "HP"),
    ("LEXMARK INTERNATIONAL", "LEXMARK"),
    ("OKI DATA CORP", "OKI"),
    ("OKIDATA", "OKI"),
    ("KYOCERA MITA", "KYOCERA"),
    ("MINOLTA QMS", "MINOLTA"),
    ("EASTMAN KODAK COMPANY", "KODAK"),
];

/// Vendor name used when a PPD names no manufacturer at all.
const UNKNOWN_VENDOR: &str = "UNKNOWN";

/// One PPD file's entry in the index: the (vendor, model, driver) key
/// material plus the file it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    /// Path of the PPD, relative to the scan root.
    pub filename: String,
    /// Normalized vendor key, e.g. `HP`.
    pub vendor: String,
    /// Model name with brackets stripped and the vendor prefix removed.
    pub model: String,
    /// Driver label shown to the user; distinct per language variant.
    pub driver: String,
    /// `*LanguageVersion` value, empty when the PPD omits it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub lang: String,
    /// Plug-and-play identifiers, when the PPD carries them.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pnp_vendor: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pnp_model: String,
}

impl DriverInfo {
    /// Normalize a parsed header into index key material.
    ///
    /// `filename` should already be relative to the scan root; its stem is
    /// the model fallback of last resort.
    pub fn derive(header: &PpdHeader, filename: &str) -> Self {
        let vendor = derive_vendor(header);
        let model = derive_model(header, &vendor, filename);
        let driver = derive_driver(header, &model);

        Self {
            filename: filename.to_string(),
            vendor,
            model,
            driver,
            lang: header.language.clone(),
            pnp_vendor: header.pnp_manufacturer.clone(),
            pnp_model: header.pnp_model.clone(),
        }
    }
}

fn canonical_vendor(name: &str) -> Option<&'static str> {
    VENDOR_ALIASES
        .iter()
        .find(|(alias, _)| name == *alias)
        .map(|(_, canonical)| *canonical)
}

fn derive_vendor(header: &PpdHeader) -> String {
    let mut raw = strupper(killspaces(&killbraces(&header.manufacturer)));
    if raw.is_empty() {
        // No *Manufacturer; most such PPDs still lead the model with it.
        raw = strupper(killspaces(&killbraces(&header.model_name)));
    }
    if raw.is_empty() {
        return UNKNOWN_VENDOR.to_string();
    }
    // Alias the whole string first ("HEWLETT-PACKARD"), then the first
    // word ("OKIDATA OL-400"), then settle for the first word itself.
    if let Some(canonical) = canonical_vendor(&raw) {
        return canonical.to_string();
    }
    let word = first_word(&raw);
    if let Some(canonical) = canonical_vendor(word) {
        return canonical.to_string();
    }
    if word.is_empty() {
        UNKNOWN_VENDOR.to_string()
    } else {
        word.to_string()
    }
}

fn derive_model(header: &PpdHeader, vendor: &str, filename: &str) -> String {
    let mut model = killspaces(&killbraces(&header.model_name)).to_string();
    if model.is_empty() {
        // *Product values are parenthesized in PPD syntax; killbraces
        // already handled that.
        model = killspaces(&killbraces(&header.product)).to_string();
    }
    if model.is_empty() {
        model = std::path::Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    // "HP LaserJet 4" under vendor HP indexes as "LaserJet 4". Only a
    // whole leading word counts; "Okidata" must not lose its "Oki".
    if model.len() > vendor.len()
        && model.is_char_boundary(vendor.len())
        && model[..vendor.len()].eq_ignore_ascii_case(vendor)
        && model[vendor.len()..].starts_with([' ', '\t', '-', '/'])
    {
        let rest = model[vendor.len()..].trim_start_matches([' ', '\t', '-', '/']);
        if !rest.is_empty() {
            model = rest.to_string();
        }
    }
    model
}

fn derive_driver(header: &PpdHeader, model: &str) -> String {
    let mut driver = killspaces(&killbraces(&header.nick_name)).to_string();
    if driver.is_empty() {
        driver = model.to_string();
    }
    // Two language variants of one driver file must not collide on the
    // same (vendor, model, driver) key.
    if !header.language.is_empty() && !header.language.eq_ignore_ascii_case("english") {
        driver = format!("{driver} ({})", header.language);
    }
    driver
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(manufacturer: &str, model: &str, nick: &str) -> PpdHeader {
        PpdHeader {
            manufacturer: manufacturer.into(),
            model_name: model.into(),
            nick_name: nick.into(),
            ..PpdHeader::default()
        }
    }

    #[test]
    fn vendor_is_uppercased_first_word() {
        let info = DriverInfo::derive(&header("Acme", "Acme Super 9000", ""), "acme.ppd");
        assert_eq!(info.vendor, "ACME");
    }

    #[test]
    fn vendor_alias_table_is_whole_string() {
        let info = DriverInfo::derive(&header("Hewlett-Packard", "HP LaserJet 4", ""), "hp4.ppd");
        assert_eq!(info.vendor, "HP");

        // Not in the table: falls through to first word.
        let info = DriverInfo::derive(&header("Hewlett-Packard GmbH", "X", ""), "x.ppd");
        assert_eq!(info.vendor, "HEWLETT");
    }

    #[test]
    fn vendor_prefix_is_stripped_from_model() {
        let info = DriverInfo::derive(&header("Hewlett-Packard", "HP LaserJet 4", ""), "hp4.ppd");
        assert_eq!(info.model, "LaserJet 4");
    }

    #[test]
    fn model_equal_to_vendor_is_kept() {
        let info = DriverInfo::derive(&header("Acme", "ACME", ""), "a.ppd");
        assert_eq!(info.model, "ACME");
    }

    #[test]
    fn missing_manufacturer_falls_back_to_model() {
        let info = DriverInfo::derive(&header("", "Okidata OL-400", ""), "ol400.ppd");
        assert_eq!(info.vendor, "OKI");
    }

    #[test]
    fn everything_missing_is_unknown_vendor_and_file_stem() {
        let info = DriverInfo::derive(&PpdHeader::default(), "drivers/mystery.ppd");
        assert_eq!(info.vendor, "UNKNOWN");
        assert_eq!(info.model, "mystery");
        assert_eq!(info.driver, "mystery");
    }

    #[test]
    fn model_falls_back_to_product() {
        let h = PpdHeader {
            product: "(Super 9000)".into(),
            ..PpdHeader::default()
        };
        let info = DriverInfo::derive(&h, "s9000.ppd");
        assert_eq!(info.model, "Super 9000");
    }

    #[test]
    fn driver_label_carries_language_suffix() {
        let h = PpdHeader {
            manufacturer: "Acme".into(),
            model_name: "Super 9000".into(),
            nick_name: "Super 9000 v2".into(),
            language: "German".into(),
            ..PpdHeader::default()
        };
        let info = DriverInfo::derive(&h, "s9000de.ppd");
        assert_eq!(info.driver, "Super 9000 v2 (German)");

        let h_en = PpdHeader {
            language: "English".into(),
            ..h
        };
        let info = DriverInfo::derive(&h_en, "s9000.ppd");
        assert_eq!(info.driver, "Super 9000 v2");
    }

    #[test]
    fn bracketed_model_is_cleaned() {
        let info = DriverInfo::derive(&header("Acme", "\"Super [9000]\"", ""), "s.ppd");
        assert_eq!(info.model, "Super 9000");
    }
}
