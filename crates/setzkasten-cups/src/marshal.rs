// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Attribute marshaling for cupsd's administrative operations.
//
// Pure request-building: every function here turns settings structs into
// `IppAttribute` lists without touching the network, which is what keeps
// the marshaling rules (ACL precedence, URI shapes, banner pairs)
// testable without a cupsd.

use ipp::prelude::*;

use setzkasten_core::types::{ClassSettings, PrinterSettings};

/// cupsd resets a queue's user ACL when `requesting-user-name-allowed`
/// is set to this value.
const ACL_RESET: &str = "all";

/// Queue URI as cupsd expects it in `printer-uri`: always relative to
/// the server handling the request, hence the fixed localhost authority.
pub fn printer_uri(name: &str) -> String {
    format!("ipp://localhost/printers/{name}")
}

/// Class URI, same shape under `/classes/`.
pub fn class_uri(name: &str) -> String {
    format!("ipp://localhost/classes/{name}")
}

/// The printer-attributes group of a CUPS-Add-Modify-Printer request.
///
/// Absent optional fields produce no attribute at all, so a partial
/// modify does not clobber settings it never mentioned. The one
/// exception is the ACL, which is always emitted (see [`acl_attribute`]).
pub fn printer_attributes(settings: &PrinterSettings) -> Vec<IppAttribute> {
    let mut attrs = Vec::new();

    if let Some(uri) = &settings.device_uri {
        attrs.push(IppAttribute::new(
            "device-uri",
            IppValue::Uri(uri.clone()),
        ));
    }
    if let Some(ppd) = &settings.ppd_name {
        attrs.push(IppAttribute::new(
            "ppd-name",
            IppValue::NameWithoutLanguage(ppd.clone()),
        ));
    }

    push_shared_attributes(&mut attrs, SharedSettings::from_printer(settings));
    attrs
}

/// The printer-attributes group of a CUPS-Add-Modify-Class request.
pub fn class_attributes(settings: &ClassSettings) -> Vec<IppAttribute> {
    let mut attrs = Vec::new();

    if !settings.members.is_empty() {
        let uris = settings
            .members
            .iter()
            .map(|name| IppValue::Uri(printer_uri(name)))
            .collect();
        attrs.push(IppAttribute::new("member-uris", IppValue::Array(uris)));
    }

    push_shared_attributes(&mut attrs, SharedSettings::from_class(settings));
    attrs
}

/// The user ACL attribute: a non-empty allow list wins over the deny
/// list; both empty resets the ACL to allow everyone.
pub fn acl_attribute(
    allow: &std::collections::BTreeSet<String>,
    deny: &std::collections::BTreeSet<String>,
) -> IppAttribute {
    let (name, users): (&str, Vec<&String>) = if !allow.is_empty() {
        ("requesting-user-name-allowed", allow.iter().collect())
    } else if !deny.is_empty() {
        ("requesting-user-name-denied", deny.iter().collect())
    } else {
        return IppAttribute::new(
            "requesting-user-name-allowed",
            IppValue::NameWithoutLanguage(ACL_RESET.into()),
        );
    };

    let values = users
        .into_iter()
        .map(|u| IppValue::NameWithoutLanguage(u.clone()))
        .collect();
    IppAttribute::new(name, IppValue::Array(values))
}

/// `requested-attributes` operation attribute for enumeration requests.
pub fn requested_attributes(names: &[&str]) -> IppAttribute {
    let keywords = names
        .iter()
        .map(|n| IppValue::Keyword((*n).to_string()))
        .collect();
    IppAttribute::new("requested-attributes", IppValue::Array(keywords))
}

/// The settings both printers and classes share.
struct SharedSettings<'a> {
    info: &'a Option<String>,
    location: &'a Option<String>,
    state: Option<setzkasten_core::types::PrinterState>,
    state_message: &'a Option<String>,
    accepting: Option<bool>,
    banners: &'a Option<setzkasten_core::types::JobSheets>,
    allow: &'a std::collections::BTreeSet<String>,
    deny: &'a std::collections::BTreeSet<String>,
}

impl<'a> SharedSettings<'a> {
    fn from_printer(s: &'a PrinterSettings) -> Self {
        Self {
            info: &s.info,
            location: &s.location,
            state: s.state,
            state_message: &s.state_message,
            accepting: s.accepting,
            banners: &s.banners,
            allow: &s.allow_users,
            deny: &s.deny_users,
        }
    }

    fn from_class(s: &'a ClassSettings) -> Self {
        Self {
            info: &s.info,
            location: &s.location,
            state: s.state,
            state_message: &s.state_message,
            accepting: s.accepting,
            banners: &s.banners,
            allow: &s.allow_users,
            deny: &s.deny_users,
        }
    }
}

fn push_shared_attributes(attrs: &mut Vec<IppAttribute>, shared: SharedSettings<'_>) {
    if let Some(banners) = shared.banners {
        attrs.push(IppAttribute::new(
            "job-sheets-default",
            IppValue::Array(vec![
                IppValue::NameWithoutLanguage(banners.start.clone()),
                IppValue::NameWithoutLanguage(banners.end.clone()),
            ]),
        ));
    }
    if let Some(accepting) = shared.accepting {
        attrs.push(IppAttribute::new(
            "printer-is-accepting-jobs",
            IppValue::Boolean(accepting),
        ));
    }
    if let Some(info) = shared.info {
        attrs.push(IppAttribute::new(
            "printer-info",
            IppValue::TextWithoutLanguage(info.clone()),
        ));
    }
    if let Some(location) = shared.location {
        attrs.push(IppAttribute::new(
            "printer-location",
            IppValue::TextWithoutLanguage(location.clone()),
        ));
    }
    if let Some(state) = shared.state {
        attrs.push(IppAttribute::new(
            "printer-state",
            IppValue::Enum(state.ipp_enum()),
        ));
    }
    if let Some(message) = shared.state_message {
        attrs.push(IppAttribute::new(
            "printer-state-message",
            IppValue::TextWithoutLanguage(message.clone()),
        ));
    }
    attrs.push(acl_attribute(shared.allow, shared.deny));
}

#[cfg(test)]
mod tests {
    use super::*;
    use setzkasten_core::types::{JobSheets, PrinterState};
    use std::collections::BTreeSet;

    fn find<'a>(attrs: &'a [IppAttribute], name: &str) -> Option<&'a IppAttribute> {
        attrs.iter().find(|a| a.name() == name)
    }

    fn users(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn uris_distinguish_printers_from_classes() {
        assert_eq!(printer_uri("lp0"), "ipp://localhost/printers/lp0");
        assert_eq!(class_uri("floor2"), "ipp://localhost/classes/floor2");
    }

    #[test]
    fn unset_fields_emit_no_attributes() {
        let attrs = printer_attributes(&PrinterSettings::new("lp0"));
        assert!(find(&attrs, "device-uri").is_none());
        assert!(find(&attrs, "printer-info").is_none());
        assert!(find(&attrs, "printer-state").is_none());
        // The ACL is always present (reset form when no lists are given).
        assert!(find(&attrs, "requesting-user-name-allowed").is_some());
    }

    #[test]
    fn full_printer_settings_marshal() {
        let mut settings = PrinterSettings::new("lp0");
        settings.device_uri = Some("socket://192.168.0.9:9100".into());
        settings.ppd_name = Some("laserjet.ppd".into());
        settings.info = Some("Front desk".into());
        settings.state = Some(PrinterState::Stopped);
        settings.accepting = Some(true);
        settings.banners = Some(JobSheets::default());

        let attrs = printer_attributes(&settings);
        assert_eq!(
            find(&attrs, "device-uri").unwrap().value(),
            &IppValue::Uri("socket://192.168.0.9:9100".into())
        );
        assert_eq!(
            find(&attrs, "printer-state").unwrap().value(),
            &IppValue::Enum(5)
        );
        assert_eq!(
            find(&attrs, "printer-is-accepting-jobs").unwrap().value(),
            &IppValue::Boolean(true)
        );
        assert_eq!(
            find(&attrs, "job-sheets-default").unwrap().value(),
            &IppValue::Array(vec![
                IppValue::NameWithoutLanguage("none".into()),
                IppValue::NameWithoutLanguage("none".into()),
            ])
        );
    }

    #[test]
    fn allow_list_wins_over_deny_list() {
        let attr = acl_attribute(&users(&["alice"]), &users(&["bob"]));
        assert_eq!(attr.name(), "requesting-user-name-allowed");
        assert_eq!(
            attr.value(),
            &IppValue::Array(vec![IppValue::NameWithoutLanguage("alice".into())])
        );
    }

    #[test]
    fn deny_list_used_when_allow_is_empty() {
        let attr = acl_attribute(&BTreeSet::new(), &users(&["bob", "carol"]));
        assert_eq!(attr.name(), "requesting-user-name-denied");
    }

    #[test]
    fn empty_acl_resets_to_all() {
        let attr = acl_attribute(&BTreeSet::new(), &BTreeSet::new());
        assert_eq!(attr.name(), "requesting-user-name-allowed");
        assert_eq!(
            attr.value(),
            &IppValue::NameWithoutLanguage("all".into())
        );
    }

    #[test]
    fn class_members_become_printer_uris() {
        let mut settings = ClassSettings::new("floor2");
        settings.members = users(&["lp0", "lp1"]);

        let attrs = class_attributes(&settings);
        assert_eq!(
            find(&attrs, "member-uris").unwrap().value(),
            &IppValue::Array(vec![
                IppValue::Uri("ipp://localhost/printers/lp0".into()),
                IppValue::Uri("ipp://localhost/printers/lp1".into()),
            ])
        );
    }

    #[test]
    fn memberless_class_emits_no_member_uris() {
        let attrs = class_attributes(&ClassSettings::new("floor2"));
        assert!(find(&attrs, "member-uris").is_none());
    }

    #[test]
    fn requested_attributes_are_keywords() {
        let attr = requested_attributes(&["printer-name", "printer-type"]);
        assert_eq!(
            attr.value(),
            &IppValue::Array(vec![
                IppValue::Keyword("printer-name".into()),
                IppValue::Keyword("printer-type".into()),
            ])
        );
    }
}
