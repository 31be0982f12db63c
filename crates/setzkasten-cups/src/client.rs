// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Async administration client for a cupsd instance.
//
// Every operation opens a fresh connection, sends exactly one request,
// and checks the status code; failures are logged and surfaced as
// errors, never retried. Administrative operations go to cupsd's
// `/admin/` endpoint, enumerations to `/`.

use futures::io::AsyncReadExt;
use ipp::prelude::*;
use tracing::{debug, error, info, instrument, warn};

use setzkasten_core::config::AgentConfig;
use setzkasten_core::error::{Result, SetzkastenError};
use setzkasten_core::types::{ClassInfo, ClassSettings, DestKind, PrinterSettings};

use crate::marshal;

/// The CUPS printer-type bit marking a queue learned from a remote
/// server rather than configured locally.
const PRINTER_TYPE_REMOTE: i32 = 0x2;

/// Client bound to one cupsd instance.
pub struct CupsClient {
    server: String,
    port: u16,
}

impl CupsClient {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            server: server.into(),
            port,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(&config.server, config.port)
    }

    /// Create or modify a printer queue (CUPS-Add-Modify-Printer).
    #[instrument(skip(self, settings), fields(printer = %settings.name))]
    pub async fn add_printer(&self, settings: &PrinterSettings) -> Result<()> {
        let mut request = self.admin_request(
            Operation::CupsAddModifyPrinter,
            &marshal::printer_uri(&settings.name),
        )?;
        for attr in marshal::printer_attributes(settings) {
            request
                .attributes_mut()
                .add(DelimiterTag::PrinterAttributes, attr);
        }

        self.send("/admin/", request, "CUPS-Add-Modify-Printer")
            .await?;
        info!("printer configured");
        Ok(())
    }

    /// Create or modify a class (CUPS-Add-Modify-Class).
    #[instrument(skip(self, settings), fields(class = %settings.name))]
    pub async fn add_class(&self, settings: &ClassSettings) -> Result<()> {
        let mut request = self.admin_request(
            Operation::CupsAddModifyClass,
            &marshal::class_uri(&settings.name),
        )?;
        for attr in marshal::class_attributes(settings) {
            request
                .attributes_mut()
                .add(DelimiterTag::PrinterAttributes, attr);
        }

        self.send("/admin/", request, "CUPS-Add-Modify-Class").await?;
        info!("class configured");
        Ok(())
    }

    /// Remove a printer queue (CUPS-Delete-Printer).
    #[instrument(skip(self))]
    pub async fn delete_printer(&self, name: &str) -> Result<()> {
        let request =
            self.admin_request(Operation::CupsDeletePrinter, &marshal::printer_uri(name))?;
        self.send("/admin/", request, "CUPS-Delete-Printer").await?;
        info!(printer = name, "printer deleted");
        Ok(())
    }

    /// Remove a class (CUPS-Delete-Class).
    #[instrument(skip(self))]
    pub async fn delete_class(&self, name: &str) -> Result<()> {
        let request = self.admin_request(Operation::CupsDeleteClass, &marshal::class_uri(name))?;
        self.send("/admin/", request, "CUPS-Delete-Class").await?;
        info!(class = name, "class deleted");
        Ok(())
    }

    /// Make `name` the server default destination (CUPS-Set-Default).
    #[instrument(skip(self))]
    pub async fn set_default(&self, name: &str) -> Result<()> {
        let request = self.admin_request(Operation::CupsSetDefault, &marshal::printer_uri(name))?;
        self.send("/admin/", request, "CUPS-Set-Default").await?;
        info!(destination = name, "default destination set");
        Ok(())
    }

    /// The server's default destination, if it has one (CUPS-Get-Default).
    #[instrument(skip(self))]
    pub async fn default_destination(&self) -> Result<Option<String>> {
        let request = IppRequestResponse::new(IppVersion::v1_1(), Operation::CupsGetDefault, None);
        let response = self.send("/", request, "CUPS-Get-Default").await?;

        let name = response
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
            .next()
            .and_then(|group| group.attributes().get("printer-name"))
            .map(|attr| attr.value().to_string());
        Ok(name)
    }

    /// All classes with their member printers (CUPS-Get-Classes).
    #[instrument(skip(self))]
    pub async fn classes(&self) -> Result<Vec<ClassInfo>> {
        let request = IppRequestResponse::new(IppVersion::v1_1(), Operation::CupsGetClasses, None);
        let response = self.send("/", request, "CUPS-Get-Classes").await?;

        let mut classes = Vec::new();
        for group in response
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
        {
            let Some(name) = group.attributes().get("printer-name") else {
                continue;
            };
            let members = group
                .attributes()
                .get("member-names")
                .map(|attr| string_values(attr.value()))
                .unwrap_or_default();
            classes.push(ClassInfo {
                name: name.value().to_string(),
                members,
            });
        }
        debug!(count = classes.len(), "classes enumerated");
        Ok(classes)
    }

    /// URIs of the destinations local to this server, printers or
    /// classes per `kind`.
    ///
    /// Queues the queried server itself learned from elsewhere (the
    /// remote bit in `printer-type`) are skipped, so pointing this at
    /// another host yields exactly the queues that host exports.
    #[instrument(skip(self))]
    pub async fn remote_destinations(&self, kind: DestKind) -> Result<Vec<String>> {
        let (operation, label) = match kind {
            DestKind::Printers => (Operation::CupsGetPrinters, "CUPS-Get-Printers"),
            DestKind::Classes => (Operation::CupsGetClasses, "CUPS-Get-Classes"),
        };
        let mut request = IppRequestResponse::new(IppVersion::v1_1(), operation, None);
        request.attributes_mut().add(
            DelimiterTag::OperationAttributes,
            marshal::requested_attributes(&[
                "printer-name",
                "printer-uri-supported",
                "printer-type",
            ]),
        );

        let response = self.send("/", request, label).await?;

        let mut uris = Vec::new();
        for group in response
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
        {
            let Some(uri) = group.attributes().get("printer-uri-supported") else {
                continue;
            };
            let uri = uri.value().to_string();
            if enum_value(group.attributes().get("printer-type"))
                .is_some_and(|t| t & PRINTER_TYPE_REMOTE != 0)
            {
                debug!(uri, "skipping remote queue");
                continue;
            }
            uris.push(uri);
        }
        debug!(count = uris.len(), "destinations enumerated");
        Ok(uris)
    }

    /// Fetch the PPD associated with a destination (CUPS-Get-PPD).
    ///
    /// Returns `Ok(None)` when the destination has no PPD: cupsd then
    /// answers with an empty body or an HTML error page instead of
    /// failing the request.
    #[instrument(skip(self))]
    pub async fn fetch_ppd(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let request = self.admin_request(Operation::CupsGetPPD, &marshal::printer_uri(name))?;
        let response = self.send("/", request, "CUPS-Get-PPD").await?;

        let mut body = Vec::new();
        response
            .into_payload()
            .read_to_end(&mut body)
            .await
            .map_err(|e| SetzkastenError::IppRequest(format!("CUPS-Get-PPD payload: {e}")))?;

        if body.is_empty() || body[0] == b'<' {
            warn!(destination = name, "no PPD associated with destination");
            return Ok(None);
        }
        debug!(bytes = body.len(), "PPD fetched");
        Ok(Some(body))
    }

    /// Build an administrative request carrying a `printer-uri`.
    fn admin_request(&self, operation: Operation, printer_uri: &str) -> Result<IppRequestResponse> {
        let uri: Uri = printer_uri.parse().map_err(|e| {
            SetzkastenError::IppRequest(format!("invalid printer-uri '{printer_uri}': {e}"))
        })?;
        Ok(IppRequestResponse::new(
            IppVersion::v1_1(),
            operation,
            Some(uri),
        ))
    }

    /// Send one request to the given endpoint and check its status.
    async fn send(
        &self,
        path: &str,
        request: IppRequestResponse,
        operation: &str,
    ) -> Result<IppRequestResponse> {
        let endpoint = format!("http://{}:{}{}", self.server, self.port, path);
        let uri: Uri = endpoint.parse().map_err(|e| {
            SetzkastenError::IppRequest(format!("invalid endpoint '{endpoint}': {e}"))
        })?;

        debug!(endpoint, operation, "sending IPP request");
        let client = AsyncIppClient::new(uri);
        let response = client
            .send(request)
            .await
            .map_err(|e| SetzkastenError::IppRequest(format!("{operation}: {e}")))?;

        let status = response.header().status_code();
        if !status.is_success() {
            error!(?status, operation, "request failed");
            return Err(SetzkastenError::IppRequest(format!(
                "{operation} returned status {status:?}"
            )));
        }
        Ok(response)
    }
}

/// Flatten a possibly multi-valued attribute into strings.
fn string_values(value: &IppValue) -> Vec<String> {
    match value {
        IppValue::Array(items) => items.iter().map(|v| v.to_string()).collect(),
        other => vec![other.to_string()],
    }
}

/// Integer content of an enum-ish attribute value.
fn enum_value(attr: Option<&IppAttribute>) -> Option<i32> {
    match attr?.value() {
        IppValue::Enum(v) | IppValue::Integer(v) => Some(*v),
        _ => None,
    }
}
