//! Check operations
//!
//! Every check sends its requests exactly once and returns
//! `Ok(created_id)` on success or the first contract violation as a
//! `CheckError`. Diagnostics go to the reporter as the check proceeds.

use std::collections::HashMap;

use serde_json::Value;

use super::client::{ApiClient, ApiResponse, Method};
use super::fixtures::RecordFixture;
use super::parsing::{
    as_object, expect_status, expect_str_field, extract_id, find_record, id_to_string,
    parse_json, parse_record_list, require_fields, validate_allow_origin, ALLOW_ORIGIN_HEADER,
};
use super::registry::CheckKind;
use super::report::Reporter;
use super::types::CheckError;
use super::url::{build_root_url, build_status_url};
use crate::config::ProbeConfig;
use crate::core::debug_logger::DebugLogger;

/// Successful check value: the id of a record created by the check, if any
pub type CheckOutcome = Result<Option<String>, CheckError>;

/// State shared by the checks of one run
pub struct ProbeContext<'a> {
    client: &'a dyn ApiClient,
    config: &'a ProbeConfig,
    logger: &'a DebugLogger,
    reporter: &'a mut Reporter,
    last_created_id: Option<String>,
    correlation_id: String,
}

impl<'a> ProbeContext<'a> {
    pub fn new(
        client: &'a dyn ApiClient,
        config: &'a ProbeConfig,
        logger: &'a DebugLogger,
        reporter: &'a mut Reporter,
    ) -> Self {
        Self {
            client,
            config,
            logger,
            correlation_id: logger.session_id().to_string(),
            reporter,
            last_created_id: None,
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        self.config
    }

    pub fn logger(&self) -> &DebugLogger {
        self.logger
    }

    pub fn reporter(&mut self) -> &mut Reporter {
        &mut *self.reporter
    }

    /// Id returned by the most recent successful create check
    pub fn last_created_id(&self) -> Option<&str> {
        self.last_created_id.as_deref()
    }

    pub(crate) fn set_correlation_id(&mut self, id: String) {
        self.correlation_id = id;
    }

    fn root_url(&self) -> String {
        build_root_url(&self.config.base_url, &self.config.api_prefix)
    }

    fn status_url(&self) -> String {
        build_status_url(&self.config.base_url, &self.config.api_prefix)
    }

    /// Send one request and report its status code
    async fn send(
        &mut self,
        method: Method,
        url: String,
        headers: HashMap<String, String>,
        body: Option<&Value>,
    ) -> Result<ApiResponse, CheckError> {
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| CheckError::Transport(format!("Failed to encode request body: {}", e)))?;

        match self
            .client
            .execute(method, url.clone(), headers, body, self.config.timeout_ms)
            .await
        {
            Ok(response) => {
                self.logger.request_complete(
                    method.as_str(),
                    &url,
                    response.status_code,
                    response.duration.as_millis() as u64,
                    &self.correlation_id,
                );
                self.reporter.status_code(response.status_code);
                Ok(response)
            }
            Err(error) => {
                self.logger
                    .request_failed(method.as_str(), &url, &error, &self.correlation_id);
                Err(CheckError::Transport(error))
            }
        }
    }

    /// Decode a JSON body and print it, then require the expected status.
    ///
    /// An unexpected status is reported in preference to an undecodable body.
    fn decode(
        &mut self,
        response: &ApiResponse,
        expected_status: u16,
    ) -> Result<Value, CheckError> {
        let parsed = parse_json(&response.body);
        if let Ok(body) = &parsed {
            match body {
                Value::Array(items) => self.reporter.record_count(items.len()),
                other => self.reporter.body(other),
            }
        }
        expect_status(response, expected_status)?;
        parsed
    }

    /// POST a fixture and validate the echoed record
    async fn post_record(
        &mut self,
        fixture: RecordFixture,
        required_fields: &[&str],
    ) -> Result<Option<String>, CheckError> {
        let payload = fixture.payload();
        let url = self.status_url();
        let response = self
            .send(Method::Post, url, HashMap::new(), Some(&payload))
            .await?;
        let body = self.decode(&response, 200)?;
        let record = as_object(&body)?;

        require_fields(record, required_fields)?;
        expect_str_field(record, "client_name", fixture.client_name())?;

        Ok(match record.get("id") {
            Some(Value::Null) | None => None,
            Some(id) => Some(id_to_string(id)),
        })
    }

    /// GET the record list
    async fn fetch_records(&mut self) -> Result<Vec<Value>, CheckError> {
        let url = self.status_url();
        let response = self.send(Method::Get, url, HashMap::new(), None).await?;
        let body = self.decode(&response, 200)?;
        parse_record_list(&body).map(<[Value]>::to_vec)
    }
}

/// Run one registered check
pub async fn run_check(kind: &CheckKind, ctx: &mut ProbeContext<'_>) -> CheckOutcome {
    match kind {
        CheckKind::RootGreeting => root_greeting(ctx).await,
        CheckKind::CreateRecord {
            fixture,
            required_fields,
        } => create_record(ctx, *fixture, required_fields).await,
        CheckKind::ListRecords => list_records(ctx).await,
        CheckKind::CorsHeaders => cors_headers(ctx).await,
        CheckKind::Persistence { fixture } => persistence(ctx, *fixture).await,
    }
}

/// GET {api}/ must return {"message": "Hello World"}
pub async fn root_greeting(ctx: &mut ProbeContext<'_>) -> CheckOutcome {
    let url = ctx.root_url();
    let response = ctx.send(Method::Get, url, HashMap::new(), None).await?;
    let body = ctx.decode(&response, 200)?;
    let object = as_object(&body)?;
    expect_str_field(object, "message", "Hello World")?;
    Ok(None)
}

/// POST {api}/status; remembers the created id for later list checks
pub async fn create_record(
    ctx: &mut ProbeContext<'_>,
    fixture: RecordFixture,
    required_fields: &[&str],
) -> CheckOutcome {
    let created = ctx.post_record(fixture, required_fields).await?;
    if let Some(id) = &created {
        ctx.last_created_id = Some(id.clone());
    }
    Ok(created)
}

/// GET {api}/status must list objects, including the last created id
pub async fn list_records(ctx: &mut ProbeContext<'_>) -> CheckOutcome {
    let records = ctx.fetch_records().await?;

    if let Some(expected) = ctx.last_created_id.clone() {
        if find_record(&records, &expected).is_none() {
            return Err(CheckError::RecordNotFound(expected));
        }
        ctx.reporter
            .note(&format!("Successfully found status with ID {}", expected));
    }
    Ok(None)
}

/// GET {api}/ with a foreign Origin must be allowed by wildcard or echo
pub async fn cors_headers(ctx: &mut ProbeContext<'_>) -> CheckOutcome {
    let origin = ctx.config.origin.clone();
    let url = ctx.root_url();
    let headers = HashMap::from([("Origin".to_string(), origin.clone())]);

    let response = ctx.send(Method::Get, url, headers, None).await?;
    ctx.reporter
        .header(ALLOW_ORIGIN_HEADER, response.header(ALLOW_ORIGIN_HEADER));

    expect_status(&response, 200)?;
    validate_allow_origin(&response, &origin)?;
    Ok(None)
}

/// Create a record, then require it in the list with the same client_name
pub async fn persistence(ctx: &mut ProbeContext<'_>, fixture: RecordFixture) -> CheckOutcome {
    let payload = fixture.payload();
    let url = ctx.status_url();
    let response = ctx
        .send(Method::Post, url, HashMap::new(), Some(&payload))
        .await?;
    expect_status(&response, 200)?;
    let created = parse_json(&response.body)?;
    let id = extract_id(as_object(&created)?)?;
    ctx.reporter
        .note(&format!("Created status check with ID: {}", id));

    let records = ctx.fetch_records().await?;
    let record = find_record(&records, &id).ok_or_else(|| CheckError::RecordNotFound(id.clone()))?;
    expect_str_field(as_object(record)?, "client_name", fixture.client_name())?;

    ctx.reporter
        .note(&format!("Successfully verified data persistence for status with ID {}", id));
    Ok(None)
}
