//! Timesheet upload and salary calculation
//!
//! The upload is buffered in memory, then decoded and computed on the
//! blocking thread pool so the async workers are not stalled.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wages_common::csv::{self, CsvFields};
use wages_common::report::{ReportBuilder, SalaryReport};
use wages_common::CalculatorSettings;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Name of the multipart field the page uploads the file in
pub const FILE_FIELD: &str = "file";

/// An uploaded timesheet
#[derive(Debug)]
pub struct Upload {
    pub file_name: Option<String>,
    pub charset: Option<String>,
    pub bytes: Bytes,
}

/// POST /calculate
///
/// Responds with the salaries grouped by month. Problems with the
/// timesheet itself come back with status 200 and an `error` string.
pub async fn calculate(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<SalaryReport>> {
    let mut multipart = multipart?;
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("no file uploaded".to_string()))?;

    info!(
        "Calculating salaries for {} ({} bytes, charset {})",
        upload.file_name.as_deref().unwrap_or("unnamed upload"),
        upload.bytes.len(),
        upload.charset.as_deref().unwrap_or("utf-8")
    );

    let settings = Arc::clone(&state.settings);
    let fields = Arc::clone(&state.fields);
    let report = tokio::task::spawn_blocking(move || compute(&upload, settings, &fields))
        .await
        .map_err(|e| ApiError::Internal(format!("calculation task failed: {}", e)))?;

    Ok(Json(report))
}

/// Takes the part named `file`, or else the first part carrying a file name
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Option<Upload>> {
    let mut first_file = None;

    while let Some(field) = multipart.next_field().await? {
        let named_file = field.name() == Some(FILE_FIELD);
        if !named_file && field.file_name().is_none() {
            debug!("Skipping form field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let charset = field.content_type().and_then(charset_of);
        let bytes = field.bytes().await?;
        let upload = Upload {
            file_name,
            charset,
            bytes,
        };

        if named_file {
            return Ok(Some(upload));
        }
        if first_file.is_none() {
            first_file = Some(upload);
        }
    }

    Ok(first_file)
}

/// The `charset` parameter of a content type, if any
pub fn charset_of(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

fn compute(upload: &Upload, settings: Arc<CalculatorSettings>, fields: &CsvFields) -> SalaryReport {
    let result = csv::decode(&upload.bytes, upload.charset.as_deref()).and_then(|text| {
        let mut builder = ReportBuilder::new();
        csv::process(text.as_bytes(), settings, fields, |details| builder.add(details))?;
        Ok(builder.build())
    });

    match result {
        Ok(report) => {
            debug!("Computed salaries for {} months", report.months.len());
            report
        }
        Err(e) => {
            warn!("Calculation failed: {}", e);
            SalaryReport::failed(e.to_string())
        }
    }
}
