//! wages-cli library - monthly salary calculator for the command line
//!
//! Reads a CSV timesheet from a file or an http(s) URL and prints the
//! salaries under a header per month.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wages_common::csv::{self, CsvFields};
use wages_common::report::TextReport;
use wages_common::CalculatorSettings;

/// Where the timesheet comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    Url(String),
}

impl Input {
    /// http:// and https:// arguments are URLs, anything else a file path
    pub fn parse(arg: &str) -> Self {
        let lower = arg.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Input::Url(arg.to_string())
        } else {
            Input::File(PathBuf::from(arg))
        }
    }

    /// Fails early for files that do not exist
    pub fn check(&self) -> Result<()> {
        if let Input::File(path) = self {
            if !path.is_file() {
                bail!("file not found: {}", path.display());
            }
        }
        Ok(())
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        match self {
            Input::File(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("cannot read {}", path.display())),
            Input::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .and_then(|r| r.error_for_status())
                    .with_context(|| format!("cannot fetch {}", url))?;
                let bytes = response
                    .bytes()
                    .await
                    .with_context(|| format!("cannot fetch {}", url))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::File(path) => write!(f, "{}", path.display()),
            Input::Url(url) => f.write_str(url),
        }
    }
}

/// Log filter from RUST_LOG, or else the `[logging]` level of the configuration
pub fn log_filter(configured_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured_level))
}

/// Computes the salaries in `input` and writes them to `out`
///
/// Nothing is written unless the whole timesheet is valid.
pub async fn run<W: Write>(
    input: &Input,
    encoding: Option<&str>,
    settings: Arc<CalculatorSettings>,
    fields: &CsvFields,
    out: W,
) -> Result<W> {
    input.check()?;
    if let Some(label) = encoding {
        csv::encoding_for_label(label)?;
    }

    debug!("Reading {}", input);
    let bytes = input.read().await?;
    let text = csv::decode(&bytes, encoding)?;

    let mut salaries = Vec::new();
    csv::process(text.as_bytes(), settings, fields, |details| salaries.push(details))
        .with_context(|| format!("error processing '{}'", input))?;
    debug!("{} salaries computed", salaries.len());

    let mut report = TextReport::new(out);
    for details in &salaries {
        report.add(details)?;
    }
    Ok(report.into_inner())
}
