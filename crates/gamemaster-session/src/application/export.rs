//! Session export and import as JSON or YAML documents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use gamemaster_core::clock::Clock;
use gamemaster_core::error::DomainError;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::application::command_handlers::load_session;
use crate::domain::repository::SessionStore;
use crate::domain::session::Session;

/// Current export document version.
pub const EXPORT_VERSION: u32 = 1;

/// Serialization format of an export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(DomainError::Validation(format!(
                "unknown export format '{other}'"
            ))),
        }
    }
}

/// A session wrapped with export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Document version.
    pub export_version: u32,
    /// When the export was taken.
    pub exported_at: DateTime<Utc>,
    /// The exported session.
    #[serde(flatten)]
    pub session: Session,
}

/// Renders a session as an export document.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the session does not exist and
/// `DomainError::Infrastructure` if serialization fails.
pub async fn export_session(
    session_id: Uuid,
    format: ExportFormat,
    clock: &dyn Clock,
    store: &dyn SessionStore,
) -> Result<String, DomainError> {
    let session = load_session(store, session_id).await?;
    let document = ExportDocument {
        export_version: EXPORT_VERSION,
        exported_at: clock.now(),
        session,
    };
    let rendered = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&document)
            .map_err(|e| DomainError::Infrastructure(format!("export serialization failed: {e}")))?,
        ExportFormat::Yaml => serde_yaml::to_string(&document)
            .map_err(|e| DomainError::Infrastructure(format!("export serialization failed: {e}")))?,
    };
    info!(session_id = %session_id, %format, "session exported");
    Ok(rendered)
}

/// Parses an export document without storing it.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the document cannot be parsed or has
/// an unsupported version.
pub fn parse_export(input: &str, format: ExportFormat) -> Result<ExportDocument, DomainError> {
    let document: ExportDocument = match format {
        ExportFormat::Json => serde_json::from_str(input)
            .map_err(|e| DomainError::Validation(format!("malformed export document: {e}")))?,
        ExportFormat::Yaml => serde_yaml::from_str(input)
            .map_err(|e| DomainError::Validation(format!("malformed export document: {e}")))?,
    };
    if document.export_version != EXPORT_VERSION {
        return Err(DomainError::Validation(format!(
            "unsupported export version {}",
            document.export_version
        )));
    }
    Ok(document)
}

/// Parses an export document and stores the session it contains.
///
/// # Errors
///
/// Returns the errors of [`parse_export`], and `DomainError::Validation` if a
/// session with the same id already exists.
pub async fn import_session(
    input: &str,
    format: ExportFormat,
    store: &dyn SessionStore,
) -> Result<Session, DomainError> {
    let document = parse_export(input, format)?;
    store.insert(document.session.clone()).await?;
    info!(session_id = %document.session.id, %format, "session imported");
    Ok(document.session)
}
