use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured error information extracted from MongoDB errors.
///
/// This is intended to be serialized to JSON and consumed by other
/// components (e.g. logging, gateway error responses).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
}

impl ErrorInfo {
    /// Convert error info to pretty-printed JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert error info to compact JSON string (single line).
    pub fn to_json_compact(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Format MongoDB error messages as pretty JSON wrapped in an `error` field.
///
/// Intended to be used by the parent module's `Display` implementation for
/// `ExportError::MongoDb`.
pub fn format_mongodb_error(
    f: &mut fmt::Formatter<'_>,
    error: &mongodb::error::Error,
) -> fmt::Result {
    let info = extract_error_info(error);

    let wrapper = serde_json::json!({ "error": info });

    let json_output = serde_json::to_string_pretty(&wrapper).map_err(|_| fmt::Error)?;
    write!(f, "\n{json_output}")
}

/// Extract structured information from a MongoDB error using the driver API.
///
/// The export engine only reads, so this covers the read-path error kinds;
/// everything else falls back to the driver's message.
pub fn extract_error_info(error: &mongodb::error::Error) -> ErrorInfo {
    use mongodb::error::ErrorKind;

    let mut info = ErrorInfo::default();

    match error.kind.as_ref() {
        ErrorKind::Command(command_error) => {
            info.error_type = Some("mongo.command_error".to_string());
            info.code = Some(command_error.code);
            info.message = Some(command_error.message.clone());
            info.name = get_error_name(command_error.code);
        }
        ErrorKind::Authentication { message, .. } => {
            info.error_type = Some("mongo.auth_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::ServerSelection { message, .. } => {
            info.error_type = Some("mongo.server_selection_error".to_string());
            info.message = Some(message.clone());
        }
        ErrorKind::Io(io_error) => {
            info.error_type = Some("mongo.io_error".to_string());
            info.message = Some(io_error.to_string());
        }
        other => {
            info.error_type = Some("mongo.error".to_string());
            info.message = Some(format!("{other}"));
        }
    }

    info
}

/// Map well-known MongoDB error codes to their symbolic names.
fn get_error_name(code: i32) -> Option<String> {
    let name = match code {
        2 => "BadValue",
        13 => "Unauthorized",
        18 => "AuthenticationFailed",
        26 => "NamespaceNotFound",
        50 => "MaxTimeMSExpired",
        96 => "OperationFailed",
        11600 => "InterruptedAtShutdown",
        13435 => "NotPrimaryNoSecondaryOk",
        _ => return None,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_info_json_skips_empty_fields() {
        let info = ErrorInfo {
            error_type: Some("mongo.command_error".to_string()),
            code: Some(26),
            name: Some("NamespaceNotFound".to_string()),
            message: None,
        };

        let json = info.to_json_compact().unwrap();
        assert!(json.contains("\"code\":26"));
        assert!(!json.contains("message"));
    }

    #[test]
    fn test_error_name_lookup() {
        assert_eq!(get_error_name(13), Some("Unauthorized".to_string()));
        assert_eq!(get_error_name(424242), None);
    }
}
