use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::table::RaggedRow;

/// Failures while turning decoded text into a [`crate::table::Table`]
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No columns to parse from file")]
    NoColumns,

    #[error("Error tokenizing data. Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields {
        expected: usize,
        line: u64,
        found: usize,
    },

    #[error(transparent)]
    Ragged(#[from] RaggedRow),

    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Every way an upload can fail
///
/// The `Display` text is exactly what the user sees on the form page.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload a valid CSV file.")]
    InvalidMediaType { declared: Option<String> },

    #[error("The uploaded file was empty.")]
    EmptyFile,

    #[error("Unable to decode the uploaded file. Please use UTF-8 or Latin-1 encoding.")]
    UndecodableEncoding,

    #[error("Failed to read the CSV file: {0}")]
    Parse(#[from] ParseError),

    #[error("No file was included in the upload.")]
    MissingFile,

    #[error("Failed to receive the uploaded file: {0}")]
    Multipart(String),
}

impl UploadError {
    /// Whether this failure also throws away the previously stored table
    ///
    /// Only failures that happen after the file was accepted for reading
    /// (decoding and parsing) discard the old table. Rejections at the door
    /// leave it in place.
    pub fn discards_table(&self) -> bool {
        matches!(
            self,
            UploadError::UndecodableEncoding | UploadError::Parse(_)
        )
    }
}

/// Errors that escape a handler as an HTTP status
#[derive(Debug, Error)]
pub enum AppError {
    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong while rendering the page.",
        )
            .into_response()
    }
}
