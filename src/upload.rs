use axum::body::Bytes;
use encoding_rs::Encoding;
use log::{debug, info, warn};

use crate::decoder::decode_bytes;
use crate::error::UploadError;
use crate::loader::parse_csv;
use crate::table::{Table, TableStore};

/// Media types a browser may declare for a `.csv` file
pub const ACCEPTED_MEDIA_TYPES: [&str; 3] =
    ["text/csv", "application/vnd.ms-excel", "application/csv"];

/// A file received from the upload form
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    /// Client-declared media type, not checked against the content
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Validate, decode and parse an uploaded file
///
/// Checks run in a fixed order and the first failure wins: media type,
/// emptiness, text decoding, then CSV parsing.
///
/// # Arguments
/// * `file` - The received upload
/// * `encodings` - Text encodings to try, in priority order
///
/// # Returns
/// * `Result<Table, UploadError>` - The parsed table, or why the upload was rejected
pub fn ingest(file: &UploadedFile, encodings: &[&'static Encoding]) -> Result<Table, UploadError> {
    let declared = file.content_type.as_deref();
    if !declared.is_some_and(|media| ACCEPTED_MEDIA_TYPES.contains(&media)) {
        return Err(UploadError::InvalidMediaType {
            declared: file.content_type.clone(),
        });
    }

    if file.bytes.is_empty() {
        return Err(UploadError::EmptyFile);
    }

    let (text, encoding) =
        decode_bytes(&file.bytes, encodings).ok_or(UploadError::UndecodableEncoding)?;
    debug!("decoded {} bytes as {}", file.bytes.len(), encoding.name());

    Ok(parse_csv(&text)?)
}

/// Apply an upload to the store and describe what happened
///
/// A successful upload replaces the stored table. Failures during decoding
/// or parsing clear it; earlier rejections leave it untouched.
///
/// # Returns
/// * `String` - The status message to show on the form page
pub fn store_upload(
    store: &TableStore,
    file: &UploadedFile,
    encodings: &[&'static Encoding],
) -> String {
    match ingest(file, encodings) {
        Ok(table) => stored(store, file, table),
        Err(err) => rejected(store, err),
    }
}

/// Record a failure that happened before a file could be read at all
pub fn reject_upload(store: &TableStore, err: UploadError) -> String {
    rejected(store, err)
}

fn stored(store: &TableStore, file: &UploadedFile, table: Table) -> String {
    let file_name = file.file_name.as_deref().unwrap_or_default();
    let row_count = table.row_count();
    info!(
        "stored '{}': {} columns, {} rows",
        file_name,
        table.columns().len(),
        row_count
    );
    store.replace(table);

    format!(
        "Successfully uploaded '{}'. Detected {} rows.",
        file_name, row_count
    )
}

fn rejected(store: &TableStore, err: UploadError) -> String {
    if err.discards_table() {
        store.clear();
    }

    match &err {
        UploadError::InvalidMediaType { declared } => {
            warn!("upload rejected, declared media type {:?}", declared)
        }
        _ => warn!("upload rejected: {}", err),
    }

    err.to_string()
}
