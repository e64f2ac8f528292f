/*!
# CSV Viewer

A small web application that accepts a CSV upload and shows it as an HTML table.

## Overview

The server keeps exactly one table in memory. Each successful upload replaces
it. The upload form reports what happened through a status message carried in
the redirect back to the form page.

## Architecture

### Routes
- `GET /` - Upload form, with an optional `message` query parameter
- `POST /upload` - Multipart upload of the `file` field; always answers `303 See Other` back to `/`
- `GET /display` - The stored table, or a notice that nothing was uploaded yet
- `GET /static/{path}` - Stylesheet and other assets

### Upload pipeline
1. The declared media type must be `text/csv`, `application/vnd.ms-excel` or `application/csv`
2. The file must not be empty
3. The bytes are decoded as UTF-8, falling back to Latin-1
4. The text is parsed as CSV with the first row as header and a sniffed delimiter
5. The table is stored and the row count is reported

Decode and parse failures also clear the previously stored table. A rejected
media type or an empty file leaves it alone.

## Modules

- **app**: Router, shared state and request handlers
- **config**: Command line and environment settings
- **decoder**: Ordered text-encoding fallback
- **loader**: CSV text to [`Table`]
- **upload**: Validation and storage of uploaded files
- **render**: Handlebars page templates
- **table**: The [`Table`] model and its process-wide [`TableStore`]
- **error**: Error types shared by the modules above
*/

pub mod app;
pub mod config;
pub mod decoder;
pub mod error;
pub mod loader;
pub mod render;
pub mod table;
pub mod upload;

pub use app::{AppState, build_router};
pub use config::Config;
pub use table::{Table, TableStore};
