use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
};
use encoding_rs::Encoding;
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::decoder::default_encodings;
use crate::error::{AppError, UploadError};
use crate::render::Templates;
use crate::table::TableStore;
use crate::upload::{self, UploadedFile};

/// Name of the multipart field carrying the CSV file
const FILE_FIELD: &str = "file";

/// Shared state handed to every handler
pub struct AppState {
    pub store: TableStore,
    pub templates: Templates,
    encodings: Vec<&'static Encoding>,
}

impl AppState {
    /// Empty store, compiled templates and the default UTF-8 then Latin-1 decoding order
    pub fn new() -> Result<Self, AppError> {
        Self::with_encodings(default_encodings().to_vec())
    }

    /// Same as [`AppState::new`] but with a custom decoding order
    pub fn with_encodings(encodings: Vec<&'static Encoding>) -> Result<Self, AppError> {
        Ok(AppState {
            store: TableStore::new(),
            templates: Templates::new()?,
            encodings,
        })
    }
}

#[derive(Deserialize)]
struct IndexQuery {
    message: Option<String>,
}

/// Build the application router
///
/// # Arguments
/// * `state` - Shared application state
/// * `config` - Supplies the static directory and upload size limit
///
/// # Returns
/// * `Router` - Ready to be served or driven directly in tests
pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/upload", post(handle_upload))
        .route("/display", get(serve_display))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        // Checked while multipart fields stream, so overflow reaches `read_upload`
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}

/// Start the web server and serve until the process exits
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new()?);
    let app = build_router(state, &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    info!("Serving static files from {}", config.static_dir.display());
    axum::serve(listener, app).await?;

    Ok(())
}

/// URL of the form page carrying `message` as its query string
pub fn index_url(message: &str) -> String {
    format!("/?message={}", urlencoding::encode(message))
}

async fn serve_index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IndexQuery>,
) -> Result<Html<String>, AppError> {
    let page = state.templates.render_index(params.message.as_deref())?;
    Ok(Html(page))
}

async fn serve_display(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let table = state.store.snapshot();
    let page = state.templates.render_display(table.as_deref())?;
    Ok(Html(page))
}

async fn handle_upload(State(state): State<Arc<AppState>>, multipart: Multipart) -> Redirect {
    let message = match read_upload(multipart).await {
        Ok(file) => upload::store_upload(&state.store, &file, &state.encodings),
        Err(err) => upload::reject_upload(&state.store, err),
    };

    Redirect::to(&index_url(&message))
}

/// Pull the `file` field out of the multipart body
async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.body_text()))?;

        return Ok(UploadedFile {
            content_type,
            file_name,
            bytes,
        });
    }

    Err(UploadError::MissingFile)
}
