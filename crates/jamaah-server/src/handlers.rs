//! REST API endpoint handlers for the dashboard server.
//!
//! All handlers read the filesystem through the shared [`AppState`]'s
//! [`Inventory`](crate::inventory::Inventory). Listings are taken fresh on
//! every request.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/images` | Slideshow images with captions |
//! | `GET` | `/api/data-status` | Data files with size and mtime |
//! | `GET` | `/api/data/{name}` | Raw bytes of one data file |
//! | `GET` | `/api/data/` | Always the data file 404 |

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::inventory::{DataFileRecord, ImageEntry};
use crate::state::AppState;

/// Body of `GET /api/images`.
#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    /// Listed images, at most the configured cap.
    pub images: Vec<ImageEntry>,
}

/// Body of `GET /api/data-status`.
#[derive(Debug, Serialize)]
pub struct DataStatusResponse {
    /// Every `*.json` file in the data directory, sorted by name.
    pub files: Vec<DataFileRecord>,
    /// Number of entries in `files`.
    pub count: usize,
}

// ---------------------------------------------------------------------------
// GET /api/images
// ---------------------------------------------------------------------------

/// List slideshow images from the images directory.
pub async fn list_images(State(state): State<Arc<AppState>>) -> Json<ImagesResponse> {
    Json(ImagesResponse {
        images: state.inventory.list_images(),
    })
}

// ---------------------------------------------------------------------------
// GET /api/data-status
// ---------------------------------------------------------------------------

/// List the data directory's JSON files with size and modification time.
pub async fn data_status(State(state): State<Arc<AppState>>) -> Json<DataStatusResponse> {
    let files = state.inventory.list_data_files();
    Json(DataStatusResponse {
        count: files.len(),
        files,
    })
}

// ---------------------------------------------------------------------------
// GET /api/data/{*name}
// ---------------------------------------------------------------------------

/// Final `/`- or `\`-separated segment of a request path tail.
pub fn requested_file_name(tail: &str) -> &str {
    tail.rsplit(['/', '\\']).next().unwrap_or(tail)
}

/// Serve one data file verbatim with caching disabled.
///
/// Only the final path segment is used as the file name; it must resolve
/// to an existing `.json` file inside the data directory. When the tail
/// is empty or does not percent-decode to UTF-8, the raw final segment of
/// the request path is reported instead and the answer is still a JSON 404.
pub async fn get_data_file(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    tail: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filename = match &tail {
        Ok(Path(tail)) => requested_file_name(tail).to_owned(),
        Err(rejection) => {
            debug!(path = %uri.path(), %rejection, "Undecodable data file name");
            requested_file_name(uri.path()).to_owned()
        }
    };

    let Some(path) = state.inventory.resolve_data_file(&filename) else {
        debug!(file = %filename, "Requested data file not found");
        return Err(ApiError::DataFileNotFound { filename });
    };

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        warn!(file = %filename, error = %e, "Failed to read data file");
        ApiError::Internal(format!("failed to read {filename}: {e}"))
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(requested_file_name("a.json"), "a.json");
        assert_eq!(requested_file_name("nested/dir/a.json"), "a.json");
        assert_eq!(requested_file_name("..\\..\\a.json"), "a.json");
        assert_eq!(requested_file_name("trailing/"), "");
    }
}
