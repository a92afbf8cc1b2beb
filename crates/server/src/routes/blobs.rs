use actix_files::NamedFile;
use actix_web::{get, web};
use chrono::Utc;
use findback_common::FindbackError;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::BlobQuery;

/// Serve an uploaded image through a signed, expiring link
#[get("/blobs/{name}")]
pub async fn read_blob(
    path: web::Path<String>,
    query: web::Query<BlobQuery>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<NamedFile> {
    let name = path.into_inner();

    state
        .blobs
        .verify(&name, query.expires, &query.signature, Utc::now())
        .map_err(ApiError::from)?;

    let file_path = state
        .blobs
        .path_for(&name)
        .ok_or_else(|| ApiError(FindbackError::not_found(format!("blob {}", name))))?;

    if !file_path.exists() {
        return Err(ApiError(FindbackError::not_found(format!("blob {}", name))).into());
    }

    Ok(NamedFile::open(file_path)?)
}
