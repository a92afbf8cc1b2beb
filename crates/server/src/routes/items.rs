use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use findback_common::FindbackError;
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    CreateItemResponse, ItemListResponse, ItemSubmission, ListFilter, ListQuery, MatchResponse,
    UploadedImage,
};

/// Multipart field names accepted for the image
const IMAGE_FIELDS: &[&str] = &["image", "file"];

/// Create an item report from a multipart form
#[post("/items")]
pub async fn create_item(
    mut payload: Multipart,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let max_bytes = state.config.max_upload_bytes;
    let mut submission = ItemSubmission::default();
    let mut image = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let content_disposition = field.content_disposition();
        let Some(name) = content_disposition.get_name().map(str::to_string) else {
            continue;
        };
        let filename = content_disposition.get_filename().map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            data.extend_from_slice(&chunk?);
            if data.len() > max_bytes {
                return Err(ApiError(FindbackError::invalid_input(format!(
                    "field '{}' exceeds {} bytes",
                    name, max_bytes
                )))
                .into());
            }
        }

        if IMAGE_FIELDS.contains(&name.as_str()) {
            if data.is_empty() {
                continue;
            }
            image = Some(UploadedImage {
                bytes: data,
                content_type: content_type
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                filename,
            });
        } else {
            let value = String::from_utf8(data).map_err(|_| {
                ApiError(FindbackError::invalid_input(format!(
                    "field '{}' is not valid UTF-8",
                    name
                )))
            })?;
            if !submission.set_field(&name, value) {
                debug!("Ignoring non-writable field '{}'", name);
            }
        }
    }

    let item_id = state
        .items
        .create_item(submission, image)
        .await
        .map_err(ApiError::from)?;

    info!("Item submitted: {}", item_id);
    Ok(HttpResponse::Created().json(CreateItemResponse { item_id }))
}

/// List approved, unresolved items
#[get("/items")]
pub async fn list_items(
    query: web::Query<ListQuery>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let filter = ListFilter::try_from(query.into_inner()).map_err(ApiError::from)?;
    let items = state.items.list_items(filter).await.map_err(ApiError::from)?;
    let count = items.len();

    Ok(HttpResponse::Ok().json(ItemListResponse { items, count }))
}

#[get("/items/{id}")]
pub async fn get_item(
    path: web::Path<String>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let item = state
        .items
        .get_item(&path.into_inner())
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(item))
}

/// Ranked opposite-status matches for an item
#[get("/items/{id}/matches")]
pub async fn find_matches(
    path: web::Path<String>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let outcome = state
        .items
        .find_matches(&path.into_inner())
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(MatchResponse::from(outcome)))
}

#[post("/items/{id}/approve")]
pub async fn approve_item(
    path: web::Path<String>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let item = state
        .items
        .approve_item(&path.into_inner())
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(item))
}

#[post("/items/{id}/resolve")]
pub async fn resolve_item(
    path: web::Path<String>,
    state: web::Data<Arc<AppState>>,
) -> actix_web::Result<HttpResponse> {
    let item = state
        .items
        .resolve_item(&path.into_inner())
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(item))
}
