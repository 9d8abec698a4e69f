//! Image record operations
//!
//! Each handler is one store call wrapped in the wire contract: create
//! additionally streams the `image` multipart part to disk before the
//! insert. Malformed ids are a 400 distinct from the 404 of a missing
//! record; everything else surfaces as a 500 with the error's message.

use crate::error::{ApiError, ApiResult};
use crate::record::{ImagePatch, ImageRecord, ImageResponse, InsertAck};
use crate::state::AppState;
use crate::upload::StagedUpload;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use std::time::Instant;

/// Create a record from a multipart upload
///
/// The `image` part is streamed into the upload directory; the text
/// parts become the record fields, absent ones stored as empty strings.
/// The file is promoted to its public name before the insert and removed
/// again if the insert fails.
pub async fn create_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let start = Instant::now();
    let mut multipart = multipart?;
    let upload_dir = &state.config.upload_dir;

    let mut upload: Option<StagedUpload> = None;
    let mut name = String::new();
    let mut kind = String::new();
    let mut description = String::new();
    let mut color = String::new();
    let mut life_span = String::new();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(str::to_owned) else {
            continue;
        };

        if field_name == "image" {
            let original = field.file_name().unwrap_or_default().to_owned();
            let mut staged = StagedUpload::begin(upload_dir, &original).await?;
            while let Some(chunk) = field.chunk().await? {
                staged.append(&chunk).await?;
            }
            // A repeated `image` part wins; the superseded file goes away.
            if let Some(previous) = upload.replace(staged) {
                if let Err(err) = previous.discard().await {
                    tracing::warn!(error = %err, "failed to drop superseded upload");
                }
            }
        } else {
            let value = field.text().await?;
            match field_name.as_str() {
                "name" => name = value,
                "type" => kind = value,
                "description" => description = value,
                "color" => color = value,
                "lifeSpan" => life_span = value,
                _ => {}
            }
        }
    }

    let mut upload = upload.ok_or(ApiError::MissingFilePart)?;
    upload.promote().await?;

    let record = ImageRecord {
        id: None,
        name,
        kind,
        description,
        color,
        life_span,
        image_path: upload.public_path(),
        created_at: Utc::now(),
    };

    match state.store.insert(record).await {
        Ok(id) => {
            tracing::info!(
                id = %id,
                file = upload.file_name(),
                duration_ms = %start.elapsed().as_millis(),
                "image_create_success"
            );
            Ok((
                StatusCode::CREATED,
                Json(InsertAck {
                    acknowledged: true,
                    inserted_id: id.to_hex(),
                }),
            ))
        }
        Err(err) => {
            tracing::warn!(
                error = %err,
                file = upload.file_name(),
                "image_create_failure"
            );
            if let Err(cleanup) = upload.discard().await {
                tracing::warn!(error = %cleanup, "failed to remove file after insert failure");
            }
            Err(err)
        }
    }
}

/// Every record in the collection, in store scan order
pub async fn list_images(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let records = state.store.list().await?;
    let images: Vec<ImageResponse> = records.into_iter().map(ImageResponse::from).collect();
    Ok(Json(images))
}

/// Fetch one record by its id
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_object_id(&id)?;
    match state.store.get(id).await? {
        Some(record) => Ok(Json(ImageResponse::from(record))),
        None => Err(ApiError::NotFound),
    }
}

/// Merge-set the fields present in the body into the matching record
///
/// An unknown but well-formed id reports zero counts instead of 404.
pub async fn update_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    patch: Result<Json<ImagePatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_object_id(&id)?;
    let Json(patch) = patch?;

    match state.store.update(id, &patch).await {
        Ok(report) => {
            tracing::info!(
                id = %id,
                matched = report.matched_count,
                modified = report.modified_count,
                "image_update_success"
            );
            Ok(Json(report))
        }
        Err(err) => {
            tracing::warn!(id = %id, error = %err, "image_update_failure");
            Err(err)
        }
    }
}

fn parse_object_id(raw: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}
