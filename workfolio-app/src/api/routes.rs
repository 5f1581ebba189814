use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use workfolio_core::{Repository, Work, WorkId, WorkPatch};

use crate::api::dto::{CreateWorkIn, UploadOut};
use crate::api::error::ApiError;

/// Multipart field carrying the uploaded image.
pub const IMAGE_FIELD: &str = "image";

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
}

pub async fn list_works(State(st): State<Arc<AppState>>) -> Result<Json<Vec<Work>>, ApiError> {
    Ok(Json(st.repo.list_works().await?))
}

pub async fn get_work(
    State(st): State<Arc<AppState>>,
    Path(id): Path<WorkId>,
) -> Result<Json<Work>, ApiError> {
    Ok(Json(st.repo.get_work(id).await?))
}

pub async fn create_work(
    State(st): State<Arc<AppState>>,
    Json(body): Json<CreateWorkIn>,
) -> Result<(StatusCode, Json<Work>), ApiError> {
    let work = st.repo.create_work(body.into()).await?;
    Ok((StatusCode::CREATED, Json(work)))
}

pub async fn update_work(
    State(st): State<Arc<AppState>>,
    Path(id): Path<WorkId>,
    Json(patch): Json<WorkPatch>,
) -> Result<Json<Work>, ApiError> {
    Ok(Json(st.repo.update_work(id, patch).await?))
}

pub async fn remove_work(
    State(st): State<Arc<AppState>>,
    Path(id): Path<WorkId>,
) -> Result<StatusCode, ApiError> {
    st.repo.remove_work(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upload_image(
    State(st): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadOut>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let url = st.repo.store_uploaded_image(&bytes, &filename).await?;
        return Ok((StatusCode::CREATED, Json(UploadOut { url })));
    }
    Err(ApiError::BadRequest("No file uploaded".into()))
}
