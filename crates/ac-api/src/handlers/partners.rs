//! Partner brand routes. One image per brand; updates are partial (name
//! only, image only, or both).

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;

use ac_core::AppError;

use crate::cleanup::{destroy_images, store_all};
use crate::error::ApiError;
use crate::upload::{read_form, SINGLE_IMAGE_POLICY};
use crate::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("", web::post().to(create))
        .route("/{id}", web::put().to(update))
        .route("/{id}", web::delete().to(delete));
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let partners = state.repo.list_partners().await?;
    Ok(HttpResponse::Ok().json(partners))
}

async fn create(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let form = read_form(payload, &SINGLE_IMAGE_POLICY).await?;

    let Some(name) = form.text("name") else {
        return Err(AppError::Validation("partner name and image are required".to_string()).into());
    };
    if form.files.is_empty() {
        return Err(AppError::Validation("partner name and image are required".to_string()).into());
    }

    let images = store_all(state.media.as_ref(), form.files).await?;
    let Some(image) = images.into_iter().next() else {
        return Err(AppError::Internal("image upload failed".to_string()).into());
    };

    match state.repo.create_partner(&name, &image).await {
        Ok(id) => Ok(HttpResponse::Created().json(json!({
            "message": "partner published",
            "id": id,
        }))),
        Err(err) => {
            log::error!("failed to insert partner: {err:#}");
            destroy_images(state.media.as_ref(), std::slice::from_ref(&image)).await;
            Err(AppError::Internal("failed to create partner".to_string()).into())
        }
    }
}

async fn update(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let form = read_form(payload, &SINGLE_IMAGE_POLICY).await?;

    let name = form.text("name");
    if name.is_none() && form.files.is_empty() {
        return Err(AppError::Validation(
            "send at least a name or an image to update".to_string(),
        )
        .into());
    }

    let new_image = if form.files.is_empty() {
        None
    } else {
        store_all(state.media.as_ref(), form.files)
            .await?
            .into_iter()
            .next()
    };

    match state
        .repo
        .update_partner(id, name.as_deref(), new_image.as_ref())
        .await
    {
        Ok(Some(old)) => {
            // Empty unless the image was replaced.
            destroy_images(state.media.as_ref(), &old).await;
            Ok(HttpResponse::Ok().json(json!({ "message": "partner updated" })))
        }
        Ok(None) => {
            if let Some(image) = &new_image {
                destroy_images(state.media.as_ref(), std::slice::from_ref(image)).await;
            }
            Err(AppError::NotFound("partner".to_string()).into())
        }
        Err(err) => {
            log::error!("failed to update partner {id}: {err:#}");
            if let Some(image) = &new_image {
                destroy_images(state.media.as_ref(), std::slice::from_ref(image)).await;
            }
            Err(AppError::Internal("failed to update partner".to_string()).into())
        }
    }
}

async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match state.repo.delete_partner(id).await? {
        Some(image) => {
            let outcome = destroy_images(state.media.as_ref(), &image).await;
            Ok(HttpResponse::Ok().json(json!({
                "message": "partner deleted",
                "deletedImages": outcome.attempted,
            })))
        }
        None => Err(AppError::NotFound("partner".to_string()).into()),
    }
}
