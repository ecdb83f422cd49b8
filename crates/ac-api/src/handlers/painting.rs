//! Painting-news routes. Same lifecycle as news posts; the update takes its
//! identifier from the form body rather than the path.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;

use ac_core::models::NewPaintingPost;
use ac_core::AppError;

use crate::cleanup::{destroy_images, store_all};
use crate::error::ApiError;
use crate::upload::{read_form, COVER_POLICY};
use crate::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("/create", web::post().to(create))
        .route("", web::put().to(update))
        .route("/{id}", web::delete().to(delete));
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let posts = state.repo.list_paintings().await?;
    Ok(HttpResponse::Ok().json(posts))
}

async fn create(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let form = read_form(payload, &COVER_POLICY).await?;

    let (Some(title), Some(body)) = (form.text("title"), form.text("body")) else {
        return Err(AppError::Validation("missing required fields or images".to_string()).into());
    };
    if form.files.is_empty() {
        return Err(AppError::Validation("missing required fields or images".to_string()).into());
    }
    let link = form.text("link");
    let author_id = form
        .text("author_id")
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(state.default_author_id);

    let cover = store_all(state.media.as_ref(), form.files).await?;
    match state
        .repo
        .create_painting(NewPaintingPost {
            title,
            body,
            link,
            author_id,
            cover: cover.clone(),
        })
        .await
    {
        Ok(id) => Ok(HttpResponse::Created().json(json!({
            "message": "painting post created",
            "id": id,
        }))),
        Err(err) => {
            log::error!("failed to insert painting post: {err:#}");
            destroy_images(state.media.as_ref(), &cover).await;
            Err(AppError::Internal("failed to create painting post".to_string()).into())
        }
    }
}

async fn update(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let form = read_form(payload, &COVER_POLICY).await?;

    let Some(id) = form.text("id").and_then(|value| value.parse::<i64>().ok()) else {
        return Err(AppError::Validation("missing or invalid id".to_string()).into());
    };
    let (Some(title), Some(body)) = (form.text("title"), form.text("body")) else {
        return Err(AppError::Validation("missing required fields".to_string()).into());
    };
    let link = form.text("link");

    if state.repo.find_painting(id).await?.is_none() {
        return Err(AppError::NotFound("painting post".to_string()).into());
    }

    let new_cover = if form.files.is_empty() {
        None
    } else {
        Some(store_all(state.media.as_ref(), form.files).await?)
    };

    match state
        .repo
        .update_painting(id, &title, &body, link.as_deref(), new_cover.as_deref())
        .await
    {
        Ok(Some(old)) => {
            if new_cover.is_some() {
                destroy_images(state.media.as_ref(), &old).await;
            }
            Ok(HttpResponse::Ok().json(json!({ "message": "painting post updated" })))
        }
        Ok(None) => {
            if let Some(cover) = &new_cover {
                destroy_images(state.media.as_ref(), cover).await;
            }
            Err(AppError::NotFound("painting post".to_string()).into())
        }
        Err(err) => {
            log::error!("failed to update painting post {id}: {err:#}");
            if let Some(cover) = &new_cover {
                destroy_images(state.media.as_ref(), cover).await;
            }
            Err(AppError::Internal("failed to update painting post".to_string()).into())
        }
    }
}

async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match state.repo.delete_painting(id).await? {
        Some(cover) => {
            let outcome = destroy_images(state.media.as_ref(), &cover).await;
            Ok(HttpResponse::Ok().json(json!({
                "message": "painting post deleted",
                "deletedImages": outcome.attempted,
            })))
        }
        None => Err(AppError::NotFound("painting post".to_string()).into()),
    }
}
