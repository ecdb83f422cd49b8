//! Shop item routes. The update response echoes the resulting cover so the
//! admin UI can refresh in place.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde_json::json;

use ac_core::models::NewShopItem;
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
    let items = state.repo.list_shop_items().await?;
    Ok(HttpResponse::Ok().json(items))
}

async fn create(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let form = read_form(payload, &COVER_POLICY).await?;

    let (Some(name), Some(body)) = (form.text("name"), form.text("body")) else {
        return Err(AppError::Validation("missing required fields or images".to_string()).into());
    };
    let Some(price) = form.text("price").and_then(|value| value.parse::<f64>().ok()) else {
        return Err(AppError::Validation("missing required fields or images".to_string()).into());
    };
    if form.files.is_empty() {
        return Err(AppError::Validation("missing required fields or images".to_string()).into());
    }
    let author_id = form
        .text("author_id")
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(state.default_author_id);

    let cover = store_all(state.media.as_ref(), form.files).await?;
    match state
        .repo
        .create_shop_item(NewShopItem {
            name,
            body,
            price,
            author_id,
            cover: cover.clone(),
        })
        .await
    {
        Ok(id) => Ok(HttpResponse::Created().json(json!({
            "message": "shop item created",
            "id": id,
        }))),
        Err(err) => {
            log::error!("failed to insert shop item: {err:#}");
            destroy_images(state.media.as_ref(), &cover).await;
            Err(AppError::Internal("failed to create shop item".to_string()).into())
        }
    }
}

async fn update(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let form = read_form(payload, &COVER_POLICY).await?;

    let Some(id) = form.text("id").and_then(|value| value.parse::<i64>().ok()) else {
        return Err(AppError::Validation("missing or invalid id".to_string()).into());
    };
    let (Some(name), Some(body)) = (form.text("name"), form.text("body")) else {
        return Err(AppError::Validation("missing required fields".to_string()).into());
    };
    let Some(price) = form.text("price").and_then(|value| value.parse::<f64>().ok()) else {
        return Err(AppError::Validation("missing required fields".to_string()).into());
    };

    if state.repo.find_shop_item(id).await?.is_none() {
        return Err(AppError::NotFound("shop item".to_string()).into());
    }

    let new_cover = if form.files.is_empty() {
        None
    } else {
        Some(store_all(state.media.as_ref(), form.files).await?)
    };

    match state
        .repo
        .update_shop_item(id, &name, &body, price, new_cover.as_deref())
        .await
    {
        Ok(Some(old)) => {
            let resulting = match &new_cover {
                Some(cover) => cover.clone(),
                None => old.clone(),
            };
            if new_cover.is_some() {
                destroy_images(state.media.as_ref(), &old).await;
            }
            Ok(HttpResponse::Ok().json(json!({
                "message": "shop item updated",
                "cover": resulting,
            })))
        }
        Ok(None) => {
            if let Some(cover) = &new_cover {
                destroy_images(state.media.as_ref(), cover).await;
            }
            Err(AppError::NotFound("shop item".to_string()).into())
        }
        Err(err) => {
            log::error!("failed to update shop item {id}: {err:#}");
            if let Some(cover) = &new_cover {
                destroy_images(state.media.as_ref(), cover).await;
            }
            Err(AppError::Internal("failed to update shop item".to_string()).into())
        }
    }
}

async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match state.repo.delete_shop_item(id).await? {
        Some(cover) => {
            let outcome = destroy_images(state.media.as_ref(), &cover).await;
            Ok(HttpResponse::Ok().json(json!({
                "message": "shop item deleted",
                "deletedImages": outcome.attempted,
            })))
        }
        None => Err(AppError::NotFound("shop item".to_string()).into()),
    }
}
