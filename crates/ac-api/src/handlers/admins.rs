//! Administrator routes: listing, registration, login, PIN-based password
//! recovery, profile edits, deletion.
//!
//! Credentials are argon2-hashed before they reach the repository and never
//! serialize back out; a failed login is a plain 401 with no detail about
//! which half was wrong.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use ac_core::models::{AdminProfileUpdate, NewAdministrator};
use ac_core::AppError;

use crate::error::ApiError;
use crate::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(list))
        .route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/update", web::put().to(reset_password))
        .route("/{id}", web::put().to(update_profile))
        .route("/{id}", web::delete().to(delete));
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    role: String,
    pin: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct ResetPasswordRequest {
    email: String,
    pin: String,
    new_password: String,
}

#[derive(Debug, Deserialize)]
struct ProfileUpdateRequest {
    name: String,
    email: String,
    #[serde(default)]
    role: String,
    pin: String,
}

async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let admins = state.repo.list_admins().await?;
    Ok(HttpResponse::Ok().json(admins))
}

async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("name, email and password are required".to_string()).into());
    }
    if req.pin.chars().count() != 4 {
        return Err(
            AppError::Validation("security PIN must be exactly 4 characters".to_string()).into(),
        );
    }
    if state.repo.admin_exists(req.name.trim(), req.email.trim()).await? {
        return Err(AppError::Conflict("name or email already registered".to_string()).into());
    }

    let password_hash = state.hasher.hash(&req.password)?;
    let pin_hash = state.hasher.hash(&req.pin)?;
    state
        .repo
        .create_admin(NewAdministrator {
            name: req.name.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            role: req.role,
            pin_hash,
        })
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "administrator registered" })))
}

async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    let Some(admin) = state.repo.find_admin_by_email(req.email.trim()).await? else {
        return Err(AppError::Unauthorized("invalid credentials".to_string()).into());
    };
    if !state.hasher.verify(&req.password, &admin.password_hash) {
        return Err(AppError::Unauthorized("invalid credentials".to_string()).into());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "login successful",
        "admin": admin,
    })))
}

async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = body.into_inner();
    if req.new_password.is_empty() {
        return Err(AppError::Validation("new password is required".to_string()).into());
    }

    let Some(admin) = state.repo.find_admin_by_email(req.email.trim()).await? else {
        return Err(AppError::NotFound("administrator email".to_string()).into());
    };
    if !state.hasher.verify(&req.pin, &admin.pin_hash) {
        return Err(AppError::Validation("incorrect security PIN".to_string()).into());
    }

    let password_hash = state.hasher.hash(&req.new_password)?;
    state
        .repo
        .update_admin_password(&admin.email, &password_hash)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "password updated" })))
}

async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ProfileUpdateRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let req = body.into_inner();
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation("name and email are required".to_string()).into());
    }

    let pin_hash = state.hasher.hash(&req.pin)?;
    let updated = state
        .repo
        .update_admin_profile(
            id,
            AdminProfileUpdate {
                name: req.name.trim().to_string(),
                email: req.email.trim().to_string(),
                role: req.role,
                pin_hash,
            },
        )
        .await?;

    if !updated {
        return Err(AppError::NotFound("administrator".to_string()).into());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "administrator updated" })))
}

async fn delete(state: web::Data<AppState>, path: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if state.repo.find_admin(id).await?.is_none() {
        return Err(AppError::NotFound("administrator".to_string()).into());
    }
    state.repo.delete_admin(id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "administrator deleted" })))
}
