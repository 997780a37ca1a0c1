use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::domain::{DomainError, InputField};
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::geo::Coordinates;
use crate::repos::users::Page;
use crate::services::auth::{NearbyQuery, Registration};
use crate::state::app_state::AppState;

// Missing string fields default to "" so validation reports them with a
// field-specific code instead of a generic parse failure.

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub gender: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersRequest {
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ListUsersRequest {
    fn page(&self) -> Result<Page, DomainError> {
        if self.limit == Some(0) {
            return Err(DomainError::invalid_input(
                InputField::Other,
                "limit must be at least 1",
            ));
        }
        Ok(Page {
            offset: self.offset.unwrap_or(0),
            limit: self.limit,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FindUsersRequest {
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl FindUsersRequest {
    fn query(&self) -> Result<NearbyQuery, DomainError> {
        let radius = self.radius.ok_or_else(|| {
            DomainError::invalid_input(InputField::Radius, "radius (km) is required")
        })?;
        let origin = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)?),
            (None, None) => None,
            _ => {
                return Err(DomainError::invalid_input(
                    InputField::Coordinates,
                    "lat and lng must be given together",
                ))
            }
        };
        NearbyQuery::new(radius, origin)
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let registration = Registration::new(
        &req.email,
        &req.password,
        &req.first_name,
        &req.last_name,
        &req.gender,
    )?;

    let token = app_state.auth.register(registration).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let token = app_state.auth.login(&body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

async fn get_users(
    caller: CurrentUser,
    body: ValidatedJson<ListUsersRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = body.page()?;
    let listing = app_state.auth.list_users(&caller.id, page).await?;
    Ok(HttpResponse::Ok().json(listing))
}

async fn find_users(
    caller: CurrentUser,
    body: ValidatedJson<FindUsersRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let query = body.query()?;
    let listing = app_state.auth.find_nearby(&caller.id, query).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/getUsers").route(web::post().to(get_users)))
        .service(web::resource("/findusers").route(web::post().to(find_users)));
}
