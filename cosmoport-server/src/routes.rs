//! HTTP handlers for Cosmoport server.

use std::sync::Arc;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use cosmoport_core::{
    PageRequest, Ship, ShipDraft, ShipError, ShipFilter, ShipRepository, ShipService, parse_id,
};

use crate::openapi::ApiDoc;

/// Store handle shared by all workers.
pub type SharedShipRepository = Arc<dyn ShipRepository + Send + Sync>;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Ship registry service.
    pub ships: ShipService<SharedShipRepository>,
}

impl AppState {
    /// State backed by `repository` with the default registry rules.
    pub fn new(repository: SharedShipRepository) -> Self {
        Self {
            ships: ShipService::new(repository),
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

fn error_response(err: &ShipError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        ShipError::BadRequest(_) => HttpResponse::BadRequest().json(body),
        ShipError::NotFound(_) => HttpResponse::NotFound().json(body),
        ShipError::Storage(_) => {
            log::error!("{err}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse { message })
}

/// JSON body settings that report malformed payloads as [`ErrorResponse`].
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(format!("invalid ship payload: {err}"));
        InternalError::from_response(err, response).into()
    })
}

/// Query-string settings that report malformed filters as [`ErrorResponse`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request(format!("invalid query: {err}"));
        InternalError::from_response(err, response).into()
    })
}

/// Register every ship route.
///
/// `/rest/ships/count` is registered ahead of `/rest/ships/{id}` so the
/// literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(list_ships)
        .service(count_ships)
        .service(create_ship)
        .service(get_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}

/// Run a service call on the blocking pool and map failures to responses.
async fn run_blocking<T, F>(state: &web::Data<AppState>, operation: F) -> Result<T, HttpResponse>
where
    T: Send + 'static,
    F: FnOnce(&ShipService<SharedShipRepository>) -> cosmoport_core::Result<T> + Send + 'static,
{
    let ships = state.ships.clone();
    match web::block(move || operation(&ships)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(&err)),
        Err(err) => Err(HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        })),
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipFilter, PageRequest),
    responses(
        (status = 200, description = "Matching ships", body = [Ship]),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the filter, one page at a time.
pub async fn list_ships(
    state: web::Data<AppState>,
    filter: web::Query<ShipFilter>,
    page: web::Query<PageRequest>,
) -> impl Responder {
    let predicate = match filter.build() {
        Ok(predicate) => predicate,
        Err(err) => return error_response(&err),
    };
    let page = page.into_inner();
    match run_blocking(&state, move |ships| ships.list(&predicate, Some(page))).await {
        Ok(ships) => HttpResponse::Ok().json(ships),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipFilter),
    responses(
        (status = 200, description = "Number of matching ships", body = u64),
        (status = 400, description = "Invalid filter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the filter.
pub async fn count_ships(state: web::Data<AppState>, filter: web::Query<ShipFilter>) -> impl Responder {
    let predicate = match filter.build() {
        Ok(predicate) => predicate,
        Err(err) => return error_response(&err),
    };
    match run_blocking(&state, move |ships| ships.count(&predicate)).await {
        Ok(count) => HttpResponse::Ok().json(count),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship.
pub async fn create_ship(state: web::Data<AppState>, payload: web::Json<ShipDraft>) -> impl Responder {
    let draft = payload.into_inner();
    match run_blocking(&state, move |ships| ships.create(draft)).await {
        Ok(ship) => {
            log::info!("ship {} created", ship.id);
            HttpResponse::Ok().json(ship)
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(Some(path.as_str())) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    match run_blocking(&state, move |ships| ships.get(id)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid identifier or field", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Update the fields present in the payload.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let id = match parse_id(Some(path.as_str())) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let draft = payload.into_inner();
    match run_blocking(&state, move |ships| ships.edit(id, draft)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_id(Some(path.as_str())) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    match run_blocking(&state, move |ships| ships.delete(id)).await {
        Ok(()) => {
            log::info!("ship {id} deleted");
            HttpResponse::Ok().finish()
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
