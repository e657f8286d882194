use actix_web::{web, App, HttpServer, HttpResponse, Result, HttpRequest, middleware};
use actix_web::http::header::CONTENT_TYPE;
use actix_files::Files;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};
use crate::error::GridError;
use crate::grid::{GridConfig, GridMode, GridSummary, GridView, SlotGridManager, SlotId};
use crate::parser::{parse_csv_slots, parse_json_slots};

pub const OWNER_PASSWORD_HEADER: &str = "X-Owner-Password";

/// Shared server state: one grid per server
pub struct AppState {
    pub grid: Mutex<SlotGridManager>,
    pub owner_password: String,
    pub selectable: bool,
}

impl AppState {
    pub fn new(grid: SlotGridManager, owner_password: String, selectable: bool) -> Self {
        AppState {
            grid: Mutex::new(grid),
            owner_password,
            selectable,
        }
    }

    fn grid(&self) -> MutexGuard<'_, SlotGridManager> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_owner(&self, req: &HttpRequest) -> bool {
        let password = req
            .headers()
            .get(OWNER_PASSWORD_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        password == self.owner_password
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Deserialize)]
pub struct GridQuery {
    selectable: Option<bool>,
}

/// `selectable` falls back to the server default, as in `GET /api/grid`
#[derive(Deserialize)]
pub struct ActivateRequest {
    slot_id: SlotId,
    selectable: Option<bool>,
}

#[derive(Deserialize)]
pub struct ShapeRequest {
    rows: i64,
    cols: i64,
}

#[derive(Serialize)]
pub struct GridResponse {
    mode: GridMode,
    generation: u64,
    simulating: bool,
    selected: Option<SlotId>,
    summary: GridSummary,
    grid: GridView,
}

fn failure(err: &GridError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        GridError::UnknownSlot(_) => HttpResponse::NotFound().json(body),
        GridError::NoRuntime => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

// Owner login endpoint
async fn owner_login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.password == state.owner_password {
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
    } else {
        Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})))
    }
}

// Rendered grid
async fn get_grid(
    query: web::Query<GridQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let selectable = query.selectable.unwrap_or(state.selectable);
    let grid = state.grid();
    let snapshot = grid.snapshot();

    Ok(HttpResponse::Ok().json(GridResponse {
        mode: snapshot.mode,
        generation: snapshot.generation,
        simulating: grid.is_simulating(),
        selected: snapshot.selected.clone(),
        summary: snapshot.summary(),
        grid: snapshot.render(selectable),
    }))
}

// Click on a slot
async fn activate_slot(
    req: web::Json<ActivateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let selectable = req.selectable.unwrap_or(state.selectable);
    match state.grid().activate(&req.slot_id, selectable) {
        Ok(Some(selected)) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "selected": selected,
        }))),
        Ok(None) => Ok(HttpResponse::Conflict().json(serde_json::json!({
            "success": false,
            "error": format!("Slot {} cannot be selected", req.slot_id),
        }))),
        Err(e) => Ok(failure(&e)),
    }
}

async fn clear_selection(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.grid().clear_selection();
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

// Recent entry/exit events
async fn get_events(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.grid().events()))
}

// Owner: change the grid shape
async fn set_shape(
    req: HttpRequest,
    body: web::Json<ShapeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.is_owner(&req) {
        return Ok(unauthorized());
    }

    match state.grid().set_shape(body.rows, body.cols) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(e) => {
            warn!("Rejected grid shape {}x{}: {}", body.rows, body.cols, e);
            Ok(failure(&e))
        }
    }
}

// Owner: upload slot data (JSON or CSV) that replaces the simulated grid
async fn upload_override(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.is_owner(&req) {
        return Ok(unauthorized());
    }

    let is_csv = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/csv"));
    let parsed = if is_csv { parse_csv_slots(&body) } else { parse_json_slots(&body) };

    let result = parsed.and_then(|slots| {
        let count = slots.len();
        state.grid().set_override(slots).map(|()| count)
    });

    match result {
        Ok(count) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Loaded {} slots", count),
        }))),
        Err(e) => {
            warn!("Rejected slot upload: {}", e);
            Ok(failure(&e))
        }
    }
}

// Owner: drop uploaded data and go back to simulation
async fn clear_override(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !state.is_owner(&req) {
        return Ok(unauthorized());
    }

    match state.grid().clear_override() {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true}))),
        Err(e) => Ok(failure(&e)),
    }
}

// HTML page handler
async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

/// Routes, without the static file service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/api/login", web::post().to(owner_login))
        .route("/api/grid", web::get().to(get_grid))
        .route("/api/grid/activate", web::post().to(activate_slot))
        .route("/api/grid/selection", web::delete().to(clear_selection))
        .route("/api/grid/events", web::get().to(get_events))
        .route("/api/grid/shape", web::put().to(set_shape))
        .service(
            web::resource("/api/grid/override")
                .route(web::put().to(upload_override))
                .route(web::delete().to(clear_override)),
        );
}

pub async fn start_server(
    port: u16,
    owner_password: String,
    selectable: bool,
    config: GridConfig,
) -> anyhow::Result<()> {
    let grid = SlotGridManager::new(config, None)?;
    let app_state = web::Data::new(AppState::new(grid, owner_password, selectable));

    info!("Starting web server on port {}", port);
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", "static"))
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
