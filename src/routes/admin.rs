use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::admin_validator,
    db,
    error::ApiError,
    models::{
        NuevoBono, NuevoCliente, BONO_TIPOS, RECARGA_ESTADOS, RESERVA_ESTADOS,
        SOLICITUD_ESTADOS, VISIBLE_VALORES,
    },
    state::AppState,
    validate::{campo_texto, email_valido, entero_positivo, importe_decimal, valor_permitido},
};

// Back-office surface. Everything under /api/admin requires Basic
// credentials belonging to an admin user.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(HttpAuthentication::basic(admin_validator))
            .service(web::resource("/reservas").route(web::get().to(listar_reservas)))
            .service(
                web::resource("/reservas/{id}/estado")
                    .route(web::post().to(actualizar_reserva_estado)),
            )
            .service(
                web::resource("/clientes")
                    .route(web::get().to(listar_clientes))
                    .route(web::post().to(crear_cliente)),
            )
            .service(
                web::resource("/clientes/{id}/saldo")
                    .route(web::post().to(actualizar_cliente_saldo)),
            )
            .service(
                web::resource("/clientes/{id}/notas")
                    .route(web::post().to(actualizar_cliente_notas)),
            )
            .service(web::resource("/bonos").route(web::post().to(crear_bono)))
            .service(web::resource("/recargas").route(web::get().to(listar_recargas)))
            .service(
                web::resource("/recargas/{id}/estado")
                    .route(web::post().to(actualizar_recarga_estado)),
            )
            .service(web::resource("/trabajo").route(web::get().to(listar_solicitudes)))
            .service(
                web::resource("/trabajo/{id}/estado")
                    .route(web::post().to(actualizar_solicitud_estado)),
            )
            .service(web::resource("/resenas").route(web::get().to(listar_resenas)))
            .service(
                web::resource("/resenas/{id}/visible").route(web::post().to(aprobar_resena)),
            )
            .service(web::resource("/resenas/{id}").route(web::delete().to(eliminar_resena))),
    );
}

#[derive(Deserialize)]
struct EstadoUpdate {
    estado: String,
}

#[derive(Deserialize)]
struct SaldoUpdate {
    saldo: String,
}

#[derive(Deserialize)]
struct NotasUpdate {
    notas: String,
}

#[derive(Deserialize)]
struct VisibleUpdate {
    visible: String,
}

// ---- Reservas ----

async fn listar_reservas(state: web::Data<AppState>) -> HttpResponse {
    let reservas = db::list_reservas(&state.db).await.unwrap_or_default();
    HttpResponse::Ok().json(reservas)
}

async fn actualizar_reserva_estado(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<EstadoUpdate>,
) -> Result<HttpResponse, ApiError> {
    valor_permitido("estado", &payload.estado, &RESERVA_ESTADOS)?;
    db::update_reserva_estado(&state.db, path.into_inner(), &payload.estado).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Clientes ----

async fn listar_clientes(state: web::Data<AppState>) -> HttpResponse {
    let clientes = db::list_clientes(&state.db).await.unwrap_or_default();
    HttpResponse::Ok().json(clientes)
}

async fn crear_cliente(
    state: web::Data<AppState>,
    payload: web::Json<NuevoCliente>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("nombre", &payload.nombre, 2, 255)?;
    email_valido(&payload.email)?;

    db::create_cliente(&state.db, &payload).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn actualizar_cliente_saldo(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<SaldoUpdate>,
) -> Result<HttpResponse, ApiError> {
    importe_decimal("saldo", &payload.saldo)?;
    db::update_cliente_saldo(&state.db, path.into_inner(), &payload.saldo).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn actualizar_cliente_notas(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<NotasUpdate>,
) -> Result<HttpResponse, ApiError> {
    db::update_cliente_notas(&state.db, path.into_inner(), &payload.notas).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Bonos ----

async fn crear_bono(
    state: web::Data<AppState>,
    payload: web::Json<NuevoBono>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("nombre", &payload.nombre, 2, 255)?;
    importe_decimal("precio", &payload.precio)?;
    entero_positivo("creditos", payload.creditos)?;
    valor_permitido("tipo", &payload.tipo, &BONO_TIPOS)?;

    db::create_bono(&state.db, &payload).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Recargas ----

async fn listar_recargas(state: web::Data<AppState>) -> HttpResponse {
    let recargas = db::list_recargas(&state.db).await.unwrap_or_default();
    HttpResponse::Ok().json(recargas)
}

async fn actualizar_recarga_estado(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<EstadoUpdate>,
) -> Result<HttpResponse, ApiError> {
    valor_permitido("estado", &payload.estado, &RECARGA_ESTADOS)?;
    db::update_recarga_estado(&state.db, path.into_inner(), &payload.estado).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Solicitudes de trabajo ----

async fn listar_solicitudes(state: web::Data<AppState>) -> HttpResponse {
    let solicitudes = db::list_solicitudes_trabajo(&state.db).await.unwrap_or_default();
    HttpResponse::Ok().json(solicitudes)
}

async fn actualizar_solicitud_estado(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<EstadoUpdate>,
) -> Result<HttpResponse, ApiError> {
    valor_permitido("estado", &payload.estado, &SOLICITUD_ESTADOS)?;
    db::update_solicitud_estado(&state.db, path.into_inner(), &payload.estado).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Reseñas ----

async fn listar_resenas(state: web::Data<AppState>) -> HttpResponse {
    let resenas = db::list_resenas(&state.db, false).await.unwrap_or_default();
    HttpResponse::Ok().json(resenas)
}

async fn aprobar_resena(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<VisibleUpdate>,
) -> Result<HttpResponse, ApiError> {
    valor_permitido("visible", &payload.visible, &VISIBLE_VALORES)?;
    db::update_resena_visible(&state.db, path.into_inner(), &payload.visible).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

async fn eliminar_resena(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    db::delete_resena(&state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
