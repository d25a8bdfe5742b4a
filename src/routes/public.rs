use actix_web::http::header::Header;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_httpauth::headers::authorization::{Authorization, Basic};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    auth::{authenticate_credentials, clear_session_cookie},
    catalog::{find_bono_pago, find_tarotista, Tarotista, TAROTISTAS},
    db,
    error::ApiError,
    llm::{self, ChatMessage},
    models::{
        NuevaRecarga, NuevaReserva, NuevaResena, NuevaSolicitudTrabajo, METODOS_CONTACTO,
        METODOS_PAGO, TIPOS_CONSULTA,
    },
    notify::notify_owner,
    state::AppState,
    stripe,
    validate::{campo_texto, email_valido, entero_positivo, importe_decimal, valor_permitido},
};

const FALLBACK_TAROTISTA: &str = "Las cartas no hablan en este momento. Inténtalo de nuevo.";
const FALLBACK_ATENCION: &str =
    "Disculpa, no puedo responder ahora. Contáctanos al +34 625 815 306.";

const INSTRUCCION_PLATAFORMA: &str = "\n\nEres una tarotista mística de la plataforma Tarot Meiga - Sabiduría Ancestral. Cuando respondas, imagina que estás tirando las cartas del tarot para el consultante. Menciona alguna carta específica del tarot en tu respuesta. Sé auténtico a tu personalidad única.";

const PROMPT_ATENCION: &str = r#"Eres el asistente virtual de Tarot Meiga - Sabiduría Ancestral. Tu nombre es Luna y eres amable, cálida y mística.
Ayudas a los clientes con información sobre:
- Los servicios de tarot disponibles (tarotistas IA con 1 pregunta gratis, y consultas con Reina la tarotista humana)
- Los bonos y precios: Consulta Express (15€/1 consulta), Bono Básico (39€/3 consultas), Bono Estándar (59€/6 consultas), Bono Premium (99€/10 consultas), Pack 30 min (25€), Pack 60 min (45€)
- Cómo reservar una consulta con Reina (formulario en la web o llamando al +34 625 815 306)
- Métodos de contacto: WhatsApp, audio, email o llamada
- Email de contacto: tarotmeiga.es@gmail.com
- Teléfono: +34 625 815 306
- Para reservar bonos, los clientes deben ir a la sección "Bonos" y rellenar el formulario de recarga
- Para trabajar con nosotros, hay un formulario en la sección "Trabaja con Nosotros"
Responde siempre en español, de forma breve y cálida. Si no sabes algo, sugiere contactar directamente por WhatsApp o teléfono."#;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/tarotistas").route(web::get().to(listar_tarotistas)))
            .service(web::resource("/tarotistas/{id}").route(web::get().to(detalle_tarotista)))
            .service(web::resource("/chat/preguntar").route(web::post().to(chat_preguntar)))
            .service(web::resource("/chat/atencion").route(web::post().to(chat_atencion)))
            .service(web::resource("/reservas").route(web::post().to(crear_reserva)))
            .service(web::resource("/bonos").route(web::get().to(listar_bonos)))
            .service(web::resource("/recargas").route(web::post().to(solicitar_recarga)))
            .service(web::resource("/trabajo").route(web::post().to(solicitar_trabajo)))
            .service(
                web::resource("/resenas")
                    .route(web::get().to(listar_resenas))
                    .route(web::post().to(crear_resena)),
            )
            .service(web::resource("/pagos/checkout").route(web::post().to(crear_checkout)))
            .service(web::resource("/auth/me").route(web::get().to(auth_me)))
            .service(web::resource("/auth/logout").route(web::post().to(auth_logout)))
            .service(web::resource("/health").route(web::get().to(health))),
    );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

// ---- Tarotistas ----

/// Public projection of a persona; the long description and system prompt
/// stay out of the listing.
#[derive(Serialize)]
struct TarotistaResumen {
    id: &'static str,
    nombre: &'static str,
    especialidad: &'static str,
    descripcion_corta: &'static str,
    avatar: &'static str,
    imagen: &'static str,
    color: &'static str,
    tags: &'static [&'static str],
    disponible: bool,
}

impl From<&'static Tarotista> for TarotistaResumen {
    fn from(t: &'static Tarotista) -> Self {
        Self {
            id: t.id,
            nombre: t.nombre,
            especialidad: t.especialidad,
            descripcion_corta: t.descripcion_corta,
            avatar: t.avatar,
            imagen: t.imagen,
            color: t.color,
            tags: t.tags,
            disponible: t.disponible,
        }
    }
}

async fn listar_tarotistas() -> HttpResponse {
    let resumen: Vec<TarotistaResumen> = TAROTISTAS.iter().map(TarotistaResumen::from).collect();
    HttpResponse::Ok().json(resumen)
}

async fn detalle_tarotista(path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let tarotista = find_tarotista(&path.into_inner())
        .ok_or_else(|| ApiError::NotFound("Tarotista no encontrada".to_string()))?;
    Ok(HttpResponse::Ok().json(tarotista))
}

// ---- Chat ----

#[derive(Deserialize)]
struct PreguntaPayload {
    tarotista_id: String,
    pregunta: String,
    session_id: String,
}

async fn chat_preguntar(
    state: web::Data<AppState>,
    payload: web::Json<PreguntaPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("pregunta", &payload.pregunta, 5, 500)?;
    campo_texto("session_id", &payload.session_id, 1, 128)?;

    let tarotista = find_tarotista(&payload.tarotista_id)
        .ok_or_else(|| ApiError::NotFound("Tarotista no encontrada".to_string()))?;

    let messages = [
        ChatMessage::new(
            "system",
            format!("{}{INSTRUCCION_PLATAFORMA}", tarotista.system_prompt),
        ),
        ChatMessage::new("user", payload.pregunta.clone()),
    ];

    let respuesta = match llm::completar(&state.http, &state.llm, &messages).await {
        Ok(Some(texto)) => texto,
        Ok(None) => FALLBACK_TAROTISTA.to_string(),
        Err(err) => {
            log::warn!("Chat completion failed for {}: {err}", tarotista.id);
            FALLBACK_TAROTISTA.to_string()
        }
    };

    db::create_chat_conversacion(
        &state.db,
        payload.session_id.trim(),
        tarotista.id,
        &payload.pregunta,
        &respuesta,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "respuesta": respuesta })))
}

#[derive(Deserialize)]
struct AtencionPayload {
    mensaje: String,
    historial: Option<Vec<ChatMessage>>,
}

async fn chat_atencion(
    state: web::Data<AppState>,
    payload: web::Json<AtencionPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("mensaje", &payload.mensaje, 1, 500)?;

    let mut messages = vec![ChatMessage::new("system", PROMPT_ATENCION)];
    if let Some(historial) = payload.historial {
        for msg in &historial {
            valor_permitido("historial role", &msg.role, &["user", "assistant"])?;
        }
        messages.extend(historial);
    }
    messages.push(ChatMessage::new("user", payload.mensaje));

    let respuesta = match llm::completar(&state.http, &state.llm, &messages).await {
        Ok(Some(texto)) => texto,
        Ok(None) => FALLBACK_ATENCION.to_string(),
        Err(err) => {
            log::warn!("Support chat completion failed: {err}");
            FALLBACK_ATENCION.to_string()
        }
    };

    Ok(HttpResponse::Ok().json(json!({ "respuesta": respuesta })))
}

// ---- Reservas ----

async fn crear_reserva(
    state: web::Data<AppState>,
    payload: web::Json<NuevaReserva>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("nombre", &payload.nombre, 2, 255)?;
    if let Some(email) = payload.email.as_deref() {
        email_valido(email)?;
    }
    valor_permitido("tipo_consulta", &payload.tipo_consulta, &TIPOS_CONSULTA)?;
    valor_permitido("metodo_contacto", &payload.metodo_contacto, &METODOS_CONTACTO)?;
    if let Some(mensaje) = payload.mensaje.as_deref() {
        campo_texto("mensaje", mensaje, 0, 1000)?;
    }

    db::create_reserva(&state.db, &payload).await?;

    notify_owner(
        &state.http,
        &state.notify,
        &format!("Nueva reserva de {}", payload.nombre),
        &format!(
            "Tipo: {} | Contacto: {} | Email: {} | Tel: {} | Mensaje: {}",
            payload.tipo_consulta,
            payload.metodo_contacto,
            payload.email.as_deref().unwrap_or("no indicado"),
            payload.telefono.as_deref().unwrap_or("no indicado"),
            payload.mensaje.as_deref().unwrap_or("sin mensaje"),
        ),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Bonos ----

async fn listar_bonos(state: web::Data<AppState>) -> HttpResponse {
    if let Err(err) = db::seed_bonos_default(&state.db).await {
        log::warn!("Bono seed failed: {err}");
    }
    let bonos = db::list_bonos(&state.db).await.unwrap_or_default();
    HttpResponse::Ok().json(bonos)
}

// ---- Recargas ----

async fn solicitar_recarga(
    state: web::Data<AppState>,
    payload: web::Json<NuevaRecarga>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("cliente_nombre", &payload.cliente_nombre, 2, 255)?;
    email_valido(&payload.cliente_email)?;
    entero_positivo("bono_id", payload.bono_id)?;
    campo_texto("bono_nombre", &payload.bono_nombre, 1, 255)?;
    importe_decimal("importe", &payload.importe)?;
    entero_positivo("creditos", payload.creditos)?;
    valor_permitido("metodo", &payload.metodo, &METODOS_PAGO)?;

    db::create_recarga(&state.db, &payload).await?;

    notify_owner(
        &state.http,
        &state.notify,
        &format!("Nueva solicitud de recarga de {}", payload.cliente_nombre),
        &format!(
            "Bono: {} | Importe: {}€ | Método: {} | Email: {} | Tel: {}",
            payload.bono_nombre,
            payload.importe,
            payload.metodo,
            payload.cliente_email,
            payload.cliente_telefono.as_deref().unwrap_or("no indicado"),
        ),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Trabajo ----

async fn solicitar_trabajo(
    state: web::Data<AppState>,
    payload: web::Json<NuevaSolicitudTrabajo>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("nombre", &payload.nombre, 2, 255)?;
    email_valido(&payload.email)?;
    campo_texto("especialidad", &payload.especialidad, 2, 255)?;
    campo_texto("experiencia", &payload.experiencia, 10, 2000)?;
    campo_texto("presentacion", &payload.presentacion, 10, 2000)?;

    db::create_solicitud_trabajo(&state.db, &payload).await?;

    notify_owner(
        &state.http,
        &state.notify,
        &format!("Nueva solicitud de trabajo de {}", payload.nombre),
        &format!(
            "Especialidad: {} | Email: {} | Tel: {}",
            payload.especialidad,
            payload.email,
            payload.telefono.as_deref().unwrap_or("no indicado"),
        ),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Reseñas ----

// Unapproved reseñas (and their author emails) are only reachable through
// the authenticated admin listing.
async fn listar_resenas(state: web::Data<AppState>) -> HttpResponse {
    let resenas = db::list_resenas(&state.db, true)
        .await
        .unwrap_or_default();
    HttpResponse::Ok().json(resenas)
}

async fn crear_resena(
    state: web::Data<AppState>,
    payload: web::Json<NuevaResena>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    campo_texto("nombre", &payload.nombre, 2, 255)?;
    if let Some(email) = payload.email.as_deref() {
        email_valido(email)?;
    }
    campo_texto("texto", &payload.texto, 10, 1000)?;
    if !(1..=5).contains(&payload.puntuacion) {
        return Err(ApiError::Validation(
            "puntuacion must be between 1 and 5".to_string(),
        ));
    }

    // Stored hidden until an explicit admin approval.
    db::create_resena(&state.db, &payload).await?;

    notify_owner(
        &state.http,
        &state.notify,
        &format!("Nueva reseña de {}", payload.nombre),
        &format!(
            "Puntuación: {}/5\nTexto: {}\nEmail: {}",
            payload.puntuacion,
            payload.texto,
            payload.email.as_deref().unwrap_or("no indicado"),
        ),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ---- Pagos ----

#[derive(Deserialize)]
struct CheckoutPayload {
    bono_id: String,
    cliente_nombre: Option<String>,
    cliente_email: Option<String>,
    origin: String,
}

async fn crear_checkout(
    state: web::Data<AppState>,
    payload: web::Json<CheckoutPayload>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    if !payload.origin.starts_with("http://") && !payload.origin.starts_with("https://") {
        return Err(ApiError::Validation("origin must be an http(s) URL".to_string()));
    }
    if let Some(email) = payload.cliente_email.as_deref() {
        email_valido(email)?;
    }

    let bono = find_bono_pago(&payload.bono_id)
        .ok_or_else(|| ApiError::NotFound("Bono no encontrado".to_string()))?;

    let url = stripe::crear_checkout_session(
        &state.http,
        &state.stripe,
        bono,
        payload.cliente_nombre.as_deref(),
        payload.cliente_email.as_deref(),
        &payload.origin,
    )
    .await
    .map_err(|err| {
        log::error!("Checkout session creation failed: {err}");
        ApiError::Payment(err.to_string())
    })?;

    Ok(HttpResponse::Ok().json(json!({ "url": url })))
}

// ---- Auth ----

async fn auth_me(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let Ok(auth) = Authorization::<Basic>::parse(&req) else {
        return HttpResponse::Ok().json(serde_json::Value::Null);
    };
    let credentials = auth.into_scheme();
    let username = credentials.user_id();
    let password = credentials.password().unwrap_or_default();

    match authenticate_credentials(&state.db, username, password).await {
        Some(user) => {
            let row = db::get_user_by_open_id(&state.db, &user.open_id)
                .await
                .ok()
                .flatten();
            HttpResponse::Ok().json(row)
        }
        None => HttpResponse::Ok().json(serde_json::Value::Null),
    }
}

async fn auth_logout(req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(clear_session_cookie(&req))
        .json(json!({ "success": true }))
}
