use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

pub const RESERVA_ESTADOS: [&str; 4] = ["pendiente", "confirmada", "completada", "cancelada"];
pub const RECARGA_ESTADOS: [&str; 3] = ["pendiente", "confirmada", "rechazada"];
pub const SOLICITUD_ESTADOS: [&str; 4] = ["pendiente", "revisada", "aceptada", "rechazada"];

pub const TIPOS_CONSULTA: [&str; 4] = ["amor", "trabajo", "salud", "general"];
pub const METODOS_CONTACTO: [&str; 4] = ["whatsapp", "audio", "email", "llamada"];
pub const METODOS_PAGO: [&str; 4] = ["transferencia", "bizum", "paypal", "efectivo"];
pub const BONO_TIPOS: [&str; 2] = ["minutos", "consultas"];
pub const VISIBLE_VALORES: [&str; 2] = ["si", "no"];

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub last_signed_in: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ReservaRow {
    pub id: i64,
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub tipo_consulta: String,
    pub metodo_contacto: String,
    pub mensaje: Option<String>,
    pub estado: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClienteRow {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub saldo: String,
    pub notas: Option<String>,
    pub estado: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BonoRow {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: String,
    pub creditos: i64,
    pub tipo: String,
    pub activo: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecargaRow {
    pub id: i64,
    pub cliente_nombre: String,
    pub cliente_email: String,
    pub cliente_telefono: Option<String>,
    pub bono_id: Option<i64>,
    pub bono_nombre: String,
    pub importe: String,
    pub creditos: i64,
    pub metodo: String,
    pub estado: String,
    pub notas: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SolicitudTrabajoRow {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub especialidad: String,
    pub experiencia: String,
    pub presentacion: String,
    pub redes_sociales: Option<String>,
    pub estado: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ResenaRow {
    pub id: i64,
    pub nombre: String,
    pub email: Option<String>,
    pub texto: String,
    pub puntuacion: i64,
    pub tarotista_nombre: Option<String>,
    pub visible: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaReserva {
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub tipo_consulta: String,
    pub metodo_contacto: String,
    pub mensaje: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoCliente {
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevoBono {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: String,
    pub creditos: i64,
    pub tipo: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaRecarga {
    pub cliente_nombre: String,
    pub cliente_email: String,
    pub cliente_telefono: Option<String>,
    pub bono_id: i64,
    pub bono_nombre: String,
    pub importe: String,
    pub creditos: i64,
    pub metodo: String,
    pub notas: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaSolicitudTrabajo {
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub especialidad: String,
    pub experiencia: String,
    pub presentacion: String,
    pub redes_sociales: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NuevaResena {
    pub nombre: String,
    pub email: Option<String>,
    pub texto: String,
    pub puntuacion: i64,
    pub tarotista_nombre: Option<String>,
}

/// Incoming identity from the external login flow. Fields left as `None`
/// keep their stored value on upsert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NuevoUsuario {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: Option<String>,
    pub last_signed_in: Option<String>,
}
