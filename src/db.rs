use std::{fs, path::Path};

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{
    BonoRow, ClienteRow, NuevaRecarga, NuevaReserva, NuevaResena, NuevaSolicitudTrabajo,
    NuevoBono, NuevoCliente, NuevoUsuario, RecargaRow, ReservaRow, ResenaRow,
    SolicitudTrabajoRow, UserRow, ROLE_ADMIN, ROLE_USER,
};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// ---- Users ----

/// Insert-or-update keyed by the external login id. Only fields present on
/// the incoming record are merged; `last_signed_in` is always refreshed.
/// The role defaults to admin only when the login id matches the configured
/// owner identity.
pub async fn upsert_user(
    pool: &SqlitePool,
    user: &NuevoUsuario,
    owner_open_id: &str,
) -> Result<(), sqlx::Error> {
    if user.open_id.trim().is_empty() {
        return Err(sqlx::Error::Protocol("user open_id is required".into()));
    }

    let role = user.role.clone().or_else(|| {
        (!owner_open_id.is_empty() && user.open_id == owner_open_id)
            .then(|| ROLE_ADMIN.to_string())
    });
    let last_signed_in = user.last_signed_in.clone().unwrap_or_else(now);
    let stamp = now();

    sqlx::query(
        r#"INSERT INTO users (open_id, name, email, login_method, role, last_signed_in, created_at, updated_at)
           VALUES (?, ?, ?, ?, COALESCE(?, ?), ?, ?, ?)
           ON CONFLICT(open_id) DO UPDATE SET
             name = COALESCE(excluded.name, users.name),
             email = COALESCE(excluded.email, users.email),
             login_method = COALESCE(excluded.login_method, users.login_method),
             role = COALESCE(?, users.role),
             last_signed_in = excluded.last_signed_in,
             updated_at = excluded.updated_at"#,
    )
    .bind(&user.open_id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.login_method)
    .bind(&role)
    .bind(ROLE_USER)
    .bind(&last_signed_in)
    .bind(&stamp)
    .bind(&stamp)
    .bind(&role)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_user_by_open_id(
    pool: &SqlitePool,
    open_id: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE open_id = ? LIMIT 1")
        .bind(open_id)
        .fetch_optional(pool)
        .await
}

// ---- Reservas ----

pub async fn create_reserva(pool: &SqlitePool, data: &NuevaReserva) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO reservas (nombre, email, telefono, tipo_consulta, metodo_contacto, mensaje, estado, created_at)
           VALUES (?, ?, ?, ?, ?, ?, 'pendiente', ?)"#,
    )
    .bind(&data.nombre)
    .bind(&data.email)
    .bind(&data.telefono)
    .bind(&data.tipo_consulta)
    .bind(&data.metodo_contacto)
    .bind(&data.mensaje)
    .bind(now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_reservas(pool: &SqlitePool) -> Result<Vec<ReservaRow>, sqlx::Error> {
    sqlx::query_as::<_, ReservaRow>("SELECT * FROM reservas ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn update_reserva_estado(
    pool: &SqlitePool,
    id: i64,
    estado: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE reservas SET estado = ? WHERE id = ?")
        .bind(estado)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- Chat conversaciones ----

pub async fn create_chat_conversacion(
    pool: &SqlitePool,
    session_id: &str,
    tarotista_id: &str,
    pregunta: &str,
    respuesta: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO chat_conversaciones (session_id, tarotista_id, pregunta, respuesta, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(session_id)
    .bind(tarotista_id)
    .bind(pregunta)
    .bind(respuesta)
    .bind(now())
    .execute(pool)
    .await?;
    Ok(())
}

// ---- Clientes ----

pub async fn list_clientes(pool: &SqlitePool) -> Result<Vec<ClienteRow>, sqlx::Error> {
    sqlx::query_as::<_, ClienteRow>("SELECT * FROM clientes ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn create_cliente(pool: &SqlitePool, data: &NuevoCliente) -> Result<(), sqlx::Error> {
    let stamp = now();
    sqlx::query(
        r#"INSERT INTO clientes (nombre, email, telefono, saldo, notas, estado, created_at, updated_at)
           VALUES (?, ?, ?, '0.00', ?, 'activo', ?, ?)"#,
    )
    .bind(&data.nombre)
    .bind(&data.email)
    .bind(&data.telefono)
    .bind(&data.notas)
    .bind(&stamp)
    .bind(&stamp)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_cliente_saldo(
    pool: &SqlitePool,
    id: i64,
    saldo: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE clientes SET saldo = ?, updated_at = ? WHERE id = ?")
        .bind(saldo)
        .bind(now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_cliente_notas(
    pool: &SqlitePool,
    id: i64,
    notas: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE clientes SET notas = ?, updated_at = ? WHERE id = ?")
        .bind(notas)
        .bind(now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- Bonos ----

pub async fn list_bonos(pool: &SqlitePool) -> Result<Vec<BonoRow>, sqlx::Error> {
    sqlx::query_as::<_, BonoRow>("SELECT * FROM bonos ORDER BY CAST(precio AS REAL) ASC")
        .fetch_all(pool)
        .await
}

pub async fn create_bono(pool: &SqlitePool, data: &NuevoBono) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO bonos (nombre, descripcion, precio, creditos, tipo, activo, created_at)
           VALUES (?, ?, ?, ?, ?, 'si', ?)"#,
    )
    .bind(&data.nombre)
    .bind(&data.descripcion)
    .bind(&data.precio)
    .bind(data.creditos)
    .bind(&data.tipo)
    .bind(now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Seeds the default package catalog once. Idempotence is checked by the
/// existence of any row, so admin-created packages suppress the seed too.
pub async fn seed_bonos_default(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bonos")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let defaults: [(&str, &str, &str, i64, &str); 6] = [
        ("Consulta Express", "1 consulta rápida de 15 minutos", "15.00", 1, "consultas"),
        ("Bono Básico", "3 consultas completas de 30 minutos", "39.00", 3, "consultas"),
        ("Bono Estándar", "5 consultas completas + 1 gratis", "59.00", 6, "consultas"),
        ("Bono Premium", "10 consultas + seguimiento mensual", "99.00", 10, "consultas"),
        ("Pack 30 Minutos", "30 minutos de consulta libre", "25.00", 30, "minutos"),
        ("Pack 60 Minutos", "60 minutos de consulta libre", "45.00", 60, "minutos"),
    ];

    for (nombre, descripcion, precio, creditos, tipo) in defaults {
        sqlx::query(
            r#"INSERT INTO bonos (nombre, descripcion, precio, creditos, tipo, activo, created_at)
               VALUES (?, ?, ?, ?, ?, 'si', ?)"#,
        )
        .bind(nombre)
        .bind(descripcion)
        .bind(precio)
        .bind(creditos)
        .bind(tipo)
        .bind(now())
        .execute(pool)
        .await?;
    }

    Ok(())
}

// ---- Recargas ----

pub async fn list_recargas(pool: &SqlitePool) -> Result<Vec<RecargaRow>, sqlx::Error> {
    sqlx::query_as::<_, RecargaRow>("SELECT * FROM recargas ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn create_recarga(pool: &SqlitePool, data: &NuevaRecarga) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO recargas
           (cliente_nombre, cliente_email, cliente_telefono, bono_id, bono_nombre, importe, creditos, metodo, estado, notas, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pendiente', ?, ?)"#,
    )
    .bind(&data.cliente_nombre)
    .bind(&data.cliente_email)
    .bind(&data.cliente_telefono)
    .bind(data.bono_id)
    .bind(&data.bono_nombre)
    .bind(&data.importe)
    .bind(data.creditos)
    .bind(&data.metodo)
    .bind(&data.notas)
    .bind(now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_recarga_estado(
    pool: &SqlitePool,
    id: i64,
    estado: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE recargas SET estado = ? WHERE id = ?")
        .bind(estado)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- Solicitudes de trabajo ----

pub async fn list_solicitudes_trabajo(
    pool: &SqlitePool,
) -> Result<Vec<SolicitudTrabajoRow>, sqlx::Error> {
    sqlx::query_as::<_, SolicitudTrabajoRow>(
        "SELECT * FROM solicitudes_trabajo ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create_solicitud_trabajo(
    pool: &SqlitePool,
    data: &NuevaSolicitudTrabajo,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO solicitudes_trabajo
           (nombre, email, telefono, especialidad, experiencia, presentacion, redes_sociales, estado, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, 'pendiente', ?)"#,
    )
    .bind(&data.nombre)
    .bind(&data.email)
    .bind(&data.telefono)
    .bind(&data.especialidad)
    .bind(&data.experiencia)
    .bind(&data.presentacion)
    .bind(&data.redes_sociales)
    .bind(now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_solicitud_estado(
    pool: &SqlitePool,
    id: i64,
    estado: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE solicitudes_trabajo SET estado = ? WHERE id = ?")
        .bind(estado)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// ---- Reseñas ----

pub async fn list_resenas(
    pool: &SqlitePool,
    solo_visibles: bool,
) -> Result<Vec<ResenaRow>, sqlx::Error> {
    if solo_visibles {
        sqlx::query_as::<_, ResenaRow>(
            "SELECT * FROM resenas WHERE visible = 'si' ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
    } else {
        sqlx::query_as::<_, ResenaRow>("SELECT * FROM resenas ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }
}

pub async fn create_resena(pool: &SqlitePool, data: &NuevaResena) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"INSERT INTO resenas (nombre, email, texto, puntuacion, tarotista_nombre, visible, created_at)
           VALUES (?, ?, ?, ?, ?, 'no', ?)"#,
    )
    .bind(&data.nombre)
    .bind(&data.email)
    .bind(&data.texto)
    .bind(data.puntuacion)
    .bind(&data.tarotista_nombre)
    .bind(now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_resena_visible(
    pool: &SqlitePool,
    id: i64,
    visible: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE resenas SET visible = ? WHERE id = ?")
        .bind(visible)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_resena(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM resenas WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        run_migrations(&pool).await.expect("migrations");
        pool
    }

    #[actix_web::test]
    async fn upsert_user_elevates_owner_role() {
        let pool = test_pool().await;
        let user = NuevoUsuario {
            open_id: "owner-123".to_string(),
            name: Some("Reina".to_string()),
            ..Default::default()
        };
        upsert_user(&pool, &user, "owner-123").await.unwrap();
        let stored = get_user_by_open_id(&pool, "owner-123").await.unwrap().unwrap();
        assert_eq!(stored.role, ROLE_ADMIN);

        let other = NuevoUsuario {
            open_id: "visitor-9".to_string(),
            ..Default::default()
        };
        upsert_user(&pool, &other, "owner-123").await.unwrap();
        let stored = get_user_by_open_id(&pool, "visitor-9").await.unwrap().unwrap();
        assert_eq!(stored.role, ROLE_USER);
    }

    #[actix_web::test]
    async fn upsert_user_merges_only_present_fields() {
        let pool = test_pool().await;
        let first = NuevoUsuario {
            open_id: "u-1".to_string(),
            name: Some("Ana".to_string()),
            email: Some("ana@test.com".to_string()),
            last_signed_in: Some("2026-01-01T00:00:00+00:00".to_string()),
            ..Default::default()
        };
        upsert_user(&pool, &first, "").await.unwrap();

        // Second login carries no profile fields; name and email must survive.
        let second = NuevoUsuario {
            open_id: "u-1".to_string(),
            last_signed_in: Some("2026-02-01T00:00:00+00:00".to_string()),
            ..Default::default()
        };
        upsert_user(&pool, &second, "").await.unwrap();

        let stored = get_user_by_open_id(&pool, "u-1").await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("Ana"));
        assert_eq!(stored.email.as_deref(), Some("ana@test.com"));
        assert_eq!(stored.last_signed_in, "2026-02-01T00:00:00+00:00");
    }

    #[actix_web::test]
    async fn upsert_user_rejects_empty_open_id() {
        let pool = test_pool().await;
        let user = NuevoUsuario::default();
        assert!(upsert_user(&pool, &user, "").await.is_err());
    }

    #[actix_web::test]
    async fn seed_bonos_default_is_idempotent() {
        let pool = test_pool().await;
        seed_bonos_default(&pool).await.unwrap();
        seed_bonos_default(&pool).await.unwrap();
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bonos")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 6);

        let bonos = list_bonos(&pool).await.unwrap();
        assert_eq!(bonos.first().map(|b| b.precio.as_str()), Some("15.00"));
        assert_eq!(bonos.last().map(|b| b.precio.as_str()), Some("99.00"));
    }

    #[actix_web::test]
    async fn resena_hidden_until_approved() {
        let pool = test_pool().await;
        let resena = NuevaResena {
            nombre: "Carmen".to_string(),
            email: None,
            texto: "Una lectura preciosa y certera".to_string(),
            puntuacion: 5,
            tarotista_nombre: None,
        };
        create_resena(&pool, &resena).await.unwrap();

        assert!(list_resenas(&pool, true).await.unwrap().is_empty());
        let all = list_resenas(&pool, false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].visible, "no");

        update_resena_visible(&pool, all[0].id, "si").await.unwrap();
        assert_eq!(list_resenas(&pool, true).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn ensure_sqlite_dir_ignores_memory_urls() {
        assert!(ensure_sqlite_dir("sqlite::memory:").is_ok());
        assert!(ensure_sqlite_dir("postgres://x").is_ok());
    }
}
