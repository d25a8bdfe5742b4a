use crate::error::ApiError;

/// Trimmed character-count bound for a free-text field.
pub fn campo_texto(nombre: &str, valor: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = valor.trim().chars().count();
    if len < min || len > max {
        return Err(ApiError::Validation(format!(
            "{nombre} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

pub fn valor_permitido(nombre: &str, valor: &str, permitidos: &[&str]) -> Result<(), ApiError> {
    if !permitidos.contains(&valor) {
        return Err(ApiError::Validation(format!(
            "{nombre} must be one of: {}",
            permitidos.join(", ")
        )));
    }
    Ok(())
}

pub fn email_valido(valor: &str) -> Result<(), ApiError> {
    let valor = valor.trim();
    let bien_formado = valor.len() <= 320
        && valor
            .split_once('@')
            .is_some_and(|(local, dominio)| !local.is_empty() && dominio.contains('.'));
    if !bien_formado {
        return Err(ApiError::Validation("email is not valid".to_string()));
    }
    Ok(())
}

/// Monetary amounts travel as decimal strings ("39.00"), never floats.
pub fn importe_decimal(nombre: &str, valor: &str) -> Result<(), ApiError> {
    let valor = valor.trim();
    let (entero, fraccion) = match valor.split_once('.') {
        Some((entero, fraccion)) => (entero, fraccion),
        None => (valor, "0"),
    };
    let bien_formado = !entero.is_empty()
        && entero.chars().all(|c| c.is_ascii_digit())
        && !fraccion.is_empty()
        && fraccion.len() <= 2
        && fraccion.chars().all(|c| c.is_ascii_digit());
    if !bien_formado {
        return Err(ApiError::Validation(format!(
            "{nombre} must be a decimal amount like 39.00"
        )));
    }
    Ok(())
}

pub fn entero_positivo(nombre: &str, valor: i64) -> Result<(), ApiError> {
    if valor <= 0 {
        return Err(ApiError::Validation(format!("{nombre} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campo_texto_bounds() {
        assert!(campo_texto("nombre", "Ana", 2, 255).is_ok());
        assert!(campo_texto("nombre", "A", 2, 255).is_err());
        assert!(campo_texto("nombre", "  A  ", 2, 255).is_err());
        assert!(campo_texto("texto", &"x".repeat(1001), 10, 1000).is_err());
    }

    #[test]
    fn valores_permitidos() {
        assert!(valor_permitido("estado", "pendiente", &["pendiente", "confirmada"]).is_ok());
        assert!(valor_permitido("estado", "archivada", &["pendiente", "confirmada"]).is_err());
    }

    #[test]
    fn emails() {
        assert!(email_valido("maria@test.com").is_ok());
        assert!(email_valido("sin-arroba").is_err());
        assert!(email_valido("@dominio.com").is_err());
        assert!(email_valido("a@sinpunto").is_err());
    }

    #[test]
    fn importes() {
        assert!(importe_decimal("importe", "39.00").is_ok());
        assert!(importe_decimal("importe", "15").is_ok());
        assert!(importe_decimal("importe", "39.001").is_err());
        assert!(importe_decimal("importe", "39,00").is_err());
        assert!(importe_decimal("importe", "-5.00").is_err());
    }

    #[test]
    fn enteros() {
        assert!(entero_positivo("creditos", 3).is_ok());
        assert!(entero_positivo("creditos", 0).is_err());
        assert!(entero_positivo("creditos", -1).is_err());
    }
}
