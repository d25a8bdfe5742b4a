use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use crate::{catalog::BonoPago, state::StripeConfig};

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("stripe secret key not configured")]
    MissingKey,
    #[error("stripe request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("stripe returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("stripe session has no redirect url")]
    NoUrl,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    url: Option<String>,
}

/// Creates a hosted checkout session for one package and returns the
/// provider redirect URL. Nothing is persisted locally; the webhook is the
/// only record of a completed payment.
pub async fn crear_checkout_session(
    http: &reqwest::Client,
    config: &StripeConfig,
    bono: &BonoPago,
    cliente_nombre: Option<&str>,
    cliente_email: Option<&str>,
    origin: &str,
) -> Result<String, StripeError> {
    if config.secret_key.trim().is_empty() {
        return Err(StripeError::MissingKey);
    }

    let origin = origin.trim_end_matches('/');
    let mut params: Vec<(&str, String)> = vec![
        ("payment_method_types[0]", "card".to_string()),
        ("line_items[0][price_data][currency]", "eur".to_string()),
        (
            "line_items[0][price_data][product_data][name]",
            format!("Tarot Meiga - {}", bono.nombre),
        ),
        (
            "line_items[0][price_data][product_data][description]",
            bono.descripcion.to_string(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            bono.precio_centimos.to_string(),
        ),
        ("line_items[0][quantity]", "1".to_string()),
        ("mode", "payment".to_string()),
        ("allow_promotion_codes", "true".to_string()),
        (
            "client_reference_id",
            cliente_email.unwrap_or("guest").to_string(),
        ),
        ("metadata[bono_id]", bono.id.to_string()),
        ("metadata[bono_nombre]", bono.nombre.to_string()),
        ("metadata[creditos]", bono.creditos.to_string()),
        (
            "metadata[customer_name]",
            cliente_nombre.unwrap_or_default().to_string(),
        ),
        (
            "metadata[customer_email]",
            cliente_email.unwrap_or_default().to_string(),
        ),
        ("success_url", format!("{origin}/bonos?pago=exitoso")),
        ("cancel_url", format!("{origin}/bonos?pago=cancelado")),
    ];
    if let Some(email) = cliente_email {
        params.push(("customer_email", email.to_string()));
    }

    let response = http
        .post(CHECKOUT_SESSIONS_URL)
        .basic_auth(&config.secret_key, None::<&str>)
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(StripeError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let session: CheckoutSessionResponse = response.json().await?;
    session.url.ok_or(StripeError::NoUrl)
}

#[derive(Debug, Error, PartialEq)]
pub enum SignatureError {
    #[error("missing timestamp in signature header")]
    MissingTimestamp,
    #[error("missing v1 signature in signature header")]
    MissingSignature,
    #[error("signature mismatch")]
    Mismatch,
}

/// Stripe's v1 scheme: HMAC-SHA256 over `"{timestamp}.{payload}"` with the
/// endpoint secret, hex-encoded in one or more `v1=` components of the
/// `Stripe-Signature` header. Comparison is constant-time via the MAC
/// verifier.
pub fn verify_signature(payload: &[u8], header: &str, secret: &str) -> Result<(), SignatureError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MissingTimestamp)?;
    if signatures.is_empty() {
        return Err(SignatureError::MissingSignature);
    }

    for candidate in signatures {
        let Ok(expected) = hex::decode(candidate) else {
            continue;
        };
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .map_err(|_| SignatureError::Mismatch)?;
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

/// The slice of the Stripe event envelope the webhook cares about.
#[derive(Debug, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub customer_email: Option<String>,
    pub amount_total: Option<i64>,
}

impl Event {
    pub fn checkout_session(&self) -> CheckoutSession {
        serde_json::from_value(self.data.object.clone()).unwrap_or_default()
    }
}

/// Builds a `Stripe-Signature` header value for a payload. Test-only helper
/// shared with the integration suite.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_prueba";

    #[test]
    fn accepts_valid_signature() {
        let payload = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
        let header = sign_payload(payload, SECRET, "1714000000");
        assert!(verify_signature(payload, &header, SECRET).is_ok());
    }

    #[test]
    fn rejects_tampered_payload() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, SECRET, "1714000000");
        assert_eq!(
            verify_signature(br#"{"id":"evt_2"}"#, &header, SECRET),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign_payload(payload, SECRET, "1714000000");
        assert_eq!(
            verify_signature(payload, &header, "whsec_otro"),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn rejects_malformed_header() {
        let payload = b"{}";
        assert_eq!(
            verify_signature(payload, "v1=abcd", SECRET),
            Err(SignatureError::MissingTimestamp)
        );
        assert_eq!(
            verify_signature(payload, "t=1714000000", SECRET),
            Err(SignatureError::MissingSignature)
        );
    }

    #[test]
    fn accepts_any_matching_v1_component() {
        let payload = b"payload";
        let good = sign_payload(payload, SECRET, "99");
        let good_sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t=99,v1=deadbeef,v1={good_sig}");
        assert!(verify_signature(payload, &header, SECRET).is_ok());
    }

    #[test]
    fn checkout_session_extraction_defaults() {
        let event: Event = serde_json::from_str(
            r#"{"id":"evt_9","type":"checkout.session.completed","data":{"object":{"id":"cs_1","amount_total":3900,"metadata":{"bono_nombre":"Bono Básico","customer_email":"ana@test.com"}}}}"#,
        )
        .unwrap();
        let session = event.checkout_session();
        assert_eq!(session.amount_total, Some(3900));
        assert_eq!(session.metadata.get("bono_nombre").map(String::as_str), Some("Bono Básico"));

        let empty: Event = serde_json::from_str(
            r#"{"id":"evt_10","type":"invoice.paid","data":{"object":{}}}"#,
        )
        .unwrap();
        let session = empty.checkout_session();
        assert!(session.metadata.is_empty());
        assert!(session.amount_total.is_none());
    }
}
