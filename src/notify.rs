use serde_json::json;

use crate::state::NotifyConfig;

/// Sends a side-channel message to the business operator. Fire-and-forget:
/// a missing target disables it silently and delivery failures are only
/// logged, never surfaced to the caller.
pub async fn notify_owner(http: &reqwest::Client, config: &NotifyConfig, title: &str, content: &str) {
    if !config.enabled() {
        return;
    }

    let payload = json!({ "title": title, "content": content });
    let mut request = http.post(&config.url).json(&payload);
    if !config.token.trim().is_empty() {
        request = request.bearer_auth(&config.token);
    }

    match request.send().await {
        Ok(response) if !response.status().is_success() => {
            log::warn!("Owner notification rejected with status {}", response.status());
        }
        Ok(_) => {}
        Err(err) => {
            log::warn!("Owner notification failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NotifyConfig;

    #[actix_web::test]
    async fn disabled_config_is_a_no_op() {
        let config = NotifyConfig {
            url: String::new(),
            token: String::new(),
        };
        // Must return without attempting any network call.
        notify_owner(&reqwest::Client::new(), &config, "titulo", "contenido").await;
    }
}
