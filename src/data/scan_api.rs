use {
    crate::{
        config::DF,
        data::{
            origin::ServerOrigin,
            protocol::{FilterPayload, FilterResponse},
        },
        error::ScanError,
    },
    reqwest::header::ACCEPT,
};

/// Submits a one-shot scan. The server answers once every timeframe finished;
/// matches and progress stream in over the realtime channel meanwhile.
pub async fn submit_filter(
    client: &reqwest::Client,
    origin: &ServerOrigin,
    payload: &FilterPayload,
) -> Result<FilterResponse, ScanError> {
    let url = origin.filter_url();
    if DF.log_scan_payloads {
        log::info!(
            "POST {} {}",
            url,
            serde_json::to_string(payload).unwrap_or_default()
        );
    }

    let response = client
        .post(&url)
        .header(ACCEPT, "application/json")
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        // The server wraps its own failures as `{"status":"error","message":..}`.
        return Err(match response.json::<FilterResponse>().await {
            Ok(FilterResponse {
                message: Some(message),
                ..
            }) => ScanError::Rejected(message),
            _ => ScanError::Status(status.as_u16()),
        });
    }

    let body: FilterResponse = response.json().await?;
    check_response(body)
}

/// Anything but `{"status":"success"}` is a rejection carrying the server's message.
pub fn check_response(body: FilterResponse) -> Result<FilterResponse, ScanError> {
    if body.is_success() {
        Ok(body)
    } else {
        Err(ScanError::Rejected(
            body.message
                .unwrap_or_else(|| format!("status '{}'", body.status)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: serde_json::Value) -> FilterResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn success_status_passes() {
        let ok = check_response(body(json!({"status": "success", "results": {}})));
        assert!(ok.is_ok());
    }

    #[test]
    fn other_statuses_surface_the_server_message() {
        let err = check_response(body(json!({"status": "error", "message": "Binance down"})))
            .unwrap_err();
        assert_eq!(err.to_string(), "Binance down");

        let err = check_response(body(json!({"status": "busy"}))).unwrap_err();
        assert!(matches!(err, ScanError::Rejected(ref m) if m.contains("busy")));
    }
}
