use crate::validation::ValidationOutcome;
use axum::{
    extract::Query,
    http::{header, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub iban: Option<String>,
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/validate",
            get(validate_iban_handler).fallback(method_not_allowed),
        )
        .fallback(not_found)
}

/// GET /validate?iban=...
///
/// Answers 200 with the outcome whether or not the IBAN is valid; a missing
/// parameter is 403.
pub async fn validate_iban_handler(Query(query): Query<ValidateQuery>) -> impl IntoResponse {
    let Some(iban) = query.iban else {
        log::info!("GET /validate rejected: missing iban parameter");
        return (StatusCode::FORBIDDEN, "missing query parameter: iban").into_response();
    };

    let outcome = ValidationOutcome::from_input(&iban);
    log::info!(
        "GET /validate iban={} valid={} error={}",
        outcome.iban,
        outcome.valid,
        outcome.error.map_or("none", |err| err.kind())
    );
    (StatusCode::OK, Json(outcome)).into_response()
}

async fn method_not_allowed(method: Method, uri: Uri) -> impl IntoResponse {
    log::info!("{} {} rejected: method not allowed", method, uri.path());
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, HEAD")],
        "method not allowed",
    )
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    log::info!("{} {} rejected: not found", method, uri.path());
    (StatusCode::NOT_FOUND, "not found")
}

pub async fn serve(addr: SocketAddr) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind {addr}: {err}"))?;
    let local = listener.local_addr().map_err(|err| err.to_string())?;
    log::info!("Listening on http://{}", local);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| err.to_string())?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    async fn send(method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[rstest]
    #[case("GET", "/validate?iban=GB82WEST12345698765432", StatusCode::OK)]
    #[case("GET", "/validate?iban=AL85751639367318444714198669", StatusCode::OK)]
    #[case(
        "POST",
        "/validate?iban=AL85751639367318444714198669",
        StatusCode::METHOD_NOT_ALLOWED
    )]
    #[case("DELETE", "/validate?iban=GB82WEST12345698765432", StatusCode::METHOD_NOT_ALLOWED)]
    #[case("GET", "/validate?lolban=AL85751639367318444714198669", StatusCode::FORBIDDEN)]
    #[case("GET", "/validate", StatusCode::FORBIDDEN)]
    #[case("GET", "/check?iban=GB82WEST12345698765432", StatusCode::NOT_FOUND)]
    #[tokio::test]
    async fn status_codes(
        #[case] method: &str,
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let (status, _) = send(method, uri).await;
        assert_eq!(status, expected);
    }

    #[tokio::test]
    async fn valid_iban_body() {
        let (status, body) = send("GET", "/validate?iban=GB82WEST12345698765432").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "iban": "GB82WEST12345698765432",
                "valid": true,
                "error": null,
            })
        );
    }

    #[tokio::test]
    async fn invalid_iban_body_names_error_kind() {
        let (status, body) = send("GET", "/validate?iban=GB82WEST12345698765432%26").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["iban"], "GB82WEST12345698765432&");
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "invalid_characters");
    }

    #[tokio::test]
    async fn empty_parameter_is_validated() {
        let (status, body) = send("GET", "/validate?iban=").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "number_too_short");
    }
}
