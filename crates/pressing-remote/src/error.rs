use reqwest::StatusCode;
use serde::Deserialize;

use pressing_core::ports::RemoteError;

#[derive(Debug, Deserialize)]
struct ErrorBody {
  #[serde(alias = "message", alias = "detail")]
  error: String,
}

/// Texto de error del servidor: `{"error": ..}` / `{"message": ..}` / cuerpo plano / razón HTTP.
pub(crate) fn server_error(status: StatusCode, body: &str) -> RemoteError {
  let message = serde_json::from_str::<ErrorBody>(body)
    .map(|b| b.error)
    .ok()
    .or_else(|| {
      let trimmed = body.trim();
      (!trimmed.is_empty() && trimmed.len() <= 500).then(|| trimmed.to_string())
    })
    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

  RemoteError::Server { status: status.as_u16(), message }
}

pub(crate) fn transport_error(e: reqwest::Error) -> RemoteError {
  if e.is_decode() {
    RemoteError::Decode(e.to_string())
  } else {
    RemoteError::Transport(e.to_string())
  }
}

/// Comprueba el estado y devuelve la respuesta si es 2xx.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(server_error(status, &body))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prefers_json_error_field() {
    let err = server_error(StatusCode::PAYLOAD_TOO_LARGE, r#"{"error":"file too large"}"#);
    assert_eq!(err, RemoteError::Server { status: 413, message: "file too large".into() });

    let err = server_error(StatusCode::BAD_REQUEST, r#"{"message":"bad folder"}"#);
    assert_eq!(err.to_string(), "bad folder (status 400)");
  }

  #[test]
  fn falls_back_to_body_then_reason() {
    let err = server_error(StatusCode::BAD_GATEWAY, "upstream down");
    assert_eq!(err, RemoteError::Server { status: 502, message: "upstream down".into() });

    let err = server_error(StatusCode::SERVICE_UNAVAILABLE, "  ");
    assert_eq!(err, RemoteError::Server { status: 503, message: "Service Unavailable".into() });
  }
}
