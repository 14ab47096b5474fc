//! # Handlers del Eco
//! src/echo/handlers.rs
//!
//! - GET / POST / PUT / DELETE: devuelven el `EchoRecord` como JSON indentado
//! - OPTIONS: preflight CORS, 200 sin body
//!
//! Los headers CORS los agrega el router a toda respuesta.

use super::record::EchoRecord;
use crate::http::{Request, Response, StatusCode};
use tracing::{error, warn};

/// Handler para GET, POST, PUT y DELETE en cualquier path
///
/// Un body que no es UTF-8 responde 400 sin afectar al servidor.
pub fn echo_handler(req: &Request) -> Response {
    let record = match EchoRecord::from_request(req) {
        Ok(record) => record,
        Err(e) => {
            warn!("{} {}: {}", req.method(), req.path(), e);
            return Response::error(StatusCode::BadRequest, &e.to_string());
        }
    };

    match Response::pretty_json(&record) {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to serialize echo record: {}", e);
            Response::error(StatusCode::InternalServerError, "Failed to serialize echo record")
        }
    }
}

/// Handler para OPTIONS (preflight CORS)
pub fn options_handler(_req: &Request) -> Response {
    Response::new(StatusCode::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn body_json(response: &Response) -> Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_echo_get() {
        let req = Request::parse(b"GET /x?a=1&a=2 HTTP/1.1\r\nAccept: */*\r\n\r\n").unwrap();
        let response = echo_handler(&req);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("application/json"));

        let body = body_json(&response);
        assert_eq!(body["method"], "GET");
        assert_eq!(body["path"], "/x");
        assert_eq!(body["query_params"]["a"], json!(["1", "2"]));
        assert_eq!(body["body"], Value::Null);
    }

    #[test]
    fn test_echo_body_is_indented() {
        let req = Request::parse(b"DELETE / HTTP/1.1\r\n\r\n").unwrap();
        let response = echo_handler(&req);
        let text = String::from_utf8(response.body().to_vec()).unwrap();

        assert!(text.starts_with("{\n  \"timestamp\": "));
    }

    #[test]
    fn test_echo_text_body() {
        let req = Request::parse(b"PUT /t HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello").unwrap();
        let body = body_json(&echo_handler(&req));

        assert_eq!(body["method"], "PUT");
        assert_eq!(body["body"], "hello");
    }

    #[test]
    fn test_echo_invalid_utf8_is_bad_request() {
        let req = Request::parse(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\n\xC3\x28").unwrap();
        let response = echo_handler(&req);

        assert_eq!(response.status(), StatusCode::BadRequest);
        assert!(body_json(&response)["error"].as_str().unwrap().contains("UTF-8"));
    }

    #[test]
    fn test_options_empty() {
        let req = Request::parse(b"OPTIONS /anything HTTP/1.1\r\n\r\n").unwrap();
        let response = options_handler(&req);

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(response.body().is_empty());
    }
}
