//! # EchoRecord
//! src/echo/record.rs
//!
//! Descripción JSON de un request, construida de cero para cada request y
//! descartada al responder.
//!
//! ## Ejemplo de response
//! ```json
//! {
//!   "timestamp": "2024-05-01T12:30:45.123456",
//!   "method": "POST",
//!   "path": "/api/items",
//!   "query_params": { "a": ["1", "2"] },
//!   "headers": { "Content-Type": "application/json" },
//!   "body": { "k": "v" },
//!   "client_address": "127.0.0.1:54321"
//! }
//! ```

use crate::http::Request;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Headers que nunca se devuelven en el eco
const HIDDEN_HEADERS: [&str; 2] = ["Host", "Content-Length"];

/// Formato ISO-8601 en hora local, sin offset
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Igual que `TIMESTAMP_FORMAT`, con microsegundos
const TIMESTAMP_FORMAT_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Errores al construir el eco de un request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EchoError {
    /// El body no es UTF-8 válido
    #[error("Request body is not valid UTF-8 (invalid byte at offset {0})")]
    InvalidUtf8(usize),
}

/// Descripción de un request tal como se devuelve al cliente
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EchoRecord {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub query_params: IndexMap<String, Vec<String>>,
    pub headers: IndexMap<String, String>,
    pub body: Value,
    pub client_address: String,
}

impl EchoRecord {
    /// Construye el eco de un request
    ///
    /// Solo depende del request: no hay estado compartido entre llamadas.
    ///
    /// # Errores
    ///
    /// `EchoError::InvalidUtf8` si el body no se puede decodificar.
    pub fn from_request(request: &Request) -> Result<Self, EchoError> {
        let body = decode_body(request.body())?;

        let headers = request
            .headers()
            .iter()
            .filter(|(name, _)| !is_hidden_header(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let client_address = request
            .peer_addr()
            .map(|addr| format!("{}:{}", addr.ip(), addr.port()))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self {
            timestamp: format_timestamp(request.received_at()),
            method: request.method().as_str().to_string(),
            path: request.path().to_string(),
            query_params: request.query_params().clone(),
            headers,
            body,
            client_address,
        })
    }
}

/// La fracción se omite cuando los microsegundos son cero
fn format_timestamp(at: DateTime<Local>) -> String {
    let format = if at.timestamp_subsec_micros() == 0 {
        TIMESTAMP_FORMAT
    } else {
        TIMESTAMP_FORMAT_MICROS
    };
    at.format(format).to_string()
}

fn is_hidden_header(name: &str) -> bool {
    HIDDEN_HEADERS
        .iter()
        .any(|hidden| hidden.eq_ignore_ascii_case(name))
}

/// Decodifica el body: JSON si parsea, texto si no, `null` si no hubo body
pub fn decode_body(body: Option<&[u8]>) -> Result<Value, EchoError> {
    let Some(bytes) = body else {
        return Ok(Value::Null);
    };

    let text = std::str::from_utf8(bytes).map_err(|e| EchoError::InvalidUtf8(e.valid_up_to()))?;

    // Texto que no es JSON se devuelve tal cual
    Ok(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn request(raw: &[u8]) -> Request {
        Request::parse(raw)
            .unwrap()
            .with_peer_addr("127.0.0.1:54321".parse().unwrap())
    }

    #[test]
    fn test_record_fields() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
        let req = request(b"GET /items?a=1&a=2 HTTP/1.1\r\nHost: h\r\nAccept: */*\r\n\r\n")
            .with_received_at(at);

        let record = EchoRecord::from_request(&req).unwrap();

        assert_eq!(record.timestamp, "2024-05-01T12:30:45");
        assert_eq!(record.method, "GET");
        assert_eq!(record.path, "/items");
        assert_eq!(record.query_params["a"], vec!["1", "2"]);
        assert_eq!(record.headers.len(), 1);
        assert_eq!(record.headers["Accept"], "*/*");
        assert_eq!(record.body, Value::Null);
        assert_eq!(record.client_address, "127.0.0.1:54321");
    }

    #[test]
    fn test_timestamp_with_micros() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap() + Duration::microseconds(123_456);
        assert_eq!(format_timestamp(at), "2024-05-01T12:30:45.123456");

        let at = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap() + Duration::microseconds(7);
        assert_eq!(format_timestamp(at), "2024-05-01T12:30:45.000007");
    }

    #[test]
    fn test_serialized_key_order() {
        let record = EchoRecord::from_request(&request(b"GET / HTTP/1.1\r\n\r\n")).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert_eq!(
            keys,
            [
                "timestamp",
                "method",
                "path",
                "query_params",
                "headers",
                "body",
                "client_address"
            ]
        );
    }

    #[test]
    fn test_hidden_headers_any_case() {
        let req = request(
            b"POST / HTTP/1.1\r\nhost: h\r\nCONTENT-LENGTH: 2\r\nX-Keep: yes\r\n\r\nhi",
        );
        let record = EchoRecord::from_request(&req).unwrap();

        assert_eq!(record.headers.keys().collect::<Vec<_>>(), ["X-Keep"]);
    }

    #[test]
    fn test_repeated_header_keeps_last() {
        let req = request(b"GET / HTTP/1.1\r\nX-Dup: one\r\nX-Dup: two\r\n\r\n");
        let record = EchoRecord::from_request(&req).unwrap();

        assert_eq!(record.headers["X-Dup"], "two");
    }

    #[test]
    fn test_json_body_is_parsed() {
        let req = request(
            b"POST / HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 9\r\n\r\n{\"k\":\"v\"}",
        );
        let record = EchoRecord::from_request(&req).unwrap();

        assert_eq!(record.body, json!({"k": "v"}));
    }

    #[test]
    fn test_plain_body_passthrough() {
        assert_eq!(decode_body(Some(&b"hello"[..])).unwrap(), json!("hello"));
        assert_eq!(decode_body(Some(&b""[..])).unwrap(), json!(""));
        assert_eq!(decode_body(Some(&b"{broken"[..])).unwrap(), json!("{broken"));
    }

    #[test]
    fn test_json_scalars() {
        assert_eq!(decode_body(Some(&b"42"[..])).unwrap(), json!(42));
        assert_eq!(decode_body(Some(&b" [1, true, null] "[..])).unwrap(), json!([1, true, null]));
    }

    #[test]
    fn test_missing_body_is_null() {
        assert_eq!(decode_body(None).unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_utf8_body() {
        let err = decode_body(Some(&[b'o', b'k', 0xFF, 0xFE][..])).unwrap_err();
        assert_eq!(err, EchoError::InvalidUtf8(2));
    }

    #[test]
    fn test_unknown_client_address() {
        let req = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        let record = EchoRecord::from_request(&req).unwrap();

        assert_eq!(record.client_address, "unknown");
    }

    #[test]
    fn test_ipv6_client_address() {
        let req = Request::parse(b"GET / HTTP/1.1\r\n\r\n")
            .unwrap()
            .with_peer_addr("[::1]:8080".parse().unwrap());
        let record = EchoRecord::from_request(&req).unwrap();

        assert_eq!(record.client_address, "::1:8080");
    }
}
