//! # Módulo HTTP
//!
//! Implementación mínima del protocolo HTTP/1.x que necesita el servidor
//! de eco, sin librerías de alto nivel:
//!
//! - Parsing de requests (request line, headers, body por `Content-Length`)
//! - Construcción de responses HTTP/1.0
//! - Códigos de estado
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: application/json\r\n
//! Access-Control-Allow-Origin: *\r\n
//! Content-Length: 13\r\n
//! \r\n
//! {"ok": true}
//! ```
//!
//! Cada conexión lleva un solo request; la respuesta cierra la conexión.

pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
