//! # Logging
//! src/logging.rs
//!
//! Logs a stdout con prefijo de hora local, un access log por request.
//!
//! ```text
//! 2024-05-01 12:30:45  INFO "GET /x?a=1 HTTP/1.1" 200 -
//! ```

use crate::error::ServerError;
use crate::http::StatusCode;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Formato del prefijo de tiempo de cada línea
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Inicializa el subscriber global
///
/// `RUST_LOG` tiene prioridad sobre `default_filter`.
pub fn init(default_filter: &str) -> Result<(), ServerError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| ServerError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_owned()))
        .with_target(false)
        .with_writer(std::io::stdout)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))
}

/// Línea de access log: `"<request line>" <status> -`
pub fn access_line(request_line: &str, status: StatusCode) -> String {
    format!("\"{}\" {} -", request_line, status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_line() {
        assert_eq!(
            access_line("GET /x?a=1 HTTP/1.1", StatusCode::Ok),
            "\"GET /x?a=1 HTTP/1.1\" 200 -"
        );
        assert_eq!(
            access_line("PATCH / HTTP/1.1", StatusCode::NotImplemented),
            "\"PATCH / HTTP/1.1\" 501 -"
        );
    }
}
