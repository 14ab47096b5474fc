//! # Errores del Servidor
//! src/error.rs
//!
//! Errores que detienen el proceso. Los errores de un request individual
//! se resuelven como respuestas HTTP y nunca llegan aquí.

use std::io;
use thiserror::Error;

/// Errores fatales del ciclo de vida del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo abrir el socket (puerto en uso, sin permisos...)
    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_bind_error_message_and_source() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:8888".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };

        assert_eq!(err.to_string(), "Failed to bind 0.0.0.0:8888: address in use");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_from() {
        let err: ServerError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
