//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP de un solo thread:
//! 1. Escucha en un puerto
//! 2. Acepta una conexión
//! 3. Lee y parsea el request, genera y envía la response
//! 4. Vuelve a aceptar, hasta que se pide el apagado
//!
//! No hay concurrencia: un request se procesa completo antes del siguiente.

pub mod shutdown;
pub mod tcp;

pub use shutdown::ShutdownHandle;
pub use tcp::Server;
