//! # Echo Server
//! src/lib.rs
//!
//! Servidor HTTP mínimo que devuelve, como JSON, el método, path, query
//! params, headers y body de cada request que recibe. Existe como fixture
//! para tests de integración de clientes HTTP.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests y construcción de responses HTTP/1.x
//! - `router`: Despacho por método y headers comunes (CORS)
//! - `echo`: `EchoRecord` y los handlers que lo devuelven
//! - `server`: Loop de accept de un solo thread y señal de apagado
//! - `config`: Argumentos CLI / variables de entorno
//! - `logging`: Subscriber de `tracing` y formato del access log
//! - `error`: Errores fatales
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use echo_server::config::Config;
//! use echo_server::server::Server;
//!
//! let server = Server::bind(Config::default()).expect("bind");
//! server.run().expect("run");
//! ```

pub mod config;
pub mod echo;
pub mod error;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
