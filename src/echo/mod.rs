//! # Eco de Requests
//!
//! Construcción del `EchoRecord` y los handlers que lo devuelven.
//!
//! | Método                    | Handler           | Respuesta               |
//! |---------------------------|-------------------|-------------------------|
//! | GET, POST, PUT, DELETE    | `echo_handler`    | 200 + EchoRecord JSON   |
//! | OPTIONS                   | `options_handler` | 200 sin body            |
//! | cualquier otro            | (ninguno)         | 501 Not Implemented     |

pub mod handlers;
pub mod record;

pub use handlers::{echo_handler, options_handler};
pub use record::{EchoError, EchoRecord};

use crate::http::Method;
use crate::router::Router;

/// Router con los handlers del eco registrados
pub fn router() -> Router {
    let mut router = Router::new();

    router.register(Method::GET, echo_handler);
    router.register(Method::POST, echo_handler);
    router.register(Method::PUT, echo_handler);
    router.register(Method::DELETE, echo_handler);
    router.register(Method::OPTIONS, options_handler);

    router
}
