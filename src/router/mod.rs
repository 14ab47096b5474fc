//! # Despacho por Método
//! src/router/mod.rs
//!
//! El servidor de eco no enruta por path: cualquier path es válido. Lo que
//! decide el handler es el método HTTP.
//!
//! ```text
//! Request → Router (por método) → Handler → Response + headers comunes
//! ```
//!
//! Un método sin handler registrado responde 501 Not Implemented.

use crate::http::{Method, Request, Response, StatusCode};
use chrono::Utc;

/// Tipo de función handler
pub type Handler = fn(&Request) -> Response;

/// Valor de `Access-Control-Allow-Methods`
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Valor del header `Server`
pub const SERVER_NAME: &str = concat!("EchoServer/", env!("CARGO_PKG_VERSION"));

/// Router que mapea métodos a handlers
pub struct Router {
    routes: Vec<(Method, Handler)>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra el handler de un método
    ///
    /// Registrar dos veces el mismo método reemplaza el handler anterior.
    ///
    /// # Ejemplo
    /// ```
    /// use echo_server::router::Router;
    /// use echo_server::http::{Method, Request, Response};
    ///
    /// fn hello_handler(_req: &Request) -> Response {
    ///     Response::json(r#"{"message": "Hello"}"#)
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, hello_handler);
    ///
    /// let request = Request::parse(b"GET / HTTP/1.0\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).body(), br#"{"message": "Hello"}"#);
    /// ```
    pub fn register(&mut self, method: Method, handler: Handler) {
        match self.routes.iter_mut().find(|(m, _)| *m == method) {
            Some((_, existing)) => *existing = handler,
            None => self.routes.push((method, handler)),
        }
    }

    /// Ejecuta el handler del método del request
    ///
    /// Toda respuesta sale con los headers comunes (CORS incluidos).
    pub fn route(&self, request: &Request) -> Response {
        let method = request.method();

        let mut response = match self.routes.iter().find(|(m, _)| *m == method) {
            Some((_, handler)) => handler(request),
            None => Response::error(
                StatusCode::NotImplemented,
                &format!("Unsupported method ('{}')", method),
            ),
        };

        add_common_headers(&mut response);
        response
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Agrega los headers CORS a una respuesta
pub fn add_cors_headers(response: &mut Response) {
    response.add_header("Access-Control-Allow-Origin", "*");
    response.add_header("Access-Control-Allow-Methods", CORS_ALLOW_METHODS);
    response.add_header("Access-Control-Allow-Headers", "*");
}

/// Agrega los headers comunes a todas las respuestas
///
/// También se usa para las respuestas de error de parsing, que no pasan
/// por el router.
pub fn add_common_headers(response: &mut Response) {
    response.add_header("Server", SERVER_NAME);
    response.add_header("Date", &Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string());
    add_cors_headers(response);
    response.add_header("Connection", "close");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_handler(_req: &Request) -> Response {
        Response::json(r#"{"test": "ok"}"#)
    }

    fn other_handler(_req: &Request) -> Response {
        Response::json(r#"{"other": true}"#)
    }

    fn assert_cors(response: &Response) {
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(response.header("Access-Control-Allow-Methods"), Some(CORS_ALLOW_METHODS));
        assert_eq!(response.header("Access-Control-Allow-Headers"), Some("*"));
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new();
        assert_eq!(router.routes.len(), 0);
    }

    #[test]
    fn test_register_replaces() {
        let mut router = Router::new();
        router.register(Method::GET, test_handler);
        router.register(Method::GET, other_handler);

        assert_eq!(router.routes.len(), 1);
        let request = Request::parse(b"GET / HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(router.route(&request).body(), br#"{"other": true}"#);
    }

    #[test]
    fn test_route_found_any_path() {
        let mut router = Router::new();
        router.register(Method::POST, test_handler);

        let raws: [&[u8]; 2] = [
            b"POST / HTTP/1.0\r\n\r\n",
            b"POST /deep/nested/path HTTP/1.1\r\n\r\n",
        ];
        for raw in raws {
            let request = Request::parse(raw).unwrap();
            let response = router.route(&request);
            assert_eq!(response.status(), StatusCode::Ok);
            assert_cors(&response);
        }
    }

    #[test]
    fn test_unregistered_method_not_implemented() {
        let mut router = Router::new();
        router.register(Method::GET, test_handler);

        let request = Request::parse(b"PATCH /x HTTP/1.1\r\n\r\n").unwrap();
        let response = router.route(&request);

        assert_eq!(response.status(), StatusCode::NotImplemented);
        assert_cors(&response);
        let body = String::from_utf8(response.body().to_vec()).unwrap();
        assert!(body.contains("PATCH"));
    }

    #[test]
    fn test_common_headers() {
        let mut response = Response::new(StatusCode::Ok);
        add_common_headers(&mut response);

        assert_eq!(response.header("Server"), Some(SERVER_NAME));
        assert_eq!(response.header("Connection"), Some("close"));
        assert!(response.header("Date").unwrap().ends_with(" GMT"));
        assert_cors(&response);
    }
}
