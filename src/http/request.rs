//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! Parser HTTP/1.0 / HTTP/1.1 para el servidor de eco. Solo soporta un
//! request por conexión y bodies delimitados por `Content-Length`.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /echo?a=1&a=2 HTTP/1.1\r\n
//! Host: localhost:8888\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 9\r\n
//! \r\n
//! {"k":"v"}
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.x`
//! 2. **Headers**: Pares `Name: Value` (uno por línea, en orden de llegada)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: Exactamente `Content-Length` bytes; sin ese header no hay body

use super::StatusCode;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Tamaño máximo de la cabecera (request line + headers) que aceptamos
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Métodos HTTP reconocidos por el parser
///
/// Reconocer un método no implica que tenga handler: el router decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    OPTIONS,
    PATCH,
    TRACE,
    CONNECT,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::TRACE => "TRACE",
            Method::CONNECT => "CONNECT",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    /// Los métodos son case-sensitive: `get` no es `GET`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            "PATCH" => Ok(Method::PATCH),
            "TRACE" => Ok(Method::TRACE),
            "CONNECT" => Ok(Method::CONNECT),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Request vacío
    #[error("Empty request")]
    EmptyRequest,

    /// Formato inválido de la request line
    #[error("Invalid request line format")]
    InvalidRequestLine,

    /// Método HTTP no soportado
    #[error("Unsupported method ('{0}')")]
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta (debe ser HTTP/1.0 o HTTP/1.1)
    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    /// Header malformado
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Content-Length que no es un entero no negativo
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// El peer cerró antes de enviar todo el body anunciado
    #[error("Incomplete body: expected {expected} bytes, received {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// No apareció la línea vacía dentro de `MAX_HEAD_BYTES`
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(usize),
}

impl ParseError {
    /// Código de estado con el que se responde a este error
    pub fn status(&self) -> StatusCode {
        match self {
            ParseError::UnsupportedMethod(_) => StatusCode::NotImplemented,
            ParseError::InvalidHttpVersion(_) => StatusCode::HttpVersionNotSupported,
            ParseError::HeadTooLarge(_) => StatusCode::RequestHeaderFieldsTooLarge,
            _ => StatusCode::BadRequest,
        }
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Target tal cual llegó en la request line (ej: "/echo?a=1")
    target: String,

    /// Path decodificado (ej: "/hello world")
    path: String,

    /// Query parameters en orden de aparición; una key puede repetirse
    query_params: IndexMap<String, Vec<String>>,

    /// Headers en orden de llegada, con el nombre tal como lo envió el cliente
    headers: Vec<(String, String)>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    /// Body crudo; `None` si no hubo header `Content-Length`
    body: Option<Vec<u8>>,

    /// Momento en que se parseó el request
    received_at: DateTime<Local>,

    /// Dirección del cliente, la completa el servidor
    peer_addr: Option<SocketAddr>,
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// El buffer debe contener la cabecera completa y, si hay
    /// `Content-Length`, al menos esa cantidad de bytes de body.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use echo_server::http::Request;
    ///
    /// let raw = b"GET /search?q=rust&q=http HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/search");
    /// assert_eq!(request.query_values("q"), Some(&["rust".to_string(), "http".to_string()][..]));
    /// assert!(request.body().is_none());
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let (head, rest) = match find_head_end(buffer) {
            Some((head_len, body_start)) => (&buffer[..head_len], &buffer[body_start..]),
            None if buffer.len() >= MAX_HEAD_BYTES => {
                return Err(ParseError::HeadTooLarge(MAX_HEAD_BYTES));
            }
            None => (buffer, &buffer[buffer.len()..]),
        };

        let head = decode_latin1(head);
        if head.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        let mut lines = head.split('\n').map(|line| line.trim_end_matches('\r'));
        let request_line = lines.next().ok_or(ParseError::EmptyRequest)?;

        // 1. Request line
        let (method, target, version) = Self::parse_request_line(request_line)?;
        let (path, query_params) = Self::parse_target(&target);

        // 2. Headers
        let headers = Self::parse_headers(lines)?;

        // 3. Body
        let body = Self::parse_body(&headers, rest)?;

        Ok(Request {
            method,
            target,
            path,
            query_params,
            headers,
            version,
            body,
            received_at: Local::now(),
            peer_addr: None,
        })
    }

    /// Parsea la request line
    ///
    /// Formato: `GET /path?query HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD TARGET VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        let method = parts[0].parse::<Method>()?;

        Ok((method, parts[1].to_string(), version))
    }

    /// Separa el target en path decodificado y query parameters
    ///
    /// Acepta también la forma absoluta (`http://host/path?x=1`) y descarta
    /// el fragmento. La query se separa antes de buscar el esquema: un
    /// `://` dentro de la query es parte de un valor.
    fn parse_target(target: &str) -> (String, IndexMap<String, Vec<String>>) {
        let target = target.split('#').next().unwrap_or_default();

        let (raw_path, query) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };
        let raw_path = strip_authority(raw_path);

        let path = percent_decode_str(raw_path).decode_utf8_lossy().into_owned();
        (path, parse_query_string(query))
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato `Name: Value`. Una línea que empieza con
    /// espacio o tab continúa el valor del header anterior.
    fn parse_headers<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<Vec<(String, String)>, ParseError> {
        let mut headers: Vec<(String, String)> = Vec::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            if line.starts_with([' ', '\t']) {
                match headers.last_mut() {
                    Some((_, value)) => {
                        value.push(' ');
                        value.push_str(line.trim());
                        continue;
                    }
                    None => return Err(ParseError::InvalidHeader(line.to_string())),
                }
            }

            match line.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    headers.push((name.trim().to_string(), value.trim().to_string()));
                }
                _ => return Err(ParseError::InvalidHeader(line.to_string())),
            }
        }

        Ok(headers)
    }

    /// Extrae exactamente `Content-Length` bytes del resto del buffer
    fn parse_body(headers: &[(String, String)], rest: &[u8]) -> Result<Option<Vec<u8>>, ParseError> {
        let Some(raw) = find_header(headers, "Content-Length") else {
            return Ok(None);
        };

        let expected: usize = raw
            .parse()
            .map_err(|_| ParseError::InvalidContentLength(raw.to_string()))?;

        if rest.len() < expected {
            return Err(ParseError::IncompleteBody {
                expected,
                received: rest.len(),
            });
        }

        Ok(Some(rest[..expected].to_vec()))
    }

    /// Lee el `Content-Length` de una cabecera todavía sin parsear
    ///
    /// Lo usa el lector de conexiones para saber cuántos bytes de body
    /// esperar. Un valor inválido retorna `None`; el error real lo reporta
    /// `parse`.
    pub fn content_length_hint(head: &[u8]) -> Option<usize> {
        String::from_utf8_lossy(head)
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(':'))
            .filter(|(name, _)| name.trim().eq_ignore_ascii_case("Content-Length"))
            .last()
            .and_then(|(_, value)| value.trim().parse().ok())
    }

    /// Asigna la dirección del cliente
    pub fn with_peer_addr(mut self, addr: SocketAddr) -> Self {
        self.peer_addr = Some(addr);
        self
    }

    /// Reemplaza el instante de recepción
    pub fn with_received_at(mut self, at: DateTime<Local>) -> Self {
        self.received_at = at;
        self
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Target sin procesar, tal como vino en la request line
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Obtiene el path decodificado del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene todos los query parameters
    pub fn query_params(&self) -> &IndexMap<String, Vec<String>> {
        &self.query_params
    }

    /// Primer valor de un query parameter
    ///
    /// # Ejemplo
    /// ```
    /// use echo_server::http::Request;
    ///
    /// let raw = b"GET /test?num=42&num=7 HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.query_param("num"), Some("42"));
    /// assert_eq!(request.query_param("missing"), None);
    /// ```
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_values(name)
            .and_then(|values| values.first())
            .map(|s| s.as_str())
    }

    /// Todos los valores de un query parameter, en orden
    pub fn query_values(&self, name: &str) -> Option<&[String]> {
        self.query_params.get(name).map(|v| v.as_slice())
    }

    /// Obtiene todos los headers en orden de llegada
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene un header (case-insensitive; si se repite, gana el último)
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene el body del request, si se envió `Content-Length`
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Instante en que se recibió el request
    pub fn received_at(&self) -> DateTime<Local> {
        self.received_at
    }

    /// Dirección del cliente
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    /// Request line reconstruida, para el access log
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.target, self.version)
    }
}

/// Busca el fin de la cabecera
///
/// Retorna `(largo_cabecera, inicio_body)`. Acepta `\r\n\r\n` y también
/// `\n\n` de clientes que no mandan `\r`.
pub fn find_head_end(buffer: &[u8]) -> Option<(usize, usize)> {
    (0..buffer.len()).find_map(|i| {
        let tail = &buffer[i..];
        if tail.starts_with(b"\r\n\r\n") {
            Some((i, i + 4))
        } else if tail.starts_with(b"\n\n") {
            Some((i, i + 2))
        } else {
            None
        }
    })
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Quita `scheme://authority` de un path en forma absoluta
///
/// Solo aplica si el path no empieza con `/` y lo anterior a `://` es un
/// esquema válido (letra seguida de letras, dígitos, `+`, `-` o `.`).
fn strip_authority(raw_path: &str) -> &str {
    if raw_path.starts_with('/') {
        return raw_path;
    }
    let Some((scheme, after_scheme)) = raw_path.split_once("://") else {
        return raw_path;
    };
    if !is_scheme(scheme) {
        return raw_path;
    }
    match after_scheme.find('/') {
        Some(pos) => &after_scheme[pos..],
        None => "/",
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Decodifica la cabecera como ISO-8859-1: cada byte es un carácter
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parsea una query string como un formulario
///
/// Ejemplo: `"a=1&a=2&b=hello+world"`
/// Retorna: `{"a": ["1", "2"], "b": ["hello world"]}`
///
/// Los pares sin valor (`debug` o `debug=`) se descartan.
pub fn parse_query_string(query: &str) -> IndexMap<String, Vec<String>> {
    let mut params: IndexMap<String, Vec<String>> = IndexMap::new();

    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        params
            .entry(form_decode(key))
            .or_default()
            .push(form_decode(value));
    }

    params
}

/// Decodifica un componente de formulario (`+` es espacio, luego `%XX`)
fn form_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
