//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Loop de accept de un solo thread. El listener es no bloqueante para
//! poder revisar el `ShutdownHandle` entre conexiones; cada conexión
//! aceptada vuelve a modo bloqueante y se atiende completa.
//!
//! No hay plazo total para leer un request: un cliente que no envía nada
//! ocupa al servidor. Las lecturas usan un timeout corto solo para revisar
//! el `ShutdownHandle`; con el apagado pedido la conexión se abandona.

use super::ShutdownHandle;
use crate::config::Config;
use crate::echo;
use crate::error::ServerError;
use crate::http::request::{find_head_end, MAX_HEAD_BYTES};
use crate::http::{Request, Response};
use crate::logging::access_line;
use crate::router::{add_common_headers, Router};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Espera entre intentos de accept cuando no hay conexiones pendientes
pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Cada cuánto una lectura bloqueada revisa el pedido de apagado
const READ_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tiempo máximo para descartar bytes no leídos antes de cerrar
const DRAIN_TIMEOUT: Duration = Duration::from_millis(100);

const READ_CHUNK: usize = 8192;

/// Servidor HTTP de eco
pub struct Server {
    config: Config,
    router: Router,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Abre el socket de escucha
    ///
    /// Un error aquí es fatal. Con `port = 0` el sistema elige un puerto
    /// libre y `config().port` queda con el puerto real.
    pub fn bind(mut config: Config) -> Result<Self, ServerError> {
        let address = config.address();

        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            addr: address.clone(),
            source,
        })?;
        listener.set_nonblocking(true)?;

        let local_addr = listener.local_addr()?;
        config.port = local_addr.port();
        info!("Listening on {}", local_addr);

        Ok(Self {
            config,
            router: echo::router(),
            listener,
            shutdown: ShutdownHandle::new(),
        })
    }

    /// Dirección real del socket de escucha
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Configuración efectiva (con el puerto real)
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle para detener `run` desde otro thread o desde Ctrl+C
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Atiende conexiones una por una hasta que se dispare el apagado
    ///
    /// Los errores de una conexión se registran y no detienen el loop.
    pub fn run(self) -> Result<(), ServerError> {
        while !self.shutdown.is_triggered() {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    debug!("Connection from {}", peer);
                    if let Err(e) = Self::handle_connection(stream, peer, &self.router, &self.shutdown) {
                        warn!("Connection error with {}: {}", peer, e);
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        info!("Listener on {} closed", self.config.address());
        Ok(())
    }

    /// Atiende un request completo: lee, responde, registra y cierra
    fn handle_connection(
        mut stream: TcpStream,
        peer: SocketAddr,
        router: &Router,
        shutdown: &ShutdownHandle,
    ) -> io::Result<()> {
        // En algunas plataformas el stream hereda el modo no bloqueante
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(READ_POLL_INTERVAL))?;

        let raw = read_request_bytes(&mut stream, shutdown)?;
        if raw.is_empty() {
            debug!("Connection from {} closed without data", peer);
            return Ok(());
        }

        let (response, request_line) = match Request::parse(&raw) {
            Ok(request) => {
                let request = request.with_peer_addr(peer);
                (router.route(&request), request.request_line())
            }
            Err(e) => {
                warn!("Invalid request from {}: {}", peer, e);
                let mut response = Response::error(e.status(), &e.to_string());
                add_common_headers(&mut response);
                (response, first_line(&raw))
            }
        };

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let line = access_line(&request_line, response.status());
        if response.status().is_success() {
            info!("{}", line);
        } else {
            warn!("{}", line);
        }

        drain_and_close(stream);
        Ok(())
    }
}

/// Lee la cabecera completa y, si hay `Content-Length`, el body anunciado
///
/// Se detiene si el peer cierra antes; `Request::parse` reporta lo que
/// falte. Sin `Content-Length` no se lee nada después de la cabecera.
fn read_request_bytes(stream: &mut impl Read, shutdown: &ShutdownHandle) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    // 1. Cabecera
    let body_start = loop {
        if let Some((_, body_start)) = find_head_end(&buffer) {
            break body_start;
        }
        if buffer.len() >= MAX_HEAD_BYTES {
            return Ok(buffer);
        }
        match read_some(stream, &mut chunk, shutdown)? {
            0 => return Ok(buffer),
            n => buffer.extend_from_slice(&chunk[..n]),
        }
    };

    // 2. Body
    let Some(content_length) = Request::content_length_hint(&buffer[..body_start]) else {
        return Ok(buffer);
    };
    let wanted = body_start.saturating_add(content_length);

    while buffer.len() < wanted {
        match read_some(stream, &mut chunk, shutdown)? {
            0 => break,
            n => buffer.extend_from_slice(&chunk[..n]),
        }
    }

    Ok(buffer)
}

/// Lee lo que haya, reintentando los timeouts hasta que se pida el apagado
fn read_some(stream: &mut impl Read, chunk: &mut [u8], shutdown: &ShutdownHandle) -> io::Result<usize> {
    loop {
        match stream.read(chunk) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                if shutdown.is_triggered() {
                    return Err(io::Error::new(
                        ErrorKind::ConnectionAborted,
                        "server shutting down, request abandoned",
                    ));
                }
            }
            result => return result,
        }
    }
}

/// Primera línea del request crudo, para el access log de errores
fn first_line(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == b'\n').unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).trim_end().to_string()
}

/// Cierra la escritura y descarta lo que el cliente haya enviado de más
///
/// Cerrar con bytes sin leer provoca un RST que puede pisar la respuesta
/// en el cliente.
fn drain_and_close(mut stream: TcpStream) {
    if stream.shutdown(Shutdown::Write).is_err() {
        return;
    }
    if stream.set_read_timeout(Some(DRAIN_TIMEOUT)).is_err() {
        return;
    }
    let mut sink = [0u8; 1024];
    while let Ok(n) = stream.read(&mut sink) {
        if n == 0 {
            break;
        }
    }
}
