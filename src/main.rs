//! # Echo Server - Entry Point
//! src/main.rs
//!
//! Parsea la configuración, inicializa logs, abre el socket y atiende
//! requests hasta Ctrl+C.

use echo_server::config::Config;
use echo_server::error::ServerError;
use echo_server::logging;
use echo_server::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = run(config) {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), ServerError> {
    config.validate().map_err(ServerError::Config)?;
    logging::init(&config.log_level)?;

    let server = Server::bind(config)?;
    server.shutdown_handle().install_ctrlc()?;

    server.config().print_banner();

    server.run()?;

    println!("\nServer stopped");
    Ok(())
}
