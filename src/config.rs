//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de eco desde argumentos CLI y variables de
//! entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./echo_server --port 9000 --log-level debug
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! ECHO_PORT=9000 ECHO_HOST=127.0.0.1 ./echo_server
//! ```

use clap::Parser;

/// Configuración del servidor de eco
#[derive(Debug, Clone, Parser)]
#[command(name = "echo_server")]
#[command(about = "Servidor HTTP de eco para tests de integración")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8888", env = "ECHO_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (por defecto todas las interfaces)
    #[arg(long, default_value = "0.0.0.0", env = "ECHO_HOST")]
    pub host: String,

    /// Filtro de logs (`info`, `debug`, `echo_server=trace`...); RUST_LOG tiene prioridad
    #[arg(long = "log-level", default_value = "info", env = "ECHO_LOG")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use echo_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8888");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL que se anuncia en el banner de inicio
    ///
    /// Si escucha en todas las interfaces se anuncia `localhost`.
    pub fn url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" | "" => "localhost",
            host => host,
        };
        format!("http://{}:{}", host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.log_level.trim().is_empty() {
            return Err("Log level must not be empty".to_string());
        }
        Ok(())
    }

    /// Imprime el banner de inicio
    pub fn print_banner(&self) {
        println!("Echo server starting on {}", self.url());
        println!("Press Ctrl+C to stop");
        println!("{}", "-".repeat(50));
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8888,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8888);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_defaults_match_default_impl() {
        let parsed = Config::try_parse_from(["echo_server"]).unwrap();
        let default = Config::default();

        // Las variables ECHO_* del entorno podrían pisar los defaults
        if std::env::var_os("ECHO_PORT").is_none() {
            assert_eq!(parsed.port, default.port);
        }
        if std::env::var_os("ECHO_HOST").is_none() {
            assert_eq!(parsed.host, default.host);
        }
    }

    #[test]
    fn test_parse_cli_args() {
        let config =
            Config::try_parse_from(["echo_server", "-p", "9000", "--host", "127.0.0.1", "--log-level", "debug"])
                .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_parse_invalid_port() {
        assert!(Config::try_parse_from(["echo_server", "--port", "70000"]).is_err());
        assert!(Config::try_parse_from(["echo_server", "--port", "abc"]).is_err());
    }

    #[test]
    fn test_address_custom() {
        let mut config = Config::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3000;
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_url() {
        let mut config = Config::default();
        assert_eq!(config.url(), "http://localhost:8888");

        config.host = "192.168.1.10".to_string();
        config.port = 80;
        assert_eq!(config.url(), "http://192.168.1.10:80");
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.host = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("Host"));

        let mut config = Config::default();
        config.log_level = String::new();
        assert!(config.validate().unwrap_err().contains("Log level"));
    }

    #[test]
    fn test_print_banner() {
        // Should not panic
        Config::default().print_banner();
    }
}
