//! # Señal de Apagado
//! src/server/shutdown.rs
//!
//! Flag compartido entre el handler de Ctrl+C y el loop de accept.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Handle clonable para pedir que el servidor deje de aceptar conexiones
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pide el apagado; el loop de accept lo ve en su próxima vuelta
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Conecta Ctrl+C (SIGINT) a este handle
    ///
    /// Solo puede instalarse una vez por proceso.
    pub fn install_ctrlc(&self) -> Result<(), ctrlc::Error> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            info!("Interrupt received, stopping");
            handle.trigger();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_is_shared_between_clones() {
        let handle = ShutdownHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_triggered());

        handle.trigger();
        assert!(clone.is_triggered());
    }

    #[test]
    fn test_trigger_from_other_thread() {
        let handle = ShutdownHandle::new();
        let remote = handle.clone();

        std::thread::spawn(move || remote.trigger()).join().unwrap();
        assert!(handle.is_triggered());
    }
}
