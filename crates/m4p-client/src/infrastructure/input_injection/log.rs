//! Dry-run injector that only logs.
//!
//! Useful to check calibration and key bindings on a machine where synthetic
//! input is unwanted or unavailable.  Pointer moves arrive at the telemetry
//! rate, so they are logged at `trace`; everything else at `info`.

use m4p_core::{KeyName, PointerButton};
use tracing::{info, trace};

use crate::application::inject_actions::{InjectionError, Injector};

/// Logs every action as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInjector;

impl LogInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Injector for LogInjector {
    fn key_toggle(&self, key: &KeyName, down: bool) -> Result<(), InjectionError> {
        info!(%key, down, "key toggle");
        Ok(())
    }

    fn pointer_move(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        trace!(x, y, "pointer move");
        Ok(())
    }

    fn button_toggle(&self, button: PointerButton, down: bool) -> Result<(), InjectionError> {
        info!(%button, down, "button toggle");
        Ok(())
    }

    fn scroll(&self, amount: i32) -> Result<(), InjectionError> {
        info!(amount, "scroll");
        Ok(())
    }
}
