//! Injector backends.
//!
//! The uinput backend is only compiled on Linux.

pub mod log;
pub mod mock;

#[cfg(target_os = "linux")]
pub mod linux;
