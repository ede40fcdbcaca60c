//! Infrastructure layer for the client application.
//!
//! **Dependency rule**: this layer may depend on `application` and `m4p_core`,
//! but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`input_injection`** – Implementations of `Injector`: a logging dry run,
//!   a Linux uinput device, and a recording mock for tests.
//!
//! - **`network`** – The UDP datagram transport spoken by the TV app.
//!
//! - **`sleep_listener`** – Optional UDP listener that suspends the machine
//!   on request.
//!
//! - **`storage`** – TOML configuration file.

pub mod input_injection;
pub mod network;
pub mod sleep_listener;
pub mod storage;
