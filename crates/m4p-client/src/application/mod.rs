//! Application layer use cases for the client.
//!
//! - **`inject_actions`** – The [`Injector`](inject_actions::Injector) seam
//!   and the use case that forwards each semantic action to it.
//!
//! - **`session`** – One connection lifetime: dial, receive, map, inject.
//!   The [`Transport`](session::Transport) and
//!   [`Connection`](session::Connection) traits live here so the session can
//!   be driven by a fake in tests.
//!
//! - **`supervisor`** – Runs sessions back to back with a fixed delay until
//!   the shared cancellation token fires.

pub mod inject_actions;
pub mod session;
pub mod supervisor;
