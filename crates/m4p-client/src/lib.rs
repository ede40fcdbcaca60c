//! m4p-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does m4p-client do?
//!
//! A companion app on the TV forwards everything the magic remote does over
//! UDP.  This client:
//!
//! 1. Opens a datagram session to the TV and subscribes to pointer telemetry.
//! 2. Receives key edges, telemetry frames, button edges and wheel deltas.
//! 3. Maps each one through [`m4p_core::ActionMapper`] into semantic actions.
//! 4. Hands the actions to an injector backend that synthesises local input.
//! 5. Reconnects after a fixed delay whenever the session ends, until the
//!    process is asked to stop.

/// Application layer: session loop, supervisor and injection use case.
pub mod application;

/// Infrastructure layer: UDP transport, injector backends, config, sleep listener.
pub mod infrastructure;
