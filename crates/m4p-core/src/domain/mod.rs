//! Domain layer: semantic actions, calibration and the event-to-action mapper.
//!
//! Nothing in here performs I/O.  Given the same event and the same
//! calibration, the mapper always returns the same ordered actions, which is
//! what lets the client crate test its session loop against a recorder.

pub mod action;
pub mod calibration;
pub mod mapper;

pub use action::{KeyName, PointerButton, SemanticAction};
pub use calibration::{CalibrationError, CalibrationProfile};
pub use mapper::{ActionMapper, Translation, SCROLL_NOTCH};
