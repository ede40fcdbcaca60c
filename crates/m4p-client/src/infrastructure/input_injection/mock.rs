//! Recording injector for tests.
//!
//! Every call is converted back into the [`SemanticAction`] that produced it
//! and pushed onto an in-memory list, so assertions can check exactly what
//! was injected and in what order.  Set `should_fail` to exercise error paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use m4p_core::{KeyName, PointerButton, SemanticAction};

use crate::application::inject_actions::{InjectionError, Injector};

/// An injector that records actions instead of touching the OS.
#[derive(Default)]
pub struct MockInjector {
    actions: Mutex<Vec<SemanticAction>>,
    attempts: AtomicUsize,
    /// When `true`, every call returns [`InjectionError::Platform`] and
    /// nothing is recorded.
    pub should_fail: bool,
}

impl MockInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the recorded actions.
    pub fn actions(&self) -> Vec<SemanticAction> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn record(&self, action: SemanticAction) -> Result<(), InjectionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".into()));
        }
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(action);
        Ok(())
    }
}

impl Injector for MockInjector {
    fn key_toggle(&self, key: &KeyName, down: bool) -> Result<(), InjectionError> {
        self.record(SemanticAction::KeyToggle {
            key: key.clone(),
            down,
        })
    }

    fn pointer_move(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.record(SemanticAction::PointerMove { x, y })
    }

    fn button_toggle(&self, button: PointerButton, down: bool) -> Result<(), InjectionError> {
        self.record(SemanticAction::ButtonToggle { button, down })
    }

    fn scroll(&self, amount: i32) -> Result<(), InjectionError> {
        self.record(SemanticAction::Scroll { amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_in_call_order() {
        let mock = MockInjector::new();

        mock.pointer_move(1, 2).unwrap();
        mock.scroll(-1).unwrap();

        assert_eq!(
            mock.actions(),
            vec![
                SemanticAction::PointerMove { x: 1, y: 2 },
                SemanticAction::Scroll { amount: -1 },
            ]
        );
        assert_eq!(mock.attempts(), 2);
    }

    #[test]
    fn test_failing_mock_counts_attempts_but_records_nothing() {
        let mock = MockInjector::failing();

        let result = mock.button_toggle(PointerButton::Left, true);

        assert!(matches!(result, Err(InjectionError::Platform(_))));
        assert!(mock.actions().is_empty());
        assert_eq!(mock.attempts(), 1);
    }
}
