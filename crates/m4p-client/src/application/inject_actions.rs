//! InjectActionsUseCase: forwards semantic actions to the local input backend.
//!
//! The use case sits at the application layer and delegates to an
//! [`Injector`] trait object for OS-level event synthesis.  Backends live in
//! the infrastructure layer.

use std::sync::Arc;

use m4p_core::{KeyName, PointerButton, SemanticAction};
use thiserror::Error;

/// Error type for input injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("platform error: {0}")]
    Platform(String),
    /// The backend has no equivalent for this key.
    #[error("unsupported key: {0}")]
    UnsupportedKey(KeyName),
    #[error("virtual device I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Local input synthesis.
///
/// Implementations must be callable from any task; the session loop holds no
/// lock across a call.
pub trait Injector: Send + Sync {
    /// Presses (`down = true`) or releases a key.
    fn key_toggle(&self, key: &KeyName, down: bool) -> Result<(), InjectionError>;

    /// Moves the pointer to absolute pixel coordinates.
    fn pointer_move(&self, x: i32, y: i32) -> Result<(), InjectionError>;

    /// Presses or releases a pointer button.
    fn button_toggle(&self, button: PointerButton, down: bool) -> Result<(), InjectionError>;

    /// Scrolls vertically by whole notches.
    fn scroll(&self, amount: i32) -> Result<(), InjectionError>;
}

/// The Inject Actions use case.
#[derive(Clone)]
pub struct InjectActionsUseCase {
    injector: Arc<dyn Injector>,
}

impl InjectActionsUseCase {
    pub fn new(injector: Arc<dyn Injector>) -> Self {
        Self { injector }
    }

    /// Sends one action to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the backend rejects the action.
    pub fn handle(&self, action: &SemanticAction) -> Result<(), InjectionError> {
        match action {
            SemanticAction::KeyToggle { key, down } => self.injector.key_toggle(key, *down),
            SemanticAction::PointerMove { x, y } => self.injector.pointer_move(*x, *y),
            SemanticAction::ButtonToggle { button, down } => {
                self.injector.button_toggle(*button, *down)
            }
            SemanticAction::Scroll { amount } => self.injector.scroll(*amount),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::{mock, predicate::eq, Sequence};

    mock! {
        pub Backend {}

        impl Injector for Backend {
            fn key_toggle(&self, key: &KeyName, down: bool) -> Result<(), InjectionError>;
            fn pointer_move(&self, x: i32, y: i32) -> Result<(), InjectionError>;
            fn button_toggle(&self, button: PointerButton, down: bool) -> Result<(), InjectionError>;
            fn scroll(&self, amount: i32) -> Result<(), InjectionError>;
        }
    }

    fn use_case(backend: MockBackend) -> InjectActionsUseCase {
        InjectActionsUseCase::new(Arc::new(backend))
    }

    #[test]
    fn test_handle_key_toggle_calls_key_toggle_once() {
        // Arrange
        let mut backend = MockBackend::new();
        backend
            .expect_key_toggle()
            .withf(|key, down| *key == KeyName::Named("audio_play") && *down)
            .times(1)
            .returning(|_, _| Ok(()));

        // Act
        let result = use_case(backend).handle(&SemanticAction::KeyToggle {
            key: KeyName::Named("audio_play"),
            down: true,
        });

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_handle_pointer_move_forwards_coordinates() {
        let mut backend = MockBackend::new();
        backend
            .expect_pointer_move()
            .with(eq(200), eq(100))
            .times(1)
            .returning(|_, _| Ok(()));

        use_case(backend)
            .handle(&SemanticAction::PointerMove { x: 200, y: 100 })
            .unwrap();
    }

    #[test]
    fn test_handle_button_and_scroll_in_order() {
        // Arrange
        let mut seq = Sequence::new();
        let mut backend = MockBackend::new();
        backend
            .expect_button_toggle()
            .with(eq(PointerButton::Right), eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        backend
            .expect_scroll()
            .with(eq(-2))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        let uc = use_case(backend);

        // Act
        uc.handle(&SemanticAction::ButtonToggle { button: PointerButton::Right, down: false })
            .unwrap();
        uc.handle(&SemanticAction::Scroll { amount: -2 }).unwrap();
    }

    #[test]
    fn test_handle_propagates_backend_error() {
        // Arrange
        let mut backend = MockBackend::new();
        backend
            .expect_key_toggle()
            .returning(|key, _| Err(InjectionError::UnsupportedKey(key.clone())));

        // Act
        let err = use_case(backend)
            .handle(&SemanticAction::KeyToggle { key: KeyName::Code(500), down: true })
            .unwrap_err();

        // Assert
        assert!(matches!(err, InjectionError::UnsupportedKey(KeyName::Code(500))));
        assert_eq!(err.to_string(), "unsupported key: 500");
    }
}
