//! Linux input injection through a uinput virtual device.
//!
//! One virtual device carries everything the remote can produce: absolute
//! X/Y axes sized to the configured screen, the vertical wheel, four pointer
//! buttons and the keys listed in [`m4p_core::keymap::linux_input`].
//!
//! # Permissions
//!
//! Creating the device needs write access to `/dev/uinput`.  Either run as
//! root or add a udev rule granting the `input` group access and join it.

use std::sync::{Mutex, PoisonError};

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{
    AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
    UinputAbsSetup,
};
use m4p_core::keymap::linux_input::{all_linux_keys, key_to_linux};
use m4p_core::{KeyName, PointerButton};
use tracing::info;

use crate::application::inject_actions::{InjectionError, Injector};

const DEVICE_NAME: &str = "magic4rs virtual remote";

/// Injector backed by `/dev/uinput`.
pub struct UinputInjector {
    device: Mutex<VirtualDevice>,
    max_x: i32,
    max_y: i32,
}

impl UinputInjector {
    /// Creates the virtual device.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Io`] if `/dev/uinput` cannot be opened or
    /// the device cannot be registered, and [`InjectionError::Platform`] for
    /// a zero-sized screen.
    pub fn new(screen_width: u32, screen_height: u32) -> Result<Self, InjectionError> {
        let (max_x, max_y) = axis_max(screen_width, screen_height).ok_or_else(|| {
            InjectionError::Platform(format!("invalid screen size {screen_width}x{screen_height}"))
        })?;

        let mut keys = AttributeSet::<Key>::new();
        for code in all_linux_keys() {
            keys.insert(Key::new(code));
        }
        for button in [
            PointerButton::Left,
            PointerButton::Right,
            PointerButton::Back,
            PointerButton::Forward,
        ] {
            keys.insert(button_key(button));
        }

        let mut wheel = AttributeSet::<RelativeAxisType>::new();
        wheel.insert(RelativeAxisType::REL_WHEEL);

        let abs_x = UinputAbsSetup::new(AbsoluteAxisType::ABS_X, AbsInfo::new(0, 0, max_x, 0, 0, 0));
        let abs_y = UinputAbsSetup::new(AbsoluteAxisType::ABS_Y, AbsInfo::new(0, 0, max_y, 0, 0, 0));

        let device = VirtualDeviceBuilder::new()?
            .name(DEVICE_NAME)
            .with_keys(&keys)?
            .with_relative_axes(&wheel)?
            .with_absolute_axis(&abs_x)?
            .with_absolute_axis(&abs_y)?
            .build()?;

        info!("uinput device {DEVICE_NAME:?} ready ({screen_width}x{screen_height})");
        Ok(Self {
            device: Mutex::new(device),
            max_x,
            max_y,
        })
    }

    /// Writes a batch followed by a sync report.
    fn emit(&self, events: &[InputEvent]) -> Result<(), InjectionError> {
        let mut batch = events.to_vec();
        batch.push(InputEvent::new(EventType::SYNCHRONIZATION, 0, 0));
        let mut device = self.device.lock().unwrap_or_else(PoisonError::into_inner);
        device.emit(&batch)?;
        Ok(())
    }
}

impl Injector for UinputInjector {
    fn key_toggle(&self, key: &KeyName, down: bool) -> Result<(), InjectionError> {
        let code = key_to_linux(key).ok_or_else(|| InjectionError::UnsupportedKey(key.clone()))?;
        self.emit(&[InputEvent::new(EventType::KEY, code, i32::from(down))])
    }

    fn pointer_move(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.emit(&[
            InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_X.0, x.clamp(0, self.max_x)),
            InputEvent::new(EventType::ABSOLUTE, AbsoluteAxisType::ABS_Y.0, y.clamp(0, self.max_y)),
        ])
    }

    fn button_toggle(&self, button: PointerButton, down: bool) -> Result<(), InjectionError> {
        self.emit(&[InputEvent::new(
            EventType::KEY,
            button_key(button).code(),
            i32::from(down),
        )])
    }

    fn scroll(&self, amount: i32) -> Result<(), InjectionError> {
        if amount == 0 {
            return Ok(());
        }
        self.emit(&[InputEvent::new(
            EventType::RELATIVE,
            RelativeAxisType::REL_WHEEL.0,
            amount,
        )])
    }
}

fn button_key(button: PointerButton) -> Key {
    match button {
        PointerButton::Left => Key::BTN_LEFT,
        PointerButton::Right => Key::BTN_RIGHT,
        PointerButton::Back => Key::BTN_SIDE,
        PointerButton::Forward => Key::BTN_EXTRA,
    }
}

/// Largest valid pixel index on each axis, `None` for an empty screen.
fn axis_max(width: u32, height: u32) -> Option<(i32, i32)> {
    let max_x = i32::try_from(width).ok()?.checked_sub(1)?;
    let max_y = i32::try_from(height).ok()?.checked_sub(1)?;
    (max_x >= 0 && max_y >= 0).then_some((max_x, max_y))
}
