//! Boundary to the OS-level mouse listener.
//!
//! A [`HookBackend`] pushes [`InputEvent`]s into the channel handed to
//! [`HookBackend::install`] until [`HookBackend::uninstall`] returns. Only the
//! three standard buttons cross this boundary; other buttons, the wheel and
//! the keyboard are dropped by the backend.

mod mock;
#[cfg(any(not(target_os = "linux"), feature = "x11-hook"))]
mod rdev_backend;

use crate::canvas::Point;
use std::sync::mpsc::Sender;

pub use mock::{MockHookBackend, MockHookHandle};
#[cfg(any(not(target_os = "linux"), feature = "x11-hook"))]
pub use rdev_backend::{primary_display_size, RdevHookBackend as DefaultHookBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [
        MouseButton::Primary,
        MouseButton::Middle,
        MouseButton::Secondary,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Move { point: Point },
    ButtonDown { point: Point, button: MouseButton },
    ButtonUp { point: Point, button: MouseButton },
}

pub trait HookBackend: Send {
    fn install(&mut self, sender: Sender<InputEvent>) -> anyhow::Result<()>;
    fn uninstall(&mut self) -> anyhow::Result<()>;
    fn is_installed(&self) -> bool;
}

#[cfg(all(target_os = "linux", not(feature = "x11-hook")))]
#[derive(Debug, Default)]
pub struct DefaultHookBackend;

#[cfg(all(target_os = "linux", not(feature = "x11-hook")))]
impl HookBackend for DefaultHookBackend {
    fn install(&mut self, _sender: Sender<InputEvent>) -> anyhow::Result<()> {
        Err(anyhow::anyhow!(
            "global mouse hooks need the `x11-hook` feature on this platform"
        ))
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn is_installed(&self) -> bool {
        false
    }
}

#[cfg(all(target_os = "linux", not(feature = "x11-hook")))]
pub fn primary_display_size() -> anyhow::Result<(u32, u32)> {
    Err(anyhow::anyhow!(
        "display size query needs the `x11-hook` feature on this platform"
    ))
}
