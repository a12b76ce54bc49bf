use super::{HookBackend, InputEvent, MouseButton};
use crate::canvas::Point;
use anyhow::anyhow;
use once_cell::sync::OnceCell;
use rdev::{listen, Button, Event, EventType};
use std::sync::mpsc::Sender;
use std::sync::Mutex;
use std::thread;

/// `rdev::listen` never returns once it is running, so a single listener
/// thread lives for the whole process. Installing and uninstalling only swap
/// the sender it forwards to.
#[derive(Debug, Default)]
pub struct RdevHookBackend {
    installed: bool,
}

impl HookBackend for RdevHookBackend {
    fn install(&mut self, sender: Sender<InputEvent>) -> anyhow::Result<()> {
        if self.installed {
            return Ok(());
        }
        hook_dispatch().set_sender(Some(sender))?;
        ensure_listener();
        self.installed = true;
        Ok(())
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        // Taking the sender under the dispatch lock means no event is sent
        // once this returns.
        hook_dispatch().set_sender(None)?;
        self.installed = false;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        self.installed
    }
}

pub fn primary_display_size() -> anyhow::Result<(u32, u32)> {
    let (width, height) =
        rdev::display_size().map_err(|err| anyhow!("failed to query display size: {err:?}"))?;
    Ok((u32::try_from(width)?, u32::try_from(height)?))
}

#[derive(Default)]
struct HookDispatch {
    sender: Mutex<Option<Sender<InputEvent>>>,
    /// Last position reported by the listener; `None` until the first move.
    cursor: Mutex<Option<Point>>,
}

impl HookDispatch {
    fn set_sender(&self, sender: Option<Sender<InputEvent>>) -> anyhow::Result<()> {
        let mut guard = self
            .sender
            .lock()
            .map_err(|_| anyhow!("hook dispatch lock poisoned"))?;
        *guard = sender;
        Ok(())
    }

    fn send(&self, event: InputEvent) {
        if let Ok(guard) = self.sender.lock() {
            if let Some(sender) = guard.as_ref() {
                if sender.send(event).is_err() {
                    tracing::debug!(?event, "session receiver gone, dropping event");
                }
            }
        }
    }

    fn handle(&self, event: Event) {
        match event.event_type {
            EventType::MouseMove { x, y } => {
                let point = Point::new(x.round() as i32, y.round() as i32);
                if let Ok(mut cursor) = self.cursor.lock() {
                    *cursor = Some(point);
                }
                self.send(InputEvent::Move { point });
            }
            EventType::ButtonPress(button) => {
                if let Some((point, button)) = self.locate(button) {
                    self.send(InputEvent::ButtonDown { point, button });
                }
            }
            EventType::ButtonRelease(button) => {
                if let Some((point, button)) = self.locate(button) {
                    self.send(InputEvent::ButtonUp { point, button });
                }
            }
            _ => {}
        }
    }

    /// Pairs a standard button with the cached cursor position. A click seen
    /// before any move has no known position and is dropped.
    fn locate(&self, button: Button) -> Option<(Point, MouseButton)> {
        let button = map_button(button)?;
        let point = self.cursor.lock().ok().and_then(|cursor| *cursor);
        if point.is_none() {
            tracing::debug!(?button, "cursor position unknown, dropping click");
        }
        Some((point?, button))
    }
}

fn map_button(button: Button) -> Option<MouseButton> {
    match button {
        Button::Left => Some(MouseButton::Primary),
        Button::Right => Some(MouseButton::Secondary),
        Button::Middle => Some(MouseButton::Middle),
        Button::Unknown(code) => {
            tracing::debug!(code, "ignoring non-standard mouse button");
            None
        }
    }
}

fn hook_dispatch() -> &'static HookDispatch {
    static DISPATCH: OnceCell<HookDispatch> = OnceCell::new();
    DISPATCH.get_or_init(HookDispatch::default)
}

fn ensure_listener() {
    static LISTENER: OnceCell<()> = OnceCell::new();
    LISTENER.get_or_init(|| {
        tracing::debug!("starting global mouse listener");
        thread::spawn(|| {
            if let Err(err) = listen(|event| hook_dispatch().handle(event)) {
                tracing::error!("global mouse listener failed: {:?}", err);
            }
        });
    });
}
