use super::{HookBackend, InputEvent};
use anyhow::anyhow;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};

/// Scripted backend for tests: events are injected through the paired
/// [`MockHookHandle`] instead of an OS hook.
#[derive(Clone)]
pub struct MockHookBackend {
    shared: Arc<Mutex<MockHook>>,
}

#[derive(Default)]
struct MockHook {
    installs: usize,
    uninstalls: usize,
    session: Option<Sender<InputEvent>>,
}

fn lock(shared: &Mutex<MockHook>) -> anyhow::Result<MutexGuard<'_, MockHook>> {
    shared.lock().map_err(|_| anyhow!("mock hook state poisoned"))
}

impl MockHookBackend {
    pub fn new() -> (Self, MockHookHandle) {
        let shared = Arc::new(Mutex::new(MockHook::default()));
        let handle = MockHookHandle {
            shared: Arc::clone(&shared),
        };
        (Self { shared }, handle)
    }
}

impl HookBackend for MockHookBackend {
    fn install(&mut self, sender: Sender<InputEvent>) -> anyhow::Result<()> {
        let mut hook = lock(&self.shared)?;
        if hook.session.is_some() {
            return Ok(());
        }
        hook.installs += 1;
        hook.session = Some(sender);
        Ok(())
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        let mut hook = lock(&self.shared)?;
        if hook.session.take().is_some() {
            hook.uninstalls += 1;
        }
        Ok(())
    }

    fn is_installed(&self) -> bool {
        lock(&self.shared)
            .map(|hook| hook.session.is_some())
            .unwrap_or(false)
    }
}

/// Test side of [`MockHookBackend`].
pub struct MockHookHandle {
    shared: Arc<Mutex<MockHook>>,
}

impl MockHookHandle {
    pub fn install_count(&self) -> usize {
        lock(&self.shared).map(|hook| hook.installs).unwrap_or(0)
    }

    pub fn uninstall_count(&self) -> usize {
        lock(&self.shared).map(|hook| hook.uninstalls).unwrap_or(0)
    }

    pub fn is_listening(&self) -> bool {
        lock(&self.shared)
            .map(|hook| hook.session.is_some())
            .unwrap_or(false)
    }

    /// Returns `false` when no session is listening.
    pub fn emit(&self, event: InputEvent) -> bool {
        let Ok(hook) = lock(&self.shared) else {
            return false;
        };
        match &hook.session {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }

    /// Emits events in order and returns how many were accepted.
    pub fn emit_all(&self, events: impl IntoIterator<Item = InputEvent>) -> usize {
        events
            .into_iter()
            .map(|event| self.emit(event))
            .filter(|sent| *sent)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Point;
    use std::sync::mpsc;

    fn moved(x: i32) -> InputEvent {
        InputEvent::Move {
            point: Point::new(x, 0),
        }
    }

    #[test]
    fn events_flow_only_while_installed() {
        let (mut backend, handle) = MockHookBackend::new();
        assert!(!handle.emit(moved(1)));

        let (tx, rx) = mpsc::channel();
        backend.install(tx).unwrap();
        assert!(backend.is_installed());
        assert!(handle.is_listening());
        assert_eq!(handle.emit_all([moved(2), moved(3)]), 2);

        backend.uninstall().unwrap();
        assert!(!handle.emit(moved(4)));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![moved(2), moved(3)]);
    }

    #[test]
    fn repeated_install_and_uninstall_count_once() {
        let (mut backend, handle) = MockHookBackend::new();
        let (tx, _rx) = mpsc::channel();
        backend.install(tx.clone()).unwrap();
        backend.install(tx).unwrap();
        backend.uninstall().unwrap();
        backend.uninstall().unwrap();

        assert_eq!(handle.install_count(), 1);
        assert_eq!(handle.uninstall_count(), 1);
    }
}
