use crate::canvas::SharedCanvas;
use crate::hook::{InputEvent, MouseButton};
use crate::preview::PreviewSurface;
use crate::tracker::{ClickTracker, MoveTracker, Palette, Tracker, TrackerSwitch};
use std::collections::HashMap;

/// Enable switches of the four standard trackers, for the UI checkboxes.
#[derive(Debug, Clone)]
pub struct TrackerSwitches {
    pub primary: TrackerSwitch,
    pub middle: TrackerSwitch,
    pub secondary: TrackerSwitch,
    pub movement: TrackerSwitch,
}

impl TrackerSwitches {
    pub fn labeled(&self) -> [(&'static str, &TrackerSwitch); 4] {
        [
            ("Record left click position", &self.primary),
            ("Record mid click position", &self.middle),
            ("Record right click position", &self.secondary),
            ("Record mouse movements", &self.movement),
        ]
    }
}

pub struct EventRouter {
    click_trackers: HashMap<MouseButton, ClickTracker>,
    move_tracker: MoveTracker,
}

impl EventRouter {
    pub fn new(
        click_trackers: HashMap<MouseButton, ClickTracker>,
        move_tracker: MoveTracker,
    ) -> Self {
        Self {
            click_trackers,
            move_tracker,
        }
    }

    /// One click tracker per standard button plus the move tracker, all
    /// drawing on `canvas` and mirroring to clones of `preview`.
    pub fn standard<P>(canvas: &SharedCanvas, preview: P, palette: &Palette) -> Self
    where
        P: PreviewSurface + Clone + 'static,
    {
        let click_trackers = MouseButton::ALL
            .into_iter()
            .map(|button| {
                let tracker = ClickTracker::new(
                    canvas.clone(),
                    Box::new(preview.clone()),
                    palette.for_button(button),
                    palette,
                );
                (button, tracker)
            })
            .collect();
        let move_tracker = MoveTracker::new(canvas.clone(), Box::new(preview), palette);
        Self::new(click_trackers, move_tracker)
    }

    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move { point } => self.move_tracker.track(point),
            InputEvent::ButtonDown { point, button } => {
                let Some(tracker) = self.click_trackers.get_mut(&button) else {
                    panic!("no click tracker registered for {button:?}");
                };
                tracker.track(point);
            }
            InputEvent::ButtonUp { .. } => {}
        }
    }

    /// Clears per-session state before a new recording starts.
    pub fn reset(&mut self) {
        self.move_tracker.reset();
    }

    pub fn move_tracker(&self) -> &MoveTracker {
        &self.move_tracker
    }

    pub fn click_switch(&self, button: MouseButton) -> Option<&TrackerSwitch> {
        self.click_trackers.get(&button).map(|tracker| tracker.switch())
    }

    /// Switches of the standard trackers, or `None` when a standard button
    /// has no tracker registered.
    pub fn switches(&self) -> Option<TrackerSwitches> {
        Some(TrackerSwitches {
            primary: self.click_switch(MouseButton::Primary)?.clone(),
            middle: self.click_switch(MouseButton::Middle)?.clone(),
            secondary: self.click_switch(MouseButton::Secondary)?.clone(),
            movement: self.move_tracker.switch().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Canvas, Point, Rgba};
    use crate::preview::{self, PreviewCanvas, PreviewColor, PreviewCommand};
    use crate::tracker::Toggle;

    fn router() -> (SharedCanvas, EventRouter, PreviewCanvas) {
        let canvas = Canvas::new(200, 200).into_shared();
        let (queue, preview) = preview::channel((200, 200), None);
        let router = EventRouter::standard(&canvas, queue, &Palette::standard());
        (canvas, router, preview)
    }

    #[test]
    fn button_down_goes_to_matching_tracker() {
        let (canvas, mut router, mut preview) = router();
        let point = Point::new(100, 100);

        router.dispatch(InputEvent::ButtonDown {
            point,
            button: MouseButton::Secondary,
        });

        assert_eq!(
            canvas.lock().expect("canvas").pixel(100, 100),
            Rgba::rgba(100, 0, 0, 255)
        );
        preview.drain();
        assert!(matches!(
            preview.shapes()[0],
            PreviewCommand::Oval {
                color: PreviewColor::Red,
                ..
            }
        ));
    }

    #[test]
    fn middle_button_uses_blue_preview_dot() {
        let (_canvas, mut router, mut preview) = router();
        router.dispatch(InputEvent::ButtonDown {
            point: Point::new(20, 20),
            button: MouseButton::Middle,
        });
        preview.drain();
        assert!(matches!(
            preview.shapes()[0],
            PreviewCommand::Oval {
                color: PreviewColor::Blue,
                ..
            }
        ));
    }

    #[test]
    fn button_up_is_ignored() {
        let (canvas, mut router, mut preview) = router();
        router.dispatch(InputEvent::ButtonUp {
            point: Point::new(10, 10),
            button: MouseButton::Primary,
        });
        assert!(canvas.lock().expect("canvas").is_blank());
        assert_eq!(preview.drain(), 0);
    }

    #[test]
    fn moves_always_reach_move_tracker() {
        let (_canvas, mut router, _preview) = router();
        router.dispatch(InputEvent::Move {
            point: Point::new(3, 4),
        });
        assert_eq!(router.move_tracker().last_position(), Some(Point::new(3, 4)));
        router.reset();
        assert_eq!(router.move_tracker().last_position(), None);
    }

    #[test]
    fn all_disabled_leaves_canvas_untouched() {
        let (canvas, mut router, mut preview) = router();
        let switches = router.switches().expect("standard switches");
        for (_, switch) in switches.labeled() {
            switch.disable();
        }

        let click = |x, button| InputEvent::ButtonDown {
            point: Point::new(x, 50),
            button,
        };
        let moved = |x, y| InputEvent::Move {
            point: Point::new(x, y),
        };
        for (i, event) in [
            moved(1, 1),
            moved(150, 150),
            click(50, MouseButton::Primary),
            click(60, MouseButton::Middle),
            click(70, MouseButton::Secondary),
            moved(10, 190),
        ]
        .into_iter()
        .enumerate()
        {
            router.dispatch(event);
            assert!(canvas.lock().expect("canvas").is_blank(), "event {i} drew");
        }
        assert_eq!(preview.drain(), 0);
    }

    #[test]
    #[should_panic(expected = "no click tracker registered")]
    fn unregistered_button_fails_loudly() {
        let canvas = Canvas::new(10, 10).into_shared();
        let (queue, _preview) = preview::channel((10, 10), None);
        let move_tracker = MoveTracker::new(canvas, Box::new(queue), &Palette::standard());
        let mut router = EventRouter::new(HashMap::new(), move_tracker);

        router.dispatch(InputEvent::ButtonDown {
            point: Point::new(1, 1),
            button: MouseButton::Primary,
        });
    }

    #[test]
    fn switches_missing_for_partial_router() {
        let canvas = Canvas::new(10, 10).into_shared();
        let (queue, _preview) = preview::channel((10, 10), None);
        let move_tracker = MoveTracker::new(canvas, Box::new(queue), &Palette::standard());
        let router = EventRouter::new(HashMap::new(), move_tracker);
        assert!(router.switches().is_none());
    }
}
