pub mod canvas;
pub mod gui;
pub mod hook;
pub mod logging;
pub mod preview;
pub mod session;
pub mod tracker;

pub use canvas::{Canvas, Point, SharedCanvas};
pub use session::{SessionController, SessionState};
