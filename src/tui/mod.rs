pub mod draw;
pub mod events;
pub mod navigation;
pub mod run;
pub mod screen;
pub mod state;
pub mod views;

pub use draw::{draw_session, Surface};
pub use events::{Command, DetailCommand};
pub use navigation::{clamp_or_reject, move_cursor, Nav};
pub use run::run;
pub use screen::{Pos, Screen};
pub use state::Session;
