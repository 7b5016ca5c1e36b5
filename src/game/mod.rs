//! Game module - exploration sessions and tick scheduling

mod session;
mod time;

pub use session::{MapCommand, Session, SessionConfig};
pub use time::TickClock;
