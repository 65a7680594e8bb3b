// Word search engine: grid generation, drag matching, and the per-player session

pub mod grid;
pub mod selection;
pub mod session;

pub use grid::{Generation, GridError, GridGenerator};
pub use selection::SelectionMatcher;
pub use session::{GameError, GameOutcome, GameSession, SessionEvent, SessionState};
