// Use cases layer: match lifecycle workflows.

pub mod game;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod types;

pub use game::MatchExit;
pub use registry::{MatchHandle, MatchRegistry, MatchSettings};
pub use session::MatchSession;
pub use types::{EventSink, MatchCommand, MatchEvent, MatchSnapshot};
