pub mod clock;
pub mod error;
pub mod input;
pub mod renderer;
pub mod script;
pub mod session;

pub use error::HostError;
pub use session::{MatchSummary, SessionOptions, run_match};
