pub mod message;
pub mod types;

pub use message::{Channel, ChannelEvent};
pub use types::{AlertPayload, MatchResult, TrackRecord};
