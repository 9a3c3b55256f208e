// Business logic services
// Transcript persistence and its time source.

pub mod clock;
pub mod transcript_store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use transcript_store::{PersistError, PersistOutcome, TranscriptStore};
