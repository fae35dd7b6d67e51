pub mod arrangement;
pub mod phrase;
pub mod progression;
pub mod scheduler;
pub mod session;
pub mod track;

pub use arrangement::{Arrangement, ArrangementItem, Direction};
pub use phrase::{Bar, Phrase, Slot};
pub use progression::Progression;
pub use scheduler::Scheduler;
pub use session::{Session, SlotRef};
pub use track::{TimeSignature, TrackSettings};
