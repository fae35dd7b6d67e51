use thiserror::Error;

use crate::ids::{ItemId, PhraseId};

#[derive(Error, Debug)]
pub enum EngineError {
    // the source could not be read at all (missing file, unknown key, ...)
    #[error("failed to load {location} ({reason})")]
    Fetch { location: String, reason: String },

    #[error("failed to decode {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: hound::Error,
    },

    #[error("audio output unavailable: {0}")]
    Output(String),

    #[error("no samples loaded")]
    NotLoaded,
}

/// Rejected edits. These are raised before any state is touched, so the
/// caller can show them and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} name cannot be empty")]
    EmptyName(&'static str),

    #[error("no phrase with id {0}")]
    UnknownPhrase(PhraseId),

    #[error("no arrangement item with id {0}")]
    UnknownItem(ItemId),

    #[error("bar {bar}, slot {slot} is out of range")]
    SlotOutOfRange { bar: usize, slot: usize },

    #[error("bar {0} is out of range")]
    BarOutOfRange(usize),

    #[error("no phrase selected")]
    NoPhraseSelected,
}
