//! World- and schema-originating errors (`spec.md` §7): "fail-fast" by
//! policy, distinct from the contained [`crate::stop`] control-flow signal
//! and from `photon-bot`'s transport errors.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error("duplicate id {0}: CREATE for an id already present in the world")]
    DuplicateId(u64),
    #[error("unknown id {0}: STATE/DESTROY for an id absent from the world")]
    UnknownId(u64),
}
