//! Per-frame composition of filters and hand-off to the engine backend.

pub(crate) mod backend;
pub(crate) mod compose;
