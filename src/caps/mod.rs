//! Fixed-function path probing and SFC input derivation.

pub(crate) mod input;
pub(crate) mod limits;
pub(crate) mod prober;
