//! Hardware filters, their packets, and the per-engine filter pool.

pub(crate) mod factory;
pub(crate) mod hw_filter;
pub(crate) mod packet;
pub(crate) mod params;
