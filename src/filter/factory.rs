use std::collections::VecDeque;

use tracing::debug;

use crate::{
    filter::hw_filter::HwFilter,
    filter::packet::ParameterConstructor,
    filter::params::{EngineType, HwFilterParams},
    foundation::error::{HwFilterError, HwResult},
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterPoolStats {
    /// Idle filters per engine, in [`EngineType::POOLED`] order.
    pub idle: [usize; 3],
    /// Filters constructed because the matching pool was empty.
    pub constructed: u64,
    /// Acquires served from a pool.
    pub reused: u64,
}

/// Recycles filter instances across frames, one FIFO free-list per engine type.
///
/// Filters move out on acquire and back in on release, so an instance is either owned by the
/// caller or idle in exactly one pool. Pools grow without bound; the number of engine types
/// keeps them small in practice. Not internally synchronized.
#[derive(Debug, Default)]
pub struct HwFilterFactory {
    pool_vebox: VecDeque<HwFilter>,
    pool_sfc: VecDeque<HwFilter>,
    pool_render: VecDeque<HwFilter>,
    stats: FilterPoolStats,
}

impl HwFilterFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> FilterPoolStats {
        let mut stats = self.stats.clone();
        stats.idle = [
            self.pool_vebox.len(),
            self.pool_sfc.len(),
            self.pool_render.len(),
        ];
        stats
    }

    fn pool_mut(&mut self, engine: EngineType) -> Option<&mut VecDeque<HwFilter>> {
        match engine {
            EngineType::Vebox => Some(&mut self.pool_vebox),
            EngineType::Sfc => Some(&mut self.pool_sfc),
            EngineType::Render => Some(&mut self.pool_render),
            EngineType::Invalid => None,
        }
    }

    /// Take an idle filter for `engine`, constructing one when the pool is empty.
    ///
    /// The returned filter is [`crate::FilterState::Uninitialized`]. Idle filters are handed out
    /// in the order they were released.
    pub fn acquire(&mut self, engine: EngineType) -> HwResult<HwFilter> {
        let Some(pool) = self.pool_mut(engine) else {
            return Err(HwFilterError::validation(format!(
                "no filter variant for engine {engine:?}"
            )));
        };

        match pool.pop_front() {
            Some(filter) => {
                self.stats.reused = self.stats.reused.saturating_add(1);
                Ok(filter)
            }
            None => {
                self.stats.constructed = self.stats.constructed.saturating_add(1);
                let serial = self.stats.constructed;
                debug!(?engine, serial, "constructing filter");
                Ok(HwFilter::new(engine, serial))
            }
        }
    }

    /// Clean `filter` and return it to the pool of its own engine type.
    pub fn release(&mut self, mut filter: HwFilter) {
        filter.clean();
        let engine = filter.engine_type();
        if let Some(pool) = self.pool_mut(engine) {
            pool.push_back(filter);
        }
    }

    /// Acquire a filter for `params.engine` and initialize it for the frame.
    ///
    /// If initialization fails the filter goes back to its pool before the error propagates.
    pub fn get_hw_filter(
        &mut self,
        params: HwFilterParams,
        ctor: &mut dyn ParameterConstructor,
    ) -> HwResult<HwFilter> {
        let mut filter = self.acquire(params.engine)?;
        match filter.initialize(params, ctor) {
            Ok(()) => Ok(filter),
            Err(e) => {
                self.release(filter);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/factory.rs"]
mod tests;
