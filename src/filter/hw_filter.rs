use smallvec::SmallVec;
use tracing::debug;

use crate::{
    filter::packet::{Packet, PacketParameter, ParameterConstructor},
    filter::params::{
        CscParams, EngineType, ExecuteCaps, FilterParameter, HwFilterParams, PipelineParams,
        RotMirParams, ScalingParams, TransformKind,
    },
    foundation::error::{HwFilterError, HwResult},
};

/// Lifecycle of a filter instance between acquire and release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterState {
    Uninitialized,
    Configured,
    Emitted,
}

/// A pipeline stage targeting one engine.
///
/// All engine variants share this struct; they differ only in which transforms append a
/// parameter. The SFC variant appends when the frame's [`ExecuteCaps`] flag for that transform
/// is set and otherwise behaves like the VEBOX variant, which accepts every transform without
/// emitting anything. The render variant also accepts everything as a no-op.
#[derive(Debug)]
pub struct HwFilter {
    engine: EngineType,
    serial: u64,
    state: FilterState,
    caps: ExecuteCaps,
    pipeline: Option<PipelineParams>,
    pending: SmallVec<[PacketParameter; 3]>,
}

impl HwFilter {
    pub(crate) fn new(engine: EngineType, serial: u64) -> Self {
        Self {
            engine,
            serial,
            state: FilterState::Uninitialized,
            caps: ExecuteCaps::default(),
            pipeline: None,
            pending: SmallVec::new(),
        }
    }

    pub fn engine_type(&self) -> EngineType {
        self.engine
    }

    /// Construction order assigned by the factory, stable across reuse.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    pub fn caps(&self) -> ExecuteCaps {
        self.caps
    }

    /// Number of parameter objects waiting to be emitted.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop all per-frame state and return to [`FilterState::Uninitialized`].
    pub fn clean(&mut self) {
        self.state = FilterState::Uninitialized;
        self.caps = ExecuteCaps::default();
        self.pipeline = None;
        self.pending.clear();
    }

    /// Bind the filter to a frame and apply `params.params` in order.
    ///
    /// On failure the filter is cleaned and the error returned.
    pub fn initialize(
        &mut self,
        params: HwFilterParams,
        ctor: &mut dyn ParameterConstructor,
    ) -> HwResult<()> {
        if self.state != FilterState::Uninitialized {
            return Err(HwFilterError::validation(format!(
                "{:?} filter initialized twice (state {:?})",
                self.engine, self.state
            )));
        }
        if params.engine != self.engine {
            return Err(HwFilterError::validation(format!(
                "{:?} filter cannot be initialized for {:?}",
                self.engine, params.engine
            )));
        }

        self.caps = params.caps;
        self.pipeline = Some(params.pipeline);
        self.state = FilterState::Configured;

        for p in &params.params {
            self.configure(p, ctor)?;
        }
        Ok(())
    }

    pub fn configure(
        &mut self,
        param: &FilterParameter,
        ctor: &mut dyn ParameterConstructor,
    ) -> HwResult<()> {
        match param {
            FilterParameter::Csc(p) => self.configure_csc(p, ctor),
            FilterParameter::RotMir(p) => self.configure_rot_mir(p, ctor),
            FilterParameter::Scaling(p) => self.configure_scaling(p, ctor),
        }
    }

    pub fn configure_csc(
        &mut self,
        params: &CscParams,
        ctor: &mut dyn ParameterConstructor,
    ) -> HwResult<()> {
        self.configure_with(TransformKind::Csc, ctor, |c| {
            c.create_csc(params).map(PacketParameter::SfcCsc)
        })
    }

    pub fn configure_rot_mir(
        &mut self,
        params: &RotMirParams,
        ctor: &mut dyn ParameterConstructor,
    ) -> HwResult<()> {
        self.configure_with(TransformKind::RotMir, ctor, |c| {
            c.create_rot_mir(params).map(PacketParameter::SfcRotMir)
        })
    }

    pub fn configure_scaling(
        &mut self,
        params: &ScalingParams,
        ctor: &mut dyn ParameterConstructor,
    ) -> HwResult<()> {
        self.configure_with(TransformKind::Scaling, ctor, |c| {
            c.create_scaling(params).map(PacketParameter::SfcScaling)
        })
    }

    fn configure_with(
        &mut self,
        kind: TransformKind,
        ctor: &mut dyn ParameterConstructor,
        create: impl FnOnce(&mut dyn ParameterConstructor) -> Option<PacketParameter>,
    ) -> HwResult<()> {
        if self.state != FilterState::Configured {
            return Err(HwFilterError::validation(format!(
                "cannot configure {kind:?} on {:?} filter in state {:?}",
                self.engine, self.state
            )));
        }

        if !self.is_active(kind) {
            return Ok(());
        }

        match create(ctor) {
            Some(p) => {
                self.pending.push(p);
                Ok(())
            }
            None => {
                self.clean();
                Err(HwFilterError::parameter_allocation(format!(
                    "{kind:?} parameter for {:?} engine",
                    self.engine
                )))
            }
        }
    }

    fn is_active(&self, kind: TransformKind) -> bool {
        match self.engine {
            EngineType::Sfc => self.caps.sfc_enabled(kind),
            EngineType::Vebox | EngineType::Render | EngineType::Invalid => false,
        }
    }

    /// Finalize the pending parameters into a [`Packet`] owned by the caller.
    pub fn emit(&mut self) -> HwResult<Packet> {
        let pipeline = match (self.state, self.pipeline) {
            (FilterState::Configured, Some(pipeline)) => pipeline,
            _ => {
                return Err(HwFilterError::validation(format!(
                    "cannot emit {:?} filter in state {:?}",
                    self.engine, self.state
                )));
            }
        };

        let params = std::mem::take(&mut self.pending);
        self.state = FilterState::Emitted;
        debug!(
            engine = ?self.engine,
            serial = self.serial,
            params = params.len(),
            "packet emitted"
        );
        Ok(Packet::new(self.engine, pipeline, params))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/hw_filter.rs"]
mod tests;
