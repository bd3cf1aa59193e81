//! hwfilter composes per-frame hardware filter pipelines for fixed-function video
//! post-processing on integrated GPUs.
//!
//! # Pipeline overview
//!
//! 1. **Probe**: `SurfaceDesc + TransformRequest -> ProbeOutcome` (can decoder output go straight
//!    through the scaler/format converter?)
//! 2. **Plan**: `FrameJob -> Vec<HwFilterParams>` (which engine runs which transform, in order)
//! 3. **Configure**: filters are taken from a per-engine pool and fed their parameters
//! 4. **Emit**: each filter produces a `Packet` that is handed to an [`EngineBackend`]
//!
//! Register-level command encoding, surface allocation and bitstream parsing live behind the
//! [`EngineBackend`], [`EngineCapability`] and [`ParameterConstructor`] seams.
//!
//! Processing is single-threaded and frame-sequential; nothing here is internally synchronized.
#![forbid(unsafe_code)]

mod caps;
mod filter;
mod foundation;
mod pipeline;

pub use caps::input::{
    AvsFilterMode, ChromaSubsampling, InputOrdering, SfcInputConfig, SfcStateMode,
    derive_engine_input_params, sfc_input_layout,
};
pub use caps::limits::SfcLimits;
pub use caps::prober::{
    EngineCapability, ProbeOutcome, ProcessingParams, SfcJpegState, SfcPipeMode,
};
pub use filter::factory::{FilterPoolStats, HwFilterFactory};
pub use filter::hw_filter::{FilterState, HwFilter};
pub use filter::packet::{
    DefaultParameterConstructor, MirrorMode, Packet, PacketParameter, ParameterConstructor,
    SfcCscParameter, SfcRotMirParameter, SfcScalingParameter,
};
pub use filter::params::{
    CscParams, EngineType, ExecuteCaps, FilterParameter, HwFilterParams, PipelineParams,
    RotMirParams, ScalingParams, TransformKind,
};
pub use foundation::config::PlatformConfig;
pub use foundation::core::{
    ChromaLayout, PlaneOffset, Rect, Rotation, SurfaceDesc, SurfaceFormat, TileType,
    TransformRequest,
};
pub use foundation::error::{HwFilterError, HwResult};
pub use foundation::math::align_ceil;
pub use pipeline::backend::{EngineBackend, PacketLog};
pub use pipeline::compose::{FrameJob, FrameStats, HwFilterPipe};
