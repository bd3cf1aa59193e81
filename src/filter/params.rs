use smallvec::SmallVec;

use crate::{
    caps::input::SfcInputConfig,
    foundation::core::{ChromaLayout, Rect, Rotation, SurfaceDesc, SurfaceFormat},
};

/// Hardware path a filter instance targets. Fixed for the lifetime of the instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineType {
    /// No engine; never handed out by the factory.
    Invalid,
    /// Video enhancement unit alone.
    Vebox,
    /// Video enhancement unit feeding the fixed-function scaler/format converter.
    Sfc,
    /// Programmable shader engine.
    Render,
}

impl EngineType {
    /// Engines the factory can hand out.
    pub const POOLED: [EngineType; 3] = [Self::Vebox, Self::Sfc, Self::Render];
}

/// Transform a filter can be configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Csc,
    RotMir,
    Scaling,
}

/// Which transforms run on the fixed-function unit for this frame.
///
/// Computed once per frame and passed by value; never mutated afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExecuteCaps {
    pub sfc_csc: bool,
    pub sfc_rot_mir: bool,
    pub sfc_scaling: bool,
}

impl ExecuteCaps {
    pub fn sfc_enabled(self, kind: TransformKind) -> bool {
        match kind {
            TransformKind::Csc => self.sfc_csc,
            TransformKind::RotMir => self.sfc_rot_mir,
            TransformKind::Scaling => self.sfc_scaling,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CscParams {
    pub input_format: SurfaceFormat,
    pub output_format: SurfaceFormat,
    pub input_chroma: ChromaLayout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RotMirParams {
    pub rotation: Rotation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScalingParams {
    pub input_region: Rect,
    pub output_region: Rect,
}

/// One transform's parameters, as handed to [`crate::HwFilter::configure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterParameter {
    Csc(CscParams),
    RotMir(RotMirParams),
    Scaling(ScalingParams),
}

impl FilterParameter {
    pub fn kind(&self) -> TransformKind {
        match self {
            Self::Csc(_) => TransformKind::Csc,
            Self::RotMir(_) => TransformKind::RotMir,
            Self::Scaling(_) => TransformKind::Scaling,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Frame-level surfaces and engine state shared by every filter in a frame.
pub struct PipelineParams {
    pub source: SurfaceDesc,
    pub target: SurfaceDesc,
    /// SFC input programming when the decoder feeds the SFC directly.
    pub sfc_input: Option<SfcInputConfig>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Everything needed to initialize one filter for one frame.
pub struct HwFilterParams {
    pub engine: EngineType,
    pub caps: ExecuteCaps,
    pub pipeline: PipelineParams,
    /// Transforms applied in order during initialization.
    pub params: SmallVec<[FilterParameter; 3]>,
}

#[cfg(test)]
#[path = "../../tests/unit/filter/params.rs"]
mod tests;
