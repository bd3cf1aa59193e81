use smallvec::SmallVec;

use crate::{
    caps::input::{ChromaSubsampling, sfc_input_layout},
    filter::params::{CscParams, EngineType, PipelineParams, RotMirParams, ScalingParams},
    foundation::core::{Rect, Rotation, SurfaceFormat},
    foundation::math::ratio_f32,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SfcCscParameter {
    pub input_format: SurfaceFormat,
    pub output_format: SurfaceFormat,
    /// Subsampling of the SFC input, `None` when the layout has no SFC input mode.
    pub input_chroma_subsampling: Option<ChromaSubsampling>,
    pub csc_enabled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorMode {
    None,
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SfcRotMirParameter {
    /// Clockwise rotation, one of 0, 90, 180, 270.
    pub angle_degrees: u16,
    pub mirror: MirrorMode,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SfcScalingParameter {
    pub input_region: Rect,
    pub output_region: Rect,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Engine-specific parameter object appended to a packet by an active filter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PacketParameter {
    SfcCsc(SfcCscParameter),
    SfcRotMir(SfcRotMirParameter),
    SfcScaling(SfcScalingParameter),
}

/// Finalized configuration bundle for one engine, handed to the engine backend.
///
/// Only filters build packets; once emitted a packet is never modified.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Packet {
    engine: EngineType,
    pipeline: PipelineParams,
    params: SmallVec<[PacketParameter; 3]>,
}

impl Packet {
    pub(crate) fn new(
        engine: EngineType,
        pipeline: PipelineParams,
        params: SmallVec<[PacketParameter; 3]>,
    ) -> Self {
        Self {
            engine,
            pipeline,
            params,
        }
    }

    pub fn engine(&self) -> EngineType {
        self.engine
    }

    pub fn pipeline(&self) -> &PipelineParams {
        &self.pipeline
    }

    /// Parameter objects in configuration order.
    pub fn params(&self) -> &[PacketParameter] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Builds engine parameter objects from transform parameters.
///
/// Returning `None` reports that the object could not be constructed; the filter turns that
/// into [`crate::HwFilterError::ParameterAllocation`].
pub trait ParameterConstructor {
    fn create_csc(&mut self, params: &CscParams) -> Option<SfcCscParameter>;
    fn create_rot_mir(&mut self, params: &RotMirParams) -> Option<SfcRotMirParameter>;
    fn create_scaling(&mut self, params: &ScalingParams) -> Option<SfcScalingParameter>;
}

/// Builds plain value parameter objects. Refuses empty scaling regions.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultParameterConstructor;

impl ParameterConstructor for DefaultParameterConstructor {
    fn create_csc(&mut self, params: &CscParams) -> Option<SfcCscParameter> {
        Some(SfcCscParameter {
            input_format: params.input_format,
            output_format: params.output_format,
            input_chroma_subsampling: sfc_input_layout(params.input_chroma)
                .ok()
                .map(|(_, subsampling, _)| subsampling),
            csc_enabled: params.input_format != params.output_format,
        })
    }

    fn create_rot_mir(&mut self, params: &RotMirParams) -> Option<SfcRotMirParameter> {
        let (angle_degrees, mirror) = match params.rotation {
            Rotation::Identity => (0, MirrorMode::None),
            Rotation::Rotate90 => (90, MirrorMode::None),
            Rotation::Rotate180 => (180, MirrorMode::None),
            Rotation::Rotate270 => (270, MirrorMode::None),
            Rotation::MirrorHorizontal => (0, MirrorMode::Horizontal),
            Rotation::MirrorVertical => (0, MirrorMode::Vertical),
        };
        Some(SfcRotMirParameter {
            angle_degrees,
            mirror,
        })
    }

    fn create_scaling(&mut self, params: &ScalingParams) -> Option<SfcScalingParameter> {
        if params.input_region.is_empty() || params.output_region.is_empty() {
            return None;
        }
        Some(SfcScalingParameter {
            input_region: params.input_region,
            output_region: params.output_region,
            scale_x: ratio_f32(params.output_region.width, params.input_region.width),
            scale_y: ratio_f32(params.output_region.height, params.input_region.height),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/packet.rs"]
mod tests;
