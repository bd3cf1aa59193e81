use std::io::Read;

use crate::{
    caps::prober::{EngineCapability, ProcessingParams, SfcPipeMode},
    foundation::core::{Rect, SurfaceFormat},
    foundation::error::{HwFilterError, HwResult},
    foundation::math::ratio_f32,
};

/// Table-driven [`EngineCapability`] describing a scaler's frame limits and accepted formats.
///
/// Stands in for the driver's own predicate in the CLI and tests.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SfcLimits {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    /// Largest output/input ratio on either axis.
    pub max_upscale: f32,
    /// Largest input/output ratio on either axis.
    pub max_downscale: f32,
    /// Input formats accepted when fed from the decoder.
    pub vdbox_input_formats: Vec<SurfaceFormat>,
    /// Input formats accepted when fed from the enhancement unit.
    pub vebox_input_formats: Vec<SurfaceFormat>,
    pub output_formats: Vec<SurfaceFormat>,
}

impl Default for SfcLimits {
    fn default() -> Self {
        Self {
            min_width: 128,
            min_height: 128,
            max_width: 16 * 1024,
            max_height: 16 * 1024,
            max_upscale: 8.0,
            max_downscale: 8.0,
            vdbox_input_formats: vec![
                SurfaceFormat::Yuv400P,
                SurfaceFormat::Imc3,
                SurfaceFormat::Yuv422H,
                SurfaceFormat::Yuv444P,
                SurfaceFormat::Nv12,
            ],
            vebox_input_formats: vec![
                SurfaceFormat::Nv12,
                SurfaceFormat::P010,
                SurfaceFormat::Yuy2,
            ],
            output_formats: vec![
                SurfaceFormat::A8R8G8B8,
                SurfaceFormat::X8R8G8B8,
                SurfaceFormat::Nv12,
                SurfaceFormat::Yuy2,
            ],
        }
    }
}

impl SfcLimits {
    pub fn from_json_str(s: &str) -> HwResult<Self> {
        serde_json::from_str(s).map_err(|e| HwFilterError::serde(e.to_string()))
    }

    pub fn from_json_reader(r: impl Read) -> HwResult<Self> {
        serde_json::from_reader(r).map_err(|e| HwFilterError::serde(e.to_string()))
    }

    fn region_fits(&self, r: Rect) -> bool {
        !r.is_empty()
            && (self.min_width..=self.max_width).contains(&r.width)
            && (self.min_height..=self.max_height).contains(&r.height)
    }

    fn ratio_fits(&self, input: Rect, output: Rect) -> bool {
        let sx = ratio_f32(output.width, input.width);
        let sy = ratio_f32(output.height, input.height);
        [sx, sy]
            .into_iter()
            .all(|s| s <= self.max_upscale && s * self.max_downscale >= 1.0)
    }
}

impl EngineCapability for SfcLimits {
    fn is_path_supported(&self, params: &ProcessingParams, mode: SfcPipeMode) -> bool {
        let inputs = match mode {
            SfcPipeMode::Vdbox => &self.vdbox_input_formats,
            SfcPipeMode::Vebox => &self.vebox_input_formats,
        };
        inputs.contains(&params.input_surface.format)
            && self.output_formats.contains(&params.output_surface.format)
            && self.region_fits(params.input_region)
            && self.region_fits(params.output_region)
            && self.ratio_fits(params.input_region, params.output_region)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caps/limits.rs"]
mod tests;
