use tracing::{debug, warn};

use crate::{
    caps::input::{SfcInputConfig, derive_engine_input_params},
    foundation::config::PlatformConfig,
    foundation::core::{
        ChromaLayout, PlaneOffset, Rect, SurfaceDesc, SurfaceFormat, TransformRequest,
    },
    foundation::error::{HwFilterError, HwResult},
    foundation::math::align_ceil,
};

/// Engine that feeds the SFC unit for a candidate path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SfcPipeMode {
    /// Decoder box.
    Vdbox,
    /// Video enhancement box.
    Vebox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Description of a candidate SFC processing path, handed to the capability predicate.
pub struct ProcessingParams {
    pub input_surface: SurfaceDesc,
    pub output_surface: SurfaceDesc,
    pub input_region: Rect,
    pub output_region: Rect,
}

/// External predicate deciding whether an engine can run a processing path.
///
/// Queried at most once per candidate path per frame.
pub trait EngineCapability {
    /// Whether `params` can run on the SFC fed from `mode`.
    fn is_path_supported(&self, params: &ProcessingParams, mode: SfcPipeMode) -> bool;
}

impl<F> EngineCapability for F
where
    F: Fn(&ProcessingParams, SfcPipeMode) -> bool,
{
    fn is_path_supported(&self, params: &ProcessingParams, mode: SfcPipeMode) -> bool {
        self(params, mode)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Result of [`SfcJpegState::check_and_initialize`].
pub struct ProbeOutcome {
    /// The fixed-function output path is active for this frame.
    pub usable: bool,
    /// Synthetic SFC input surface; `Some` exactly when `usable` is set.
    pub input_surface: Option<SurfaceDesc>,
}

/// Per-decoder state of the JPEG fixed-function output path.
///
/// Frame-scoped fields are overwritten by every [`SfcJpegState::check_and_initialize`].
#[derive(Clone, Debug)]
pub struct SfcJpegState {
    config: PlatformConfig,
    sfc_pipe_out: bool,
    jpeg_in_use: bool,
    chroma_layout: Option<ChromaLayout>,
    processing: Option<ProcessingParams>,
}

impl SfcJpegState {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            sfc_pipe_out: false,
            jpeg_in_use: false,
            chroma_layout: None,
            processing: None,
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Whether the last probe activated the fixed-function output.
    pub fn is_sfc_output(&self) -> bool {
        self.sfc_pipe_out
    }

    /// Whether the JPEG decoder owns the SFC for the current frame.
    pub fn is_jpeg_in_use(&self) -> bool {
        self.jpeg_in_use
    }

    /// Chroma layout recorded by the last successful probe.
    pub fn chroma_layout(&self) -> Option<ChromaLayout> {
        self.chroma_layout
    }

    pub fn processing_params(&self) -> Option<&ProcessingParams> {
        self.processing.as_ref()
    }

    /// Forget everything derived for the previous frame.
    pub fn reset(&mut self) {
        self.sfc_pipe_out = false;
        self.jpeg_in_use = false;
        self.chroma_layout = None;
        self.processing = None;
    }

    /// Decide whether decoder output can go straight through the SFC for this frame.
    ///
    /// All of the following must hold: the SKU has the SFC pipe, `dest` is 32-bit packed RGB,
    /// the source is interleaved (or monochrome), and it has exactly one scan. When they do,
    /// a synthetic input surface is derived and offered to `predicate`.
    ///
    /// Requesting RGB output when the path is unusable fails with
    /// [`HwFilterError::UnsupportedConversion`]; no other conversion path exists for it.
    #[tracing::instrument(skip(self, predicate), fields(chroma = ?req.chroma))]
    pub fn check_and_initialize(
        &mut self,
        dest: &SurfaceDesc,
        req: &TransformRequest,
        predicate: &dyn EngineCapability,
    ) -> HwResult<ProbeOutcome> {
        dest.validate()?;
        req.validate()?;
        self.reset();

        let mut outcome = ProbeOutcome {
            usable: false,
            input_surface: None,
        };

        let eligible = self.config.sfc_pipe_supported
            && dest.format.is_packed_rgb32()
            && (req.interleaved || req.chroma.is_monochrome())
            && req.total_scans == 1;

        if eligible {
            outcome.input_surface = self.synthetic_input(dest, req.chroma);
        }

        if let Some(input) = outcome.input_surface {
            let params = ProcessingParams {
                input_surface: input,
                output_surface: *dest,
                input_region: input.full_region(),
                output_region: dest.full_region(),
            };

            if predicate.is_path_supported(&params, SfcPipeMode::Vdbox) {
                self.sfc_pipe_out = true;
                self.jpeg_in_use = true;
                self.chroma_layout = Some(req.chroma);
                self.processing = Some(params);
                outcome.usable = true;
            } else {
                debug!("engine rejected SFC path");
            }
        }

        if !outcome.usable && dest.format.is_packed_rgb32() {
            warn!(format = ?dest.format, "SFC YUV->RGB unsupported");
            return Err(HwFilterError::unsupported_conversion(format!(
                "{:?} output from {:?} ({} scans, interleaved={}) has no fixed-function path",
                dest.format, req.chroma, req.total_scans, req.interleaved
            )));
        }

        debug!(usable = outcome.usable, "probe done");
        Ok(outcome)
    }

    /// Input surface the SFC sees when it is fed straight from the decoder.
    ///
    /// `None` for layouts that have no tri-planar SFC input format.
    fn synthetic_input(&self, dest: &SurfaceDesc, chroma: ChromaLayout) -> Option<SurfaceDesc> {
        let h = dest.height;
        let aligned_h = align_ceil(h, self.config.uv_plane_alignment);

        let (format, v_rows) = match chroma {
            ChromaLayout::Yuv400 => (SurfaceFormat::Yuv400P, None),
            ChromaLayout::Yuv420 => {
                (SurfaceFormat::Imc3, Some(aligned_h.saturating_add(h / 2)))
            }
            ChromaLayout::Yuv422H2Y | ChromaLayout::Yuv422H4Y => {
                (SurfaceFormat::Yuv422H, Some(aligned_h.saturating_add(h / 2)))
            }
            ChromaLayout::Yuv444 | ChromaLayout::Rgb | ChromaLayout::Bgr => {
                (SurfaceFormat::Yuv444P, Some(aligned_h.saturating_add(h)))
            }
            ChromaLayout::Yuv411 | ChromaLayout::Yuv422V2Y | ChromaLayout::Yuv422V4Y => {
                return None;
            }
        };

        Some(SurfaceDesc {
            width: dest.width,
            height: h,
            pitch: align_ceil(dest.width, self.config.surface_pitch_alignment),
            format,
            tile_type: dest.tile_type,
            u_plane_offset: PlaneOffset::rows(h),
            v_plane_offset: v_rows.map(PlaneOffset::rows).unwrap_or_default(),
        })
    }

    /// SFC input state for the frame accepted by the last probe.
    ///
    /// Fails with [`HwFilterError::UnsupportedChromaLayout`] when no layout was recorded.
    pub fn update_input_info(&self) -> HwResult<SfcInputConfig> {
        let (Some(layout), Some(params)) = (self.chroma_layout, self.processing.as_ref()) else {
            return Err(HwFilterError::unsupported_chroma_layout(
                "no chroma layout recorded for the SFC input",
            ));
        };
        derive_engine_input_params(layout, &params.input_surface)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/caps/prober.rs"]
mod tests;
