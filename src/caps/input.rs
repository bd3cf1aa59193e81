use crate::{
    foundation::core::{ChromaLayout, SurfaceDesc},
    foundation::error::{HwFilterError, HwResult},
    foundation::math::align_ceil,
};

/// Where the SFC unit takes its input from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SfcStateMode {
    /// Decoder output streamed directly into SFC.
    VdToSfc,
}

/// Adaptive video scaler filter footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvsFilterMode {
    Filter5x5,
}

/// Order in which decoded blocks arrive at the SFC input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOrdering {
    Vd8x8Jpeg,
    Vd16x16Jpeg,
}

/// Chroma subsampling tag programmed into the SFC state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChromaSubsampling {
    S400,
    S420,
    S422H,
    S444,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// SFC input programming derived from the chroma layout in use.
pub struct SfcInputConfig {
    pub state_mode: SfcStateMode,
    pub avs_filter_mode: AvsFilterMode,
    pub input_ordering: InputOrdering,
    pub chroma_subsampling: ChromaSubsampling,
    /// Input frame width rounded up to the block alignment.
    pub input_frame_width: u32,
    /// Input frame height rounded up to the block alignment.
    pub input_frame_height: u32,
}

/// Ordering, subsampling and block alignment (pixels) the SFC expects for `layout`.
pub fn sfc_input_layout(
    layout: ChromaLayout,
) -> HwResult<(InputOrdering, ChromaSubsampling, u32)> {
    match layout {
        ChromaLayout::Yuv400 => Ok((InputOrdering::Vd8x8Jpeg, ChromaSubsampling::S400, 8)),
        ChromaLayout::Yuv420 => Ok((InputOrdering::Vd16x16Jpeg, ChromaSubsampling::S420, 16)),
        ChromaLayout::Yuv422H2Y => Ok((InputOrdering::Vd8x8Jpeg, ChromaSubsampling::S422H, 8)),
        ChromaLayout::Yuv422H4Y => Ok((InputOrdering::Vd16x16Jpeg, ChromaSubsampling::S422H, 16)),
        ChromaLayout::Yuv444 | ChromaLayout::Rgb | ChromaLayout::Bgr => {
            Ok((InputOrdering::Vd8x8Jpeg, ChromaSubsampling::S444, 8))
        }
        ChromaLayout::Yuv411 | ChromaLayout::Yuv422V2Y | ChromaLayout::Yuv422V4Y => Err(
            HwFilterError::unsupported_chroma_layout(format!("{layout:?} is not an SFC input")),
        ),
    }
}

/// Derive the SFC input state for a decoded `source` surface in `layout`.
///
/// The input frame is the raw surface size rounded up to whole decode blocks.
pub fn derive_engine_input_params(
    layout: ChromaLayout,
    source: &SurfaceDesc,
) -> HwResult<SfcInputConfig> {
    let (input_ordering, chroma_subsampling, align) = sfc_input_layout(layout)?;
    Ok(SfcInputConfig {
        state_mode: SfcStateMode::VdToSfc,
        avs_filter_mode: AvsFilterMode::Filter5x5,
        input_ordering,
        chroma_subsampling,
        input_frame_width: align_ceil(source.width, align),
        input_frame_height: align_ceil(source.height, align),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/caps/input.rs"]
mod tests;
