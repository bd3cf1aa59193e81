use crate::foundation::error::{HwFilterError, HwResult};

/// Chroma sampling scheme of a decoded JPEG frame.
///
/// Raw decoder codes map onto variants through `TryFrom<u8>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChromaLayout {
    /// Monochrome, luma plane only.
    Yuv400,
    /// 4:2:0.
    Yuv420,
    /// Horizontal 4:2:2, two luma blocks per MCU.
    Yuv422H2Y,
    /// Horizontal 4:2:2, four luma blocks per MCU.
    Yuv422H4Y,
    /// 4:4:4.
    Yuv444,
    /// 4:1:1.
    Yuv411,
    /// Vertical 4:2:2, two luma blocks per MCU.
    Yuv422V2Y,
    /// Vertical 4:2:2, four luma blocks per MCU.
    Yuv422V4Y,
    /// Three full-resolution RGB components.
    Rgb,
    /// Three full-resolution BGR components.
    Bgr,
}

impl ChromaLayout {
    /// Every layout, in raw code order.
    pub const ALL: [ChromaLayout; 10] = [
        Self::Yuv400,
        Self::Yuv420,
        Self::Yuv422H2Y,
        Self::Yuv422H4Y,
        Self::Yuv444,
        Self::Yuv411,
        Self::Yuv422V2Y,
        Self::Yuv422V4Y,
        Self::Rgb,
        Self::Bgr,
    ];

    /// Whether the frame carries a luma plane only.
    pub fn is_monochrome(self) -> bool {
        matches!(self, Self::Yuv400)
    }

    /// Planar format the decoder writes for this layout.
    pub fn native_format(self) -> SurfaceFormat {
        match self {
            Self::Yuv400 => SurfaceFormat::Yuv400P,
            Self::Yuv420 => SurfaceFormat::Imc3,
            Self::Yuv422H2Y | Self::Yuv422H4Y => SurfaceFormat::Yuv422H,
            Self::Yuv422V2Y | Self::Yuv422V4Y => SurfaceFormat::Yuv422V,
            Self::Yuv411 => SurfaceFormat::Yuv411P,
            Self::Yuv444 | Self::Rgb | Self::Bgr => SurfaceFormat::Yuv444P,
        }
    }
}

impl TryFrom<u8> for ChromaLayout {
    type Error = HwFilterError;

    fn try_from(code: u8) -> HwResult<Self> {
        Self::ALL.get(usize::from(code)).copied().ok_or_else(|| {
            HwFilterError::unsupported_chroma_layout(format!("unknown chroma type code {code}"))
        })
    }
}

/// Surface pixel formats understood by the engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceFormat {
    /// Packed 32-bit ARGB.
    A8R8G8B8,
    /// Packed 32-bit RGB with an unused alpha byte.
    X8R8G8B8,
    /// Semi-planar 4:2:0, 8-bit.
    Nv12,
    /// Semi-planar 4:2:0, 10-bit in 16-bit containers.
    P010,
    /// Packed 4:2:2.
    Yuy2,
    /// Luma plane only.
    Yuv400P,
    /// Tri-planar 4:2:0.
    Imc3,
    /// Tri-planar 4:1:1.
    Yuv411P,
    /// Tri-planar horizontal 4:2:2.
    Yuv422H,
    /// Tri-planar vertical 4:2:2.
    Yuv422V,
    /// Tri-planar 4:4:4.
    Yuv444P,
}

impl SurfaceFormat {
    /// Whether this belongs to the 32-bit packed RGB family.
    pub fn is_packed_rgb32(self) -> bool {
        matches!(self, Self::A8R8G8B8 | Self::X8R8G8B8)
    }

    /// Bytes per pixel in the first (luma or packed) plane.
    pub fn plane0_bytes_per_pixel(self) -> u32 {
        match self {
            Self::A8R8G8B8 | Self::X8R8G8B8 => 4,
            Self::P010 | Self::Yuy2 => 2,
            _ => 1,
        }
    }
}

/// Memory tiling of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    /// Row-major, untiled.
    #[default]
    Linear,
    /// X-major tiling.
    TileX,
    /// Y-major tiling.
    TileY,
}

/// Offset of a chroma plane relative to the surface base, `y` in rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlaneOffset {
    pub x: u32,
    pub y: u32,
}

impl PlaneOffset {
    /// Offset starting `rows` rows below the surface base.
    pub fn rows(rows: u32) -> Self {
        Self { x: 0, y: rows }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Surface descriptor: dimensions, layout and plane placement.
///
/// Only the fields the engines read are carried; memory itself is owned elsewhere.
pub struct SurfaceDesc {
    pub width: u32,
    pub height: u32,
    pub pitch: u32,
    pub format: SurfaceFormat,
    #[serde(default)]
    pub tile_type: TileType,
    #[serde(default)]
    pub u_plane_offset: PlaneOffset,
    #[serde(default)]
    pub v_plane_offset: PlaneOffset,
}

impl SurfaceDesc {
    /// Linear surface with a tightly packed pitch and no chroma plane offsets.
    pub fn new(width: u32, height: u32, format: SurfaceFormat) -> Self {
        Self {
            width,
            height,
            pitch: width.saturating_mul(format.plane0_bytes_per_pixel()),
            format,
            tile_type: TileType::Linear,
            u_plane_offset: PlaneOffset::default(),
            v_plane_offset: PlaneOffset::default(),
        }
    }

    pub fn validate(&self) -> HwResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HwFilterError::validation(format!(
                "surface dimensions must be > 0, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn full_region(&self) -> Rect {
        Rect::full(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Rotation or mirroring applied on output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    MirrorHorizontal,
    MirrorVertical,
}

impl Rotation {
    pub fn is_identity(self) -> bool {
        self == Self::Identity
    }

    /// Whether width and height trade places on output.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

/// Immutable per-frame description of the decoded source.
///
/// Created by the decode orchestrator once per frame; read-only to this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransformRequest {
    /// Source chroma sampling.
    pub chroma: ChromaLayout,
    /// Raw decoded width in pixels.
    pub source_width: u32,
    /// Raw decoded height in pixels.
    pub source_height: u32,
    /// Total number of scans in the bitstream.
    pub total_scans: u32,
    /// All components encoded together in one scan.
    pub interleaved: bool,
    /// Requested output orientation.
    #[serde(default)]
    pub rotation: Rotation,
}

impl TransformRequest {
    pub fn validate(&self) -> HwResult<()> {
        if self.total_scans == 0 {
            return Err(HwFilterError::validation("total_scans must be >= 1"));
        }
        Ok(())
    }

    /// Decoded source surface as the decoder writes it.
    pub fn source_surface(&self) -> SurfaceDesc {
        SurfaceDesc::new(
            self.source_width,
            self.source_height,
            self.chroma.native_format(),
        )
    }

    /// Source dimensions after the requested rotation.
    pub fn oriented_size(&self) -> (u32, u32) {
        if self.rotation.swaps_dimensions() {
            (self.source_height, self.source_width)
        } else {
            (self.source_width, self.source_height)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
