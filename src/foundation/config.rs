use std::io::Read;

use crate::foundation::error::{HwFilterError, HwResult};

/// Hardware-generation constants and feature availability.
///
/// Alignment values differ between GPU generations, so they are inputs rather than literals.
/// Missing JSON fields fall back to [`PlatformConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// The SKU has the fixed-function scaler/format-converter pipe.
    pub sfc_pipe_supported: bool,
    /// Pitch alignment of decoder output surfaces, in bytes.
    pub surface_pitch_alignment: u32,
    /// Row alignment of the chroma planes in tri-planar decoder output.
    pub uv_plane_alignment: u32,
    /// SFC can rotate and mirror on this platform.
    pub sfc_rot_mir_supported: bool,
    /// SFC can scale on this platform.
    pub sfc_scaling_supported: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            sfc_pipe_supported: true,
            surface_pitch_alignment: 128,
            uv_plane_alignment: 8,
            sfc_rot_mir_supported: true,
            sfc_scaling_supported: true,
        }
    }
}

impl PlatformConfig {
    pub fn validate(&self) -> HwResult<()> {
        for (name, v) in [
            ("surface_pitch_alignment", self.surface_pitch_alignment),
            ("uv_plane_alignment", self.uv_plane_alignment),
        ] {
            if !v.is_power_of_two() {
                return Err(HwFilterError::validation(format!(
                    "{name} must be a non-zero power of two, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON platform description.
    pub fn from_json_str(s: &str) -> HwResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| HwFilterError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_reader(r: impl Read) -> HwResult<Self> {
        let cfg: Self =
            serde_json::from_reader(r).map_err(|e| HwFilterError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
