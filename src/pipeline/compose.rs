use smallvec::SmallVec;
use tracing::debug;

use crate::{
    caps::prober::{EngineCapability, ProcessingParams, SfcJpegState, SfcPipeMode},
    filter::factory::HwFilterFactory,
    filter::packet::{Packet, ParameterConstructor},
    filter::params::{
        CscParams, EngineType, ExecuteCaps, FilterParameter, HwFilterParams, PipelineParams,
        RotMirParams, ScalingParams,
    },
    foundation::config::PlatformConfig,
    foundation::core::{Rect, SurfaceDesc, TransformRequest},
    foundation::error::{HwFilterError, HwResult},
    pipeline::backend::EngineBackend,
};

/// One frame's worth of work: what was decoded and where it must end up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameJob {
    pub request: TransformRequest,
    pub destination: SurfaceDesc,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Counters for one executed frame.
pub struct FrameStats {
    /// The decoder fed the fixed-function unit directly.
    pub sfc_output: bool,
    /// Packets submitted, one per filter.
    pub packets: usize,
    /// Parameter objects across all packets.
    pub parameters: usize,
}

#[derive(Clone, Copy, Debug, Default)]
struct Needs {
    csc: bool,
    rot_mir: bool,
    scaling: bool,
}

impl Needs {
    fn of(job: &FrameJob) -> Self {
        let req = &job.request;
        let dest = &job.destination;
        Self {
            csc: dest.format != req.chroma.native_format(),
            rot_mir: !req.rotation.is_identity(),
            scaling: req.oriented_size() != (dest.width, dest.height),
        }
    }

    fn without(self, caps: ExecuteCaps) -> Self {
        Self {
            csc: self.csc && !caps.sfc_csc,
            rot_mir: self.rot_mir && !caps.sfc_rot_mir,
            scaling: self.scaling && !caps.sfc_scaling,
        }
    }

    fn any(self) -> bool {
        self.csc || self.rot_mir || self.scaling
    }

    /// Parameter sets for every needed transform, in configuration order.
    fn params(self, job: &FrameJob, source: &SurfaceDesc) -> SmallVec<[FilterParameter; 3]> {
        let req = &job.request;
        let dest = &job.destination;
        let mut out = SmallVec::new();
        if self.csc {
            out.push(FilterParameter::Csc(CscParams {
                input_format: source.format,
                output_format: dest.format,
                input_chroma: req.chroma,
            }));
        }
        if self.rot_mir {
            out.push(FilterParameter::RotMir(RotMirParams {
                rotation: req.rotation,
            }));
        }
        if self.scaling {
            out.push(FilterParameter::Scaling(ScalingParams {
                input_region: Rect::full(req.source_width, req.source_height),
                output_region: dest.full_region(),
            }));
        }
        out
    }
}

/// Ask the engine whether the SFC can also take the source-to-destination resize.
///
/// The probe only checks the destination-sized path, so the regions here are the ones the
/// scaling parameter will carry.
fn sfc_scaling_supported(
    job: &FrameJob,
    input: &SurfaceDesc,
    predicate: &dyn EngineCapability,
) -> bool {
    let req = &job.request;
    let params = ProcessingParams {
        input_surface: SurfaceDesc {
            width: req.source_width,
            height: req.source_height,
            ..*input
        },
        output_surface: job.destination,
        input_region: Rect::full(req.source_width, req.source_height),
        output_region: job.destination.full_region(),
    };
    predicate.is_path_supported(&params, SfcPipeMode::Vdbox)
}

/// Per-decoder filter pipeline: probes each frame, picks engines and drives the filters.
///
/// Frames are processed strictly one at a time.
#[derive(Debug)]
pub struct HwFilterPipe {
    sfc: SfcJpegState,
    factory: HwFilterFactory,
}

impl HwFilterPipe {
    pub fn new(config: PlatformConfig) -> HwResult<Self> {
        config.validate()?;
        Ok(Self {
            sfc: SfcJpegState::new(config),
            factory: HwFilterFactory::new(),
        })
    }

    pub fn sfc_state(&self) -> &SfcJpegState {
        &self.sfc
    }

    pub fn factory(&self) -> &HwFilterFactory {
        &self.factory
    }

    /// Choose the ordered filters for `job`.
    ///
    /// When the fixed-function path is usable, an SFC filter takes every transform the platform
    /// lets it run. Whatever is left goes to a render filter placed after it. A frame that needs
    /// no transform gets no filters. Scaling stays on the SFC only when the engine accepts the
    /// actual resize ratio.
    pub fn plan_frame(
        &mut self,
        job: &FrameJob,
        predicate: &dyn EngineCapability,
    ) -> HwResult<Vec<HwFilterParams>> {
        let req = &job.request;
        if Rect::full(req.source_width, req.source_height).is_empty() {
            return Err(HwFilterError::validation(format!(
                "source dimensions must be > 0, got {}x{}",
                req.source_width, req.source_height
            )));
        }

        let probe = self
            .sfc
            .check_and_initialize(&job.destination, &job.request, predicate)?;
        let needs = Needs::of(job);
        let mut plan = Vec::with_capacity(2);

        let (remaining, render_source) = if probe.usable {
            let input = probe.input_surface.ok_or_else(|| {
                HwFilterError::validation("usable SFC path without an input surface")
            })?;
            let cfg = self.sfc.config();
            let sfc_scaling = needs.scaling
                && cfg.sfc_scaling_supported
                && sfc_scaling_supported(job, &input, predicate);
            if needs.scaling && !sfc_scaling {
                debug!("scaling left to render");
            }
            let caps = ExecuteCaps {
                sfc_csc: needs.csc,
                sfc_rot_mir: needs.rot_mir && cfg.sfc_rot_mir_supported,
                sfc_scaling,
            };
            plan.push(HwFilterParams {
                engine: EngineType::Sfc,
                caps,
                pipeline: PipelineParams {
                    source: input,
                    target: job.destination,
                    sfc_input: Some(self.sfc.update_input_info()?),
                },
                params: needs.params(job, &input),
            });
            (needs.without(caps), job.destination)
        } else {
            (needs, job.request.source_surface())
        };

        if remaining.any() {
            plan.push(HwFilterParams {
                engine: EngineType::Render,
                caps: ExecuteCaps::default(),
                pipeline: PipelineParams {
                    source: render_source,
                    target: job.destination,
                    sfc_input: None,
                },
                params: remaining.params(job, &render_source),
            });
        }

        debug!(
            sfc = probe.usable,
            engines = ?plan.iter().map(|p| p.engine).collect::<Vec<_>>(),
            "frame planned"
        );
        Ok(plan)
    }

    /// Plan, configure and emit every filter for `job`, then submit the packets in order.
    ///
    /// Nothing is submitted unless every filter emitted; filters return to the pool either way.
    #[tracing::instrument(skip_all, fields(chroma = ?job.request.chroma))]
    pub fn execute_frame(
        &mut self,
        job: &FrameJob,
        predicate: &dyn EngineCapability,
        ctor: &mut dyn ParameterConstructor,
        backend: &mut dyn EngineBackend,
    ) -> HwResult<FrameStats> {
        let plan = self.plan_frame(job, predicate)?;

        let mut packets = Vec::with_capacity(plan.len());
        for params in plan {
            let mut filter = self.factory.get_hw_filter(params, ctor)?;
            let packet = filter.emit();
            self.factory.release(filter);
            packets.push(packet?);
        }

        let stats = FrameStats {
            sfc_output: self.sfc.is_sfc_output(),
            packets: packets.len(),
            parameters: packets.iter().map(Packet::len).sum(),
        };
        for packet in packets {
            backend.submit(packet)?;
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/compose.rs"]
mod tests;
