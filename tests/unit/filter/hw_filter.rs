use super::*;
use crate::{
    filter::packet::DefaultParameterConstructor,
    filter::packet::{SfcCscParameter, SfcRotMirParameter, SfcScalingParameter},
    foundation::core::{ChromaLayout, Rect, Rotation, SurfaceDesc, SurfaceFormat},
};

/// Constructor that fails every request, as when parameter memory is exhausted.
struct Exhausted;

impl ParameterConstructor for Exhausted {
    fn create_csc(&mut self, _params: &CscParams) -> Option<SfcCscParameter> {
        None
    }

    fn create_rot_mir(&mut self, _params: &RotMirParams) -> Option<SfcRotMirParameter> {
        None
    }

    fn create_scaling(&mut self, _params: &ScalingParams) -> Option<SfcScalingParameter> {
        None
    }
}

fn pipeline() -> PipelineParams {
    PipelineParams {
        source: SurfaceDesc::new(64, 64, SurfaceFormat::Imc3),
        target: SurfaceDesc::new(32, 32, SurfaceFormat::A8R8G8B8),
        sfc_input: None,
    }
}

fn all_transforms() -> SmallVec<[FilterParameter; 3]> {
    smallvec::smallvec![
        FilterParameter::Csc(CscParams {
            input_format: SurfaceFormat::Imc3,
            output_format: SurfaceFormat::A8R8G8B8,
            input_chroma: ChromaLayout::Yuv420,
        }),
        FilterParameter::RotMir(RotMirParams {
            rotation: Rotation::Rotate180,
        }),
        FilterParameter::Scaling(ScalingParams {
            input_region: Rect::full(64, 64),
            output_region: Rect::full(32, 32),
        }),
    ]
}

fn params(engine: EngineType, caps: ExecuteCaps) -> HwFilterParams {
    HwFilterParams {
        engine,
        caps,
        pipeline: pipeline(),
        params: all_transforms(),
    }
}

fn all_caps() -> ExecuteCaps {
    ExecuteCaps {
        sfc_csc: true,
        sfc_rot_mir: true,
        sfc_scaling: true,
    }
}

#[test]
fn no_caps_yields_empty_packet_for_every_engine() {
    for engine in EngineType::POOLED {
        let mut f = HwFilter::new(engine, 1);
        f.initialize(
            params(engine, ExecuteCaps::default()),
            &mut DefaultParameterConstructor,
        )
        .unwrap();
        let packet = f.emit().unwrap();
        assert_eq!(packet.engine(), engine);
        assert!(packet.is_empty(), "{engine:?}");
        assert_eq!(f.state(), FilterState::Emitted);
    }
}

#[test]
fn sfc_appends_enabled_transforms_in_order() {
    let mut f = HwFilter::new(EngineType::Sfc, 1);
    f.initialize(params(EngineType::Sfc, all_caps()), &mut DefaultParameterConstructor)
        .unwrap();
    assert_eq!(f.pending_len(), 3);

    let packet = f.emit().unwrap();
    assert!(matches!(packet.params()[0], PacketParameter::SfcCsc(_)));
    assert!(matches!(packet.params()[1], PacketParameter::SfcRotMir(_)));
    assert!(matches!(packet.params()[2], PacketParameter::SfcScaling(_)));
    assert_eq!(packet.pipeline(), &pipeline());
    assert_eq!(f.pending_len(), 0);
}

#[test]
fn sfc_passes_through_disabled_transforms() {
    let caps = ExecuteCaps {
        sfc_csc: true,
        sfc_rot_mir: false,
        sfc_scaling: false,
    };
    let mut f = HwFilter::new(EngineType::Sfc, 1);
    f.initialize(params(EngineType::Sfc, caps), &mut DefaultParameterConstructor)
        .unwrap();
    let packet = f.emit().unwrap();
    assert_eq!(packet.len(), 1);
    assert!(matches!(packet.params()[0], PacketParameter::SfcCsc(_)));
}

#[test]
fn vebox_and_render_ignore_sfc_caps() {
    for engine in [EngineType::Vebox, EngineType::Render] {
        let mut f = HwFilter::new(engine, 1);
        f.initialize(params(engine, all_caps()), &mut DefaultParameterConstructor)
            .unwrap();
        assert!(f.emit().unwrap().is_empty());
    }
}

#[test]
fn pass_through_never_touches_the_constructor() {
    let mut f = HwFilter::new(EngineType::Render, 1);
    f.initialize(params(EngineType::Render, all_caps()), &mut Exhausted)
        .unwrap();
    assert!(f.emit().unwrap().is_empty());
}

#[test]
fn allocation_failure_discards_pending_state() {
    let mut f = HwFilter::new(EngineType::Sfc, 1);
    let err = f
        .initialize(params(EngineType::Sfc, all_caps()), &mut Exhausted)
        .unwrap_err();
    assert!(matches!(err, HwFilterError::ParameterAllocation(_)));
    assert_eq!(f.state(), FilterState::Uninitialized);
    assert_eq!(f.pending_len(), 0);
    assert!(f.emit().is_err());
}

#[test]
fn configure_requires_initialization() {
    let mut f = HwFilter::new(EngineType::Sfc, 1);
    let err = f
        .configure_rot_mir(
            &RotMirParams {
                rotation: Rotation::Rotate90,
            },
            &mut DefaultParameterConstructor,
        )
        .unwrap_err();
    assert!(matches!(err, HwFilterError::Validation(_)));
}

#[test]
fn engine_mismatch_is_rejected() {
    let mut f = HwFilter::new(EngineType::Vebox, 1);
    let err = f
        .initialize(params(EngineType::Sfc, all_caps()), &mut DefaultParameterConstructor)
        .unwrap_err();
    assert!(matches!(err, HwFilterError::Validation(_)));
    assert_eq!(f.engine_type(), EngineType::Vebox);
}

#[test]
fn emitted_filter_cannot_emit_or_configure_again() {
    let mut f = HwFilter::new(EngineType::Sfc, 1);
    f.initialize(params(EngineType::Sfc, all_caps()), &mut DefaultParameterConstructor)
        .unwrap();
    f.emit().unwrap();

    assert!(matches!(f.emit(), Err(HwFilterError::Validation(_))));
    assert!(
        f.configure(&all_transforms()[0], &mut DefaultParameterConstructor)
            .is_err()
    );

    f.clean();
    assert_eq!(f.state(), FilterState::Uninitialized);
    assert_eq!(f.caps(), ExecuteCaps::default());
    assert_eq!(f.serial(), 1);
}
