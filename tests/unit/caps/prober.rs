use std::cell::Cell;

use super::*;
use crate::foundation::core::{Rotation, TileType};

fn request(chroma: ChromaLayout, interleaved: bool, scans: u32) -> TransformRequest {
    TransformRequest {
        chroma,
        source_width: 100,
        source_height: 90,
        total_scans: scans,
        interleaved,
        rotation: Rotation::Identity,
    }
}

fn rgb_dest() -> SurfaceDesc {
    SurfaceDesc::new(100, 90, SurfaceFormat::A8R8G8B8)
}

fn accept(_: &ProcessingParams, _: SfcPipeMode) -> bool {
    true
}

fn reject(_: &ProcessingParams, _: SfcPipeMode) -> bool {
    false
}

fn state_with_uv_align(align: u32) -> SfcJpegState {
    SfcJpegState::new(PlatformConfig {
        uv_plane_alignment: align,
        ..PlatformConfig::default()
    })
}

#[test]
fn yuv420_rgb_output_derives_imc3_input() {
    let mut state = state_with_uv_align(2);
    let out = state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv420, true, 1), &accept)
        .unwrap();

    assert!(out.usable);
    let input = out.input_surface.unwrap();
    assert_eq!(input.format, SurfaceFormat::Imc3);
    assert_eq!((input.width, input.height), (100, 90));
    assert_eq!(input.pitch, 128);
    assert_eq!(input.u_plane_offset.y, 90);
    assert_eq!(input.v_plane_offset.y, 135);

    assert!(state.is_sfc_output());
    assert!(state.is_jpeg_in_use());
    assert_eq!(state.chroma_layout(), Some(ChromaLayout::Yuv420));
    let params = state.processing_params().unwrap();
    assert_eq!(params.output_surface, rgb_dest());
    assert_eq!(params.input_region, Rect::full(100, 90));
}

#[test]
fn plane_offsets_use_configured_alignment() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let out = state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv422H2Y, true, 1), &accept)
        .unwrap();
    let input = out.input_surface.unwrap();
    assert_eq!(input.format, SurfaceFormat::Yuv422H);
    assert_eq!(input.v_plane_offset.y, 96 + 45);

    let out = state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Bgr, true, 1), &accept)
        .unwrap();
    let input = out.input_surface.unwrap();
    assert_eq!(input.format, SurfaceFormat::Yuv444P);
    assert_eq!(input.v_plane_offset.y, 96 + 90);
}

#[test]
fn monochrome_is_usable_without_interleaving() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let out = state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv400, false, 1), &accept)
        .unwrap();
    assert!(out.usable);
    let input = out.input_surface.unwrap();
    assert_eq!(input.format, SurfaceFormat::Yuv400P);
    assert_eq!(input.v_plane_offset, PlaneOffset::default());
}

#[test]
fn predicate_rejection_with_rgb_output_is_unsupported_conversion() {
    let mut state = state_with_uv_align(2);
    let err = state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv420, true, 1), &reject)
        .unwrap_err();
    assert!(matches!(err, HwFilterError::UnsupportedConversion(_)));
    assert!(!state.is_sfc_output());
    assert_eq!(state.chroma_layout(), None);
}

#[test]
fn multi_scan_or_non_interleaved_never_reaches_predicate() {
    let calls = Cell::new(0u32);
    let counting = |_: &ProcessingParams, _: SfcPipeMode| {
        calls.set(calls.get() + 1);
        true
    };

    let mut state = SfcJpegState::new(PlatformConfig::default());
    for req in [
        request(ChromaLayout::Yuv420, true, 2),
        request(ChromaLayout::Yuv420, false, 1),
        request(ChromaLayout::Yuv444, false, 3),
        request(ChromaLayout::Yuv400, false, 2),
    ] {
        let err = state
            .check_and_initialize(&rgb_dest(), &req, &counting)
            .unwrap_err();
        assert!(matches!(err, HwFilterError::UnsupportedConversion(_)));
        assert!(!state.is_sfc_output());
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn non_rgb_destination_never_fails_conversion() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let dest = SurfaceDesc::new(100, 90, SurfaceFormat::Nv12);
    for chroma in ChromaLayout::ALL {
        for interleaved in [false, true] {
            for scans in [1, 2] {
                let out = state
                    .check_and_initialize(&dest, &request(chroma, interleaved, scans), &accept)
                    .unwrap();
                assert!(!out.usable);
                assert_eq!(out.input_surface, None);
            }
        }
    }
}

#[test]
fn layouts_without_sfc_input_are_unusable() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let err = state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv411, true, 1), &accept)
        .unwrap_err();
    assert!(matches!(err, HwFilterError::UnsupportedConversion(_)));
}

#[test]
fn missing_sfc_pipe_disables_the_path() {
    let mut state = SfcJpegState::new(PlatformConfig {
        sfc_pipe_supported: false,
        ..PlatformConfig::default()
    });
    let err = state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv420, true, 1), &accept)
        .unwrap_err();
    assert!(matches!(err, HwFilterError::UnsupportedConversion(_)));
}

#[test]
fn tile_type_is_copied_from_destination() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let dest = SurfaceDesc {
        tile_type: TileType::TileY,
        ..rgb_dest()
    };
    let out = state
        .check_and_initialize(&dest, &request(ChromaLayout::Yuv420, true, 1), &accept)
        .unwrap();
    assert_eq!(out.input_surface.unwrap().tile_type, TileType::TileY);
}

#[test]
fn each_probe_resets_previous_frame() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv420, true, 1), &accept)
        .unwrap();
    assert!(state.is_sfc_output());

    let nv12 = SurfaceDesc::new(100, 90, SurfaceFormat::Nv12);
    state
        .check_and_initialize(&nv12, &request(ChromaLayout::Yuv420, true, 1), &accept)
        .unwrap();
    assert!(!state.is_sfc_output());
    assert!(!state.is_jpeg_in_use());
    assert!(state.processing_params().is_none());
}

#[test]
fn zero_sized_destination_is_invalid() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let dest = SurfaceDesc::new(0, 90, SurfaceFormat::A8R8G8B8);
    let err = state
        .check_and_initialize(&dest, &request(ChromaLayout::Yuv420, true, 1), &accept)
        .unwrap_err();
    assert!(matches!(err, HwFilterError::Validation(_)));
}

#[test]
fn update_input_info_requires_an_accepted_frame() {
    let state = SfcJpegState::new(PlatformConfig::default());
    let err = state.update_input_info().unwrap_err();
    assert!(matches!(err, HwFilterError::UnsupportedChromaLayout(_)));
}

#[test]
fn update_input_info_uses_recorded_layout() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv420, true, 1), &accept)
        .unwrap();
    let cfg = state.update_input_info().unwrap();
    assert_eq!(cfg.input_frame_width, 112);
    assert_eq!(cfg.input_frame_height, 96);

    state
        .check_and_initialize(&rgb_dest(), &request(ChromaLayout::Yuv422H2Y, true, 1), &accept)
        .unwrap();
    let cfg = state.update_input_info().unwrap();
    assert_eq!(cfg.input_frame_width, 104);
    assert_eq!(cfg.input_frame_height, 96);
}

#[test]
fn tall_destination_saturates_plane_offsets() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let dest = SurfaceDesc::new(64, u32::MAX - 3, SurfaceFormat::A8R8G8B8);
    for chroma in [ChromaLayout::Yuv420, ChromaLayout::Yuv422H4Y, ChromaLayout::Rgb] {
        let out = state
            .check_and_initialize(&dest, &request(chroma, true, 1), &accept)
            .unwrap();
        let input = out.input_surface.unwrap();
        assert_eq!(input.u_plane_offset.y, u32::MAX - 3);
        assert_eq!(input.v_plane_offset.y, u32::MAX, "{chroma:?}");
    }
}

#[test]
fn probe_checks_destination_not_source_size() {
    let mut state = SfcJpegState::new(PlatformConfig::default());
    let req = TransformRequest {
        source_width: 0,
        source_height: 0,
        ..request(ChromaLayout::Yuv420, true, 1)
    };
    let out = state.check_and_initialize(&rgb_dest(), &req, &accept).unwrap();
    assert!(out.usable);
}
