use gst::prelude::*;
use std::sync::Arc;

use pipeline_tutorials::router::{MediaKind, PadRouter, RoutablePad, RouteOutcome};

use super::init_test_environment;

/// Active, unparented source pad carrying `caps` as its current caps
fn src_pad(name: &str, caps: Option<&str>) -> gst::Pad {
    let pad = gst::Pad::builder(gst::PadDirection::Src).name(name).build();
    pad.set_active(true).unwrap();
    pad.store_sticky_event(&gst::event::StreamStart::new(name)).unwrap();
    if let Some(caps) = caps {
        let caps = gst::Caps::builder(caps).build();
        pad.store_sticky_event(&gst::event::Caps::new(&caps)).unwrap();
    }
    pad
}

fn router() -> (PadRouter<gst::Pad>, gst::Element, gst::Element) {
    let convert = gst::ElementFactory::make("identity").name("convert").build().unwrap();
    let videosink = gst::ElementFactory::make("fakesink").name("videosink").build().unwrap();
    let router = PadRouter::for_elements(&convert, &videosink).unwrap();
    (router, convert, videosink)
}

#[test]
fn test_routes_real_pads_by_caps() {
    init_test_environment();
    let (router, convert, videosink) = router();

    let audio = src_pad("src_0", Some("audio/x-raw"));
    assert_eq!(router.route(&audio), RouteOutcome::Linked(MediaKind::Audio));
    assert_eq!(
        audio.peer().and_then(|p| p.parent_element()).as_ref(),
        Some(&convert)
    );

    let second_audio = src_pad("src_1", Some("audio/x-raw"));
    assert_eq!(
        router.route(&second_audio),
        RouteOutcome::AlreadyLinked(MediaKind::Audio)
    );
    assert!(!second_audio.is_linked());

    let subtitles = src_pad("src_2", Some("text/x-raw"));
    assert_eq!(
        router.route(&subtitles),
        RouteOutcome::Ignored("text/x-raw".to_string())
    );
    assert!(!subtitles.is_linked());

    let video = src_pad("src_3", Some("video/x-raw"));
    assert_eq!(router.route(&video), RouteOutcome::Linked(MediaKind::Video));
    assert_eq!(
        video.peer().and_then(|p| p.parent_element()).as_ref(),
        Some(&videosink)
    );

    assert!(router.is_complete());
    assert_eq!(
        router.route(&src_pad("src_4", Some("video/x-raw"))),
        RouteOutcome::AlreadyComplete
    );
}

#[test]
fn test_pad_without_caps_is_skipped() {
    init_test_environment();
    let (router, _convert, _videosink) = router();

    let pad = src_pad("src_0", None);
    assert_eq!(router.route(&pad), RouteOutcome::NoCaps);
    assert!(!router.audio_sink().is_linked());
}

#[test]
fn test_pad_added_signal_drives_router() {
    init_test_environment();
    let (router, convert, _videosink) = router();
    let router = Arc::new(router);

    let source = gst::Bin::with_name("source");
    router.attach(source.upcast_ref::<gst::Element>());

    let audio = src_pad("src_0", Some("audio/x-raw"));
    source.add_pad(&audio).unwrap();

    assert!(audio.is_linked());
    assert_eq!(
        router.audio_sink().parent_element().as_ref(),
        Some(&convert)
    );
    assert!(router.audio_sink().is_linked());
    assert!(!router.video_sink().is_linked());
}

#[test]
fn test_real_pad_media_kind_follows_current_caps() {
    init_test_environment();

    assert_eq!(src_pad("src_0", Some("video/x-raw")).media_kind(), Some(MediaKind::Video));
    assert_eq!(src_pad("src_1", Some("audio/x-raw")).media_kind(), Some(MediaKind::Audio));
    assert_eq!(
        src_pad("src_2", Some("application/x-subtitle")).media_kind(),
        Some(MediaKind::Other("application/x-subtitle".to_string()))
    );
    assert_eq!(src_pad("src_3", None).media_kind(), None);
}
