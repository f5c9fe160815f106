//! Linking of pads that appear at runtime on a demuxing source.
//!
//! `uridecodebin` only exposes its source pads once it has looked at the
//! stream, and may expose one per elementary stream. [`PadRouter`] decides for
//! each of them whether it feeds the audio branch, the video branch or nothing.

use gst::prelude::*;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const RAW_AUDIO: &str = "audio/x-raw";
pub const RAW_VIDEO: &str = "video/x-raw";

/// Media type of a pad, from the name of the first structure of its caps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    Other(String),
}

impl MediaKind {
    pub fn from_caps_type(caps_type: &str) -> Self {
        if caps_type.starts_with(RAW_AUDIO) {
            MediaKind::Audio
        } else if caps_type.starts_with(RAW_VIDEO) {
            MediaKind::Video
        } else {
            MediaKind::Other(caps_type.to_string())
        }
    }

    /// `None` for empty or ANY caps
    pub fn from_caps(caps: &gst::CapsRef) -> Option<Self> {
        caps.structure(0)
            .map(|s| Self::from_caps_type(s.name().as_str()))
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Audio => f.write_str(RAW_AUDIO),
            MediaKind::Video => f.write_str(RAW_VIDEO),
            MediaKind::Other(caps_type) => f.write_str(caps_type),
        }
    }
}

/// A connection point as seen by the router
pub trait RoutablePad {
    fn pad_name(&self) -> String;

    /// Kind of the current caps, `None` until negotiated
    fn media_kind(&self) -> Option<MediaKind>;

    fn has_peer(&self) -> bool;

    /// Link `self` (a source pad) to `sink`
    fn link_into(&self, sink: &Self) -> Result<(), gst::PadLinkError>;
}

impl RoutablePad for gst::Pad {
    fn pad_name(&self) -> String {
        self.name().to_string()
    }

    fn media_kind(&self) -> Option<MediaKind> {
        let caps = self.current_caps()?;
        MediaKind::from_caps(&caps)
    }

    fn has_peer(&self) -> bool {
        self.is_linked()
    }

    fn link_into(&self, sink: &Self) -> Result<(), gst::PadLinkError> {
        self.link(sink).map(|_| ())
    }
}

/// What a single routing decision did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Both branches were linked already, the new pad was not inspected
    AlreadyComplete,
    /// The new pad has no negotiated caps yet
    NoCaps,
    /// Neither raw audio nor raw video
    Ignored(String),
    /// The matching branch is linked to an earlier pad
    AlreadyLinked(MediaKind),
    Linked(MediaKind),
    LinkFailed(MediaKind, gst::PadLinkError),
}

/// Routes new source pads to one of two fixed sink pads.
///
/// Each sink pad is linked at most once. The whole check-then-link sequence
/// runs under one lock, so concurrent `pad-added` emissions from different
/// streaming threads cannot both link the same sink.
pub struct PadRouter<P> {
    audio_sink: P,
    video_sink: P,
    lock: Mutex<()>,
}

impl<P: RoutablePad> PadRouter<P> {
    pub fn new(audio_sink: P, video_sink: P) -> Self {
        Self {
            audio_sink,
            video_sink,
            lock: Mutex::new(()),
        }
    }

    pub fn audio_sink(&self) -> &P {
        &self.audio_sink
    }

    pub fn video_sink(&self) -> &P {
        &self.video_sink
    }

    /// Both branches are fed
    pub fn is_complete(&self) -> bool {
        self.audio_sink.has_peer() && self.video_sink.has_peer()
    }

    /// Decide where `new_pad` goes and link it there. Failures are logged,
    /// never returned as errors.
    pub fn route(&self, new_pad: &P) -> RouteOutcome {
        let _guard = self.lock.lock();

        if self.is_complete() {
            info!("We are already linked both audio and video. Ignoring.");
            return RouteOutcome::AlreadyComplete;
        }

        let Some(kind) = new_pad.media_kind() else {
            debug!("Pad '{}' has no negotiated caps yet. Ignoring.", new_pad.pad_name());
            return RouteOutcome::NoCaps;
        };

        let sink = match &kind {
            MediaKind::Audio => &self.audio_sink,
            MediaKind::Video => &self.video_sink,
            MediaKind::Other(caps_type) => {
                info!(
                    "It has type '{}' which is neither raw audio nor raw video. Ignoring.",
                    caps_type
                );
                return RouteOutcome::Ignored(caps_type.clone());
            }
        };

        if sink.has_peer() {
            info!("The {} branch is already linked. Ignoring pad '{}'.", kind, new_pad.pad_name());
            return RouteOutcome::AlreadyLinked(kind);
        }

        match new_pad.link_into(sink) {
            Ok(()) => {
                info!("Link succeeded (type '{}').", kind);
                RouteOutcome::Linked(kind)
            }
            Err(err) => {
                warn!("Type is '{}' but link failed: {:?}", kind, err);
                RouteOutcome::LinkFailed(kind, err)
            }
        }
    }
}

impl PadRouter<gst::Pad> {
    /// Build a router over the `sink` pads of the audio entry and video entry elements
    pub fn for_elements(audio: &gst::Element, video: &gst::Element) -> crate::Result<Self> {
        let static_sink = |element: &gst::Element| {
            element.static_pad("sink").ok_or_else(|| {
                crate::TutorialError::LinkError(format!("Element '{}' has no sink pad", element.name()))
            })
        };

        Ok(Self::new(static_sink(audio)?, static_sink(video)?))
    }

    /// Route every pad `source` adds from now on
    pub fn attach(self: &Arc<Self>, source: &gst::Element) -> gst::glib::SignalHandlerId {
        let router = Arc::clone(self);
        source.connect_pad_added(move |src, new_pad| {
            info!("Received new pad '{}' from '{}'", new_pad.name(), src.name());
            let outcome = router.route(new_pad);
            debug!("Routing of pad '{}': {:?}", new_pad.name(), outcome);
        })
    }
}
