use gst::prelude::*;
use gst::MessageView;
use tracing::{error, info, warn};

use super::PipelineState;

/// Bus messages the run loop reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    Error {
        source: String,
        error: String,
        debug: Option<String>,
    },
    Eos,
    StateChanged {
        old: PipelineState,
        new: PipelineState,
        pending: PipelineState,
    },
    Other(String),
}

impl BusMessage {
    /// Convert a GStreamer message. State changes from anything other than
    /// `pipeline` itself are dropped.
    pub fn from_gst(msg: &gst::Message, pipeline: &gst::Object) -> Option<Self> {
        match msg.view() {
            MessageView::Error(err) => Some(BusMessage::Error {
                source: err
                    .src()
                    .map(|s| s.name().to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                error: err.error().to_string(),
                debug: err.debug().map(|d| d.to_string()),
            }),
            MessageView::Eos(_) => Some(BusMessage::Eos),
            MessageView::StateChanged(state_changed) => {
                if state_changed.src() != Some(pipeline) {
                    return None;
                }
                Some(BusMessage::StateChanged {
                    old: state_changed.old().into(),
                    new: state_changed.current().into(),
                    pending: state_changed.pending().into(),
                })
            }
            _ => Some(BusMessage::Other(format!("{:?}", msg.type_()))),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Eos,
    Error {
        source: String,
        error: String,
        debug: Option<String>,
    },
    /// The bus stopped delivering messages before a terminal one arrived
    BusClosed,
}

impl RunOutcome {
    pub fn is_eos(&self) -> bool {
        matches!(self, RunOutcome::Eos)
    }
}

/// Blocking source of bus messages
pub trait MessageSource {
    /// Wait for the next message; `None` once nothing more can arrive
    fn next_message(&mut self) -> Option<BusMessage>;
}

/// A pipeline's bus, popped without timeout and filtered to
/// error, end-of-stream and state-changed messages
pub struct PipelineBus {
    bus: gst::Bus,
    pipeline: gst::Object,
}

impl PipelineBus {
    pub fn new(bus: gst::Bus, pipeline: &gst::Pipeline) -> Self {
        Self {
            bus,
            pipeline: pipeline.clone().upcast(),
        }
    }
}

impl MessageSource for PipelineBus {
    fn next_message(&mut self) -> Option<BusMessage> {
        loop {
            let msg = self.bus.timed_pop_filtered(
                gst::ClockTime::NONE,
                &[
                    gst::MessageType::Error,
                    gst::MessageType::Eos,
                    gst::MessageType::StateChanged,
                ],
            )?;

            if let Some(message) = BusMessage::from_gst(&msg, &self.pipeline) {
                return Some(message);
            }
        }
    }
}

/// Consume messages until an error or end-of-stream arrives
pub fn run_until_terminal<S: MessageSource + ?Sized>(messages: &mut S, pipeline_name: &str) -> RunOutcome {
    while let Some(message) = messages.next_message() {
        match message {
            BusMessage::Error { source, error, debug } => {
                error!("Error received from element {}: {}", source, error);
                let debug_info = debug.as_deref().unwrap_or("none");
                error!("Debugging information: {}", debug_info);
                return RunOutcome::Error { source, error, debug };
            }
            BusMessage::Eos => {
                info!("End-Of-Stream reached on {}", pipeline_name);
                return RunOutcome::Eos;
            }
            BusMessage::StateChanged { old, new, .. } => {
                info!("Pipeline {} state changed from {:?} to {:?}", pipeline_name, old, new);
            }
            BusMessage::Other(kind) => {
                warn!("Unexpected message received: {}", kind);
            }
        }
    }

    warn!("Bus of {} closed before error or end-of-stream", pipeline_name);
    RunOutcome::BusClosed
}
