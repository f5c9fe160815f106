use gst::prelude::*;
use tracing::{debug, error, info, warn};

pub mod bus;
pub use bus::{run_until_terminal, BusMessage, MessageSource, PipelineBus, RunOutcome};

/// Pipeline state tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Null,
    Ready,
    Paused,
    Playing,
}

impl From<gst::State> for PipelineState {
    fn from(state: gst::State) -> Self {
        match state {
            gst::State::Null => PipelineState::Null,
            gst::State::Ready => PipelineState::Ready,
            gst::State::Paused => PipelineState::Paused,
            gst::State::Playing => PipelineState::Playing,
            gst::State::VoidPending => PipelineState::Null,
        }
    }
}

/// Pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Unable to set the pipeline to the {state:?} state: {error:?}")]
    StateChange {
        state: PipelineState,
        error: gst::StateChangeError,
    },
    #[error("Pipeline error: {0}")]
    Pipeline(String),
    #[error("Pipeline {0} has no bus")]
    NoBus(String),
}

/// The operations a run needs from a pipeline
pub trait PipelineControl {
    type Bus: MessageSource;

    fn name(&self) -> &str;

    /// Request the playing state
    fn play(&mut self) -> Result<(), PipelineError>;

    /// Take a reference to the pipeline's bus
    fn bus(&self) -> Result<Self::Bus, PipelineError>;

    /// Drop back to the null state. Must be safe to call more than once.
    fn release(&mut self);
}

/// Play `control` until error or end-of-stream, then tear it down.
///
/// Every exit path releases the bus reference first and the pipeline
/// afterwards. A failed state change is returned as an error once the
/// pipeline has been released.
pub fn run<C: PipelineControl>(mut control: C) -> Result<RunOutcome, PipelineError> {
    if let Err(err) = control.play() {
        error!("{}", err);
        control.release();
        return Err(err);
    }

    let mut bus = match control.bus() {
        Ok(bus) => bus,
        Err(err) => {
            control.release();
            return Err(err);
        }
    };

    let outcome = run_until_terminal(&mut bus, control.name());

    drop(bus);
    control.release();

    Ok(outcome)
}

/// Owns a `gst::Pipeline` and every element added to it.
///
/// The pipeline is set back to `Null` exactly once, either through
/// [`Pipeline::release`] or when dropped.
pub struct Pipeline {
    name: String,
    pipeline: gst::Pipeline,
    released: bool,
}

impl Pipeline {
    /// Create a new, empty pipeline with the given name
    pub fn new(name: &str) -> Self {
        debug!("Creating pipeline: {}", name);
        Self {
            name: name.to_string(),
            pipeline: gst::Pipeline::with_name(name),
            released: false,
        }
    }

    pub fn add_elements(&self, elements: &[gst::Element]) -> Result<(), PipelineError> {
        self.pipeline.add_many(elements).map_err(|e| {
            PipelineError::Pipeline(format!("Failed to add elements to {}: {}", self.name, e))
        })?;
        debug!("Added {} elements to pipeline: {}", elements.len(), self.name);
        Ok(())
    }

    pub fn current_state(&self) -> PipelineState {
        self.pipeline.state(gst::ClockTime::ZERO).1.into()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the underlying GStreamer pipeline
    pub fn gst_pipeline(&self) -> &gst::Pipeline {
        &self.pipeline
    }

    fn set_state(&self, state: gst::State) -> Result<gst::StateChangeSuccess, PipelineError> {
        self.pipeline
            .set_state(state)
            .map_err(|error| PipelineError::StateChange {
                state: state.into(),
                error,
            })
    }
}

impl PipelineControl for Pipeline {
    type Bus = PipelineBus;

    fn name(&self) -> &str {
        &self.name
    }

    fn play(&mut self) -> Result<(), PipelineError> {
        info!("Starting pipeline: {}", self.name);
        let success = self.set_state(gst::State::Playing)?;
        debug!("Pipeline {} state change: {:?}", self.name, success);
        Ok(())
    }

    fn bus(&self) -> Result<PipelineBus, PipelineError> {
        let bus = self
            .pipeline
            .bus()
            .ok_or_else(|| PipelineError::NoBus(self.name.clone()))?;
        Ok(PipelineBus::new(bus, &self.pipeline))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        info!("Stopping pipeline: {}", self.name);
        if let Err(e) = self.set_state(gst::State::Null) {
            warn!("Error stopping pipeline {}: {}", self.name, e);
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.release();
    }
}
