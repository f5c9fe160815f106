use gst::prelude::*;
use std::sync::Arc;
use tracing::info;

use crate::config::DecodeConfig;
use crate::gst_utils;
use crate::pipeline::Pipeline;
use crate::router::PadRouter;
use crate::{Result, TutorialError};

/// `uridecodebin` feeding `audioconvert ! audioresample ! autoaudiosink`
/// and `autovideosink`.
///
/// The source is left unlinked: its pads only appear once it has seen the
/// stream, and the [`PadRouter`] links them as they show up.
pub struct DecodePipeline {
    pipeline: Pipeline,
    router: Arc<PadRouter<gst::Pad>>,
}

impl DecodePipeline {
    pub fn build(config: &DecodeConfig) -> Result<Self> {
        let elements = gst_utils::make_elements(&config.factories())?;
        let [source, convert, resample, sink, videosink] = elements.as_slice() else {
            return Err(TutorialError::ConfigError(format!(
                "Expected 5 decode elements, got {}",
                elements.len()
            )));
        };

        let pipeline = Pipeline::new(&config.pipeline_name);
        pipeline.add_elements(&elements)?;

        gst::Element::link_many([convert, resample, sink]).map_err(|e| {
            TutorialError::LinkError(format!(
                "{} ! {} ! {}: {}",
                config.audio_convert, config.audio_resample, config.audio_sink, e
            ))
        })?;

        if !gst_utils::set_property_str(source, "uri", &config.uri)? {
            return Err(TutorialError::ConfigError(format!(
                "Source '{}' does not accept a URI",
                config.source
            )));
        }
        gst_utils::apply_properties(&elements, &config.properties)?;

        let router = Arc::new(PadRouter::for_elements(convert, videosink)?);
        router.attach(source);

        info!("Built decode pipeline for {}", config.uri);

        Ok(Self { pipeline, router })
    }

    pub fn router(&self) -> &Arc<PadRouter<gst::Pad>> {
        &self.router
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> Pipeline {
        self.pipeline
    }
}
