use gst::prelude::*;
use tracing::{debug, info};

use crate::config::EffectConfig;
use crate::gst_utils;
use crate::pipeline::Pipeline;
use crate::{Result, TutorialError};

/// `source ! filter ! convert ! sink`, fully linked before it starts playing
pub struct EffectPipeline {
    pipeline: Pipeline,
    elements: Vec<gst::Element>,
}

impl EffectPipeline {
    pub fn build(config: &EffectConfig) -> Result<Self> {
        // All elements must exist before anything is put together
        let elements = gst_utils::make_elements(&config.factories())?;

        let pipeline = Pipeline::new(&config.pipeline_name);
        pipeline.add_elements(&elements)?;

        gst::Element::link_many(&elements).map_err(|e| {
            TutorialError::LinkError(format!(
                "{} ! {} ! {} ! {}: {}",
                config.source, config.filter, config.convert, config.sink, e
            ))
        })?;
        debug!("Linked {} elements in {}", elements.len(), config.pipeline_name);

        let source = &elements[0];
        if let Some(pattern) = &config.pattern {
            gst_utils::set_property_str(source, "pattern", pattern)?;
        }
        if let Some(num_buffers) = config.num_buffers {
            gst_utils::set_property_str(source, "num-buffers", &num_buffers.to_string())?;
        }
        gst_utils::apply_properties(&elements, &config.properties)?;

        info!(
            "Built effect pipeline: {} ! {} ! {} ! {}",
            config.source, config.filter, config.convert, config.sink
        );

        Ok(Self { pipeline, elements })
    }

    pub fn element(&self, name: &str) -> Option<&gst::Element> {
        self.elements.iter().find(|e| e.name().as_str() == name)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> Pipeline {
        self.pipeline
    }
}
