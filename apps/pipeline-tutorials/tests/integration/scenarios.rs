use gst::prelude::*;
use std::collections::BTreeMap;

use pipeline_tutorials::{
    config::EffectConfig,
    pipeline::{self, PipelineError, RunOutcome},
    tutorials::EffectPipeline,
    TutorialError,
};

use super::{core_effect_config, init_test_environment};

fn with_property(mut config: EffectConfig, element: &str, property: &str, value: &str) -> EffectConfig {
    config
        .properties
        .entry(element.to_string())
        .or_insert_with(BTreeMap::new)
        .insert(property.to_string(), value.to_string());
    config
}

#[test]
fn test_runs_to_end_of_stream() {
    init_test_environment();

    let effect = EffectPipeline::build(&core_effect_config()).unwrap();
    let gst_pipeline = effect.pipeline().gst_pipeline().clone();

    let outcome = pipeline::run(effect.into_pipeline()).unwrap();
    assert_eq!(outcome, RunOutcome::Eos);
    assert_eq!(gst_pipeline.current_state(), gst::State::Null);
}

#[test]
fn test_error_before_eos_names_the_element() {
    init_test_environment();

    let config = EffectConfig {
        num_buffers: None,
        ..with_property(core_effect_config(), "filter", "error-after", "3")
    };

    let effect = EffectPipeline::build(&config).unwrap();
    let gst_pipeline = effect.pipeline().gst_pipeline().clone();

    match pipeline::run(effect.into_pipeline()).unwrap() {
        RunOutcome::Error { source, error, .. } => {
            assert_eq!(source, "filter");
            assert!(!error.is_empty());
        }
        other => panic!("Expected an error outcome, got {:?}", other),
    }
    assert_eq!(gst_pipeline.current_state(), gst::State::Null);
}

#[test]
fn test_state_change_failure_releases_pipeline() {
    init_test_environment();

    let config = with_property(core_effect_config(), "sink", "state-error", "null-to-ready");
    let effect = EffectPipeline::build(&config).unwrap();
    let gst_pipeline = effect.pipeline().gst_pipeline().clone();

    let result = pipeline::run(effect.into_pipeline());
    assert!(matches!(result, Err(PipelineError::StateChange { .. })));
    assert_eq!(gst_pipeline.current_state(), gst::State::Null);
}

#[test]
fn test_missing_element_is_reported() {
    init_test_environment();

    let config = EffectConfig {
        source: "no-such-source".to_string(),
        ..core_effect_config()
    };

    match EffectPipeline::build(&config) {
        Err(TutorialError::MissingElements(missing)) => {
            assert_eq!(missing, vec!["no-such-source".to_string()]);
        }
        Err(other) => panic!("Unexpected error: {}", other),
        Ok(_) => panic!("Pipeline built with a missing element"),
    }
}

#[test]
fn test_bad_property_value_is_reported_not_panicked() {
    init_test_environment();

    let config = with_property(core_effect_config(), "source", "num-buffers", "lots");

    match EffectPipeline::build(&config) {
        Err(TutorialError::ConfigError(message)) => {
            assert!(message.contains("num-buffers"), "{}", message);
        }
        Err(other) => panic!("Unexpected error: {}", other),
        Ok(_) => panic!("Pipeline built with an unparsable property"),
    }
}
