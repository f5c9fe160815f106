pub mod routing;
pub mod scenarios;

use pipeline_tutorials::config::EffectConfig;

pub fn init_test_environment() {
    // Initialize GStreamer once for all tests
    gst::init().ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Effect pipeline made only of core elements, so it runs headless
pub fn core_effect_config() -> EffectConfig {
    EffectConfig {
        pipeline_name: "core-effect".to_string(),
        source: "fakesrc".to_string(),
        filter: "identity".to_string(),
        convert: "identity".to_string(),
        sink: "fakesink".to_string(),
        pattern: None,
        num_buffers: Some(20),
        ..EffectConfig::default()
    }
}
