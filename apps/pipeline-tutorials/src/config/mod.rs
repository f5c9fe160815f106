use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Element names used inside the effect pipeline, in link order.
pub const EFFECT_ELEMENTS: &[&str] = &["source", "filter", "convert", "sink"];

/// Element names used inside the decode pipeline.
pub const DECODE_ELEMENTS: &[&str] = &["source", "convert", "resample", "sink", "videosink"];

pub const DEFAULT_URI: &str =
    "https://gstreamer.freedesktop.org/data/media/sintel_trailer-480p.webm";

/// Extra `property = "value"` pairs keyed by element name
pub type ElementProperties = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub effect: EffectConfig,
    pub decode: DecodeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

/// Static pipeline: source ! filter ! convert ! sink
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EffectConfig {
    pub pipeline_name: String,
    pub source: String,
    pub filter: String,
    pub convert: String,
    pub sink: String,
    /// Value for the source's `pattern` property, skipped if the source has none
    pub pattern: Option<String>,
    /// Stop after this many buffers, `None` runs until the sink gives up
    pub num_buffers: Option<i32>,
    pub properties: ElementProperties,
}

/// Dynamic pipeline: uridecodebin feeding an audio chain and a video sink
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub pipeline_name: String,
    pub uri: String,
    pub source: String,
    pub audio_convert: String,
    pub audio_resample: String,
    pub audio_sink: String,
    pub video_sink: String,
    pub properties: ElementProperties,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Pipeline Tutorials".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            pipeline_name: "test-pipeline".to_string(),
            source: "videotestsrc".to_string(),
            filter: "vertigotv".to_string(),
            convert: "videoconvert".to_string(),
            sink: "autovideosink".to_string(),
            pattern: Some("smpte".to_string()),
            num_buffers: None,
            properties: ElementProperties::new(),
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            pipeline_name: "test-pipeline".to_string(),
            uri: DEFAULT_URI.to_string(),
            source: "uridecodebin".to_string(),
            audio_convert: "audioconvert".to_string(),
            audio_resample: "audioresample".to_string(),
            audio_sink: "autoaudiosink".to_string(),
            video_sink: "autovideosink".to_string(),
            properties: ElementProperties::new(),
        }
    }
}

impl EffectConfig {
    /// Factory names in link order, paired with their element names
    pub fn factories(&self) -> [(&str, &str); 4] {
        [
            (self.source.as_str(), "source"),
            (self.filter.as_str(), "filter"),
            (self.convert.as_str(), "convert"),
            (self.sink.as_str(), "sink"),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        validate_factories("effect", &self.factories())?;
        if let Some(num_buffers) = self.num_buffers {
            if num_buffers < -1 {
                return Err(format!("effect.num_buffers must be -1 or greater, got {}", num_buffers));
            }
        }
        validate_properties("effect", &self.properties, EFFECT_ELEMENTS)
    }
}

impl DecodeConfig {
    pub fn factories(&self) -> [(&str, &str); 5] {
        [
            (self.source.as_str(), "source"),
            (self.audio_convert.as_str(), "convert"),
            (self.audio_resample.as_str(), "resample"),
            (self.audio_sink.as_str(), "sink"),
            (self.video_sink.as_str(), "videosink"),
        ]
    }

    fn validate(&self) -> Result<(), String> {
        validate_factories("decode", &self.factories())?;
        if !self.uri.contains("://") {
            return Err(format!("decode.uri is not a valid URI: '{}'", self.uri));
        }
        validate_properties("decode", &self.properties, DECODE_ELEMENTS)
    }
}

fn validate_factories(section: &str, factories: &[(&str, &str)]) -> Result<(), String> {
    for (factory, element) in factories {
        if factory.trim().is_empty() {
            return Err(format!("{}: factory for '{}' must not be empty", section, element));
        }
    }
    Ok(())
}

fn validate_properties(
    section: &str,
    properties: &ElementProperties,
    known: &[&str],
) -> Result<(), String> {
    for element in properties.keys() {
        if !known.contains(&element.as_str()) {
            return Err(format!(
                "{}.properties: unknown element '{}', expected one of {:?}",
                section, element, known
            ));
        }
    }
    Ok(())
}

/// Which pipeline section a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Effect,
    Decode,
}

impl AppConfig {
    fn validate(&self) -> Result<(), String> {
        if self.log_level.trim().is_empty() {
            return Err("app.log_level must not be empty".to_string());
        }
        Ok(())
    }
}

impl Config {
    /// Validate `[app]` and the section of the pipeline about to run.
    /// The other section is left alone.
    pub fn validate(&self, kind: PipelineKind) -> Result<(), String> {
        self.app.validate()?;

        match kind {
            PipelineKind::Effect => self.effect.validate(),
            PipelineKind::Decode => self.decode.validate(),
        }
    }

    pub fn from_file(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Err(crate::TutorialError::ConfigError(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::TutorialError::ConfigError(format!(
                "Failed to read configuration file {:?}: {}",
                path, e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            crate::TutorialError::ConfigError(format!(
                "Failed to parse configuration file {:?}: {}",
                path, e
            ))
        })?;

        config.app.validate().map_err(crate::TutorialError::ConfigError)?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from `path` if given, otherwise fall back to the built-in defaults
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}
