//! The two pipelines the binary can run.

pub mod decode;
pub mod effect;

pub use decode::DecodePipeline;
pub use effect::EffectPipeline;
