use gst::glib;
use gst::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, info, warn};

use crate::{Result, TutorialError};

/// Represents which element factories were found in the GStreamer installation
#[derive(Debug, Clone, Default)]
pub struct GstCapabilities {
    pub available_elements: HashMap<String, bool>,
}

impl GstCapabilities {
    /// Check if a specific element is available
    pub fn has_element(&self, element: &str) -> bool {
        self.available_elements.get(element).copied().unwrap_or(false)
    }

    pub fn missing(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .available_elements
            .iter()
            .filter(|(_, found)| !**found)
            .map(|(name, _)| name.clone())
            .collect();
        missing.sort();
        missing
    }
}

/// Initialize GStreamer with error handling and logging
pub fn initialize() -> Result<()> {
    info!("Initializing GStreamer");

    gst::init().map_err(|e| {
        error!("Failed to initialize GStreamer: {}", e);
        TutorialError::ConfigError(format!("GStreamer initialization failed: {}", e))
    })?;

    let (major, minor, micro, nano) = gst::version();
    info!("GStreamer version: {}.{}.{}.{}", major, minor, micro, nano);

    if let Ok(debug_str) = std::env::var("GST_DEBUG") {
        debug!("GST_DEBUG set to: {}", debug_str);
    }

    if let Ok(plugin_path) = std::env::var("GST_PLUGIN_PATH") {
        info!("Using custom GST_PLUGIN_PATH: {}", plugin_path);
    }

    Ok(())
}

/// Look up each factory in the registry without instantiating anything
pub fn discover_plugins(factories: &[&str]) -> GstCapabilities {
    let mut available_elements = HashMap::new();

    for factory in factories {
        if let Some(found) = gst::ElementFactory::find(factory) {
            debug!("Found element: {} (rank: {:?})", factory, found.rank());
            available_elements.insert(factory.to_string(), true);
        } else {
            warn!("Missing element: {}", factory);
            available_elements.insert(factory.to_string(), false);
        }
    }

    GstCapabilities { available_elements }
}

/// Create every `(factory, name)` pair, reporting all missing factories at once
pub fn make_elements(specs: &[(&str, &str)]) -> Result<Vec<gst::Element>> {
    let mut elements = Vec::with_capacity(specs.len());
    let mut missing = Vec::new();

    for (factory, name) in specs {
        match gst::ElementFactory::make(factory).name(*name).build() {
            Ok(element) => {
                debug!("Created element '{}' from factory '{}'", name, factory);
                elements.push(element);
            }
            Err(err) => {
                error!("Could not create element '{}' ({}): {}", name, factory, err);
                missing.push(factory.to_string());
            }
        }
    }

    if !missing.is_empty() {
        return Err(TutorialError::MissingElements(missing));
    }

    Ok(elements)
}

/// Set a property from its string form, if the element has it.
///
/// Returns `Ok(false)` when the element has no such property. A value that
/// does not parse into the property's type, or falls outside its range, is a
/// configuration error.
pub fn set_property_str(element: &gst::Element, property: &str, value: &str) -> Result<bool> {
    let Some(pspec) = element.find_property(property) else {
        warn!(
            "Element '{}' has no property '{}', not setting it",
            element.name(),
            property
        );
        return Ok(false);
    };

    let invalid = |reason: String| {
        TutorialError::ConfigError(format!(
            "Invalid value '{}' for {}::{}: {}",
            value,
            element.name(),
            property,
            reason
        ))
    };

    if !pspec.flags().contains(glib::ParamFlags::WRITABLE) {
        return Err(invalid("property is not writable".to_string()));
    }

    let parsed = glib::Value::deserialize(value, pspec.value_type())
        .map_err(|_| invalid(format!("expected a {}", pspec.value_type().name())))?;
    check_range(&pspec, &parsed).map_err(invalid)?;

    debug!("Setting {}::{} = {}", element.name(), property, value);
    element.set_property_from_value(property, &parsed);
    Ok(true)
}

/// Numeric properties reject values outside their declared bounds
fn check_range(pspec: &glib::ParamSpec, value: &glib::Value) -> std::result::Result<(), String> {
    macro_rules! bounded {
        ($spec:ty, $t:ty) => {
            if let Some(spec) = pspec.downcast_ref::<$spec>() {
                let v = value.get::<$t>().map_err(|e| e.to_string())?;
                if v < spec.minimum() || v > spec.maximum() {
                    return Err(format!(
                        "{} is outside {}..={}",
                        v,
                        spec.minimum(),
                        spec.maximum()
                    ));
                }
                return Ok(());
            }
        };
    }

    bounded!(glib::ParamSpecInt, i32);
    bounded!(glib::ParamSpecUInt, u32);
    bounded!(glib::ParamSpecInt64, i64);
    bounded!(glib::ParamSpecUInt64, u64);
    bounded!(glib::ParamSpecFloat, f32);
    bounded!(glib::ParamSpecDouble, f64);

    Ok(())
}

/// Apply the configured extra properties to the elements they name
pub fn apply_properties(
    elements: &[gst::Element],
    properties: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<()> {
    for element in elements {
        let Some(props) = properties.get(element.name().as_str()) else {
            continue;
        };
        for (property, value) in props {
            set_property_str(element, property, value)?;
        }
    }
    Ok(())
}

/// Print detailed plugin information (for --check-plugins flag)
pub fn print_plugin_info(title: &str, capabilities: &GstCapabilities) {
    println!("\n{}", title);
    println!("{}", "=".repeat(title.len()));

    let (major, minor, micro, nano) = gst::version();
    println!("\nGStreamer Version: {}.{}.{}.{}", major, minor, micro, nano);

    if let Ok(plugin_path) = std::env::var("GST_PLUGIN_PATH") {
        println!("Custom Plugin Path: {}", plugin_path);
    }

    let mut names: Vec<&String> = capabilities.available_elements.keys().collect();
    names.sort();

    println!("\nElements:");
    for name in names {
        let status = if capabilities.has_element(name) { "✓" } else { "✗" };
        println!("  {} {}", status, name);
    }

    let registry = gst::Registry::get();
    println!("\nRegistry Statistics:");
    println!("  Total Plugins: {}", registry.plugins().len());
}
