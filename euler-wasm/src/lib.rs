//! WASM bindings for Euler diagram synthesis.
//!
//! This crate provides JavaScript/WASM bindings for the euler-core library, enabling a
//! browser-based renderer to draw descriptions and inspect the steps behind each drawing.

use euler_core::{
    Decomposer, DecompositionStep, DecompositionStrategyType, Description, DiagramConfig, Recomposer, RecompositionStep,
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use tsify::Tsify;
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;

/// Removal of one curve, as shown to the renderer.
#[derive(Debug, Clone, Tsify, Serialize, Deserialize)]
pub struct DecompositionStepView {
    pub from: String,
    pub to: String,
    pub removed: String,
}

impl From<&DecompositionStep> for DecompositionStepView {
    fn from(step: &DecompositionStep) -> Self {
        DecompositionStepView {
            from: step.from.informal_description(),
            to: step.to.informal_description(),
            removed: step.removed.to_string(),
        }
    }
}

/// One contour added during recomposition.
#[derive(Debug, Clone, Tsify, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContourAddition {
    pub curve: String,
    pub kind: String,
    pub split_zones: Vec<String>,
}

/// Addition of one curve label, as shown to the renderer.
#[derive(Debug, Clone, Tsify, Serialize, Deserialize)]
pub struct RecompositionStepView {
    pub from: String,
    pub to: String,
    pub added: Vec<ContourAddition>,
}

impl From<&RecompositionStep> for RecompositionStepView {
    fn from(step: &RecompositionStep) -> Self {
        RecompositionStepView {
            from: step.from.informal_description(),
            to: step.to.informal_description(),
            added: step
                .data
                .iter()
                .map(|rd| ContourAddition {
                    curve: rd.added_curve.to_string(),
                    kind: rd.kind().to_string(),
                    split_zones: rd.split_zones.iter().map(|z| z.label()).collect(),
                })
                .collect(),
        }
    }
}

/// Initializes the logging system for WASM.
///
/// Sets up console logging and panic hooks for better error reporting in the browser.
/// Should be called once at application startup.
#[wasm_bindgen]
pub fn init_logs() {
    match log::set_logger(&DEFAULT_LOGGER) {
        Ok(_) => info!("Initialized console.logger"),
        Err(e) => error!("failed to set console.logger: {}", e),
    };
    console_error_panic_hook::set_once();
}

/// Updates the log level filter.
///
/// # Arguments
/// * `level` - Log level string: "error", "warn", "info", "debug", or "trace".
///   Defaults to "info" if empty or null.
#[wasm_bindgen]
pub fn update_log_level(level: JsValue) -> Result<(), JsError> {
    let level: Option<String> = serde_wasm_bindgen::from_value(level)?;
    log::set_max_level(euler_core::parse_log_level(level.as_deref()));
    Ok(())
}

fn parse_config(config: JsValue) -> Result<DiagramConfig, JsError> {
    let config: Option<DiagramConfig> = serde_wasm_bindgen::from_value(config)?;
    Ok(config.unwrap_or_default())
}

/// Decomposes a description (e.g. `"a b ab"`) curve by curve.
///
/// # Arguments
/// * `description` - Zones as whitespace-separated curve labels.
/// * `strategy` - Decomposition strategy name (e.g. "innermost"); the default when null.
#[wasm_bindgen]
pub fn decompose(description: &str, strategy: Option<String>) -> Result<JsValue, JsError> {
    let description: Description = description.parse()?;
    let strategy: DecompositionStrategyType = match strategy {
        Some(name) => name.parse().map_err(|e: String| JsError::new(&e))?,
        None => DecompositionStrategyType::default(),
    };
    let steps: Vec<DecompositionStepView> = Decomposer::new(strategy).decompose(&description).iter().map(Into::into).collect();
    Ok(serde_wasm_bindgen::to_value(&steps)?)
}

/// Decomposes then recomposes a description, using the strategies in `config` (a
/// `DiagramConfig`; defaults when null).
#[wasm_bindgen]
pub fn recompose(description: &str, config: JsValue) -> Result<JsValue, JsError> {
    let description: Description = description.parse()?;
    let config = parse_config(config)?;
    let d_steps = Decomposer::new(config.decomposition).decompose(&description);
    let steps: Vec<RecompositionStepView> = Recomposer::new(config.recomposition).recompose(&d_steps).iter().map(Into::into).collect();
    Ok(serde_wasm_bindgen::to_value(&steps)?)
}

/// Draws a description scaled to a `size`×`size` box.
///
/// # Returns
/// A `DiagramView`: contours, zones (with shading and centers) and the bounding box.
///
/// # Errors
/// If the description is malformed, or no configured recomposition strategy can be drawn.
#[wasm_bindgen]
pub fn make_diagram(description: &str, size: f64, config: JsValue) -> Result<JsValue, JsError> {
    let config = parse_config(config)?;
    let diagram = euler_core::draw(description, size, &config)?;
    Ok(serde_wasm_bindgen::to_value(&diagram.view())?)
}
