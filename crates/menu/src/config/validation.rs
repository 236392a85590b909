//! Configuration validation.

use tracing::debug;

use crate::config::MenuConfig;
use crate::error::ConfigError;

/// Validate the entire menu configuration.
pub fn validate_config(config: &MenuConfig) -> Result<(), ConfigError> {
    let selectors = &config.selectors;
    validate_token("selectors.triggerId", &selectors.trigger_id)?;
    validate_token("selectors.panelId", &selectors.panel_id)?;
    if let Some(logo_id) = &selectors.logo_id {
        validate_token("selectors.logoId", logo_id)?;
    }
    validate_selector("selectors.body", &selectors.body)?;
    validate_selector("selectors.links", &selectors.links)?;
    validate_selector("selectors.focusable", &selectors.focusable)?;

    let classes = &config.classes;
    validate_token("classes.open", &classes.open)?;
    validate_token("classes.active", &classes.active)?;
    validate_token("classes.noScroll", &classes.no_scroll)?;

    let thresholds = &config.thresholds;
    validate_threshold("thresholds.swipePx", thresholds.swipe_px)?;
    validate_threshold("thresholds.breakpointPx", thresholds.breakpoint_px)?;

    debug!(trigger = %selectors.trigger_id, panel = %selectors.panel_id, "validated menu configuration");
    Ok(())
}

/// Ids and class names must be single non-empty tokens.
fn validate_token(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            reason: "value cannot be empty".to_string(),
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidField {
            field,
            reason: format!("'{value}' must not contain whitespace"),
        });
    }
    Ok(())
}

/// Selectors are only checked for presence. Each host parses them at query
/// time with its own grammar and degrades when one is rejected.
fn validate_selector(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            reason: "selector cannot be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidField {
            field,
            reason: format!("{value} must be a finite, non-negative number of pixels"),
        });
    }
    Ok(())
}
