//! Controller configuration module.
//!
//! Handles loading, validating, and merging `site-controls.toml`. Stock
//! defaults are the base layer; a user file only needs the keys it wants to
//! change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [carousel]
//! auto_play = true              # Advance slides on a timer
//! interval_ms = 5000            # Time each slide stays up
//! transition_ms = 700           # Slide transition length (cloned-slide snap)
//! restart_on_manual_nav = true  # Manual navigation restarts the timer
//! swipe_threshold = 50          # Minimum horizontal travel for a swipe
//! cloned_slides = 0             # Trailing clones for seamless looping
//!
//! [viewport]
//! breakpoint = 768              # Widths at or below are mobile
//! resize_debounce_ms = 0        # 0 = handle every resize immediately
//!
//! [header]
//! scrolled_offset = 100         # Scroll offset that marks the header scrolled
//! scroll_throttle_ms = 100
//!
//! [reveal]
//! selector = ".service-card, .slide-content"
//!
//! [lazy]
//! source_attribute = "data-src"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILENAME: &str = "site-controls.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Controller configuration.
///
/// All fields have defaults matching the stock page script. Unknown keys are
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Slide timing, swipe sensitivity and wrap strategy.
    pub carousel: CarouselConfig,
    /// Mobile/desktop breakpoint.
    pub viewport: ViewportConfig,
    /// Header scroll marker.
    pub header: HeaderConfig,
    /// Reveal-on-scroll targets.
    pub reveal: RevealConfig,
    /// Deferred image loading.
    pub lazy: LazyConfig,
}

impl ControllerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.carousel.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be greater than 0".into(),
            ));
        }
        if !(self.carousel.swipe_threshold.is_finite() && self.carousel.swipe_threshold > 0.0) {
            return Err(ConfigError::Validation(
                "carousel.swipe_threshold must be a positive finite number".into(),
            ));
        }
        if self.viewport.breakpoint == 0 {
            return Err(ConfigError::Validation(
                "viewport.breakpoint must be greater than 0".into(),
            ));
        }
        if self.reveal.selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reveal.selector must not be empty".into(),
            ));
        }
        if self.lazy.source_attribute.trim().is_empty() {
            return Err(ConfigError::Validation(
                "lazy.source_attribute must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Carousel behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Advance slides automatically.
    pub auto_play: bool,
    /// Auto-advance period in milliseconds.
    pub interval_ms: u64,
    /// Slide transition length. With cloned slides this is how long the
    /// clone stays up before snapping back to the real first slide.
    pub transition_ms: u64,
    /// Restart the auto-advance timer from zero after manual navigation
    /// instead of keeping its phase.
    pub restart_on_manual_nav: bool,
    /// Horizontal travel a swipe must exceed.
    pub swipe_threshold: f64,
    /// Number of trailing slides that duplicate the leading ones for
    /// seamless looping. 0 selects plain modulo wrapping.
    pub cloned_slides: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_play: true,
            interval_ms: 5000,
            transition_ms: 700,
            restart_on_manual_nav: true,
            swipe_threshold: 50.0,
            cloned_slides: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    /// Widths at or below this are mobile.
    pub breakpoint: u32,
    /// Debounce window for resize handling; 0 handles every resize.
    pub resize_debounce_ms: u64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            breakpoint: 768,
            resize_debounce_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    /// The header is marked `scrolled` once `scroll_y` exceeds this.
    pub scrolled_offset: u32,
    pub scroll_throttle_ms: u64,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scrolled_offset: 100,
            scroll_throttle_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Elements that fade in on first entering the viewport.
    pub selector: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".service-card, .slide-content".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyConfig {
    /// Attribute holding the deferred image source.
    pub source_attribute: String,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            source_attribute: "data-src".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// `ControllerConfig::default()` as a TOML table, the bottom layer every
/// user file is merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ControllerConfig::default()).expect("default config must serialize")
}

/// Layer `overlay` onto `base`. Sections combine key by key, so a user file
/// that sets one carousel key keeps every other carousel default; any
/// non-table value in the overlay wins outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `site-controls.toml` from `dir` without interpreting it. A missing
/// file is `Ok(None)`, not an error.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Turn layered TOML into a checked [`ControllerConfig`]. Unknown keys and
/// out-of-range values are both errors here.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ControllerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ControllerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site-controls.toml` in the given directory, on top of
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<ControllerConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `site-controls.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Site Controls Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Carousel
# ---------------------------------------------------------------------------
[carousel]
# Advance slides automatically.
auto_play = true

# Milliseconds each slide stays up under auto-advance.
interval_ms = 5000

# Slide transition length in milliseconds.
transition_ms = 700

# Clicking a button or indicator, pressing an arrow key or swiping restarts
# the auto-advance timer, so the next slide gets a full interval.
restart_on_manual_nav = true

# Horizontal travel (CSS pixels) a touch swipe must exceed.
swipe_threshold = 50.0

# Trailing slides that repeat the leading ones for a seamless loop.
# 0 wraps from the last slide straight back to the first.
cloned_slides = 0

# ---------------------------------------------------------------------------
# Viewport
# ---------------------------------------------------------------------------
[viewport]
# Viewport widths at or below this use the mobile menu and click dropdowns.
breakpoint = 768

# Wait this long after the last resize before re-evaluating the layout.
# 0 re-evaluates on every resize event.
resize_debounce_ms = 0

# ---------------------------------------------------------------------------
# Header
# ---------------------------------------------------------------------------
[header]
# The header gets the "scrolled" class past this scroll offset.
scrolled_offset = 100

# Minimum time between scroll evaluations.
scroll_throttle_ms = 100

# ---------------------------------------------------------------------------
# Reveal on scroll
# ---------------------------------------------------------------------------
[reveal]
# Elements that fade in the first time they enter the viewport.
selector = ".service-card, .slide-content"

# ---------------------------------------------------------------------------
# Lazy images
# ---------------------------------------------------------------------------
[lazy]
# Attribute holding the deferred image source.
source_attribute = "data-src"
"##
}
