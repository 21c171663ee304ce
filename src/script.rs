//! Interaction scripts replayed against a simulated page.
//!
//! A script describes the page (viewport, host capabilities, markup layout)
//! and a list of steps. Replaying it boots a [`Page`], applies each step in
//! order, and records a [`Snapshot`] after boot and after every step.
//!
//! ```toml
//! viewport_width = 1024
//!
//! [layout]
//! slides = 3
//!
//! [[step]]
//! action = "click"
//! selector = ".carousel-btn.next"
//!
//! [[step]]
//! action = "advance"
//! ms = 12000
//! ```

use crate::config::{self, ConfigError, ControllerConfig};
use crate::dom::{ElementId, Key};
use crate::sim::fixture::{PageLayout, standard_page};
use crate::sim::Page;
use crate::site::Snapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Script parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No element matches selector: {0}")]
    NoMatch(String),
    #[error("advance of {0}ms exceeds the {max}ms limit per step", max = MAX_ADVANCE_MS)]
    AdvanceTooLong(u64),
}

/// Longest virtual time a single `advance` step may cover (one day).
pub const MAX_ADVANCE_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "enabled")]
    pub touch: bool,
    #[serde(default = "enabled")]
    pub intersection_observer: bool,
    #[serde(default)]
    pub layout: PageLayout,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_viewport_width() -> u32 {
    1024
}

fn enabled() -> bool {
    true
}

fn default_swipe_selector() -> String {
    crate::carousel::CONTAINER_SELECTOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Click {
        selector: String,
    },
    Hover {
        selector: String,
    },
    Unhover {
        selector: String,
    },
    /// Key name as the browser reports it (`ArrowLeft`, `Escape`, ...).
    Key {
        key: String,
    },
    Resize {
        width: u32,
    },
    Scroll {
        y: u32,
    },
    Swipe {
        #[serde(default = "default_swipe_selector")]
        selector: String,
        from: f64,
        to: f64,
    },
    /// Every element matching the selector scrolls into view.
    Intersect {
        selector: String,
    },
    Advance {
        ms: u64,
    },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click { selector } => write!(f, "click {selector}"),
            Step::Hover { selector } => write!(f, "hover {selector}"),
            Step::Unhover { selector } => write!(f, "unhover {selector}"),
            Step::Key { key } => write!(f, "key {key}"),
            Step::Resize { width } => write!(f, "resize {width}px"),
            Step::Scroll { y } => write!(f, "scroll {y}px"),
            Step::Swipe { selector, from, to } => write!(f, "swipe {selector} {from}→{to}"),
            Step::Intersect { selector } => write!(f, "intersect {selector}"),
            Step::Advance { ms } => write!(f, "advance {ms}ms"),
        }
    }
}

/// State after one step. Step 0 is the freshly booted page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub step: usize,
    pub action: String,
    pub snapshot: Snapshot,
}

pub fn parse_script(content: &str) -> Result<Script, ScriptError> {
    Ok(toml::from_str(content)?)
}

pub fn load_script(path: &Path) -> Result<Script, ScriptError> {
    let content = std::fs::read_to_string(path)?;
    parse_script(&content)
}

/// Replay `script` under `config`.
pub fn run_script(script: &Script, config: ControllerConfig) -> Result<Vec<TraceEntry>, ScriptError> {
    let mut dom = standard_page(&script.layout, script.viewport_width);
    dom.set_touch(script.touch);
    dom.set_intersection_observer(script.intersection_observer);
    let mut page = Page::boot(dom, config);

    let mut trace = vec![TraceEntry {
        step: 0,
        action: "boot".to_string(),
        snapshot: page.snapshot(),
    }];

    for (i, step) in script.steps.iter().enumerate() {
        debug!(step = i + 1, %step, "replaying");
        apply(&mut page, step)?;
        trace.push(TraceEntry {
            step: i + 1,
            action: step.to_string(),
            snapshot: page.snapshot(),
        });
    }
    Ok(trace)
}

/// Load the script and the config directory (if any) and replay.
pub fn replay_file(path: &Path, config_dir: Option<&Path>) -> Result<Vec<TraceEntry>, ScriptError> {
    let script = load_script(path)?;
    let config = match config_dir {
        Some(dir) => config::load_config(dir)?,
        None => ControllerConfig::default(),
    };
    run_script(&script, config)
}

pub fn trace_to_json(trace: &[TraceEntry]) -> Result<String, ScriptError> {
    Ok(serde_json::to_string_pretty(trace)?)
}

fn apply(page: &mut Page, step: &Step) -> Result<(), ScriptError> {
    match step {
        Step::Click { selector } => {
            let el = find(page, selector)?;
            page.click(el);
        }
        Step::Hover { selector } => {
            let el = find(page, selector)?;
            page.hover(el);
        }
        Step::Unhover { selector } => {
            let el = find(page, selector)?;
            page.unhover(el);
        }
        Step::Key { key } => {
            page.key(Key::from_name(key));
        }
        Step::Resize { width } => page.resize(*width),
        Step::Scroll { y } => page.scroll(*y),
        Step::Swipe { selector, from, to } => {
            let el = find(page, selector)?;
            page.swipe(el, *from, *to);
        }
        Step::Intersect { selector } => {
            let targets = page.find_all(selector);
            if targets.is_empty() {
                return Err(ScriptError::NoMatch(selector.clone()));
            }
            for el in targets {
                page.intersect(el);
            }
        }
        Step::Advance { ms } => {
            if *ms > MAX_ADVANCE_MS {
                return Err(ScriptError::AdvanceTooLong(*ms));
            }
            page.advance(*ms);
        }
    }
    Ok(())
}

fn find(page: &Page, selector: &str) -> Result<ElementId, ScriptError> {
    page.find(selector)
        .ok_or_else(|| ScriptError::NoMatch(selector.to_string()))
}
