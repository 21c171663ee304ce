//! CLI output formatting for replay traces and resolved config.
//!
//! # Trace Display
//!
//! Each step leads with its zero-padded index and action. Indented context
//! lines list the state fields that step changed; the boot entry lists every
//! field so the trace reads as "initial state, then deltas".
//!
//! ```text
//! 000 boot
//!     viewport: desktop
//!     slide: 1/3
//!     auto-advance: on
//!     menu: closed
//!     ...
//! 001 click .carousel-btn.next
//!     slide: 2/3
//!     changes: 1
//! 002 advance 5000ms
//!     slide: 3/3
//!     changes: 2
//! 003 key Escape
//!     (no change)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. The HTML report
//! is rendered with Maud.

use crate::config::ControllerConfig;
use crate::script::TraceEntry;
use crate::site::Snapshot;
use maud::{DOCTYPE, Markup, html};

// ============================================================================
// Shared helpers
// ============================================================================

fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Comma-separated 1-based positions, or `-` when empty.
fn positions(indices: &[usize]) -> String {
    if indices.is_empty() {
        "-".to_string()
    } else {
        indices
            .iter()
            .map(|i| (i + 1).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Labelled display values for every snapshot field, in display order.
fn snapshot_fields(snapshot: &Snapshot) -> Vec<(&'static str, String)> {
    let slide = match snapshot.active_slide {
        Some(i) => format!("{}/{}", i + 1, snapshot.slide_count),
        None => "-".to_string(),
    };
    vec![
        ("viewport", snapshot.viewport.to_string()),
        ("slide", slide),
        ("auto-advance", on_off(snapshot.auto_advance).to_string()),
        (
            "menu",
            if snapshot.menu_open { "open" } else { "closed" }.to_string(),
        ),
        ("submenus", positions(&snapshot.open_submenus)),
        ("dropdowns", positions(&snapshot.open_dropdowns)),
        ("dropdown listeners", snapshot.dropdown_listeners.to_string()),
        ("images loaded", snapshot.loaded_images.to_string()),
        ("revealed", snapshot.revealed.to_string()),
        ("changes", snapshot.slide_changes.to_string()),
    ]
}

// ============================================================================
// Replay trace
// ============================================================================

/// Format a replay trace as display lines.
pub fn format_trace(trace: &[TraceEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut previous: Option<Vec<(&'static str, String)>> = None;

    for entry in trace {
        lines.push(format!("{} {}", format_index(entry.step), entry.action));
        let fields = snapshot_fields(&entry.snapshot);
        let mut changed = 0;
        for (i, (label, value)) in fields.iter().enumerate() {
            let same = previous.as_ref().is_some_and(|p| p[i].1 == *value);
            if !same {
                lines.push(format!("{}{}: {}", indent(1), label, value));
                changed += 1;
            }
        }
        if changed == 0 {
            lines.push(format!("{}(no change)", indent(1)));
        }
        previous = Some(fields);
    }
    lines
}

pub fn print_trace(trace: &[TraceEntry]) {
    for line in format_trace(trace) {
        println!("{}", line);
    }
}

// ============================================================================
// Config
// ============================================================================

/// Format the resolved config, one `section.key = value` per line.
pub fn format_config(config: &ControllerConfig) -> Vec<String> {
    let c = &config.carousel;
    let v = &config.viewport;
    let h = &config.header;
    vec![
        "Carousel".to_string(),
        format!("{}auto_play = {}", indent(1), c.auto_play),
        format!("{}interval_ms = {}", indent(1), c.interval_ms),
        format!("{}transition_ms = {}", indent(1), c.transition_ms),
        format!("{}restart_on_manual_nav = {}", indent(1), c.restart_on_manual_nav),
        format!("{}swipe_threshold = {}", indent(1), c.swipe_threshold),
        format!("{}cloned_slides = {}", indent(1), c.cloned_slides),
        "Viewport".to_string(),
        format!("{}breakpoint = {}", indent(1), v.breakpoint),
        format!("{}resize_debounce_ms = {}", indent(1), v.resize_debounce_ms),
        "Header".to_string(),
        format!("{}scrolled_offset = {}", indent(1), h.scrolled_offset),
        format!("{}scroll_throttle_ms = {}", indent(1), h.scroll_throttle_ms),
        "Reveal".to_string(),
        format!("{}selector = {:?}", indent(1), config.reveal.selector),
        "Lazy".to_string(),
        format!("{}source_attribute = {:?}", indent(1), config.lazy.source_attribute),
    ]
}

pub fn print_config(config: &ControllerConfig) {
    for line in format_config(config) {
        println!("{}", line);
    }
}

// ============================================================================
// HTML report
// ============================================================================

/// Render a replay trace as a standalone HTML table.
pub fn render_trace_html(title: &str, trace: &[TraceEntry]) -> Markup {
    let rows: Vec<Vec<(&'static str, String)>> =
        trace.iter().map(|e| snapshot_fields(&e.snapshot)).collect();
    let labels: Vec<&'static str> = rows
        .first()
        .map(|fields| fields.iter().map(|(label, _)| *label).collect())
        .unwrap_or_default();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (title) }
                style { (REPORT_CSS) }
            }
            body {
                h1 { (title) }
                table.trace {
                    thead {
                        tr {
                            th { "#" }
                            th { "action" }
                            @for label in &labels {
                                th { (label) }
                            }
                        }
                    }
                    tbody {
                        @for (row, entry) in trace.iter().enumerate() {
                            tr {
                                td { (format_index(entry.step)) }
                                td.action { (entry.action) }
                                @for (i, field) in rows[row].iter().enumerate() {
                                    @let changed = row > 0 && rows[row - 1][i].1 != field.1;
                                    td class=[changed.then_some("changed")] { (field.1) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

const REPORT_CSS: &str = "\
body { font-family: system-ui, sans-serif; margin: 2rem; }
table.trace { border-collapse: collapse; font-size: 0.9rem; }
table.trace th, table.trace td { border: 1px solid #ccc; padding: 0.25rem 0.5rem; }
td.action { font-family: ui-monospace, monospace; }
td.changed { background: #fff3c4; }
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ViewportMode;

    fn snapshot() -> Snapshot {
        Snapshot {
            viewport: ViewportMode::Desktop,
            active_slide: Some(0),
            slide_count: 3,
            auto_advance: true,
            menu_open: false,
            open_submenus: vec![],
            open_dropdowns: vec![],
            dropdown_listeners: 4,
            loaded_images: 0,
            revealed: 0,
            slide_changes: 0,
        }
    }

    fn entry(step: usize, action: &str, snapshot: Snapshot) -> TraceEntry {
        TraceEntry {
            step,
            action: action.to_string(),
            snapshot,
        }
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(positions(&[]), "-");
        assert_eq!(positions(&[0, 2]), "1, 3");
    }

    #[test]
    fn boot_lists_every_field() {
        let lines = format_trace(&[entry(0, "boot", snapshot())]);
        assert_eq!(lines[0], "000 boot");
        assert_eq!(lines.len(), 1 + snapshot_fields(&snapshot()).len());
        assert!(lines.contains(&"    slide: 1/3".to_string()));
        assert!(lines.contains(&"    auto-advance: on".to_string()));
    }

    #[test]
    fn later_steps_list_only_changes() {
        let mut next = snapshot();
        next.active_slide = Some(1);
        next.slide_changes = 1;
        let lines = format_trace(&[
            entry(0, "boot", snapshot()),
            entry(1, "click .carousel-btn.next", next.clone()),
            entry(2, "key Escape", next),
        ]);
        let tail: Vec<_> = lines.iter().skip_while(|l| !l.starts_with("001")).collect();
        assert_eq!(
            tail,
            vec![
                "001 click .carousel-btn.next",
                "    slide: 2/3",
                "    changes: 1",
                "002 key Escape",
                "    (no change)",
            ]
        );
    }

    #[test]
    fn no_carousel_shows_dash() {
        let mut s = snapshot();
        s.active_slide = None;
        s.slide_count = 0;
        let lines = format_trace(&[entry(0, "boot", s)]);
        assert!(lines.contains(&"    slide: -".to_string()));
    }

    #[test]
    fn config_lines_cover_every_section() {
        let lines = format_config(&ControllerConfig::default());
        for section in ["Carousel", "Viewport", "Header", "Reveal", "Lazy"] {
            assert!(lines.iter().any(|l| l == section), "missing {section}");
        }
        assert!(lines.contains(&"    interval_ms = 5000".to_string()));
        assert!(lines.contains(&"    breakpoint = 768".to_string()));
    }

    #[test]
    fn html_report_marks_changed_cells() {
        let mut next = snapshot();
        next.menu_open = true;
        let html = render_trace_html(
            "menu <check>",
            &[entry(0, "boot", snapshot()), entry(1, "click .mobile-menu-toggle", next)],
        )
        .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("menu &lt;check&gt;"));
        assert!(html.contains(r#"<td class="changed">open</td>"#));
        assert_eq!(html.matches("class=\"changed\"").count(), 1);
    }
}
