use std::collections::BTreeMap;
use std::sync::Arc;

use anstyle::{AnsiColor, Effects, Style};

use crate::{OverlayInfo, OverlayState};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn resolve_output_style(stdout_is_terminal: bool) -> OutputStyle {
    if stdout_is_terminal {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let badge = format!("[{}]", status.to_ascii_uppercase());
            let badge_style = match status {
                "ok" => ok_style(),
                "warn" => warn_style(),
                _ => section_style(),
            };
            format!("{} {message}", colorize(badge_style, &badge))
        }
    }
}

pub(crate) fn format_overlay_list_lines(
    by_target: &BTreeMap<String, Vec<Arc<OverlayInfo>>>,
    style: OutputStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (target, overlays) in by_target {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(match style {
            OutputStyle::Plain => target.clone(),
            OutputStyle::Rich => colorize(section_style(), target),
        });
        for info in overlays {
            lines.push(format!(
                "{} {}",
                render_overlay_marker(style, info),
                info.package_name
            ));
        }
    }
    lines
}

fn render_overlay_marker(style: OutputStyle, info: &OverlayInfo) -> String {
    let (marker, marker_style) = if !info.is_approved() {
        ("---", warn_style())
    } else if info.state == OverlayState::ApprovedEnabled {
        ("[x]", ok_style())
    } else {
        ("[ ]", Style::new())
    };
    match style {
        OutputStyle::Plain => marker.to_string(),
        OutputStyle::Rich => colorize(marker_style, marker),
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn ok_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightGreen.into()))
        .effects(Effects::BOLD)
}

fn warn_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Yellow.into()))
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
