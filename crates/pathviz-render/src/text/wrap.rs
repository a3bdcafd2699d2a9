//! Label wrapping and font fitting.
//!
//! Labels are broken at whitespace into lines no wider than `max_width`; if the block is still
//! taller than `max_height` (or a single word is wider than `max_width`) the font shrinks one pixel
//! at a time down to the configured minimum.

use super::TextMeasurer;
use pathviz_core::config::TextConfig;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedLabel {
    pub lines: Vec<String>,
    pub font_size: f64,
    /// Widest line at `font_size`.
    pub width: f64,
    pub height: f64,
    /// Per-line `dy` in `em`: the first line is offset so the block is centered on the origin.
    pub dy_em: Vec<f64>,
}

/// Splits into alternating word and whitespace runs, keeping the whitespace.
pub fn split_words(text: &str) -> Vec<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\S+|\s+").expect("valid regex"));
    re.find_iter(text).map(|m| m.as_str()).collect()
}

struct Wrapped {
    lines: Vec<String>,
    width: f64,
    height: f64,
}

fn wrap_lines(
    text: &str,
    measurer: &dyn TextMeasurer,
    max_width: f64,
    font_size: f64,
    line_height: f64,
) -> Wrapped {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for token in split_words(text) {
        let is_space = token.chars().all(char::is_whitespace);
        if line.is_empty() && is_space {
            continue;
        }
        let candidate = format!("{line}{token}");
        if measurer.measure_width(&candidate, font_size) > max_width && !line.is_empty() {
            lines.push(line.trim_end().to_string());
            line = if is_space {
                String::new()
            } else {
                token.to_string()
            };
        } else {
            line = candidate;
        }
    }
    let last = line.trim_end();
    if !last.is_empty() || lines.is_empty() {
        lines.push(last.to_string());
    }

    let width = lines
        .iter()
        .map(|l| measurer.measure_width(l, font_size))
        .fold(0.0_f64, f64::max);
    let height = lines.len() as f64 * line_height * font_size;
    Wrapped {
        lines,
        width,
        height,
    }
}

pub fn wrap_and_size_text(
    text: &str,
    measurer: &dyn TextMeasurer,
    config: &TextConfig,
    font_size: f64,
) -> WrappedLabel {
    let mut font_size = font_size;
    let mut wrapped = wrap_lines(
        text,
        measurer,
        config.max_width,
        font_size,
        config.line_height,
    );
    while (wrapped.height > config.max_height || wrapped.width > config.max_width)
        && font_size > config.font_sizes.min
    {
        font_size = (font_size - 1.0).max(config.font_sizes.min);
        wrapped = wrap_lines(
            text,
            measurer,
            config.max_width,
            font_size,
            config.line_height,
        );
    }

    let total = wrapped.lines.len() as f64 * config.line_height;
    let start = -(total / 2.0) + config.line_height / 2.0;
    let dy_em = (0..wrapped.lines.len())
        .map(|i| {
            if i == 0 {
                start + config.vertical_offset
            } else {
                config.line_height
            }
        })
        .collect();

    WrappedLabel {
        lines: wrapped.lines,
        font_size,
        width: wrapped.width,
        height: wrapped.height,
        dy_em,
    }
}
