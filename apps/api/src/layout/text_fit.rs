//! Greedy word-wrap and truncation of tile text against a content budget.

use crate::layout::font_metrics::FontMetricTable;

const ELLIPSIS: char = '…';

/// Text cut down to a line allowance.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl FittedText {
    /// The kept lines joined back into one string, or `None` when nothing survived.
    pub fn joined(&self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.lines.join(" "))
        }
    }
}

/// Greedy word-wrap at `max_width_em`. Words wider than a full line are split by character.
/// An empty string returns no lines.
pub fn wrap_lines(text: &str, metrics: &FontMetricTable, max_width_em: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.measure_str(word);

        if word_w > max_width_em {
            // Flush and hard-break the oversized word.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }
            for c in word.chars() {
                let char_w = metrics.measure_char(c);
                if !current.is_empty() && current_width + char_w > max_width_em {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += char_w;
            }
            continue;
        }

        let space_w = if current.is_empty() {
            0.0
        } else {
            metrics.space_width
        };
        if !current.is_empty() && current_width + space_w + word_w > max_width_em {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps `text` and keeps at most `max_lines` lines. When lines are dropped the last kept line
/// ends with an ellipsis that still fits the width.
pub fn fit_text(
    text: &str,
    metrics: &FontMetricTable,
    max_width_em: f32,
    max_lines: u32,
) -> FittedText {
    let mut lines = wrap_lines(text, metrics, max_width_em);
    let max_lines = max_lines as usize;
    if lines.len() <= max_lines {
        return FittedText {
            lines,
            truncated: false,
        };
    }

    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        let ellipsis_w = metrics.measure_char(ELLIPSIS);
        while !last.is_empty() && metrics.measure_str(last) + ellipsis_w > max_width_em {
            match last.rfind(' ') {
                Some(idx) => last.truncate(idx),
                None => {
                    last.pop();
                }
            }
        }
        last.push(ELLIPSIS);
    }

    FittedText {
        lines,
        truncated: true,
    }
}
