//! # Text Layout
//!
//! Greedy line breaking over UAX#14 break opportunities. The same routine
//! answers "how many lines?" for height measurement and "which lines?" for
//! drawing, so measured and drawn text can never disagree.

use crate::font::FontContext;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    /// The text as a string.
    pub text: String,
    /// Width of the line without trailing spaces.
    pub width: f64,
}

/// The font a run of text is measured in.
#[derive(Debug, Clone, Copy)]
pub struct FontSpec<'a> {
    pub family: &'a str,
    pub weight: u32,
    pub italic: bool,
    pub size: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Each entry is the break opportunity *before* that character position.
/// Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let byte_to_char: Vec<usize> = {
        let mut map = vec![0usize; text.len() + 1];
        let mut char_idx = 0;
        for (byte_idx, _) in text.char_indices() {
            map[byte_idx] = char_idx;
            char_idx += 1;
        }
        map[text.len()] = char_idx;
        map
    };

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextLayout;

impl TextLayout {
    pub fn new() -> Self {
        Self
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Lines break at the last allowed opportunity before overflowing; a
    /// word wider than the line is split at the overflowing character.
    /// Empty text yields one empty line.
    pub fn break_into_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font: FontSpec<'_>,
    ) -> Vec<BrokenLine> {
        if text.is_empty() {
            return vec![BrokenLine {
                text: String::new(),
                width: 0.0,
            }];
        }

        let chars: Vec<char> = text.chars().collect();
        let char_widths: Vec<f64> = chars
            .iter()
            .map(|&ch| {
                if is_newline(ch) {
                    0.0
                } else {
                    font_context.char_width(ch, font.family, font.weight, font.italic, font.size)
                }
            })
            .collect();
        let break_opps = compute_break_opportunities(text);

        let mut lines = Vec::new();
        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut last_break_point: Option<usize> = None;

        for (i, &ch) in chars.iter().enumerate() {
            let char_width = char_widths[i];

            if i > 0 {
                match break_opps[i] {
                    Some(BreakOpportunity::Mandatory) => {
                        let end = if is_newline(chars[i - 1]) { i - 1 } else { i };
                        lines.push(self.make_line(&chars[line_start..end], &char_widths[line_start..end]));
                        line_start = i;
                        line_width = 0.0;
                        last_break_point = None;
                    }
                    Some(BreakOpportunity::Allowed) => {
                        last_break_point = Some(i - 1);
                    }
                    None => {}
                }
            }

            if is_newline(ch) {
                continue;
            }

            if line_width + char_width > max_width && line_start < i {
                if let Some(bp) = last_break_point.filter(|bp| *bp >= line_start) {
                    let break_at = bp + 1;
                    lines.push(self.make_line(&chars[line_start..break_at], &char_widths[line_start..break_at]));
                    line_start = break_at;
                    line_width = char_widths[line_start..=i].iter().sum();
                    last_break_point = None;
                    continue;
                }

                lines.push(self.make_line(&chars[line_start..i], &char_widths[line_start..i]));
                line_start = i;
                line_width = char_width;
                last_break_point = None;
                continue;
            }

            line_width += char_width;
        }

        if line_start < chars.len() {
            let tail: Vec<char> = chars[line_start..]
                .iter()
                .copied()
                .filter(|c| !is_newline(*c))
                .collect();
            if !tail.is_empty() || lines.is_empty() {
                let widths: Vec<f64> = chars[line_start..]
                    .iter()
                    .zip(&char_widths[line_start..])
                    .filter(|(c, _)| !is_newline(**c))
                    .map(|(_, w)| *w)
                    .collect();
                lines.push(self.make_line(&tail, &widths));
            }
        }

        lines
    }

    /// Number of lines `text` wraps into.
    pub fn count_lines(
        &self,
        font_context: &FontContext,
        text: &str,
        max_width: f64,
        font: FontSpec<'_>,
    ) -> usize {
        self.break_into_lines(font_context, text, max_width, font).len()
    }

    fn make_line(&self, chars: &[char], widths: &[f64]) -> BrokenLine {
        let mut effective_width: f64 = widths.iter().sum();

        // Trailing spaces don't count toward alignment
        let mut i = chars.len();
        while i > 0 && chars[i - 1] == ' ' {
            i -= 1;
            effective_width -= widths[i];
        }

        BrokenLine {
            text: chars[..i].iter().collect(),
            width: effective_width.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helvetica(size: f64) -> FontSpec<'static> {
        FontSpec {
            family: "Helvetica",
            weight: 400,
            italic: false,
            size,
        }
    }

    #[test]
    fn test_single_line() {
        let lines = TextLayout::new().break_into_lines(&FontContext::new(), "Hello", 200.0, helvetica(12.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello");
    }

    #[test]
    fn test_line_break_at_space() {
        let lines =
            TextLayout::new().break_into_lines(&FontContext::new(), "Hello World", 40.0, helvetica(12.0));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_explicit_newline() {
        let lines =
            TextLayout::new().break_into_lines(&FontContext::new(), "Hello\nWorld", 200.0, helvetica(12.0));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(lines[1].text, "World");
    }

    #[test]
    fn test_empty_string() {
        let lines = TextLayout::new().break_into_lines(&FontContext::new(), "", 200.0, helvetica(12.0));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].width, 0.0);
    }

    #[test]
    fn test_long_word_is_force_split() {
        let lines = TextLayout::new().break_into_lines(
            &FontContext::new(),
            "Supercalifragilistic",
            30.0,
            helvetica(12.0),
        );
        assert!(lines.len() > 1);
        let rejoined: String = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(rejoined, "Supercalifragilistic");
        assert!(lines.iter().all(|l| l.width <= 30.0 + 1e-9));
    }

    #[test]
    fn test_trailing_space_trimmed_from_width() {
        let ctx = FontContext::new();
        let lines = TextLayout::new().break_into_lines(&ctx, "Hi ", 200.0, helvetica(10.0));
        let expected = ctx.measure_string("Hi", "Helvetica", 400, false, 10.0);
        assert!((lines[0].width - expected).abs() < 1e-9);
    }

    #[test]
    fn test_count_lines_matches_break() {
        let ctx = FontContext::new();
        let layout = TextLayout::new();
        let text = "the quick brown fox jumps over the lazy dog";
        assert_eq!(
            layout.count_lines(&ctx, text, 60.0, helvetica(10.0)),
            layout.break_into_lines(&ctx, text, 60.0, helvetica(10.0)).len()
        );
    }
}
