//! Greedy word wrapping for axis labels.

use super::fonts::{FontSpec, TextMeasure};

/// Baseline shift of a single line so it is centered on its anchor, in em.
pub const BASE_DY_EM: f64 = 0.35;
pub const LINE_HEIGHT_EM: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// Offset from the previous line (the anchor for the first one), in em.
    pub dy_em: f64,
}

/// Splits `text` on whitespace and packs words into lines no wider than
/// `max_width`. A word that does not fit on its own still gets its own line
/// and is never split.
pub fn wrap_words(text: &str, max_width: f64, font: FontSpec, measure: &dyn TextMeasure) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.text_width(&candidate, font) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps and assigns `dy` offsets that center the block vertically.
pub fn wrap_label(text: &str, max_width: f64, font: FontSpec, measure: &dyn TextMeasure) -> Vec<WrappedLine> {
    let lines = wrap_words(text, max_width, font, measure);
    let first_dy = BASE_DY_EM - (lines.len().saturating_sub(1) as f64) * LINE_HEIGHT_EM / 2.0;
    lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| WrappedLine {
            text,
            dy_em: if i == 0 { first_dy } else { LINE_HEIGHT_EM },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::fonts::HeuristicMeasure;

    /// Every glyph is 10px wide.
    struct Fixed;

    impl TextMeasure for Fixed {
        fn text_width(&self, text: &str, _font: FontSpec) -> f64 {
            text.chars().count() as f64 * 10.0
        }
    }

    fn font() -> FontSpec {
        FontSpec::axis_label()
    }

    #[test]
    fn packs_words_greedily() {
        let lines = wrap_words("aa bb cc dd", 50.0, font(), &Fixed);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn long_word_keeps_its_own_line() {
        let lines = wrap_words("Communication is key", 80.0, font(), &Fixed);
        assert_eq!(lines, vec!["Communication", "is key"]);
        assert!(lines.iter().all(|l| !l.is_empty()));
    }

    #[test]
    fn single_long_word_is_one_line() {
        let lines = wrap_words("Accountability", 10.0, font(), &Fixed);
        assert_eq!(lines, vec!["Accountability"]);
    }

    #[test]
    fn blank_label_has_no_lines() {
        assert!(wrap_label("   ", 80.0, font(), &Fixed).is_empty());
    }

    #[test]
    fn dy_centers_the_block() {
        let lines = wrap_label("aa bb cc", 20.0, font(), &Fixed);
        assert_eq!(lines.len(), 3);
        assert!((lines[0].dy_em - (0.35 - 1.2)).abs() < 1e-9);
        assert_eq!(lines[1].dy_em, 1.2);
        assert_eq!(lines[2].dy_em, 1.2);

        let single = wrap_label("Focus", 80.0, font(), &HeuristicMeasure);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].dy_em, 0.35);
    }

    #[test]
    fn lines_fit_unless_a_single_word_overflows() {
        let measure = HeuristicMeasure;
        let text = "Takes ownership of outcomes and follows through on commitments";
        for line in wrap_words(text, 80.0, font(), &measure) {
            let fits = measure.text_width(&line, font()) <= 80.0;
            assert!(fits || !line.contains(' '), "line too wide: {line}");
        }
    }
}
