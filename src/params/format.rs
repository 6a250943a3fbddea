//! Text display and parsing for parameter values.
//!
//! The same pairs serve UI text entry and the human-readable preset format,
//! so `parse(display(x))` must land back on (or within display precision of)
//! `x`. Parse functions return `None` for text they cannot read; callers
//! leave the parameter unchanged in that case.

use super::schema::{DisplayFormat, ParamDef, ParamKind};

/// Text for a plain value under a parameter's definition.
pub fn display(def: &ParamDef, value: f32) -> String {
    match &def.kind {
        ParamKind::Continuous { format, .. } => display_as(*format, value),
        ParamKind::Choice { choices, .. } => {
            let index = def.constrain(value) as usize;
            choices.get(index).cloned().unwrap_or_default()
        }
    }
}

/// Plain value for user text under a parameter's definition, constrained to range.
pub fn parse(def: &ParamDef, text: &str) -> Option<f32> {
    let value = match &def.kind {
        ParamKind::Continuous { format, .. } => parse_as(*format, text)?,
        ParamKind::Choice { choices, .. } => parse_choice(choices, text)? as f32,
    };
    Some(def.constrain(value))
}

pub fn display_as(format: DisplayFormat, value: f32) -> String {
    match format {
        DisplayFormat::Percent => display_percent(value),
        DisplayFormat::Decibels => display_decibels(value),
        DisplayFormat::Pan => display_pan(value),
        DisplayFormat::LfoRate => display_lfo_rate(value),
        DisplayFormat::Hertz => display_hertz(value),
        DisplayFormat::Plain => format!("{}", value),
    }
}

pub fn parse_as(format: DisplayFormat, text: &str) -> Option<f32> {
    match format {
        DisplayFormat::Percent => parse_percent(text),
        DisplayFormat::Decibels => parse_decibels(text),
        DisplayFormat::Pan => parse_pan(text),
        DisplayFormat::LfoRate => parse_lfo_rate(text),
        DisplayFormat::Hertz => parse_hertz(text),
        DisplayFormat::Plain => parse_float(text),
    }
}

pub fn display_percent(value: f32) -> String {
    format!("{:.0}%", value * 100.0)
}

pub fn parse_percent(text: &str) -> Option<f32> {
    let clean = text.trim();
    let clean = clean.strip_suffix('%').unwrap_or(clean);
    parse_float(clean).map(|percent| percent / 100.0)
}

pub fn display_decibels(value: f32) -> String {
    format!("{:.1}dB", value)
}

pub fn parse_decibels(text: &str) -> Option<f32> {
    parse_float(strip_suffix_ignore_case(text.trim(), "db"))
}

pub fn display_hertz(value: f32) -> String {
    format!("{:.2}Hz", value)
}

pub fn parse_hertz(text: &str) -> Option<f32> {
    parse_float(strip_suffix_ignore_case(text.trim(), "hz"))
}

/// Pan as `"NL"` / `"NR"` where N runs 0..=50 (truncated toward center).
pub fn display_pan(value: f32) -> String {
    let position = (value * 50.0) as i32;
    if position < 0 {
        format!("{}L", -position)
    } else {
        format!("{}R", position)
    }
}

pub fn parse_pan(text: &str) -> Option<f32> {
    let clean = text.trim().to_ascii_uppercase();

    if let Some(left) = clean.strip_suffix('L') {
        return parse_float(left).map(|amount| (-amount / 50.0).clamp(-1.0, 0.0));
    }
    if let Some(right) = clean.strip_suffix('R') {
        return parse_float(right).map(|amount| (amount / 50.0).clamp(0.0, 1.0));
    }
    parse_float(&clean)
}

/// Note length as an exact fraction `n/d` (n in 1..=4, d in 1..=32) when one
/// matches, otherwise plain decimal text.
pub fn display_lfo_rate(value: f32) -> String {
    const EPSILON: f32 = 1e-4;

    for numerator in 1..=4 {
        for denominator in 1..=32 {
            let candidate = numerator as f32 / denominator as f32;
            if (value - candidate).abs() < EPSILON {
                return format!("{}/{}", numerator, denominator);
            }
        }
    }

    format!("{}", value)
}

pub fn parse_lfo_rate(text: &str) -> Option<f32> {
    let clean = text.trim();

    if let Some((numerator, denominator)) = clean.split_once('/') {
        let numerator = parse_float(numerator)?;
        let denominator = parse_float(denominator)?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    parse_float(clean)
}

/// Choice by name (case-insensitive) or by index.
pub fn parse_choice(choices: &[String], text: &str) -> Option<usize> {
    let clean = text.trim();

    if let Some(index) = choices.iter().position(|c| c.eq_ignore_ascii_case(clean)) {
        return Some(index);
    }

    clean.parse::<usize>().ok().filter(|&index| index < choices.len())
}

fn parse_float(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> &'a str {
    let split = text.len().saturating_sub(suffix.len());
    match (text.get(..split), text.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(suffix) => head.trim_end(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_pair() {
        assert_eq!(display_percent(0.7), "70%");
        assert_eq!(parse_percent(" 70% "), Some(0.7));
        assert_eq!(parse_percent("45"), Some(0.45));
        assert_eq!(parse_percent("loud"), None);
    }

    #[test]
    fn decibel_pair() {
        assert_eq!(display_decibels(-6.0), "-6.0dB");
        assert_eq!(parse_decibels("-6.0 dB"), Some(-6.0));
        assert_eq!(parse_decibels("3.5DB"), Some(3.5));
        assert_eq!(parse_decibels("7"), Some(7.0));
    }

    #[test]
    fn hertz_pair() {
        assert_eq!(display_hertz(2.5), "2.50Hz");
        assert_eq!(parse_hertz("2.50Hz"), Some(2.5));
        assert_eq!(parse_hertz("0.1 hz"), Some(0.1));
    }

    #[test]
    fn pan_pair() {
        assert_eq!(display_pan(0.0), "0R");
        assert_eq!(display_pan(-1.0), "50L");
        assert_eq!(display_pan(0.5), "25R");
        assert_eq!(parse_pan("50L"), Some(-1.0));
        assert_eq!(parse_pan("25r"), Some(0.5));
        assert_eq!(parse_pan("0.2"), Some(0.2));
    }

    #[test]
    fn pan_display_truncates_within_one_step() {
        for i in -100..=100 {
            let value = i as f32 / 100.0;
            let back = parse_pan(&display_pan(value)).unwrap();
            assert!((back - value).abs() < 1.0 / 50.0 + 1e-6);
        }
    }

    #[test]
    fn percent_round_trips_within_display_precision() {
        for i in 0..=1000 {
            let value = i as f32 / 1000.0;
            let back = parse_percent(&display_percent(value)).unwrap();
            assert!((back - value).abs() <= 0.005 + 1e-6, "{} -> {}", value, back);
        }
    }

    #[test]
    fn decibels_round_trip_within_display_precision() {
        for i in 0..=1200 {
            let value = i as f32 / 100.0;
            let back = parse_decibels(&display_decibels(value)).unwrap();
            assert!((back - value).abs() <= 0.05 + 1e-5, "{} -> {}", value, back);
        }
    }

    #[test]
    fn hertz_round_trips_within_display_precision() {
        for i in 1..=2000 {
            let value = i as f32 / 100.0 + 0.003;
            let back = parse_hertz(&display_hertz(value)).unwrap();
            assert!((back - value).abs() <= 0.005 + 1e-5, "{} -> {}", value, back);
        }
    }

    #[test]
    fn lfo_rate_fraction_grid_is_exact() {
        for numerator in 1..=4 {
            for denominator in 1..=32 {
                let value = numerator as f32 / denominator as f32;
                let text = display_lfo_rate(value);
                assert!(text.contains('/'), "{} displayed as {}", value, text);
                assert_eq!(parse_lfo_rate(&text), Some(value));
            }
        }
    }

    #[test]
    fn lfo_rate_off_grid_is_exact() {
        for value in [0.7_f32, 0.333, 1.1, 2.9, 3.3] {
            assert_eq!(parse_lfo_rate(&display_lfo_rate(value)), Some(value));
        }
    }

    #[test]
    fn lfo_rate_prefers_fractions() {
        assert_eq!(display_lfo_rate(0.75), "3/4");
        assert_eq!(display_lfo_rate(0.5), "1/2");
        assert_eq!(display_lfo_rate(0.03125), "1/32");
        assert_eq!(display_lfo_rate(4.0), "4/1");
        assert_eq!(display_lfo_rate(0.7), "0.7");
    }

    #[test]
    fn lfo_rate_parse() {
        assert_eq!(parse_lfo_rate("3/4"), Some(0.75));
        assert_eq!(parse_lfo_rate(" 1 / 8 "), Some(0.125));
        assert_eq!(parse_lfo_rate("1/0"), None);
        assert_eq!(parse_lfo_rate("0.7"), Some(0.7));
    }

    #[test]
    fn choice_by_name_or_index() {
        let choices: Vec<String> = ["free", "synced"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_choice(&choices, "Synced"), Some(1));
        assert_eq!(parse_choice(&choices, "0"), Some(0));
        assert_eq!(parse_choice(&choices, "2"), None);
        assert_eq!(parse_choice(&choices, "maybe"), None);
    }

    #[test]
    fn suffix_strip_handles_short_text() {
        assert_eq!(strip_suffix_ignore_case("b", "db"), "b");
        assert_eq!(strip_suffix_ignore_case("", "hz"), "");
    }
}
