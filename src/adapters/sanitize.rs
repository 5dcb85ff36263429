//! Log sanitization for clinical values.
//!
//! Prediction requests carry clinical measurements and their outcome. This
//! module scrubs formatted log lines before they reach the sink:
//! - Numeric arrays (feature vectors)
//! - Percentages (rendered probabilities)
//! - `probability=`, `label=` and `risk=` style fields
//!
//! Prefer keeping clinical values out of log calls entirely; the writer
//! wrapper is a fallback applied to everything the subscriber formats.

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Longest line sanitized as a whole; longer input is cut and marked.
const MAX_LINE_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        [
            // Three or more numbers in brackets: a feature vector.
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?){2,}\s*,?\s*\]",
                "[REDACTED-FEATURES]",
            ),
            (
                r"(?i)\b(probability|prob|label|prediction|risk)\s*[:=]\s*[A-Za-z0-9_.\-]+",
                "$1=[REDACTED]",
            ),
            (r"-?\d+(?:\.\d+)?\s?%", "[REDACTED-PCT]"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(regex) => Some(Rule { regex, replacement }),
            Err(_) => None,
        })
        .collect()
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Replace clinical values in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, MAX_LINE_BYTES);

    let mut out = prefix.to_string();
    for rule in rules() {
        if rule.regex.is_match(&out) {
            out = rule.regex.replace_all(&out, rule.replacement).into_owned();
        }
    }
    if truncated {
        out.push_str(" [TRUNCATED]");
    }
    out
}

/// Whether `input` contains anything `sanitize` would replace.
#[must_use]
pub fn contains_clinical_values(input: &str) -> bool {
    rules().iter().any(|r| r.regex.is_match(input))
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log output
/// line by line before it is written to the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        if self.buffer.len() > MAX_LINE_BYTES * 2 {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_feature_vector() {
        let input = "features=[45, 80.0, 1.02, 1.0, 0.0, 1, 1, 0] submitted";
        let sanitized = sanitize(input);
        assert!(sanitized.contains("[REDACTED-FEATURES]"));
        assert!(!sanitized.contains("80.0"));
    }

    #[test]
    fn test_sanitize_probability_fields() {
        let sanitized = sanitize("Prediction complete: label=1, probability=0.8123, risk=High");
        assert!(!sanitized.contains("0.8123"));
        assert!(sanitized.contains("probability=[REDACTED]"));
        assert!(sanitized.contains("risk=[REDACTED]"));
        assert!(sanitized.contains("label=[REDACTED]"));
    }

    #[test]
    fn test_sanitize_percentage() {
        let sanitized = sanitize("Predicted 81.23% for Kidney Disease");
        assert_eq!(sanitized, "Predicted [REDACTED-PCT] for Kidney Disease");
    }

    #[test]
    fn test_plain_text_untouched() {
        let input = "Loaded logistic model from \"models/kidney_model.json\" (n_features=24)";
        assert!(!contains_clinical_values(input));
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_truncates_long_input() {
        let input = "x".repeat(MAX_LINE_BYTES + 10);
        let sanitized = sanitize(&input);
        assert!(sanitized.ends_with("[TRUNCATED]"));
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let mut sink = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut sink);
            writer.write_all(b"vector [1, 2, 3]\nok\n").unwrap();
            writer.flush().unwrap();
        }
        let out = String::from_utf8(sink).unwrap();
        assert_eq!(out, "vector [REDACTED-FEATURES]\nok\n");
    }
}
