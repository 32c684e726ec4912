//! Structured extraction from free-text model responses.
//!
//! Model output is unreliable: sometimes a clean ```json block,
//! sometimes an untagged fence, sometimes JSON buried in prose,
//! occasionally bare JSON. Extraction is an ordered chain of pure
//! candidate-locating strategies; the first strategy whose candidate
//! parses wins. A strategy that locates text which fails to parse does
//! not abort the chain; the next fallback is tried.

use std::sync::OnceLock;

use regex::Regex;

use super::PipelineError;

/// A pure text -> candidate-JSON locator. Returns the snippet to try
/// parsing, or `None` when the pattern is absent.
type Strategy = fn(&str) -> Option<String>;

/// Fallback chain, in order. Names show up in debug logs only.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("fenced-json", fenced_json_block),
    ("fenced-any", any_fenced_block),
    ("brace-delimited", brace_delimited),
    ("whole-text", whole_text),
];

/// Recover a JSON value from raw response text, or fail with the raw
/// text attached for offline diagnosis.
pub fn extract_json(text: &str) -> Result<serde_json::Value, PipelineError> {
    for (name, strategy) in STRATEGIES {
        let Some(candidate) = strategy(text) else {
            continue;
        };
        match serde_json::from_str(&candidate) {
            Ok(value) => {
                tracing::debug!(strategy = name, "Extracted JSON from response");
                return Ok(value);
            }
            Err(e) => {
                tracing::debug!(strategy = name, error = %e, "Candidate failed to parse");
            }
        }
    }

    tracing::warn!(
        response_len = text.len(),
        "No extraction strategy recovered JSON"
    );
    Err(PipelineError::Extraction {
        raw: text.to_string(),
    })
}

fn fenced_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```json\s*(.*?)```").expect("valid regex"))
}

fn any_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```[a-zA-Z0-9_-]*\s*(.*?)```").expect("valid regex"))
}

/// Stage 1: a fenced block explicitly tagged as JSON.
fn fenced_json_block(text: &str) -> Option<String> {
    fenced_json_re()
        .captures(text)
        .map(|c| c[1].trim().to_string())
}

/// Stage 2: any fenced block, tagged or not.
fn any_fenced_block(text: &str) -> Option<String> {
    any_fence_re()
        .captures(text)
        .map(|c| c[1].trim().to_string())
}

/// Stage 3: the outermost brace-delimited substring. Model output
/// rarely carries more than one top-level object, so first `{` to
/// last `}` is good enough.
fn brace_delimited(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(text[start..=end].to_string())
}

/// Stage 4: the entire response might already be bare JSON.
fn whole_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BARE: &str = r#"{"primaryDiagnosis":"X","confidence":0.8,"alternativeDiagnoses":[]}"#;

    #[test]
    fn extracts_from_tagged_fence() {
        let text = format!("Sure! ```json\n{BARE}\n```");
        let value = extract_json(&text).unwrap();
        assert_eq!(value["primaryDiagnosis"], "X");
        assert_eq!(value["confidence"], 0.8);
    }

    #[test]
    fn extracts_from_untagged_fence() {
        let text = format!("Here you go:\n```\n{BARE}\n```\nHope that helps.");
        let value = extract_json(&text).unwrap();
        assert_eq!(value["primaryDiagnosis"], "X");
    }

    #[test]
    fn extracts_brace_substring_from_prose() {
        let text = format!("The result is {BARE} as requested.");
        let value = extract_json(&text).unwrap();
        assert_eq!(value["confidence"], 0.8);
    }

    #[test]
    fn extracts_bare_json() {
        let value = extract_json(BARE).unwrap();
        assert_eq!(value["primaryDiagnosis"], "X");
    }

    #[test]
    fn fencing_is_semantically_transparent() {
        let direct = extract_json(BARE).unwrap();
        let fenced = extract_json(&format!("```json\n{BARE}\n```")).unwrap();
        let untagged = extract_json(&format!("```\n{BARE}\n```")).unwrap();
        let prose = extract_json(&format!("Result: {BARE}")).unwrap();
        assert_eq!(direct, fenced);
        assert_eq!(direct, untagged);
        assert_eq!(direct, prose);
    }

    #[test]
    fn broken_fence_falls_through_to_brace_stage() {
        // The fenced block holds no JSON, but a complete object
        // follows in prose.
        let text = format!("```json\nnot json, sorry\n```\nActually: {BARE}");
        let value = extract_json(&text).unwrap();
        assert_eq!(value["primaryDiagnosis"], "X");
    }

    #[test]
    fn no_json_at_all_fails_with_raw_text() {
        let result = extract_json("I cannot produce a structured answer, sorry.");
        match result {
            Err(PipelineError::Extraction { raw }) => {
                assert!(raw.contains("cannot produce"));
            }
            other => panic!("Expected Extraction error, got {other:?}"),
        }
    }

    #[test]
    fn empty_text_fails() {
        assert!(matches!(
            extract_json("   "),
            Err(PipelineError::Extraction { .. })
        ));
    }

    #[test]
    fn strategies_locate_without_parsing() {
        assert_eq!(
            fenced_json_block("```json\n{\"a\":1}\n```").as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(brace_delimited("x {\"a\":1} y").as_deref(), Some("{\"a\":1}"));
        assert!(fenced_json_block("no fences").is_none());
        assert!(brace_delimited("no braces").is_none());
    }
}
