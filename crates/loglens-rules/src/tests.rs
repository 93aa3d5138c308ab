//! Property-based tests over whole documents.

use crate::*;
use proptest::prelude::*;

fn sample_rules() -> RuleSet {
    let build = RuleSet::from_json(
        r#"{
            "highlight": {
                "LOC": { "regex": "[A-Za-z_/]+\\.[a-z]+:[0-9]+", "theme": "loc" },
                "ERR": { "regex": "ERROR.*", "tilEnd": true, "theme": "err" },
                "TAG": { "regex": "\\[[a-z]+\\]", "char": "[", "offset": 1, "theme": "tag" },
                "NUM": { "regex": "[0-9]+", "theme": "num" }
            },
            "panel": ["ERR", "LOC"],
            "jump": ["ERR", "LOC"]
        }"#,
    );
    match build {
        Ok(build) => build.rule_set,
        Err(e) => unreachable!("sample rules are valid: {e}"),
    }
}

fn log_line() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("ERROR".to_string()),
            Just("[net]".to_string()),
            Just("core.rs:17".to_string()),
            "[a-z]{1,6}",
            "[0-9]{1,3}",
            Just("日本".to_string()),
        ],
        0..8,
    )
    .prop_map(|words| words.join(" "))
}

fn document() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(log_line(), 0..12),
        prop_oneof![Just("\n"), Just("\r\n"), Just("\r")],
    )
        .prop_map(|(lines, sep)| lines.join(sep))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_tokens_sorted_by_line_then_column(text in document()) {
        let doc = extract_document(&text, &sample_rules());
        let keys: Vec<_> = doc.tokens.iter().map(|t| (t.line_index, t.start_column)).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn prop_errors_in_line_order(text in document()) {
        let doc = extract_document(&text, &sample_rules());
        prop_assert!(doc.errors.windows(2).all(|w| w[0].line_index <= w[1].line_index));
    }

    #[test]
    fn prop_til_end_tokens_span_whole_line(text in document()) {
        let lines = split_lines(&text);
        let doc = extract_document(&text, &sample_rules());
        for token in doc.tokens.iter().filter(|t| t.category == "err") {
            let line = lines[token.line_index as usize];
            prop_assert_eq!(token.length as usize, line.chars().count());
        }
    }

    #[test]
    fn prop_tokens_stay_within_line(text in document()) {
        let lines = split_lines(&text);
        let doc = extract_document(&text, &sample_rules());
        for token in doc.tokens.iter().filter(|t| t.category != "err") {
            let len = lines[token.line_index as usize].chars().count();
            prop_assert!((token.start_column + token.length) as usize <= len);
        }
    }

    #[test]
    fn prop_error_content_is_line_suffix(text in document()) {
        let lines = split_lines(&text);
        let doc = extract_document(&text, &sample_rules());
        for record in &doc.errors {
            prop_assert!(lines[record.line_index as usize].ends_with(&record.content));
        }
    }

    #[test]
    fn prop_references_have_positive_lines(text in document()) {
        let doc = extract_document(&text, &sample_rules());
        for reference in doc.errors.iter().filter_map(|r| r.source_reference.as_ref()) {
            prop_assert!(reference.line_number >= 1);
            prop_assert!(!reference.file_path.is_empty());
        }
    }
}
