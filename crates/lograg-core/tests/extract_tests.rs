use lograg_core::extract::{default_rules, FieldExtractor, FieldRule};
use lograg_core::{Error, Record};

fn level_only() -> FieldExtractor {
    FieldExtractor::new(&[FieldRule::new("level", "DEBUG|INFO|WARN|ERROR", "log level")]).expect("rules")
}

#[test]
fn level_rule_picks_error_from_line() {
    let record = level_only().extract("2024-01-01 00:00:00,000 ERROR db failure");
    let expected: Record = [("level", "ERROR")].into_iter().collect();
    assert_eq!(record, expected);
}

#[test]
fn default_rules_add_timestamp_alongside_level() {
    let extractor = FieldExtractor::with_default_rules().expect("default rules");
    let record = extractor.extract("2024-01-01 00:00:00,000 ERROR db failure");
    assert_eq!(record.get("timestamp"), Some("2024-01-01 00:00:00,000"));
    assert_eq!(record.get("logLevel"), Some("ERROR"));
    assert_eq!(record.len(), 2, "no other rule matches: {record:?}");
}

#[test]
fn line_without_matches_yields_empty_record() {
    let extractor = FieldExtractor::with_default_rules().expect("default rules");
    for line in ["", "   ", "nothing to see here", "a"] {
        assert!(extractor.extract(line).is_empty(), "line {line:?}");
    }
}

#[test]
fn extraction_is_deterministic() {
    let extractor = FieldExtractor::with_default_rules().expect("default rules");
    let line = "2023-05-06 10:11:12,131 WARN jane@corp.io token=abcdefghijklmnopqrstuvwx policy 123456789";
    let first = extractor.extract(line);
    for _ in 0..10 { assert_eq!(extractor.extract(line), first); }
    assert_eq!(first.get("email"), Some("jane@corp.io"));
    assert_eq!(first.get("policyNumber"), Some("123456789"));
    assert_eq!(first.get("key"), Some("abcdefghijklmnopqrstuvwx"));
}

#[test]
fn overlapping_number_rules_match_independently() {
    let extractor = FieldExtractor::with_default_rules().expect("default rules");
    let record = extractor.extract("policy 123456789 ref 98765432101");
    assert_eq!(record.get("policyNumber"), Some("123456789"));
    assert_eq!(record.get("otherData"), Some("98765432101"));

    // A long digit run satisfies both the token rule and the generic number rule.
    let record = extractor.extract("id 12345678901234567890123 done");
    assert_eq!(record.get("key"), Some("12345678901234567890123"));
    assert_eq!(record.get("otherData"), Some("12345678901234567890123"));
    assert!(!record.contains("policyNumber"));
}

#[test]
fn default_rules_are_ascii_only() {
    let extractor = FieldExtractor::with_default_rules().expect("default rules");

    let record = extractor.extract("policy \u{661}\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}\u{668}\u{669} logged");
    assert!(!record.contains("policyNumber"));
    assert!(!record.contains("otherData"));

    // Non-ASCII letters are not word characters, so the digits start a word.
    let record = extractor.extract("ref\u{e9}123456789 end");
    assert_eq!(record.get("policyNumber"), Some("123456789"));

    let record = extractor.extract("2024-01-01 00:00:00,000 user caf\u{e9}@example.com");
    assert_eq!(record.get("timestamp"), Some("2024-01-01 00:00:00,000"));
    assert!(!record.contains("email"));
}

#[test]
fn first_match_per_rule_name_wins() {
    let rules = [FieldRule::new("n", "foo", ""), FieldRule::new("n", "bar", "")];
    let extractor = FieldExtractor::new(&rules).expect("rules");
    assert_eq!(extractor.extract("bar foo").get("n"), Some("foo"));
    assert_eq!(extractor.extract("bar only").get("n"), Some("bar"));
}

#[test]
fn fields_follow_rule_order() {
    let extractor = FieldExtractor::with_default_rules().expect("default rules");
    let record = extractor.extract("ERROR 2024-01-01 00:00:00,000 policy 123456789");
    let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["logLevel", "policyNumber"], "timestamp is anchored at line start");
}

#[test]
fn invalid_pattern_names_the_rule() {
    let err = FieldExtractor::new(&[FieldRule::new("broken", "(unclosed", "")]).expect_err("must fail");
    match err {
        Error::InvalidRule { name, .. } => assert_eq!(name, "broken"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_rule_name_is_rejected() {
    let err = FieldExtractor::new(&[FieldRule::new(" ", "x", "")]).expect_err("must fail");
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn default_rule_table_is_ordered_and_described() {
    let extractor = FieldExtractor::new(&default_rules()).expect("default rules");
    let names: Vec<&str> = extractor.rules().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["timestamp", "logLevel", "email", "key", "policyNumber", "otherData"]);
    assert!(extractor.rules().iter().all(|r| !r.description().is_empty()));
}

#[test]
fn record_serializes_as_ordered_json_object() {
    let record: Record = [("b", "2"), ("a", "1"), ("b", "3")].into_iter().collect();
    assert_eq!(serde_json::to_string(&record).expect("json"), r#"{"b":"2","a":"1"}"#);
}
