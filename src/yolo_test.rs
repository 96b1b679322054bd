#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// parse_line
// =============================================================

#[test]
fn parses_well_formed_line() {
    let b = parse_line("12 0.5 0.25 0.1 0.2").unwrap().unwrap();
    assert_eq!(b.class_id, 12);
    assert_eq!(b.cx, 0.5);
    assert_eq!(b.cy, 0.25);
    assert_eq!(b.w, 0.1);
    assert_eq!(b.h, 0.2);
    assert!(b.line_index.is_none());
}

#[test]
fn tolerates_extra_whitespace() {
    let b = parse_line("  3\t0.5   0.5 0.1 0.1  ").unwrap().unwrap();
    assert_eq!(b.class_id, 3);
}

#[test]
fn blank_line_is_skipped() {
    assert_eq!(parse_line(""), Ok(None));
    assert_eq!(parse_line("   \t "), Ok(None));
}

#[test]
fn four_tokens_is_field_count_error() {
    assert_eq!(parse_line("0 0.5 0.5 0.1"), Err(ParseErrorKind::FieldCount { found: 4 }));
}

#[test]
fn six_tokens_is_field_count_error() {
    assert_eq!(parse_line("0 0.5 0.5 0.1 0.1 9"), Err(ParseErrorKind::FieldCount { found: 6 }));
}

#[test]
fn single_token_is_field_count_error() {
    assert_eq!(parse_line("7"), Err(ParseErrorKind::FieldCount { found: 1 }));
}

#[test]
fn negative_class_is_rejected() {
    assert_eq!(parse_line("-1 0.5 0.5 0.1 0.1"), Err(ParseErrorKind::ClassId { value: "-1".into() }));
}

#[test]
fn fractional_class_is_rejected() {
    assert!(matches!(parse_line("1.0 0.5 0.5 0.1 0.1"), Err(ParseErrorKind::ClassId { .. })));
}

#[test]
fn non_numeric_coordinate_names_field() {
    assert_eq!(
        parse_line("0 0.5 abc 0.1 0.1"),
        Err(ParseErrorKind::Number { field: "cy", value: "abc".into() })
    );
}

#[test]
fn non_finite_coordinate_is_rejected() {
    assert!(matches!(parse_line("0 NaN 0.5 0.1 0.1"), Err(ParseErrorKind::Number { field: "cx", .. })));
    assert!(matches!(parse_line("0 0.5 0.5 inf 0.1"), Err(ParseErrorKind::Number { field: "w", .. })));
}

#[test]
fn zero_size_is_rejected() {
    assert_eq!(
        parse_line("0 0.5 0.5 0 0.1"),
        Err(ParseErrorKind::NonPositiveSize { field: "w", value: "0".into() })
    );
    assert!(matches!(parse_line("0 0.5 0.5 0.1 -0.2"), Err(ParseErrorKind::NonPositiveSize { field: "h", .. })));
}

#[test]
fn error_messages() {
    assert_eq!(ParseErrorKind::FieldCount { found: 4 }.to_string(), "expected 5 values, got 4");
    let err = ParseError { line: 3, kind: ParseErrorKind::ClassId { value: "x".into() } };
    assert_eq!(err.to_string(), "line 3: invalid class id \"x\"");
}

// =============================================================
// parse_labels
// =============================================================

#[test]
fn one_good_line_one_short_line() {
    let parsed = parse_labels("0 0.5 0.5 0.1 0.1\n1 0.2 0.2 0.1\n");
    assert_eq!(parsed.boxes.len(), 1);
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].line, 2);
    assert_eq!(parsed.errors[0].kind, ParseErrorKind::FieldCount { found: 4 });
}

#[test]
fn errors_do_not_stop_later_lines() {
    let text = "garbage\n\n3 0.1 0.1 0.05 0.05\n4 0.2 x 0.05 0.05\n5 0.3 0.3 0.05 0.05";
    let parsed = parse_labels(text);
    let classes: Vec<u32> = parsed.boxes.iter().map(|b| b.class_id).collect();
    assert_eq!(classes, vec![3, 5]);
    let lines: Vec<usize> = parsed.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![1, 4]);
}

#[test]
fn empty_file_parses_to_nothing() {
    let parsed = parse_labels("");
    assert!(parsed.boxes.is_empty());
    assert!(parsed.errors.is_empty());
}

#[test]
fn crlf_line_endings() {
    let parsed = parse_labels("0 0.5 0.5 0.1 0.1\r\n1 0.2 0.2 0.1 0.1\r\n");
    assert_eq!(parsed.boxes.len(), 2);
    assert!(parsed.errors.is_empty());
}

// =============================================================
// format_line / format_labels
// =============================================================

#[test]
fn format_uses_seventeen_decimals() {
    let b = LabelBox::new(7, NormalizedRect::new(0.5, 0.25, 0.125, 1.0));
    assert_eq!(
        format_line(&b),
        "7 0.50000000000000000 0.25000000000000000 0.12500000000000000 1.00000000000000000"
    );
}

#[test]
fn formatted_line_parses_back() {
    let b = LabelBox::new(35, NormalizedRect::new(0.123_456_789, 0.987_654_321, 0.05, 0.075));
    let back = parse_line(&format_line(&b)).unwrap().unwrap();
    assert_eq!(back.class_id, 35);
    assert!((back.cx - b.cx).abs() < 1e-15);
    assert!((back.h - b.h).abs() < 1e-15);
}

#[test]
fn format_labels_follows_line_index() {
    let mut a = LabelBox::new(1, NormalizedRect::new(0.5, 0.5, 0.1, 0.1));
    let mut b = LabelBox::new(2, NormalizedRect::new(0.5, 0.5, 0.1, 0.1));
    let c = LabelBox::new(3, NormalizedRect::new(0.5, 0.5, 0.1, 0.1));
    a.line_index = Some(1);
    b.line_index = Some(0);
    let text = format_labels(&[c, a, b]);
    let classes: Vec<&str> = text.lines().map(|l| l.split(' ').next().unwrap_or("")).collect();
    assert_eq!(classes, vec!["2", "1", "3"]);
    assert!(text.ends_with('\n'));
}

#[test]
fn format_labels_empty() {
    assert_eq!(format_labels(&[]), "");
}
