use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_span_basic() {
    let span = Span::new(10, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
    assert!(span.contains(15));
    assert!(!span.contains(20));
}

#[test]
fn test_span_merge() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn test_span_covering() {
    assert_eq!(Span::covering("goto end"), Span::new(0, 8));
    assert!(Span::covering("").is_empty());
}

#[test]
fn test_span_shifted() {
    assert_eq!(Span::new(1, 3).shifted(4), Span::new(5, 7));
}

#[test]
fn test_span_from_range_saturates() {
    let span = Span::from_range(5..usize::MAX);
    assert_eq!(span.start, 5);
    assert_eq!(span.end, u32::MAX);
}

#[test]
fn test_span_try_from_range_too_large() {
    let result = Span::try_from_range(0..usize::MAX);
    assert_eq!(result, Err(SpanError::EndTooLarge(usize::MAX)));
}

#[test]
fn test_span_debug_format() {
    assert_eq!(format!("{:?}", Span::new(2, 9)), "2..9");
}
