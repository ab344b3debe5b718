mod common;

use common::{credit, debit, dec};
use journal_balance::domain::{
    DEFAULT_TOLERANCE, LineSheet, RawLine, Side, SideError, check_sides, validate,
    validate_default,
};
use rust_decimal::Decimal;

#[test]
fn test_empty_entry_is_balanced() {
    let result = validate_default(&[]);

    assert_eq!(result.total_debit, Decimal::ZERO);
    assert_eq!(result.total_credit, Decimal::ZERO);
    assert!(result.is_balanced);
}

#[test]
fn test_equal_debit_and_credit() {
    assert!(validate_default(&[debit("10"), credit("10")]).is_balanced);
}

#[test]
fn test_rounding_noise_under_a_cent_is_balanced() {
    let result = validate_default(&[debit("10"), credit("9.991")]);
    assert_eq!(result.difference(), dec("0.009"));
    assert!(result.is_balanced);
}

#[test]
fn test_two_cents_off_is_unbalanced() {
    let result = validate_default(&[debit("10"), credit("9.98")]);
    assert!(!result.is_balanced);
}

#[test]
fn test_debits_only_fail_balance_and_side_guard() {
    let lines = [debit("5"), debit("5")];

    assert!(!validate_default(&lines).is_balanced);
    assert_eq!(check_sides(&lines), Err(SideError::MissingCredit));
}

#[test]
fn test_zero_sums_without_credit_line_fail_side_guard() {
    // Sums match, but the guard is independent of the sums
    let lines = [debit("0"), debit("0")];

    assert!(validate_default(&lines).is_balanced);
    assert!(check_sides(&lines).is_err());
}

#[test]
fn test_validate_does_not_touch_input() {
    let lines = vec![debit("1.10"), credit("2.20"), debit("1.10")];
    let before = lines.clone();

    let first = validate(&lines, DEFAULT_TOLERANCE);
    let second = validate(&lines, DEFAULT_TOLERANCE);

    assert_eq!(first, second);
    assert_eq!(lines, before);
}

#[test]
fn test_many_small_lines_sum_exactly() {
    // 0.1 summed ten times is exactly 1 with decimals
    let mut lines: Vec<_> = (0..10).map(|_| debit("0.1")).collect();
    lines.push(credit("1"));

    let result = validate(&lines, dec("0.000001"));
    assert_eq!(result.total_debit, dec("1"));
    assert!(result.is_balanced);
}

#[test]
fn test_sheet_editing_session() {
    let mut sheet = LineSheet::new();
    let tolerance = DEFAULT_TOLERANCE;

    // Typing into the debit line
    sheet.set_amount(1, "250").unwrap();
    assert_eq!(sheet.totals(tolerance).total_debit, dec("250"));

    // Half-typed credit amount counts as zero
    sheet.set_amount(2, "-").unwrap();
    assert_eq!(sheet.totals(tolerance).total_credit, Decimal::ZERO);

    // Split the credit across two lines
    sheet.set_amount(2, "200").unwrap();
    let third = sheet.add_line(Some(Side::Credit));
    sheet.set_amount(third, "50").unwrap();
    assert!(sheet.totals(tolerance).is_balanced);

    // Removing the first credit keeps the other, so nothing is added back
    assert_eq!(sheet.remove_line(2).unwrap(), Vec::<u32>::new());
    assert!(!sheet.totals(tolerance).is_balanced);

    // Removing the only debit line brings a blank debit line back
    let added = sheet.remove_line(1).unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(sheet.get(added[0]), Some(&RawLine::with_side(Side::Debit)));
}
