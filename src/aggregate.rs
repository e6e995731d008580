//! Aggregate column engine: the running sum shown in a table's footer.
//!
//! Cells are free text. A cell counts toward the sum if it *starts* with a
//! number (`"12 kg"` counts as 12); anything else, including empty cells,
//! contributes zero. Non-numeric cells are never an error.

/// Label prefix of the footer cell under the numeric column.
pub const TOTAL_LABEL: &str = "Total: ";

/// Parse the longest numeric prefix of `text`, ignoring leading whitespace.
///
/// Accepts an optional sign, then either `Infinity` or digits with an
/// optional fraction and exponent (`"-1.5e3"`, `".5"`, `"7."`). Returns
/// `None` if no digits are found.
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    if s.get(pos..).is_some_and(|rest| rest.starts_with("Infinity")) {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    let int_digits = s.get(int_start..pos).unwrap_or("");

    let mut frac_digits = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        frac_digits = s.get(frac_start..end).unwrap_or("");
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            pos = end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = String::new();
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut end = pos + 1;
        let mut exp_sign = "";
        match bytes.get(end) {
            Some(b'-') => {
                exp_sign = "-";
                end += 1;
            }
            Some(b'+') => end += 1,
            _ => {}
        }
        let digits_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end > digits_start {
            let digits = s.get(digits_start..end).unwrap_or("0");
            exponent = format!("e{exp_sign}{digits}");
        }
    }

    let literal = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
        exponent
    );
    literal.parse::<f64>().ok()
}

/// Sum of the numeric prefixes of `cells`. Non-numeric cells count as 0.
#[must_use]
pub fn sum_cells<'a>(cells: impl IntoIterator<Item = &'a str>) -> f64 {
    cells.into_iter().filter_map(parse_float).sum()
}

/// Sum of column `col` over `rows`. Missing or non-numeric cells count as 0.
#[must_use]
pub fn column_sum(rows: &[Vec<String>], col: usize) -> f64 {
    sum_cells(rows.iter().filter_map(|row| row.get(col)).map(String::as_str))
}

/// The footer row: blank everywhere except `Total: <sum>` under `numeric`.
#[must_use]
pub fn footer_row(
    column_count: usize,
    rows: &[Vec<String>],
    numeric: Option<usize>,
) -> Vec<String> {
    (0..column_count)
        .map(|col| {
            if numeric == Some(col) {
                format!("{TOTAL_LABEL}{}", format_number(column_sum(rows, col)))
            } else {
                String::new()
            }
        })
        .collect()
}

/// Render a number the way a user expects to read it back: no trailing
/// `.0` on integers, exponent notation only for very large or very small
/// magnitudes, `Infinity`/`NaN` spelled out.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let exp = format!("{value:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn rows(cells: &[&[&str]]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect()
    }

    #[test_case("3", Some(3.0); "integer")]
    #[test_case("2.5", Some(2.5); "decimal")]
    #[test_case("  -4", Some(-4.0); "leading whitespace and sign")]
    #[test_case("+7", Some(7.0); "plus sign")]
    #[test_case(".5", Some(0.5); "leading dot")]
    #[test_case("7.", Some(7.0); "trailing dot")]
    #[test_case("1e3", Some(1000.0); "exponent")]
    #[test_case("1e", Some(1.0); "dangling exponent")]
    #[test_case("2.5E-1x", Some(0.25); "exponent then junk")]
    #[test_case("12 kg", Some(12.0); "unit suffix")]
    #[test_case("Infinity", Some(f64::INFINITY); "infinity")]
    #[test_case("-Infinity", Some(f64::NEG_INFINITY); "negative infinity")]
    #[test_case("", None; "empty")]
    #[test_case("x", None; "letters")]
    #[test_case(".", None; "lone dot")]
    #[test_case("-", None; "lone sign")]
    #[test_case("$5", None; "currency prefix")]
    fn test_parse_float(input: &str, expected: Option<f64>) {
        assert_eq!(parse_float(input), expected);
    }

    #[test]
    fn test_sum_skips_non_numeric() {
        let r = rows(&[&["a", "3"], &["b", "x"], &["c", "2.5"]]);
        assert_eq!(column_sum(&r, 1), 5.5);
    }

    #[test]
    fn test_sum_cells() {
        assert_eq!(sum_cells(["3", "x", "2.5", ""]), 5.5);
        assert_eq!(sum_cells(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_sum_of_ragged_rows() {
        let r = rows(&[&["1"], &["2", "10"]]);
        assert_eq!(column_sum(&r, 1), 10.0);
        assert_eq!(column_sum(&r, 4), 0.0);
    }

    #[test]
    fn test_footer_row() {
        let r = rows(&[&["a", "3"], &["b", "x"], &["c", "2.5"]]);
        assert_eq!(footer_row(3, &r, Some(1)), vec!["", "Total: 5.5", ""]);
        assert_eq!(footer_row(2, &r, None), vec!["", ""]);
        assert_eq!(footer_row(2, &[], Some(0)), vec!["Total: 0", ""]);
    }

    #[test_case(5.0, "5"; "integral")]
    #[test_case(5.5, "5.5"; "fractional")]
    #[test_case(-0.0, "0"; "negative zero")]
    #[test_case(0.1 + 0.2, "0.30000000000000004"; "shortest round trip")]
    #[test_case(1e21, "1e+21"; "large magnitude")]
    #[test_case(1.5e-7, "1.5e-7"; "small magnitude")]
    #[test_case(f64::INFINITY, "Infinity"; "infinite")]
    #[test_case(f64::NAN, "NaN"; "not a number")]
    fn test_format_number(value: f64, expected: &str) {
        assert_eq!(format_number(value), expected);
    }
}
