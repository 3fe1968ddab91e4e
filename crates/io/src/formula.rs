// Shared-formula expansion: shift relative references from the master cell

use std::sync::OnceLock;

use regex::{Captures, Regex};
use sheetprint_model::{column_index, column_letter, CellAddress, MAX_COL, MAX_ROW};

fn cell_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\$?)([A-Za-z]{1,3})(\$?)(\d+)").expect("cell reference pattern compiles")
    })
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Text of a shared-formula follower at `at`, given the master's text and
/// address. `$`-anchored parts stay put; references pushed off the grid
/// become `#REF!`.
pub fn expand_shared(master_text: &str, master: CellAddress, at: CellAddress) -> String {
    let row_delta = i64::from(at.row) - i64::from(master.row);
    let col_delta = i64::from(at.col) - i64::from(master.col);
    shift_formula(master_text, row_delta, col_delta)
}

/// Shift every A1-style reference in `formula`. String literals are left
/// untouched, as are names that merely look like references (`LOG10(`).
pub fn shift_formula(formula: &str, row_delta: i64, col_delta: i64) -> String {
    if row_delta == 0 && col_delta == 0 {
        return formula.to_string();
    }
    formula
        .split('"')
        .enumerate()
        .map(|(i, segment)| {
            if i % 2 == 0 {
                shift_segment(segment, row_delta, col_delta)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\"")
}

fn shift_segment(segment: &str, row_delta: i64, col_delta: i64) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut last = 0;
    for caps in cell_ref_pattern().captures_iter(segment) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let prev = segment[..whole.start()].chars().next_back();
        let next = segment[whole.end()..].chars().next();
        if prev.is_some_and(is_name_char) || next.is_some_and(|c| is_name_char(c) || c == '(') {
            continue;
        }
        let Some(shifted) = shift_reference(&caps, row_delta, col_delta) else {
            continue;
        };
        out.push_str(&segment[last..whole.start()]);
        out.push_str(&shifted);
        last = whole.end();
    }
    out.push_str(&segment[last..]);
    out
}

/// `None` when the match is not a valid grid reference.
fn shift_reference(caps: &Captures, row_delta: i64, col_delta: i64) -> Option<String> {
    let col_absolute = &caps[1] == "$";
    let row_absolute = &caps[3] == "$";
    let col = i64::from(column_index(&caps[2])?);
    let row: i64 = caps[4].parse().ok()?;
    if col > i64::from(MAX_COL) || row < 1 || row > i64::from(MAX_ROW) {
        return None;
    }

    let new_col = if col_absolute { col } else { col + col_delta };
    let new_row = if row_absolute { row } else { row + row_delta };
    if !(1..=i64::from(MAX_COL)).contains(&new_col) || !(1..=i64::from(MAX_ROW)).contains(&new_row)
    {
        return Some("#REF!".to_string());
    }

    Some(format!(
        "{}{}{}{}",
        if col_absolute { "$" } else { "" },
        column_letter(new_col as u32),
        if row_absolute { "$" } else { "" },
        new_row
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> CellAddress {
        CellAddress::parse(s).unwrap()
    }

    #[test]
    fn test_relative_refs_follow() {
        assert_eq!(expand_shared("A1+B1", at("C1"), at("C4")), "A4+B4");
        assert_eq!(expand_shared("SUM(A1:A3)", at("B1"), at("D2")), "SUM(C2:C4)");
    }

    #[test]
    fn test_anchors_respected() {
        assert_eq!(expand_shared("$A$1*A1", at("B1"), at("C3")), "$A$1*B3");
        assert_eq!(expand_shared("$A1+A$1", at("B1"), at("C3")), "$A3+B$1");
    }

    #[test]
    fn test_sheet_qualified() {
        assert_eq!(
            expand_shared("Data!A2*'My Sheet'!B2", at("A1"), at("A2")),
            "Data!A3*'My Sheet'!B3"
        );
    }

    #[test]
    fn test_off_grid_is_ref_error() {
        assert_eq!(shift_formula("A1", -1, 0), "#REF!");
        assert_eq!(shift_formula("A1", 0, -1), "#REF!");
    }

    #[test]
    fn test_literals_and_functions_untouched() {
        assert_eq!(shift_formula("IF(A1>0,\"B2\",LOG10(A1))", 1, 0), "IF(A2>0,\"B2\",LOG10(A2))");
        assert_eq!(shift_formula("ATAN2(A1,B1)", 0, 1), "ATAN2(B1,C1)");
        assert_eq!(shift_formula("Table1[Col]", 3, 3), "Table1[Col]");
    }

    #[test]
    fn test_zero_delta() {
        assert_eq!(shift_formula("A1*2", 0, 0), "A1*2");
    }
}
