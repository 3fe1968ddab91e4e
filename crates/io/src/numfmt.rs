//! Number format codes and serial date conversion.
//!
//! Cells store dates as serial numbers; the number format decides whether a
//! numeric `<v>` is a plain number, a date/time, or an elapsed duration.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use sheetprint_model::CellValue;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Format code for a built-in `numFmtId`. Ids without a fixed code
/// (locale-dependent ones) return `None`.
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    let code = match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        5 => "\"$\"#,##0_);(\"$\"#,##0)",
        6 => "\"$\"#,##0_);[Red](\"$\"#,##0)",
        7 => "\"$\"#,##0.00_);(\"$\"#,##0.00)",
        8 => "\"$\"#,##0.00_);[Red](\"$\"#,##0.00)",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0_);(#,##0)",
        38 => "#,##0_);[Red](#,##0)",
        39 => "#,##0.00_);(#,##0.00)",
        40 => "#,##0.00_);[Red](#,##0.00)",
        41 => r#"_(* #,##0_);_(* \(#,##0\);_(* "-"_);_(@_)"#,
        42 => r#"_("$"* #,##0_);_("$"* \(#,##0\);_("$"* "-"_);_(@_)"#,
        43 => r#"_(* #,##0.00_);_(* \(#,##0.00\);_(* "-"??_);_(@_)"#,
        44 => r#"_("$"* #,##0.00_)_("$"* \(#,##0.00\)_("$"* "-"??_)_(@_)"#,
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    };
    Some(code)
}

/// How a numeric cell value should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Number,
    DateTime,
    Duration,
}

/// Classify a format code. Literal text (quoted or `\`-escaped) and
/// bracketed sections are ignored except for elapsed-time markers like
/// `[h]`, which make the value a duration.
pub fn classify(code: &str) -> NumberKind {
    if code.eq_ignore_ascii_case("general") || code == "@" {
        return NumberKind::Number;
    }
    // Only the positive section decides
    let section = code.split(';').next().unwrap_or(code);

    let mut stripped = String::with_capacity(section.len());
    let mut elapsed = false;
    let mut chars = section.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&c| c != ']').collect();
                let lower = inner.to_ascii_lowercase();
                if !lower.is_empty() && lower.chars().all(|c| matches!(c, 'h' | 'm' | 's')) {
                    elapsed = true;
                }
            }
            c => stripped.push(c.to_ascii_lowercase()),
        }
    }

    if elapsed {
        NumberKind::Duration
    } else if stripped.chars().any(|c| matches!(c, 'd' | 'm' | 'y' | 'h' | 's')) {
        NumberKind::DateTime
    } else {
        NumberKind::Number
    }
}

/// Convert a serial number under `kind`. Serials that fall outside the
/// representable calendar stay numbers.
pub fn serial_to_value(serial: f64, kind: NumberKind, date1904: bool) -> CellValue {
    if !serial.is_finite() {
        return CellValue::Number(serial);
    }
    match kind {
        NumberKind::Number => CellValue::Number(serial),
        NumberKind::Duration => serial_to_duration(serial).unwrap_or(CellValue::Number(serial)),
        NumberKind::DateTime => {
            serial_to_datetime(serial, date1904).unwrap_or(CellValue::Number(serial))
        }
    }
}

fn serial_to_duration(serial: f64) -> Option<CellValue> {
    let millis = (serial * MILLIS_PER_DAY).round();
    // `as` saturates at the i64 bounds
    if !(millis > i64::MIN as f64 && millis < i64::MAX as f64) {
        return None;
    }
    TimeDelta::try_milliseconds(millis as i64).map(CellValue::Duration)
}

fn serial_to_datetime(serial: f64, date1904: bool) -> Option<CellValue> {
    let day = serial.floor();
    let millis = ((serial - day) * MILLIS_PER_DAY).round() as i64;
    let fraction = TimeDelta::milliseconds(millis);

    // Pure time of day
    if (0.0..1.0).contains(&serial) && millis < MILLIS_PER_DAY as i64 {
        let secs = (millis / 1000) as u32;
        let nanos = ((millis % 1000) * 1_000_000) as u32;
        return NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).map(CellValue::Time);
    }

    let (epoch, mut days) = if date1904 {
        (NaiveDate::from_ymd_opt(1904, 1, 1)?, day as i64)
    } else {
        (NaiveDate::from_ymd_opt(1899, 12, 30)?, day as i64)
    };
    // 1900 system: serials before the phantom 1900-02-29 are off by one
    if !date1904 && serial > 0.0 && serial < 60.0 {
        days += 1;
    }

    let midnight = epoch.and_hms_opt(0, 0, 0)?;
    let dt = midnight
        .checked_add_signed(TimeDelta::try_days(days)?)?
        .checked_add_signed(fraction)?;
    Some(CellValue::DateTime(dt))
}

/// Parse the ISO-8601 text of a `t="d"` cell.
pub fn parse_iso_value(text: &str) -> CellValue {
    let text = text.trim();
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return CellValue::DateTime(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return CellValue::Date(d);
    }
    if let Ok(t) = NaiveTime::parse_from_str(text, "%H:%M:%S%.f") {
        return CellValue::Time(t);
    }
    CellValue::Text(text.to_string())
}
