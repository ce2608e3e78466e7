use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

// Serial of 9999-12-31, the last day Excel can represent
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// Text of one calamine cell as the grid sees it.
///
/// Whole floats print without a decimal part, date cells become ISO dates and booleans
/// print as `TRUE`/`FALSE`.
pub fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) if dt.is_duration() => format_float(dt.as_f64()),
        Data::DateTime(dt) => {
            excel_date_to_iso_string(dt.as_f64()).unwrap_or_else(|| format_float(dt.as_f64()))
        }
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

fn format_float(f: f64) -> String {
    if f == (f as i64) as f64 && f.abs() < 1e10 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Converts an Excel serial date (1900 system) to `YYYY-MM-DD`, or `YYYY-MM-DDTHH:MM:SS`
/// when the serial carries a time of day.
pub fn excel_date_to_iso_string(serial: f64) -> Option<String> {
    if !serial.is_finite() || !(0.0..MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    // Excel counts the non-existent 1900-02-29
    let days = if serial > 59.0 { serial - 1.0 } else { serial };

    let base_date = NaiveDate::from_ymd_opt(1899, 12, 31)?;
    let date = base_date.checked_add_signed(Duration::days(days.trunc() as i64))?;

    let seconds = (days.fract() * 86_400.0).round() as u32;
    if seconds == 0 {
        return Some(date.format("%Y-%m-%d").to_string());
    }

    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)?;
    Some(
        NaiveDateTime::new(date, time)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_print_like_the_sheet_shows_them() {
        assert_eq!(data_to_string(&Data::Float(42.0)), "42");
        assert_eq!(data_to_string(&Data::Float(9.99)), "9.99");
        assert_eq!(data_to_string(&Data::Int(-3)), "-3");
        assert_eq!(data_to_string(&Data::Bool(true)), "TRUE");
        assert_eq!(data_to_string(&Data::Empty), "");
        assert_eq!(data_to_string(&Data::String("SKU".into())), "SKU");
    }

    #[test]
    fn serial_dates_convert_to_iso() {
        assert_eq!(excel_date_to_iso_string(1.0).as_deref(), Some("1900-01-01"));
        assert_eq!(excel_date_to_iso_string(61.0).as_deref(), Some("1900-03-01"));
        assert_eq!(excel_date_to_iso_string(45292.0).as_deref(), Some("2024-01-01"));
        assert_eq!(
            excel_date_to_iso_string(45292.5).as_deref(),
            Some("2024-01-01T12:00:00")
        );
        assert_eq!(excel_date_to_iso_string(-1.0), None);
        assert_eq!(excel_date_to_iso_string(f64::NAN), None);
    }
}
