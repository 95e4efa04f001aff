use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Column coercion
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Reinterpret each named column as timestamps. Anything that does not parse
/// becomes `Null`; cells that are already dates are kept as they are, so a
/// second pass changes nothing.
pub fn normalize_dates(mut table: Table, columns: &[&str]) -> Table {
    for &name in columns {
        let Some(idx) = table.column_index(name) else {
            log::warn!("date column '{name}' not in table, skipping");
            continue;
        };
        let mut misses = 0usize;
        for row in &mut table.rows {
            let cell = &mut row[idx];
            let coerced = coerce_date(cell);
            if coerced.is_null() && !cell.is_null() {
                misses += 1;
            }
            *cell = coerced;
        }
        if misses > 0 {
            log::debug!("{misses} unparseable values in '{name}' set to null");
        }
    }
    table
}

/// Reinterpret each named column as numbers. Numeric text parses; anything
/// else becomes `Null`. Idempotent like [`normalize_dates`].
pub fn coerce_numeric(mut table: Table, columns: &[&str]) -> Table {
    for &name in columns {
        let Some(idx) = table.column_index(name) else {
            log::warn!("numeric column '{name}' not in table, skipping");
            continue;
        };
        let mut misses = 0usize;
        for row in &mut table.rows {
            let cell = &mut row[idx];
            let coerced = coerce_number(cell);
            if coerced.is_null() && !cell.is_null() {
                misses += 1;
            }
            *cell = coerced;
        }
        if misses > 0 {
            log::debug!("{misses} non-numeric values in '{name}' set to null");
        }
    }
    table
}

fn coerce_date(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Date(d) => CellValue::Date(*d),
        CellValue::String(s) => parse_timestamp(s).map(CellValue::Date).unwrap_or(CellValue::Null),
        _ => CellValue::Null,
    }
}

fn coerce_number(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Integer(i) => CellValue::Integer(*i),
        CellValue::Float(f) if f.is_finite() => CellValue::Float(*f),
        CellValue::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                CellValue::Integer(i)
            } else {
                match s.parse::<f64>() {
                    Ok(f) if f.is_finite() => CellValue::Float(f),
                    _ => CellValue::Null,
                }
            }
        }
        _ => CellValue::Null,
    }
}

/// Parse the date spellings found in investment exports.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    fn table_of(col: &str, cells: Vec<CellValue>) -> Table {
        let mut t = Table::new(vec![col.to_string()]);
        for c in cells {
            t.push_row(vec![c]);
        }
        t
    }

    #[test]
    fn invalid_dates_become_null() {
        let t = table_of(
            "last_funding_at",
            vec![
                CellValue::String("2012-06-30".into()),
                CellValue::String("invalid".into()),
                CellValue::String("03/15/2011".into()),
                CellValue::Integer(2011),
                CellValue::Null,
            ],
        );
        let t = normalize_dates(t, &["last_funding_at"]);
        let col: Vec<_> = t.column("last_funding_at").unwrap().cloned().collect();
        assert_eq!(
            col,
            vec![date(2012, 6, 30), CellValue::Null, date(2011, 3, 15), CellValue::Null, CellValue::Null]
        );
    }

    #[test]
    fn date_normalization_is_idempotent() {
        let t = table_of(
            "founded_at",
            vec![
                CellValue::String("2007-01-01".into()),
                CellValue::String("2013-02-30".into()),
                CellValue::String("2010-05-01T08:30:00".into()),
            ],
        );
        let once = normalize_dates(t, &["founded_at"]);
        let twice = normalize_dates(once.clone(), &["founded_at"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_date_column_is_skipped() {
        let t = table_of("name", vec![CellValue::String("Acme".into())]);
        let out = normalize_dates(t.clone(), &["founded_at"]);
        assert_eq!(out, t);
    }

    #[test]
    fn numeric_coercion_parses_text_and_drops_garbage() {
        let t = table_of(
            "founded_year",
            vec![
                CellValue::String("2005".into()),
                CellValue::String("unknown".into()),
                CellValue::Float(1999.0),
                CellValue::Bool(true),
            ],
        );
        let once = coerce_numeric(t, &["founded_year"]);
        let col: Vec<_> = once.column("founded_year").unwrap().cloned().collect();
        assert_eq!(
            col,
            vec![CellValue::Integer(2005), CellValue::Null, CellValue::Float(1999.0), CellValue::Null]
        );
        assert_eq!(coerce_numeric(once.clone(), &["founded_year"]), once);
    }

    #[test]
    fn rfc3339_is_read_as_utc() {
        let dt = parse_timestamp("2014-01-01T02:00:00+02:00").unwrap();
        assert_eq!(dt.to_string(), "2014-01-01 00:00:00");
    }
}
