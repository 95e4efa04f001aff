use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDateTime;

use super::loader::load_file;
use super::model::Table;
use super::normalize::{coerce_numeric, normalize_dates};
use crate::error::{DatasetError, DatasetResult};

pub const COUNTRY: &str = "country_code";
pub const MARKET: &str = "market";
pub const STATUS: &str = "status";
pub const FOUNDED_YEAR: &str = "founded_year";
pub const FOUNDED_AT: &str = "founded_at";
pub const FIRST_FUNDING_AT: &str = "first_funding_at";
pub const LAST_FUNDING_AT: &str = "last_funding_at";
pub const FUNDING_ROUNDS: &str = "funding_rounds";
pub const FUNDING_TOTAL_USD: &str = "funding_total_usd";
pub const NAME: &str = "name";
pub const CITY: &str = "city";
pub const REGION: &str = "region";

pub const REQUIRED_COLUMNS: &[&str] = &[
    COUNTRY,
    MARKET,
    STATUS,
    FOUNDED_YEAR,
    FOUNDED_AT,
    FIRST_FUNDING_AT,
    LAST_FUNDING_AT,
    FUNDING_ROUNDS,
    FUNDING_TOTAL_USD,
    NAME,
    CITY,
];

pub const DATE_COLUMNS: &[&str] = &[FOUNDED_AT, FIRST_FUNDING_AT, LAST_FUNDING_AT];
pub const NUMERIC_COLUMNS: &[&str] = &[FOUNDED_YEAR, FUNDING_ROUNDS, FUNDING_TOTAL_USD];

// ---------------------------------------------------------------------------
// InvestmentRecord – one typed row
// ---------------------------------------------------------------------------

/// A single company's investment row after coercion. Every field is optional
/// because the source leaves gaps and coercion turns bad values into gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestmentRecord {
    pub name: Option<String>,
    pub market: Option<String>,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    pub founded_year: Option<i32>,
    pub founded_at: Option<NaiveDateTime>,
    pub first_funding_at: Option<NaiveDateTime>,
    pub last_funding_at: Option<NaiveDateTime>,
    pub funding_rounds: Option<i64>,
    pub funding_total_usd: Option<f64>,
}

impl InvestmentRecord {
    /// Whole days between first and last funding, when both dates exist.
    pub fn funding_duration_days(&self) -> Option<i64> {
        Some((self.last_funding_at? - self.first_funding_at?).num_days())
    }
}

// ---------------------------------------------------------------------------
// InvestmentDataset – the full typed record set
// ---------------------------------------------------------------------------

/// All records plus the option lists the filter sidebar offers.
#[derive(Debug, Clone, Default)]
pub struct InvestmentDataset {
    pub records: Vec<InvestmentRecord>,
    /// Source columns in file order.
    pub columns: Vec<String>,
    pub has_region: bool,
    /// Distinct values in first-appearance order; `None` is a missing cell.
    pub country_options: Vec<Option<String>>,
    pub market_options: Vec<Option<String>>,
    pub status_options: Vec<Option<String>>,
    /// Smallest and largest valid founding year.
    pub year_bounds: Option<(i32, i32)>,
}

impl InvestmentDataset {
    /// Load, coerce and type a dataset file in one step.
    pub fn open(path: &Path) -> DatasetResult<Self> {
        let table = load_file(path)?;
        Self::from_table(prepare_table(table))
    }

    /// Project an already-coerced table into typed records. Fails only when a
    /// required column is missing; `region` is optional.
    pub fn from_table(table: Table) -> DatasetResult<Self> {
        if table.columns.is_empty() {
            return Err(DatasetError::NoColumns);
        }
        let idx = |col: &str| {
            table.column_index(col).ok_or_else(|| DatasetError::MissingColumn {
                column: col.to_string(),
            })
        };
        let country = idx(COUNTRY)?;
        let market = idx(MARKET)?;
        let status = idx(STATUS)?;
        let founded_year = idx(FOUNDED_YEAR)?;
        let founded_at = idx(FOUNDED_AT)?;
        let first_funding_at = idx(FIRST_FUNDING_AT)?;
        let last_funding_at = idx(LAST_FUNDING_AT)?;
        let funding_rounds = idx(FUNDING_ROUNDS)?;
        let funding_total_usd = idx(FUNDING_TOTAL_USD)?;
        let name = idx(NAME)?;
        let city = idx(CITY)?;
        let region = table.column_index(REGION);

        let records: Vec<InvestmentRecord> = table
            .rows
            .iter()
            .map(|row| InvestmentRecord {
                name: row[name].as_text(),
                market: row[market].as_text(),
                country_code: row[country].as_text(),
                city: row[city].as_text(),
                region: region.and_then(|r| row[r].as_text()),
                status: row[status].as_text(),
                founded_year: row[founded_year]
                    .as_i64()
                    .and_then(|y| i32::try_from(y).ok()),
                founded_at: row[founded_at].as_date(),
                first_funding_at: row[first_funding_at].as_date(),
                last_funding_at: row[last_funding_at].as_date(),
                funding_rounds: row[funding_rounds].as_i64(),
                funding_total_usd: row[funding_total_usd].as_f64(),
            })
            .collect();

        let dropped_years = table
            .rows
            .iter()
            .zip(&records)
            .filter(|(row, rec)| !row[founded_year].is_null() && rec.founded_year.is_none())
            .count();
        if dropped_years > 0 {
            log::warn!("{dropped_years} rows have a non-integral founded_year, treated as missing");
        }

        Ok(Self::from_records(records, table.columns, region.is_some()))
    }

    /// Build option lists and bounds over typed records.
    pub fn from_records(records: Vec<InvestmentRecord>, columns: Vec<String>, has_region: bool) -> Self {
        let country_options = distinct(records.iter().map(|r| &r.country_code));
        let market_options = distinct(records.iter().map(|r| &r.market));
        let status_options = distinct(records.iter().map(|r| &r.status));
        let year_bounds = records
            .iter()
            .filter_map(|r| r.founded_year)
            .fold(None, |acc: Option<(i32, i32)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            });

        InvestmentDataset {
            records,
            columns,
            has_region,
            country_options,
            market_options,
            status_options,
            year_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Apply the standard date and numeric coercions to a freshly loaded table.
pub fn prepare_table(table: Table) -> Table {
    let table = normalize_dates(table, DATE_COLUMNS);
    coerce_numeric(table, NUMERIC_COLUMNS)
}

fn distinct<'a>(values: impl Iterator<Item = &'a Option<String>>) -> Vec<Option<String>> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_reader;

    const HEADER: &str = "name,market,country_code,city,status,founded_year,founded_at,\
                          first_funding_at,last_funding_at,funding_rounds,funding_total_usd";

    fn dataset(rows: &[&str]) -> InvestmentDataset {
        let src = format!("{HEADER}\n{}\n", rows.join("\n"));
        let table = load_csv_reader(src.as_bytes()).unwrap();
        InvestmentDataset::from_table(prepare_table(table)).unwrap()
    }

    #[test]
    fn typed_fields_and_duration() {
        let ds = dataset(&["Acme,Software,USA,Austin,operating,2005,2005-03-01,2008-01-01,2010-01-01,3,1000000"]);
        let r = &ds.records[0];
        assert_eq!(r.name.as_deref(), Some("Acme"));
        assert_eq!(r.founded_year, Some(2005));
        assert_eq!(r.funding_rounds, Some(3));
        assert_eq!(r.funding_total_usd, Some(1_000_000.0));
        assert_eq!(r.funding_duration_days(), Some(731));
        assert!(!ds.has_region);
        assert_eq!(ds.year_bounds, Some((2005, 2005)));
    }

    #[test]
    fn bad_year_and_date_are_missing_not_fatal() {
        let ds = dataset(&[
            "Acme,Software,USA,Austin,operating,unknown,2005-03-01,2008-01-01,invalid,3,1000000",
            "Beta,Games,GBR,London,closed,1999,,,,1,",
        ]);
        assert_eq!(ds.records[0].founded_year, None);
        assert_eq!(ds.records[0].last_funding_at, None);
        assert_eq!(ds.records[0].funding_duration_days(), None);
        assert_eq!(ds.records[0].funding_total_usd, Some(1_000_000.0));
        assert_eq!(ds.records[1].funding_total_usd, None);
        assert_eq!(ds.year_bounds, Some((1999, 1999)));
    }

    #[test]
    fn options_keep_first_appearance_order() {
        let ds = dataset(&[
            "A,Software,USA,Austin,operating,2005,,,,1,1",
            "B,Games,GBR,London,closed,2006,,,,1,1",
            "C,Software,,Austin,operating,2007,,,,1,1",
        ]);
        assert_eq!(
            ds.country_options,
            vec![Some("USA".to_string()), Some("GBR".to_string()), None]
        );
        assert_eq!(ds.market_options.len(), 2);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let table = load_csv_reader("name,market\nAcme,Software\n".as_bytes()).unwrap();
        let err = InvestmentDataset::from_table(table).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { ref column } if column == COUNTRY));
    }

    #[test]
    fn region_column_is_optional() {
        let src = format!("{HEADER},region\nAcme,Software,USA,Austin,operating,2005,,,,1,5,SF Bay Area\n");
        let table = load_csv_reader(src.as_bytes()).unwrap();
        let ds = InvestmentDataset::from_table(prepare_table(table)).unwrap();
        assert!(ds.has_region);
        assert_eq!(ds.records[0].region.as_deref(), Some("SF Bay Area"));
    }
}
