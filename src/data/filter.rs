use std::collections::BTreeSet;

use super::record::InvestmentRecord;

// ---------------------------------------------------------------------------
// Filter predicate: accepted values per dimension
// ---------------------------------------------------------------------------

/// Resolved sidebar selection. An empty set accepts nothing; `years: None`
/// means the year dimension is not constrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub countries: BTreeSet<Option<String>>,
    pub sectors: BTreeSet<Option<String>>,
    pub statuses: BTreeSet<Option<String>>,
    /// Inclusive founding-year range.
    pub years: Option<(i32, i32)>,
}

impl FilterSelection {
    /// A record passes when every dimension accepts it. A record without a
    /// founding year fails any year range.
    pub fn accepts(&self, record: &InvestmentRecord) -> bool {
        self.countries.contains(&record.country_code)
            && self.sectors.contains(&record.market)
            && self.statuses.contains(&record.status)
            && match self.years {
                None => true,
                Some((from, to)) => record
                    .founded_year
                    .is_some_and(|y| (from..=to).contains(&y)),
            }
    }

    /// One boolean per record, in record order.
    pub fn mask(&self, records: &[InvestmentRecord]) -> Vec<bool> {
        records.iter().map(|r| self.accepts(r)).collect()
    }

    /// The filtered view: borrowed records that pass the mask.
    pub fn apply<'a>(&self, records: &'a [InvestmentRecord]) -> Vec<&'a InvestmentRecord> {
        records
            .iter()
            .zip(self.mask(records))
            .filter_map(|(r, keep)| keep.then_some(r))
            .collect()
    }
}
