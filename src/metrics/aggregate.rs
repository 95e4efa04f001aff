use std::collections::BTreeMap;

use chrono::{Months, NaiveDate, NaiveDateTime};

use crate::data::record::InvestmentRecord;

/// Shown in place of the region panel when the source has no `region`.
pub const REGION_UNAVAILABLE: &str = "Region data not available in the dataset.";

// ---------------------------------------------------------------------------
// Panel result types
// ---------------------------------------------------------------------------

/// A panel's data, or the notice it shows instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> Availability<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Availability::Ready(v) => Some(v),
            Availability::Unavailable(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearTotal {
    pub year: i32,
    pub total_usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyTotal {
    pub market: String,
    pub name: String,
    pub status: String,
    pub total_usd: f64,
}

/// Funding summed under one label (market, city or region).
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTotal {
    pub label: String,
    pub total_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundCount {
    pub rounds: i64,
    pub companies: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FastGrowth {
    pub name: Option<String>,
    pub first_funding_at: NaiveDateTime,
    pub rounds: i64,
    pub duration_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFunding {
    pub name: String,
    pub market: String,
    pub events: usize,
}

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Sum funding per key. Records without a key are dropped; records without
/// an amount add nothing. Groups come out in ascending key order.
fn sum_by<K: Ord>(
    records: &[&InvestmentRecord],
    key: impl Fn(&InvestmentRecord) -> Option<K>,
) -> Vec<(K, f64)> {
    let mut groups: BTreeMap<K, f64> = BTreeMap::new();
    for &r in records {
        if let Some(k) = key(r) {
            *groups.entry(k).or_insert(0.0) += r.funding_total_usd.unwrap_or(0.0);
        }
    }
    groups.into_iter().collect()
}

/// Stable descending sort on the reduced value, then keep `n`.
fn top_n<K, V: PartialOrd>(mut groups: Vec<(K, V)>, n: usize) -> Vec<(K, V)> {
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    groups.truncate(n);
    groups
}

fn label_totals(groups: Vec<(String, f64)>) -> Vec<LabelTotal> {
    groups
        .into_iter()
        .map(|(label, total_usd)| LabelTotal { label, total_usd })
        .collect()
}

// ---------------------------------------------------------------------------
// Pipelines, one per chart panel
// ---------------------------------------------------------------------------

/// Funding trends over time: total per founding year, oldest first.
pub fn funding_by_year(records: &[&InvestmentRecord]) -> Vec<YearTotal> {
    sum_by(records, |r| r.founded_year)
        .into_iter()
        .map(|(year, total_usd)| YearTotal { year, total_usd })
        .collect()
}

/// Largest (market, name, status) groups by total funding.
pub fn top_companies(records: &[&InvestmentRecord], n: usize) -> Vec<CompanyTotal> {
    let groups = sum_by(records, |r| {
        Some((r.market.clone()?, r.name.clone()?, r.status.clone()?))
    });
    top_n(groups, n)
        .into_iter()
        .map(|((market, name, status), total_usd)| CompanyTotal {
            market,
            name,
            status,
            total_usd,
        })
        .collect()
}

pub fn top_markets(records: &[&InvestmentRecord], n: usize) -> Vec<LabelTotal> {
    label_totals(top_n(sum_by(records, |r| r.market.clone()), n))
}

/// How many multi-round records raised each number of rounds, most common
/// first.
pub fn round_distribution(records: &[&InvestmentRecord]) -> Vec<RoundCount> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for rounds in records.iter().filter_map(|r| r.funding_rounds) {
        if rounds > 1 {
            *counts.entry(rounds).or_insert(0) += 1;
        }
    }
    top_n(counts.into_iter().collect(), usize::MAX)
        .into_iter()
        .map(|(rounds, companies)| RoundCount { rounds, companies })
        .collect()
}

/// Records that raised at least `min_rounds` within `max_days` of their
/// first round. Records missing either funding date are skipped.
pub fn fast_growing(
    records: &[&InvestmentRecord],
    min_rounds: i64,
    max_days: i64,
) -> Vec<FastGrowth> {
    records
        .iter()
        .filter_map(|r| {
            let rounds = r.funding_rounds.filter(|&n| n >= min_rounds)?;
            let duration_days = r.funding_duration_days().filter(|&d| d <= max_days)?;
            Some(FastGrowth {
                name: r.name.clone(),
                first_funding_at: r.first_funding_at?,
                rounds,
                duration_days,
            })
        })
        .collect()
}

/// Start of the "recent funding" window: `years` before `reference`.
pub fn recent_cutoff(reference: NaiveDate, years: u32) -> NaiveDateTime {
    reference
        .checked_sub_months(Months::new(years.saturating_mul(12)))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Count last-funding events strictly after `cutoff` per (name, market),
/// largest first.
pub fn recent_funding(
    records: &[&InvestmentRecord],
    cutoff: NaiveDateTime,
    n: usize,
) -> Vec<RecentFunding> {
    let mut counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    for r in records {
        let Some(last) = r.last_funding_at else { continue };
        if last <= cutoff {
            continue;
        }
        if let (Some(name), Some(market)) = (&r.name, &r.market) {
            *counts.entry((name.clone(), market.clone())).or_insert(0) += 1;
        }
    }
    top_n(counts.into_iter().collect(), n)
        .into_iter()
        .map(|((name, market), events)| RecentFunding {
            name,
            market,
            events,
        })
        .collect()
}

pub fn top_cities(records: &[&InvestmentRecord], n: usize) -> Vec<LabelTotal> {
    label_totals(top_n(sum_by(records, |r| r.city.clone()), n))
}

/// Region totals, only when the source carried a `region` column.
pub fn top_regions(
    records: &[&InvestmentRecord],
    has_region: bool,
    n: usize,
) -> Availability<Vec<LabelTotal>> {
    if !has_region {
        return Availability::Unavailable(REGION_UNAVAILABLE.to_string());
    }
    Availability::Ready(label_totals(top_n(sum_by(records, |r| r.region.clone()), n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn company(name: &str, market: &str, usd: f64) -> InvestmentRecord {
        InvestmentRecord {
            name: Some(name.into()),
            market: Some(market.into()),
            status: Some("operating".into()),
            funding_total_usd: Some(usd),
            ..Default::default()
        }
    }

    #[test]
    fn year_totals_are_ascending_and_skip_missing_years() {
        let mut a = company("A", "Software", 5.0);
        a.founded_year = Some(2010);
        let mut b = company("B", "Software", 2.0);
        b.founded_year = Some(2001);
        let mut c = company("C", "Software", 3.0);
        c.founded_year = Some(2010);
        let d = company("D", "Software", 100.0);
        let rows = [a, b, c, d];
        let refs: Vec<_> = rows.iter().collect();

        assert_eq!(
            funding_by_year(&refs),
            vec![
                YearTotal { year: 2001, total_usd: 2.0 },
                YearTotal { year: 2010, total_usd: 8.0 },
            ]
        );
    }

    #[test]
    fn top_companies_groups_and_truncates() {
        let rows = [
            company("A", "Software", 1.0),
            company("B", "Games", 5.0),
            company("A", "Software", 7.0),
            company("C", "Games", 3.0),
        ];
        let refs: Vec<_> = rows.iter().collect();
        let top = top_companies(&refs, 2);
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].name.as_str(), top[0].total_usd), ("A", 8.0));
        assert_eq!((top[1].name.as_str(), top[1].total_usd), ("B", 5.0));
    }

    #[test]
    fn ties_keep_key_order() {
        let rows = [
            company("Z", "Zeta", 1.0),
            company("A", "Alpha", 1.0),
            company("M", "Mu", 1.0),
        ];
        let refs: Vec<_> = rows.iter().collect();
        let labels: Vec<_> = top_markets(&refs, 10).into_iter().map(|m| m.label).collect();
        assert_eq!(labels, ["Alpha", "Mu", "Zeta"]);
    }

    #[test]
    fn rounds_distribution_counts_multi_round_only() {
        let rows: Vec<_> = [Some(1), Some(2), Some(3), Some(2), None, Some(2)]
            .into_iter()
            .map(|n| InvestmentRecord {
                funding_rounds: n,
                ..Default::default()
            })
            .collect();
        let refs: Vec<_> = rows.iter().collect();
        assert_eq!(
            round_distribution(&refs),
            vec![
                RoundCount { rounds: 2, companies: 3 },
                RoundCount { rounds: 3, companies: 1 },
            ]
        );
    }

    #[test]
    fn fast_growing_needs_rounds_and_short_duration() {
        let mk = |rounds, first, last| InvestmentRecord {
            funding_rounds: Some(rounds),
            first_funding_at: first,
            last_funding_at: last,
            ..Default::default()
        };
        let rows = [
            mk(3, Some(ts(2010, 1, 1)), Some(ts(2011, 1, 1))),
            mk(2, Some(ts(2010, 1, 1)), Some(ts(2011, 1, 1))),
            mk(4, Some(ts(2010, 1, 1)), Some(ts(2013, 1, 1))),
            mk(5, Some(ts(2010, 1, 1)), None),
        ];
        let refs: Vec<_> = rows.iter().collect();
        let fast = fast_growing(&refs, 3, 730);
        assert_eq!(fast.len(), 1);
        assert_eq!(fast[0].duration_days, 365);
        assert_eq!(fast[0].first_funding_at, ts(2010, 1, 1));
    }

    #[test]
    fn recent_window_is_three_years_back_exclusive() {
        let cutoff = recent_cutoff(NaiveDate::from_ymd_opt(2014, 12, 31).unwrap(), 3);
        assert_eq!(cutoff, ts(2011, 12, 31));

        let mut on_cutoff = company("Old", "Software", 1.0);
        on_cutoff.last_funding_at = Some(ts(2011, 12, 31));
        let mut recent = company("New", "Software", 1.0);
        recent.last_funding_at = Some(ts(2012, 1, 1));
        let mut invalid = company("Bad", "Software", 1.0);
        invalid.last_funding_at = None;
        let rows = [on_cutoff, recent.clone(), recent, invalid];
        let refs: Vec<_> = rows.iter().collect();

        assert_eq!(
            recent_funding(&refs, cutoff, 50),
            vec![RecentFunding {
                name: "New".into(),
                market: "Software".into(),
                events: 2,
            }]
        );
    }

    #[test]
    fn region_panel_degrades_without_column() {
        let rows = [company("A", "Software", 1.0)];
        let refs: Vec<_> = rows.iter().collect();
        assert_eq!(
            top_regions(&refs, false, 20),
            Availability::Unavailable(REGION_UNAVAILABLE.to_string())
        );
        assert_eq!(top_regions(&refs, true, 20), Availability::Ready(vec![]));
    }

    #[test]
    fn empty_view_gives_empty_summaries() {
        let refs: Vec<&InvestmentRecord> = Vec::new();
        assert!(funding_by_year(&refs).is_empty());
        assert!(top_companies(&refs, 10).is_empty());
        assert!(top_markets(&refs, 10).is_empty());
        assert!(round_distribution(&refs).is_empty());
        assert!(fast_growing(&refs, 3, 730).is_empty());
        assert!(recent_funding(&refs, ts(2011, 12, 31), 50).is_empty());
        assert!(top_cities(&refs, 20).is_empty());
    }
}
