use std::collections::HashSet;

use crate::data::record::InvestmentRecord;

/// Summary tiles above the charts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Kpis {
    pub total_funding_usd: f64,
    pub sector_count: usize,
    pub company_count: usize,
    /// Mean over records that carry an amount; `None` when none do.
    pub average_funding_usd: Option<f64>,
}

impl Kpis {
    pub fn compute(records: &[&InvestmentRecord]) -> Self {
        let amounts: Vec<f64> = records.iter().filter_map(|r| r.funding_total_usd).collect();
        let total = amounts.iter().fold(0.0, |acc, usd| acc + usd);
        let average = (!amounts.is_empty()).then(|| total / amounts.len() as f64);

        let sectors: HashSet<&str> = records.iter().filter_map(|r| r.market.as_deref()).collect();
        let companies: HashSet<&str> = records.iter().filter_map(|r| r.name.as_deref()).collect();

        Kpis {
            total_funding_usd: total,
            sector_count: sectors.len(),
            company_count: companies.len(),
            average_funding_usd: average,
        }
    }

    pub fn total_label(&self) -> String {
        format_millions(self.total_funding_usd)
    }

    pub fn average_label(&self) -> String {
        self.average_funding_usd
            .map(format_millions)
            .unwrap_or_else(|| "No data".to_string())
    }
}

/// `1_000_000.0` → `"$1.00M"`. Negative zero prints as `$0.00M`.
pub fn format_millions(usd: f64) -> String {
    format!("${:.2}M", usd / 1_000_000.0 + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, market: &str, usd: Option<f64>) -> InvestmentRecord {
        InvestmentRecord {
            name: Some(name.into()),
            market: Some(market.into()),
            funding_total_usd: usd,
            ..Default::default()
        }
    }

    #[test]
    fn kpis_over_records() {
        let rows = [
            rec("Acme", "Software", Some(1_000_000.0)),
            rec("Acme", "Software", Some(3_000_000.0)),
            rec("Beta", "Games", None),
        ];
        let refs: Vec<_> = rows.iter().collect();
        let k = Kpis::compute(&refs);
        assert_eq!(k.total_label(), "$4.00M");
        assert_eq!(k.average_label(), "$2.00M");
        assert_eq!(k.sector_count, 2);
        assert_eq!(k.company_count, 2);
    }

    #[test]
    fn empty_view_has_defined_values() {
        let k = Kpis::compute(&[]);
        assert_eq!(k.total_label(), "$0.00M");
        assert_eq!(k.average_label(), "No data");
        assert_eq!((k.sector_count, k.company_count), (0, 0));
        assert!(k.total_funding_usd.is_sign_positive());
    }

    #[test]
    fn negative_zero_formats_without_sign() {
        assert_eq!(format_millions(-0.0), "$0.00M");
        assert_eq!(format_millions(2_500_000.0), "$2.50M");
    }
}
