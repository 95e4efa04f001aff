use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const MARKETS: &[&str] = &[
    "Software", "Biotechnology", "Mobile", "E-Commerce", "Enterprise Software",
    "Clean Technology", "Health Care", "Games", "Advertising", "Hardware + Software",
];
const STATUSES: &[&str] = &["operating", "acquired", "closed"];
/// (country_code, region, city)
const LOCATIONS: &[(&str, &str, &str)] = &[
    ("USA", "SF Bay Area", "San Francisco"),
    ("USA", "SF Bay Area", "Palo Alto"),
    ("USA", "New York City", "New York"),
    ("USA", "Boston", "Cambridge"),
    ("USA", "Los Angeles", "Santa Monica"),
    ("GBR", "London", "London"),
    ("IND", "Bangalore", "Bangalore"),
    ("DEU", "Berlin", "Berlin"),
    ("CAN", "Toronto", "Toronto"),
    ("ISR", "Tel Aviv", "Tel Aviv"),
];
const SYLLABLES: &[&str] = &["zen", "lo", "qua", "tri", "vex", "nor", "bit", "ly", "ra", "mo"];

/// Minimal deterministic PRNG (splitmix64).
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

struct SampleCompany {
    name: String,
    market: String,
    country_code: String,
    region: String,
    city: String,
    status: String,
    founded_year: Option<i64>,
    founded_at: Option<NaiveDate>,
    first_funding_at: Option<NaiveDate>,
    last_funding_at: Option<NaiveDate>,
    funding_rounds: i64,
    funding_total_usd: f64,
}

fn company(rng: &mut SampleRng, idx: usize) -> SampleCompany {
    let name: String = (0..2 + rng.below(2)).map(|_| rng.pick(SYLLABLES)).collect();
    let (country_code, region, city) = LOCATIONS[rng.below(LOCATIONS.len())];
    let year = 1995 + rng.below(20) as i32;
    let founded = NaiveDate::from_ymd_opt(year, 1 + rng.below(12) as u32, 1);
    let first = founded.map(|d| d + Duration::days(90 + rng.below(900) as i64));
    let rounds = 1 + rng.below(6) as i64;
    let gap = 60 + rng.below(400) as i64;
    let last = first.map(|d| d + Duration::days((rounds - 1) * gap));
    // Log-normal-ish amounts from ~50k to ~200M.
    let funding = (10.8 + 8.5 * rng.unit()).exp().round();

    SampleCompany {
        name: format!("{name}{idx}"),
        market: rng.pick(MARKETS).to_string(),
        country_code: country_code.to_string(),
        region: region.to_string(),
        city: city.to_string(),
        status: rng.pick(STATUSES).to_string(),
        // Every 97th row carries a bad year and every 89th a bad last date,
        // so the coercion paths show up in the demo.
        founded_year: (idx % 97 != 0).then_some(year as i64),
        founded_at: founded,
        first_funding_at: first,
        last_funding_at: if idx % 89 == 0 { None } else { last },
        funding_rounds: rounds,
        funding_total_usd: funding,
    }
}

fn write_csv(path: &str, rows: &[SampleCompany]) -> Result<()> {
    let mut w = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    w.write_record([
        "name", "market", "country_code", "region", "city", "status", "founded_year",
        "founded_at", "first_funding_at", "last_funding_at", "funding_rounds",
        "funding_total_usd",
    ])?;
    let date = |d: Option<NaiveDate>, bad: &str| {
        d.map(|d| d.to_string()).unwrap_or_else(|| bad.to_string())
    };
    for r in rows {
        w.write_record([
            r.name.clone(),
            r.market.clone(),
            r.country_code.clone(),
            r.region.clone(),
            r.city.clone(),
            r.status.clone(),
            r.founded_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            date(r.founded_at, ""),
            date(r.first_funding_at, ""),
            date(r.last_funding_at, "invalid"),
            r.funding_rounds.to_string(),
            format!("{:.0}", r.funding_total_usd),
        ])?;
    }
    w.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[SampleCompany]) -> Result<()> {
    let text = |f: fn(&SampleCompany) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;
    let days = |f: fn(&SampleCompany) -> Option<NaiveDate>| -> ArrayRef {
        Arc::new(Date32Array::from(
            rows.iter()
                .map(|r| f(r).map(|d| (d - epoch).num_days() as i32))
                .collect::<Vec<_>>(),
        ))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("market", DataType::Utf8, false),
        Field::new("country_code", DataType::Utf8, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("city", DataType::Utf8, false),
        Field::new("status", DataType::Utf8, false),
        Field::new("founded_year", DataType::Int64, true),
        Field::new("founded_at", DataType::Date32, true),
        Field::new("first_funding_at", DataType::Date32, true),
        Field::new("last_funding_at", DataType::Date32, true),
        Field::new("funding_rounds", DataType::Int64, false),
        Field::new("funding_total_usd", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.name.as_str()),
            text(|r| r.market.as_str()),
            text(|r| r.country_code.as_str()),
            text(|r| r.region.as_str()),
            text(|r| r.city.as_str()),
            text(|r| r.status.as_str()),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.founded_year).collect::<Vec<_>>())),
            days(|r| r.founded_at),
            days(|r| r.first_funding_at),
            days(|r| r.last_funding_at),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.funding_rounds).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.funding_total_usd).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SampleRng(42);
    let rows: Vec<SampleCompany> = (0..2000).map(|i| company(&mut rng, i)).collect();

    write_csv("sample_investments.csv", &rows)?;
    write_parquet("sample_investments.parquet", &rows)?;

    println!(
        "Wrote {} companies to sample_investments.csv and sample_investments.parquet",
        rows.len()
    );
    Ok(())
}
