/// Pure reductions over a filtered view: KPI tiles and the per-panel
/// aggregation pipelines.

pub mod aggregate;
pub mod kpi;
