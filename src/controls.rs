use crate::data::filter::FilterSelection;
use crate::data::record::InvestmentDataset;

// ---------------------------------------------------------------------------
// Multiselect with a "select all" toggle
// ---------------------------------------------------------------------------

/// The toggle half of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Every option is accepted, whatever the chooser shows.
    #[default]
    All,
    /// Exactly the chooser's highlighted options are accepted.
    Chosen,
}

/// A multi-value chooser paired with a default-on "select all" toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelect<T> {
    pub label: String,
    options: Vec<T>,
    /// Highlighted options in the order they were picked.
    chosen: Vec<T>,
    pub mode: SelectMode,
}

impl<T: Clone + PartialEq> MultiSelect<T> {
    pub fn new(label: impl Into<String>, options: Vec<T>) -> Self {
        MultiSelect {
            label: label.into(),
            options,
            chosen: Vec::new(),
            mode: SelectMode::All,
        }
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    pub fn chosen(&self) -> &[T] {
        &self.chosen
    }

    pub fn is_chosen(&self, value: &T) -> bool {
        self.chosen.contains(value)
    }

    /// Highlight or un-highlight an option. Values outside the candidate list
    /// are ignored.
    pub fn set_chosen(&mut self, value: &T, on: bool) {
        if on {
            if self.options.contains(value) && !self.chosen.contains(value) {
                self.chosen.push(value.clone());
            }
        } else {
            self.chosen.retain(|v| v != value);
        }
    }

    pub fn clear_chosen(&mut self) {
        self.chosen.clear();
    }

    pub fn select_all(&self) -> bool {
        self.mode == SelectMode::All
    }

    /// Flip the toggle. The chooser keeps its highlight either way.
    pub fn set_select_all(&mut self, on: bool) {
        self.mode = if on { SelectMode::All } else { SelectMode::Chosen };
    }

    /// The values this control accepts.
    pub fn resolve(&self) -> Vec<T> {
        match self.mode {
            SelectMode::All => self.options.clone(),
            SelectMode::Chosen => self.chosen.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Founding-year range
// ---------------------------------------------------------------------------

/// Inclusive `[from, to]` inside the dataset's `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
    from: i32,
    to: i32,
}

impl YearRange {
    /// Full-width range over the given bounds.
    pub fn new(min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        YearRange {
            min,
            max,
            from: min,
            to: max,
        }
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> i32 {
        self.to
    }

    /// Set both ends, clamped to the bounds and ordered.
    pub fn set(&mut self, from: i32, to: i32) {
        let from = from.clamp(self.min, self.max);
        let to = to.clamp(self.min, self.max);
        self.from = from.min(to);
        self.to = from.max(to);
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.from..=self.to).contains(&year)
    }

    /// Whether the range still spans the whole dataset.
    pub fn is_full(&self) -> bool {
        self.from == self.min && self.to == self.max
    }
}

// ---------------------------------------------------------------------------
// FilterControls – the whole sidebar
// ---------------------------------------------------------------------------

pub type CategoryOption = Option<String>;

/// Sidebar state. `years` is `None` when the dataset has no valid year.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControls {
    pub country: MultiSelect<CategoryOption>,
    pub sector: MultiSelect<CategoryOption>,
    pub status: MultiSelect<CategoryOption>,
    pub years: Option<YearRange>,
}

impl FilterControls {
    /// Controls with every option accepted and the full year range.
    pub fn for_dataset(dataset: &InvestmentDataset) -> Self {
        FilterControls {
            country: MultiSelect::new("Select Country", dataset.country_options.clone()),
            sector: MultiSelect::new("Select Sectors", dataset.market_options.clone()),
            status: MultiSelect::new("Select Status", dataset.status_options.clone()),
            years: dataset.year_bounds.map(|(lo, hi)| YearRange::new(lo, hi)),
        }
    }

    /// Resolve every control into the selection the mask is built from. A
    /// full-width year range does not constrain, so rows without a valid
    /// founding year stay visible until the range is narrowed.
    pub fn selection(&self) -> FilterSelection {
        FilterSelection {
            countries: self.country.resolve().into_iter().collect(),
            sectors: self.sector.resolve().into_iter().collect(),
            statuses: self.status.resolve().into_iter().collect(),
            years: self
                .years
                .filter(|y| !y.is_full())
                .map(|y| (y.from(), y.to())),
        }
    }
}

/// Display text for a categorical option.
pub fn option_label(value: &CategoryOption) -> &str {
    value.as_deref().unwrap_or("(missing)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> MultiSelect<&'static str> {
        MultiSelect::new("Select Country", vec!["USA", "GBR", "IND", "DEU"])
    }

    #[test]
    fn select_all_ignores_chooser_state() {
        let mut ms = control();
        assert_eq!(ms.resolve(), ["USA", "GBR", "IND", "DEU"]);

        ms.set_chosen(&"IND", true);
        assert_eq!(ms.resolve(), ["USA", "GBR", "IND", "DEU"]);

        ms.set_chosen(&"IND", false);
        assert_eq!(ms.resolve(), ["USA", "GBR", "IND", "DEU"]);
    }

    #[test]
    fn unchecked_toggle_returns_chooser_verbatim() {
        let mut ms = control();
        ms.set_select_all(false);
        assert!(ms.resolve().is_empty());

        ms.set_chosen(&"DEU", true);
        ms.set_chosen(&"USA", true);
        ms.set_chosen(&"USA", true);
        assert_eq!(ms.resolve(), ["DEU", "USA"]);

        ms.set_select_all(true);
        ms.set_select_all(false);
        assert_eq!(ms.resolve(), ["DEU", "USA"]);
    }

    #[test]
    fn every_subset_resolves_to_itself() {
        let options = ["a", "b", "c"];
        for mask in 0u8..8 {
            let mut ms = MultiSelect::new("t", options.to_vec());
            ms.set_select_all(false);
            let subset: Vec<_> = options
                .iter()
                .enumerate()
                .filter(|&(i, _)| mask & (1u8 << i) != 0)
                .map(|(_, v)| *v)
                .collect();
            for v in &subset {
                ms.set_chosen(v, true);
            }
            assert_eq!(ms.resolve(), subset);
            ms.set_select_all(true);
            assert_eq!(ms.resolve(), options);
        }
    }

    #[test]
    fn unknown_values_are_not_chosen() {
        let mut ms = control();
        ms.set_select_all(false);
        ms.set_chosen(&"FRA", true);
        assert!(ms.resolve().is_empty());
    }

    #[test]
    fn year_range_is_clamped_and_ordered() {
        let mut yr = YearRange::new(1990, 2014);
        yr.set(2020, 1980);
        assert_eq!((yr.from(), yr.to()), (1990, 2014));
        yr.set(2010, 2000);
        assert_eq!((yr.from(), yr.to()), (2000, 2010));
        assert!(yr.contains(2005));
        assert!(!yr.contains(2011));
        assert!(!yr.is_full());
        yr.set(1990, 2014);
        assert!(yr.is_full());
    }
}
