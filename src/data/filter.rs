use super::model::{Category, Dataset, Record};
use super::stats::quantile;

// ---------------------------------------------------------------------------
// Filter predicate: ranges plus optional categorical equality
// ---------------------------------------------------------------------------

/// Selector entry meaning "no manufacturer constraint".
pub const ALL_MANUFACTURERS: &str = "(all)";
/// Selector entry meaning "no condition constraint".
pub const ALL_CONDITIONS: &str = "(all)";

/// User-selected predicates. A record passes when it satisfies every one.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive model year range.
    pub years: (i32, i32),
    /// Inclusive price range.
    pub prices: (f64, f64),
    /// `None` → any manufacturer.
    pub manufacturer: Option<String>,
    /// `None` → any condition.
    pub condition: Option<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            years: (0, 0),
            prices: (0.0, 0.0),
            manufacturer: None,
            condition: None,
        }
    }
}

impl FilterCriteria {
    /// Starting criteria for a dataset: every model year, the central 90% of
    /// prices (5th/95th percentiles truncated to whole dollars), and no
    /// categorical constraint.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let (Some(years), Some((price_min, price_max))) =
            (dataset.year_bounds(), dataset.price_bounds())
        else {
            return Self::default();
        };

        let prices: Vec<f64> = dataset.records.iter().map(|r| r.price).collect();
        let (lo_bound, hi_bound) = (price_min.trunc(), price_max.trunc());
        let lo = quantile(&prices, 0.05).map_or(lo_bound, f64::trunc);
        let hi = quantile(&prices, 0.95).map_or(hi_bound, f64::trunc);

        Self {
            years,
            prices: (lo.clamp(lo_bound, hi_bound), hi.clamp(lo_bound, hi_bound)),
            manufacturer: None,
            condition: None,
        }
    }

    /// Set the manufacturer predicate from a selector entry; the
    /// [`ALL_MANUFACTURERS`] sentinel clears it.
    pub fn select_manufacturer(&mut self, choice: &str) {
        self.manufacturer = from_choice(choice, ALL_MANUFACTURERS);
    }

    /// Set the condition predicate from a selector entry; the
    /// [`ALL_CONDITIONS`] sentinel clears it.
    pub fn select_condition(&mut self, choice: &str) {
        self.condition = from_choice(choice, ALL_CONDITIONS);
    }

    /// Whether `record` satisfies all active predicates.
    pub fn matches(&self, record: &Record) -> bool {
        let (year_lo, year_hi) = self.years;
        let (price_lo, price_hi) = self.prices;
        if record.model_year < year_lo || record.model_year > year_hi {
            return false;
        }
        if record.price < price_lo || record.price > price_hi {
            return false;
        }
        equals(record, Category::Manufacturer, self.manufacturer.as_deref())
            && equals(record, Category::Condition, self.condition.as_deref())
    }
}

fn from_choice(choice: &str, sentinel: &str) -> Option<String> {
    (choice != sentinel).then(|| choice.to_string())
}

/// An inactive predicate passes; an active one rejects null values.
fn equals(record: &Record, category: Category, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => record.category(category) == Some(wanted),
    }
}

/// Return indices of records that pass all active predicates, in dataset
/// order.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn dataset() -> Dataset {
        let mut records = vec![
            record(5000.0, 2008, Some("toyota")),
            record(7000.0, 2010, Some("ford")),
            record(9000.0, 2012, Some("toyota")),
            record(12000.0, 2015, None),
            record(15000.0, 2016, Some("toyota")),
            record(3000.0, 2013, Some("chevrolet")),
        ];
        records[1].condition = Some("good".into());
        records[2].condition = Some("excellent".into());
        records[5].condition = Some("good".into());
        Dataset::from_records(records, vec![])
    }

    fn open(ds: &Dataset) -> FilterCriteria {
        FilterCriteria {
            years: ds.year_bounds().unwrap(),
            prices: ds.price_bounds().unwrap(),
            manufacturer: None,
            condition: None,
        }
    }

    #[test]
    fn test_year_range_inclusive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            years: (2010, 2015),
            ..open(&ds)
        };
        let idx = filtered_indices(&ds, &criteria);
        assert_eq!(idx, vec![1, 2, 3, 5]);
        assert!(idx
            .iter()
            .all(|&i| (2010..=2015).contains(&ds.records[i].model_year)));
    }

    #[test]
    fn test_price_range_inclusive() {
        let ds = dataset();
        let criteria = FilterCriteria {
            prices: (7000.0, 12000.0),
            ..open(&ds)
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 2, 3]);
    }

    #[test]
    fn test_manufacturer_equality_and_sentinel() {
        let ds = dataset();
        let mut criteria = open(&ds);

        criteria.select_manufacturer("toyota");
        let idx = filtered_indices(&ds, &criteria);
        assert_eq!(idx, vec![0, 2, 4]);
        assert!(idx
            .iter()
            .all(|&i| ds.records[i].manufacturer.as_deref() == Some("toyota")));

        criteria.select_manufacturer(ALL_MANUFACTURERS);
        assert_eq!(criteria.manufacturer, None);
        assert_eq!(filtered_indices(&ds, &criteria).len(), ds.len());
    }

    #[test]
    fn test_condition_and_manufacturer_combined() {
        let ds = dataset();
        let mut criteria = open(&ds);
        criteria.select_condition("good");
        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 5]);
        criteria.select_manufacturer("ford");
        assert_eq!(filtered_indices(&ds, &criteria), vec![1]);
        criteria.select_condition(ALL_CONDITIONS);
        assert_eq!(filtered_indices(&ds, &criteria), vec![1]);
    }

    #[test]
    fn test_unknown_value_yields_empty() {
        let ds = dataset();
        let mut criteria = open(&ds);
        criteria.select_manufacturer("tesla");
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn test_kept_plus_excluded_equals_total() {
        let ds = dataset();
        for years in [(2008, 2016), (2010, 2012), (2020, 2030), (2013, 2013)] {
            let criteria = FilterCriteria {
                years,
                prices: (4000.0, 14000.0),
                ..FilterCriteria::default()
            };
            let kept = filtered_indices(&ds, &criteria).len();
            let excluded = ds.records.iter().filter(|r| !criteria.matches(r)).count();
            assert_eq!(kept + excluded, ds.len());
        }
    }

    #[test]
    fn test_default_criteria_for_dataset() {
        let ds = dataset();
        let criteria = FilterCriteria::for_dataset(&ds);
        assert_eq!(criteria.years, (2008, 2016));
        // sorted prices: 3000 5000 7000 9000 12000 15000
        // q05 = 3000 + 0.25 * 2000, q95 = 12000 + 0.75 * 3000
        assert_eq!(criteria.prices, (3500.0, 14250.0));
        assert_eq!(criteria.manufacturer, None);
        assert_eq!(criteria.condition, None);
    }

    #[test]
    fn test_default_criteria_for_empty_dataset() {
        let criteria = FilterCriteria::for_dataset(&Dataset::default());
        assert_eq!(criteria, FilterCriteria::default());
        assert!(filtered_indices(&Dataset::default(), &criteria).is_empty());
    }
}
