use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const PRICE: &str = "price";
pub const MODEL_YEAR: &str = "model_year";
pub const ODOMETER: &str = "odometer";

/// Inclusive bounds a model year must fall within to survive cleaning.
pub const MIN_MODEL_YEAR: i32 = 1950;
pub const MAX_MODEL_YEAR: i32 = 2035;

/// Categorical columns every dataset is guaranteed to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Manufacturer,
    Condition,
    Fuel,
    Transmission,
    Type,
    Model,
}

impl Category {
    /// Every guaranteed categorical column, in the order they are appended
    /// when the source lacks them.
    pub const ALL: [Category; 6] = [
        Category::Manufacturer,
        Category::Condition,
        Category::Fuel,
        Category::Transmission,
        Category::Type,
        Category::Model,
    ];

    /// Columns offered in the scatter plot's "Color by" selector.
    pub const COLOR_BY: [Category; 5] = [
        Category::Condition,
        Category::Fuel,
        Category::Transmission,
        Category::Type,
        Category::Manufacturer,
    ];

    /// Normalized column name.
    pub fn column(self) -> &'static str {
        match self {
            Category::Manufacturer => "manufacturer",
            Category::Condition => "condition",
            Category::Fuel => "fuel",
            Category::Transmission => "transmission",
            Category::Type => "type",
            Category::Model => "model",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.column() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the cleaned table
// ---------------------------------------------------------------------------

/// A single vehicle listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Always > 0.
    pub price: f64,
    /// Always within [`MIN_MODEL_YEAR`, `MAX_MODEL_YEAR`].
    pub model_year: i32,
    /// Always >= 0.
    pub odometer: f64,
    pub manufacturer: Option<String>,
    pub condition: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub vehicle_type: Option<String>,
    pub model: Option<String>,
    /// Remaining source cells keyed by column position, kept verbatim
    /// (null tokens → `None`). Keyed by position so columns whose headers
    /// normalize to the same name stay distinct.
    pub extra: BTreeMap<usize, Option<String>>,
}

impl Record {
    pub fn category(&self, category: Category) -> Option<&str> {
        let value = match category {
            Category::Manufacturer => &self.manufacturer,
            Category::Condition => &self.condition,
            Category::Fuel => &self.fuel,
            Category::Transmission => &self.transmission,
            Category::Type => &self.vehicle_type,
            Category::Model => &self.model,
        };
        value.as_deref()
    }

    pub fn category_mut(&mut self, category: Category) -> &mut Option<String> {
        match category {
            Category::Manufacturer => &mut self.manufacturer,
            Category::Condition => &mut self.condition,
            Category::Fuel => &mut self.fuel,
            Category::Transmission => &mut self.transmission,
            Category::Type => &mut self.vehicle_type,
            Category::Model => &mut self.model,
        }
    }

    /// Render the cell at column `index` (named `column`) as text, `None`
    /// for null.
    pub fn cell(&self, index: usize, column: &str) -> Option<String> {
        if let Some(value) = self.extra.get(&index) {
            return value.clone();
        }
        match column {
            PRICE => Some(format_number(self.price)),
            MODEL_YEAR => Some(self.model_year.to_string()),
            ODOMETER => Some(format_number(self.odometer)),
            other => Category::from_column(other)
                .and_then(|category| self.category(category))
                .map(str::to_string),
        }
    }
}

/// Integral values print without a fractional part (`5000`, not `5000.0`).
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete cleaned table
// ---------------------------------------------------------------------------

/// The cleaned dataset with pre-computed selector values.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Normalized column names, source order first, then any added
    /// categorical columns.
    pub columns: Vec<String>,
    /// Sorted distinct non-null values per categorical column.
    pub unique_values: BTreeMap<Category, BTreeSet<String>>,
}

impl Dataset {
    /// Build selector indices from the cleaned records.
    pub fn from_records(records: Vec<Record>, columns: Vec<String>) -> Self {
        let mut unique_values: BTreeMap<Category, BTreeSet<String>> = BTreeMap::new();
        for category in Category::ALL {
            let values = unique_values.entry(category).or_default();
            for record in &records {
                if let Some(v) = record.category(category) {
                    values.insert(v.to_string());
                }
            }
        }
        Dataset {
            records,
            columns,
            unique_values,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct values of a categorical column.
    pub fn values(&self, category: Category) -> impl Iterator<Item = &str> {
        self.unique_values
            .get(&category)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Inclusive (min, max) model year, `None` when empty.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.model_year).min()?;
        let max = self.records.iter().map(|r| r.model_year).max()?;
        Some((min, max))
    }

    /// Inclusive (min, max) price, `None` when empty.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        if self.records.is_empty() {
            return None;
        }
        let min = self.records.iter().map(|r| r.price).fold(f64::INFINITY, f64::min);
        let max = self
            .records
            .iter()
            .map(|r| r.price)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(price: f64, year: i32, manufacturer: Option<&str>) -> Record {
        Record {
            price,
            model_year: year,
            odometer: 50_000.0,
            manufacturer: manufacturer.map(str::to_string),
            condition: None,
            fuel: None,
            transmission: None,
            vehicle_type: None,
            model: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_unique_values_skip_nulls_and_sort() {
        let ds = Dataset::from_records(
            vec![
                record(1.0, 2000, Some("toyota")),
                record(2.0, 2001, None),
                record(3.0, 2002, Some("ford")),
                record(4.0, 2003, Some("toyota")),
            ],
            vec![],
        );
        let values: Vec<&str> = ds.values(Category::Manufacturer).collect();
        assert_eq!(values, vec!["ford", "toyota"]);
        assert_eq!(ds.values(Category::Fuel).count(), 0);
    }

    #[test]
    fn test_bounds() {
        let ds = Dataset::from_records(
            vec![record(900.0, 2011, None), record(150.5, 1999, None)],
            vec![],
        );
        assert_eq!(ds.year_bounds(), Some((1999, 2011)));
        assert_eq!(ds.price_bounds(), Some((150.5, 900.0)));
        assert_eq!(Dataset::default().year_bounds(), None);
        assert_eq!(Dataset::default().price_bounds(), None);
    }

    #[test]
    fn test_cell_rendering() {
        let mut r = record(9400.0, 2011, Some("bmw"));
        r.odometer = 145000.5;
        r.extra.insert(5, Some("black".into()));
        r.extra.insert(6, None);
        assert_eq!(r.cell(0, "price").as_deref(), Some("9400"));
        assert_eq!(r.cell(1, "odometer").as_deref(), Some("145000.5"));
        assert_eq!(r.cell(2, "model_year").as_deref(), Some("2011"));
        assert_eq!(r.cell(3, "manufacturer").as_deref(), Some("bmw"));
        assert_eq!(r.cell(4, "condition"), None);
        assert_eq!(r.cell(5, "paint_color").as_deref(), Some("black"));
        assert_eq!(r.cell(6, "cylinders"), None);
        assert_eq!(r.cell(7, "unknown"), None);
    }

    #[test]
    fn test_extra_cell_shadows_name_lookup() {
        // A second "price" column is carried as an extra cell.
        let mut r = record(9400.0, 2011, None);
        r.extra.insert(3, Some("9,400 USD".into()));
        assert_eq!(r.cell(0, "price").as_deref(), Some("9400"));
        assert_eq!(r.cell(3, "price").as_deref(), Some("9,400 USD"));
    }
}
