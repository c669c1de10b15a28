use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::error::{LoadError, Result};
use super::model::{
    Category, Dataset, Record, MAX_MODEL_YEAR, MIN_MODEL_YEAR, MODEL_YEAR, ODOMETER, PRICE,
};

/// File name pattern searched for when none is configured.
pub const DEFAULT_PATTERN: &str = "vehicles_us*.csv";

/// Cell contents read as missing, the usual data-frame defaults.
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Locate the source file in `dir` and load the cleaned dataset from it.
pub fn load_dataset(dir: &Path, pattern: &str) -> Result<(PathBuf, Dataset)> {
    let path = find_source(dir, pattern)?;
    let dataset = load_csv(&path)?;
    log::info!(
        "Loaded {} cleaned records from {} ({} columns)",
        dataset.len(),
        path.display(),
        dataset.columns.len()
    );
    Ok((path, dataset))
}

// ---------------------------------------------------------------------------
// Source discovery
// ---------------------------------------------------------------------------

/// Return the first file (by name) in `dir` whose name matches `pattern`.
///
/// `*` matches any run of characters and `?` a single character; every other
/// character matches itself.
pub fn find_source(dir: &Path, pattern: &str) -> Result<PathBuf> {
    let matcher = pattern_regex(pattern)?;
    let not_found = || LoadError::NotFound {
        pattern: pattern.to_string(),
        dir: dir.to_path_buf(),
    };

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(source) => {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| matcher.is_match(n))
        })
        .collect();
    matches.sort();

    if matches.len() > 1 {
        log::warn!(
            "{} files match '{pattern}', using {}",
            matches.len(),
            matches[0].display()
        );
    }
    matches.into_iter().next().ok_or_else(not_found)
}

fn pattern_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|source| LoadError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load and clean a vehicle CSV file.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse CSV text into a cleaned [`Dataset`].
///
/// Rows survive only with a positive price, a model year within
/// [`MIN_MODEL_YEAR`, `MAX_MODEL_YEAR`] and a non-negative odometer; any of
/// the three missing or unparsable drops the row.
pub fn read_csv<R: Read>(input: R) -> csv::Result<Dataset> {
    let mut reader = csv::Reader::from_reader(input);
    let mut columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let position = |name: &str| columns.iter().position(|h| h == name);
    let price_idx = position(PRICE);
    let year_idx = position(MODEL_YEAR);
    let odometer_idx = position(ODOMETER);
    let category_idx: Vec<(Category, Option<usize>)> = Category::ALL
        .into_iter()
        .map(|c| (c, position(c.column())))
        .collect();
    // Every position not claimed by a typed field, including later
    // duplicates of a typed column's name.
    let claimed: Vec<usize> = [price_idx, year_idx, odometer_idx]
        .into_iter()
        .chain(category_idx.iter().map(|(_, idx)| *idx))
        .flatten()
        .collect();
    let extra_idx: Vec<usize> = (0..columns.len())
        .filter(|i| !claimed.contains(i))
        .collect();

    for (name, idx) in [(PRICE, price_idx), (MODEL_YEAR, year_idx), (ODOMETER, odometer_idx)] {
        if idx.is_none() {
            log::warn!("Source has no '{name}' column; every row will be dropped");
        }
    }
    for (category, idx) in &category_idx {
        if idx.is_none() {
            columns.push(category.column().to_string());
        }
    }

    let mut records = Vec::new();
    let mut total = 0usize;

    for row in reader.records() {
        let row = row?;
        total += 1;

        let number = |idx: Option<usize>| idx.and_then(|i| row.get(i)).and_then(parse_number);
        let Some(price) = number(price_idx).filter(|p| *p > 0.0) else {
            continue;
        };
        let Some(model_year) = number(year_idx).and_then(to_model_year) else {
            continue;
        };
        let Some(odometer) = number(odometer_idx).filter(|o| *o >= 0.0) else {
            continue;
        };

        let mut record = Record {
            price,
            model_year,
            odometer,
            manufacturer: None,
            condition: None,
            fuel: None,
            transmission: None,
            vehicle_type: None,
            model: None,
            extra: BTreeMap::new(),
        };
        for (category, idx) in &category_idx {
            *record.category_mut(*category) = idx.and_then(|i| row.get(i)).and_then(text_cell);
        }
        for &i in &extra_idx {
            record.extra.insert(i, row.get(i).and_then(text_cell));
        }
        records.push(record);
    }

    let dropped = total - records.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} of {total} rows with missing or out-of-range values");
    }

    Ok(Dataset::from_records(records, columns))
}

// -- Cell helpers --

/// Trim, lowercase, and turn spaces, dashes and slashes into underscores.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace([' ', '-', '/'], "_")
}

fn is_null(s: &str) -> bool {
    NULL_TOKENS.contains(&s)
}

fn text_cell(s: &str) -> Option<String> {
    (!is_null(s)).then(|| s.to_string())
}

/// Finite number or nothing.
fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if is_null(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn to_model_year(v: f64) -> Option<i32> {
    if v.fract() != 0.0 {
        return None;
    }
    let year = v as i32;
    (MIN_MODEL_YEAR..=MAX_MODEL_YEAR)
        .contains(&year)
        .then_some(year)
}
