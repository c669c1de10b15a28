use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

/// Write a synthetic vehicle-listings CSV for trying the dashboard
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file
    #[arg(default_value = "vehicles_us.csv")]
    path: PathBuf,

    /// Number of listings to write
    #[arg(default_value_t = 2000)]
    rows: usize,

    /// Seed for the pseudo-random generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// One output row, in the column order of the public dataset.
#[derive(Debug, Serialize)]
struct Listing {
    price: i64,
    model_year: Option<i32>,
    manufacturer: &'static str,
    model: String,
    condition: Option<&'static str>,
    cylinders: Option<u8>,
    fuel: &'static str,
    odometer: Option<i64>,
    transmission: &'static str,
    #[serde(rename = "type")]
    vehicle_type: &'static str,
    paint_color: Option<&'static str>,
    is_4wd: Option<u8>,
    days_listed: u32,
}

/// (manufacturer, model, body type, new price, cylinders)
const MODELS: &[(&str, &str, &str, f64, u8)] = &[
    ("toyota", "camry", "sedan", 26_000.0, 4),
    ("toyota", "tacoma", "pickup", 32_000.0, 6),
    ("toyota", "rav4", "SUV", 29_000.0, 4),
    ("ford", "f-150", "truck", 38_000.0, 8),
    ("ford", "focus", "sedan", 19_000.0, 4),
    ("ford", "explorer", "SUV", 35_000.0, 6),
    ("chevrolet", "silverado 1500", "truck", 37_000.0, 8),
    ("chevrolet", "malibu", "sedan", 23_000.0, 4),
    ("honda", "civic", "sedan", 22_000.0, 4),
    ("honda", "cr-v", "SUV", 28_000.0, 4),
    ("nissan", "altima", "sedan", 24_000.0, 4),
    ("jeep", "wrangler", "SUV", 33_000.0, 6),
    ("bmw", "x5", "SUV", 60_000.0, 6),
    ("hyundai", "sonata", "sedan", 23_000.0, 4),
    ("ram", "1500", "pickup", 39_000.0, 8),
];

/// (condition, price multiplier)
const CONDITIONS: &[(&str, f64)] = &[
    ("new", 1.15),
    ("like new", 1.05),
    ("excellent", 1.0),
    ("good", 0.9),
    ("fair", 0.7),
    ("salvage", 0.4),
];

const FUELS: &[&str] = &["gas", "gas", "gas", "gas", "diesel", "hybrid", "electric"];
const COLORS: &[&str] = &["white", "black", "silver", "grey", "blue", "red", "green"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn listing(rng: &mut SimpleRng) -> Listing {
    let (manufacturer, model, vehicle_type, new_price, cylinders) = rng.pick(MODELS);
    let (condition, condition_factor) = rng.pick(CONDITIONS);

    let age = (rng.gauss(9.0, 5.0).abs() as i32).min(40);
    let model_year = 2019 - age;
    let odometer = (f64::from(age) * rng.gauss(12_000.0, 3_000.0).max(2_000.0)).round();

    // Exponential depreciation by age, linear by mileage.
    let price = new_price * 0.86f64.powi(age) * condition_factor
        - odometer * 0.02
        + rng.gauss(0.0, 800.0);

    Listing {
        price: price.max(500.0).round() as i64,
        model_year: (!rng.chance(0.05)).then_some(model_year),
        manufacturer,
        model: model.to_string(),
        condition: (!rng.chance(0.05)).then_some(condition),
        cylinders: (!rng.chance(0.1)).then_some(cylinders),
        fuel: rng.pick(FUELS),
        odometer: (!rng.chance(0.05)).then_some(odometer as i64),
        transmission: if rng.chance(0.9) { "automatic" } else { "manual" },
        vehicle_type,
        paint_color: (!rng.chance(0.15)).then(|| rng.pick(COLORS)),
        is_4wd: rng.chance(0.5).then_some(1),
        days_listed: rng.below(120) as u32,
    }
}

/// Make roughly one listing in fifty fail the dashboard's cleaning rules.
fn corrupt(listing: &mut Listing, rng: &mut SimpleRng) {
    match rng.below(4) {
        0 => listing.price = 0,
        1 => listing.price = -listing.price,
        2 => listing.model_year = Some(1900),
        _ => listing.odometer = Some(-1),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut writer = csv::Writer::from_path(&args.path)
        .with_context(|| format!("creating {}", args.path.display()))?;

    let mut invalid = 0usize;
    for _ in 0..args.rows {
        let mut row = listing(&mut rng);
        if rng.chance(0.02) {
            corrupt(&mut row, &mut rng);
            invalid += 1;
        }
        writer
            .serialize(&row)
            .with_context(|| format!("writing {}", args.path.display()))?;
    }
    writer.flush().context("flushing CSV output")?;

    log::info!("{invalid} deliberately invalid rows");
    println!("Wrote {} listings to {}", args.rows, args.path.display());
    Ok(())
}
