//! Writes a synthetic raw / cleaned pair of used-car listings for demos:
//! `carspandas.csv` and `Cars_cleaned.csv` in the working directory.

use anyhow::{Context, Result};

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// (company, models, base price in lakh, base power in bhp)
const MAKES: &[(&str, &[&str], f64, f64)] = &[
    ("Maruti", &["Swift", "Alto", "Wagon R", "Ertiga"], 4.5, 75.0),
    ("Hyundai", &["i20", "Creta", "Verna", "Grand i10"], 6.5, 95.0),
    ("Honda", &["City", "Amaze", "Jazz"], 7.0, 100.0),
    ("Toyota", &["Innova", "Corolla Altis", "Fortuner"], 14.0, 140.0),
    ("Mahindra", &["XUV500", "Scorpio", "Bolero"], 9.0, 120.0),
    ("BMW", &["3 Series", "5 Series", "X1"], 28.0, 185.0),
];

/// (city, latitude, longitude)
const CITIES: &[(&str, f64, f64)] = &[
    ("Mumbai", 19.076, 72.877),
    ("Hyderabad", 17.385, 78.486),
    ("Kochi", 9.931, 76.267),
    ("Pune", 18.520, 73.856),
    ("Delhi", 28.704, 77.102),
    ("Chennai", 13.082, 80.270),
];

const FUELS: &[&str] = &["Petrol", "Diesel", "Diesel", "Petrol", "CNG"];
const OWNERS: &[&str] = &["First", "First", "Second", "Third"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_rows = 600;

    let mut raw = csv::Writer::from_path("carspandas.csv").context("creating carspandas.csv")?;
    let mut clean =
        csv::Writer::from_path("Cars_cleaned.csv").context("creating Cars_cleaned.csv")?;

    raw.write_record([
        "S.No.", "Name", "Location", "Year", "Kilometers_Driven", "Fuel_Type", "Transmission",
        "Owner_Type", "Mileage", "Engine", "Power", "Seats", "Price",
    ])?;
    clean.write_record([
        "Company_Name", "Model", "Location", "Year", "Kilometers_Driven", "Fuel_Type",
        "Transmission", "Owner_Type", "Mileage_value", "Engine_value", "Power_value", "Seats",
        "Price", "Latitude", "Longitude",
    ])?;

    for row in 0..n_rows {
        let &(company, models, base_price, base_power) = rng.pick(MAKES);
        let model = *rng.pick(models);
        let &(city, lat, lon) = rng.pick(CITIES);
        let fuel = *rng.pick(FUELS);
        let owner = *rng.pick(OWNERS);
        let automatic = rng.next_f64() < if base_price > 10.0 { 0.7 } else { 0.25 };
        let transmission = if automatic { "Automatic" } else { "Manual" };

        let year = 2005 + (rng.next_u64() % 15) as i64;
        let age = (2020 - year) as f64;
        let km = (age * rng.gauss(11_000.0, 3_000.0)).max(1_000.0).round() as i64;
        let power = (base_power * rng.gauss(1.0, 0.12)).max(40.0);
        let engine = (power * 12.5).round() as i64;
        let mileage = (28.0 - power / 10.0 + rng.gauss(0.0, 1.5)).max(8.0);
        let seats = if model == "Innova" || model == "Ertiga" { 7 } else { 5 };

        let mut price = base_price * (1.0 - 0.06 * age).max(0.25) * rng.gauss(1.0, 0.1);
        if automatic {
            price *= 1.15;
        }
        if fuel == "Diesel" {
            price *= 1.08;
        }
        price -= km as f64 / 400_000.0;
        let price = (price.max(0.45) * 100.0).round() / 100.0;

        raw.write_record([
            row.to_string(),
            format!("{company} {model}"),
            city.to_string(),
            year.to_string(),
            km.to_string(),
            fuel.to_string(),
            transmission.to_string(),
            owner.to_string(),
            format!("{mileage:.1} kmpl"),
            format!("{engine} CC"),
            format!("{power:.1} bhp"),
            seats.to_string(),
            price.to_string(),
        ])?;

        clean.write_record([
            company.to_string(),
            model.to_string(),
            city.to_string(),
            year.to_string(),
            km.to_string(),
            fuel.to_string(),
            transmission.to_string(),
            owner.to_string(),
            format!("{mileage:.1}"),
            engine.to_string(),
            format!("{power:.1}"),
            seats.to_string(),
            price.to_string(),
            format!("{:.4}", lat + rng.gauss(0.0, 0.05)),
            format!("{:.4}", lon + rng.gauss(0.0, 0.05)),
        ])?;
    }

    raw.flush()?;
    clean.flush()?;

    println!("Wrote {n_rows} listings to carspandas.csv and Cars_cleaned.csv");
    Ok(())
}
