use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Normal sample via the Box-Muller transform.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Base load (kWh), peak load (kWh) and the hours the building is busy.
const BUILDINGS: [(&str, f64, f64, std::ops::Range<u32>); 3] = [
    ("Office", 40.0, 160.0, 8..18),
    ("Residential", 15.0, 45.0, 17..23),
    ("Retail", 25.0, 110.0, 10..21),
];

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Fraction of cells left empty to exercise missing-value handling.
const MISSING_RATE: f64 = 0.02;

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "energy_consumption.csv".to_string());

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "building_type",
        "day_of_week",
        "hour",
        "temperature_c",
        "occupancy",
        "energy_kwh",
    ])?;

    let mut rows = 0usize;
    for (building, base, peak, busy) in &BUILDINGS {
        for (day_index, day) in DAYS.iter().enumerate() {
            let weekend = day_index >= 5;
            for hour in 0..24u32 {
                let busy_now = busy.contains(&hour) && !(weekend && *building == "Office");
                let occupancy = if busy_now {
                    (gauss(&mut rng, 0.8, 0.1).clamp(0.0, 1.0) * 100.0).round()
                } else {
                    (gauss(&mut rng, 0.1, 0.05).clamp(0.0, 1.0) * 100.0).round()
                };
                let daylight = ((hour as f64 - 6.0) / 12.0 * std::f64::consts::PI).sin().max(0.0);
                let temperature = 12.0 + 10.0 * daylight + gauss(&mut rng, 0.0, 1.5);
                let cooling = (temperature - 20.0).max(0.0) * 2.5;
                let kwh = base + (peak - base) * occupancy / 100.0 + cooling + gauss(&mut rng, 0.0, 3.0);

                let mut maybe = |value: String| {
                    if rng.gen_bool(MISSING_RATE) {
                        String::new()
                    } else {
                        value
                    }
                };
                let record = [
                    building.to_string(),
                    day.to_string(),
                    hour.to_string(),
                    maybe(format!("{temperature:.1}")),
                    maybe(format!("{occupancy}")),
                    maybe(format!("{:.2}", kwh.max(0.0))),
                ];
                writer.write_record(&record)?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {rows} rows to {output_path}");
    Ok(())
}
