use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Meter noise source. Only needs to be deterministic so every run writes
/// the same sample file (splitmix64 plus Box-Muller).
struct MeterNoise {
    state: u64,
}

impl MeterNoise {
    fn seeded(seed: u64) -> Self {
        MeterNoise { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Zero-mean normal jitter in watts.
    fn jitter(&mut self, std_dev: f64) -> f64 {
        let u1 = self.unit().max(1e-15);
        let u2 = self.unit();
        std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Household-style load curve in watts: base load, a morning and an evening
/// peak, plus noise.
fn load_at(hour: f64, noise: &mut MeterNoise) -> i64 {
    let peak = |center: f64, width: f64, height: f64| {
        height * (-(hour - center).powi(2) / (2.0 * width.powi(2))).exp()
    };
    let watts = 180.0 + peak(7.5, 1.2, 900.0) + peak(19.0, 2.0, 1600.0) + noise.jitter(40.0);
    (watts.round() as i64).clamp(-100_000, 100_000)
}

fn main() -> Result<()> {
    let mut noise = MeterNoise::seeded(42);

    let start = NaiveDate::from_ymd_opt(2026, 2, 7)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start date")?;
    let step_minutes = 15;
    let readings = 24 * 60 / step_minutes;

    let output_path = "sample_power.csv";
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Date Time", "Power"])?;

    for i in 0..readings {
        let ts = start + Duration::minutes(i * step_minutes);
        let hour = (i * step_minutes) as f64 / 60.0;
        let power = load_at(hour, &mut noise);
        writer.write_record([ts.format("%Y-%m-%d %H:%M:%S").to_string(), power.to_string()])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {readings} readings ({step_minutes} min apart) to {output_path}");
    Ok(())
}
