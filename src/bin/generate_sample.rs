use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Timelike};

use air_quality_dashboard::config::DEFAULT_DATA_PATH;
use air_quality_dashboard::data::Season;

const STATIONS: [(&str, f64); 2] = [("Aotizhongxin", 1.0), ("Dongsi", 1.15)];
const MISSING_RATE: f64 = 0.02;

/// Deterministic generator for reproducible sample files (SplitMix64).
struct SampleRng {
    state: u64,
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        SampleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.uniform() < probability
    }

    /// Normal sample via Box-Muller.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.uniform().max(f64::MIN_POSITIVE).ln()).sqrt();
        let angle = std::f64::consts::TAU * self.uniform();
        mean + std_dev * radius * angle.cos()
    }

    /// Multiplicative noise around 1.0, never negative.
    fn jitter(&mut self, spread: f64) -> f64 {
        self.normal(1.0, spread).max(0.0)
    }

    /// Formatted non-negative value, blank for an occasional gap.
    fn cell(&mut self, value: f64, decimals: usize) -> String {
        if self.chance(MISSING_RATE) {
            String::new()
        } else {
            format!("{:.*}", decimals, value.max(0.0))
        }
    }
}

fn season_factor(season: Season) -> f64 {
    match season {
        Season::Winter => 1.8,
        Season::Spring => 1.0,
        Season::Summer => 0.7,
        Season::Autumn => 1.2,
    }
}

/// Evening and night-time build-up, minimum in the early afternoon.
fn diurnal_factor(hour: u32) -> f64 {
    1.0 + 0.35 * ((hour as f64 - 2.0) / 24.0 * 2.0 * std::f64::consts::PI).cos()
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record([
        "No", "datetime", "PM2.5", "PM10", "SO2", "NO2", "CO", "RAIN", "WSPM", "station", "season",
    ])?;

    let mut rng = SampleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2013, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start timestamp")?;
    let end = NaiveDate::from_ymd_opt(2017, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid end timestamp")?;

    let mut rows = 0usize;
    for &(station, station_factor) in &STATIONS {
        let mut ts = start;
        while ts < end {
            let season = Season::from_month(ts.month());
            let wind = rng.normal(1.8, 1.0).abs();
            let rain = if rng.chance(0.05) {
                rng.normal(1.5, 1.5).abs()
            } else {
                0.0
            };

            // Wind and rain both wash out particulates.
            let washout = 1.0 / (1.0 + 0.3 * wind + 0.5 * rain);
            let diurnal = diurnal_factor(ts.hour());
            let base = 80.0 * season_factor(season) * diurnal * station_factor;
            let pm25 = (base * washout * rng.jitter(0.25)).max(2.0);
            let pm10 = pm25 * rng.normal(1.35, 0.1) + rng.normal(10.0, 5.0);
            let so2 = 15.0 * season_factor(season).powi(2) * rng.jitter(0.3);
            let no2 = 50.0 * diurnal * washout.sqrt() * rng.jitter(0.2);
            let co = 1200.0 * season_factor(season) * diurnal * rng.jitter(0.3);

            rows += 1;
            writer.write_record([
                rows.to_string(),
                ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                rng.cell(pm25, 1),
                rng.cell(pm10, 1),
                rng.cell(so2, 1),
                rng.cell(no2, 1),
                rng.cell(co, 0),
                format!("{rain:.1}"),
                rng.cell(wind, 1),
                station.to_string(),
                season.to_string(),
            ])?;

            ts += Duration::hours(1);
        }
    }
    writer.flush()?;

    log::info!("Wrote {rows} observations to {}", output_path.display());
    println!("Wrote {rows} observations to {}", output_path.display());
    Ok(())
}
