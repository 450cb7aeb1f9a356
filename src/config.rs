use crate::data::store::{POWER_MAX, POWER_MIN};

/// Startup defaults. There is no config file; logging verbosity comes from
/// `RUST_LOG` via `env_logger`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
    pub default_power: i64,
    pub power_range: std::ops::RangeInclusive<i64>,
    pub default_file_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "⚡ Power Logger".to_string(),
            inner_size: [1200.0, 800.0],
            min_inner_size: [720.0, 480.0],
            default_power: 50,
            power_range: POWER_MIN..=POWER_MAX,
            default_file_name: "power_data.csv".to_string(),
        }
    }
}
