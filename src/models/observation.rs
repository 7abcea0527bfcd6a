// One decoded `obs_st` reading. Every field may be missing on the wire.

/// Positional layout of the hub's observation array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    /// Seconds since the Unix epoch.
    pub epoch: Option<i64>,
    pub wind_lull_mps: Option<f64>,
    pub wind_avg_mps: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub wind_direction_deg: Option<f64>,
    pub wind_sample_interval_secs: Option<f64>,
    pub station_pressure_mb: Option<f64>,
    pub air_temperature_c: Option<f64>,
    pub relative_humidity_pct: Option<f64>,
    pub illuminance_lux: Option<f64>,
    pub uv_index: Option<f64>,
    pub solar_radiation_wm2: Option<f64>,
    /// Accumulated over the one-minute report interval, so effectively mm/min.
    pub precip_accumulated_mm: Option<f64>,
    pub precip_type_code: Option<i64>,
    pub lightning_avg_distance_km: Option<f64>,
    pub lightning_strike_count: Option<u32>,
    pub battery_volts: Option<f64>,
    pub report_interval_min: Option<f64>,
}
