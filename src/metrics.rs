// Observation -> Snapshot: unit conversions, detections, category lookups
// and pressure trends over the window. Every derived field is absent when
// its input is; nothing here fails the whole snapshot.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::classification::{
    PrecipitationType, RAINFALL_INTENSITY, UV_EXPOSURE, WIND_GUST_FORCE, steady_tolerance_mb,
};
use crate::models::{Observation, Snapshot};
use crate::trend::{self, ONE_HOUR_LOOKBACK, THREE_HOUR_LOOKBACK};
use crate::window::SnapshotWindow;

const INHG_PER_MB: f64 = 0.02953;
const MPH_PER_MPS: f64 = 2.237;
const MILES_PER_KM: f64 = 0.621371;
const INCHES_PER_MM: f64 = 0.03937;

/// Rounds the exact binary value to `places` decimals, ties to even.
/// `50.15` is stored just below the tie, so it rounds to `50.1`.
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

pub fn mb_to_inhg(mb: f64) -> f64 {
    round_to(mb * INHG_PER_MB, 2)
}

pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    round_to(c * 1.8 + 32.0, 1)
}

pub fn mps_to_mph(mps: f64) -> f64 {
    round_to(mps * MPH_PER_MPS, 1)
}

pub fn km_to_miles(km: f64) -> f64 {
    round_to(km * MILES_PER_KM, 1)
}

pub fn mm_to_inches(mm: f64) -> f64 {
    round_to(mm * INCHES_PER_MM, 6)
}

/// RFC 3339 UTC at second precision, e.g. `2020-05-08T14:36:54+00:00`.
pub fn iso_8601(epoch: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(epoch, 0).map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, false))
}

/// Pressures of the last `lookback` snapshots; `None` if there are fewer or
/// any of them lacks a pressure reading.
fn lookback_pressures(window: &SnapshotWindow, lookback: usize) -> Option<Vec<f64>> {
    if window.len() < lookback {
        return None;
    }
    window.iter_tail(lookback).map(|s| s.pressure_mb).collect()
}

/// Rounded delta over `lookback` and its inHg conversion.
fn pressure_change(
    window: &SnapshotWindow,
    current_mb: Option<f64>,
    lookback: usize,
) -> (Option<f64>, Option<f64>) {
    let delta = current_mb.and_then(|current| {
        let history = lookback_pressures(window, lookback)?;
        trend::pressure_delta(&history, current, lookback)
    });
    let mb = delta.map(|d| round_to(d, 2));
    (mb, mb.map(mb_to_inhg))
}

/// Builds the snapshot for `obs`. `window` holds every previously published
/// snapshot (the newest one is the prior current state) and excludes `obs`.
pub fn derive(obs: &Observation, window: &SnapshotWindow) -> Snapshot {
    let pressure_mb = obs.station_pressure_mb;
    let (one_hour_mb, one_hour_inhg) = pressure_change(window, pressure_mb, ONE_HOUR_LOOKBACK);
    let (three_hours_mb, three_hours_inhg) =
        pressure_change(window, pressure_mb, THREE_HOUR_LOOKBACK);
    let advanced = pressure_mb.and_then(|current| {
        let history = lookback_pressures(window, THREE_HOUR_LOOKBACK)?;
        trend::advanced_trend(
            &history,
            current,
            THREE_HOUR_LOOKBACK,
            steady_tolerance_mb(),
        )
    });

    let precip = obs.precip_accumulated_mm;
    let gust_mph = obs.wind_gust_mps.map(mps_to_mph);

    Snapshot {
        last_updated_epoch: obs.epoch,
        last_updated_iso_8601: obs.epoch.and_then(iso_8601),
        lightning_detected: obs.lightning_strike_count.map(|c| c > 0),
        lightning_strike_average_distance_km: obs.lightning_avg_distance_km,
        lightning_strike_average_distance_miles: obs.lightning_avg_distance_km.map(km_to_miles),
        pressure_inhg: pressure_mb.map(mb_to_inhg),
        pressure_mb,
        pressure_trend_advanced_three_hours_description: advanced,
        pressure_trend_one_hour_description: trend::classify_one_hour(one_hour_mb),
        pressure_trend_one_hour_inhg: one_hour_inhg,
        pressure_trend_one_hour_mb: one_hour_mb,
        pressure_trend_three_hours_description: trend::classify_three_hours(three_hours_mb),
        pressure_trend_three_hours_inhg: three_hours_inhg,
        pressure_trend_three_hours_mb: three_hours_mb,
        precipitation_description: RAINFALL_INTENSITY.lookup(precip),
        precipitation_detected: precip.map(|p| p > 0.0),
        precipitation_inches_per_minute: precip.map(mm_to_inches),
        precipitation_mm_per_minute: precip,
        precipitation_type: obs.precip_type_code.and_then(PrecipitationType::from_code),
        relative_humidity: obs.relative_humidity_pct.map(|h| round_to(h, 1)),
        solar_radiation: obs.solar_radiation_wm2,
        temperature_c: obs.air_temperature_c,
        temperature_f: obs.air_temperature_c.map(celsius_to_fahrenheit),
        uv_exposure_category: UV_EXPOSURE.lookup(obs.uv_index),
        uv_index: obs.uv_index,
        wind_gust_description: WIND_GUST_FORCE.lookup(gust_mph),
        wind_gust_meters_per_second: obs.wind_gust_mps,
        wind_gust_miles_per_hour: gust_mph,
    }
}
