// Hub datagram -> Observation. Only `obs_st` packets are observations;
// rapid_wind, hub_status, device_status etc. are rejected.

use serde_json::Value;
use thiserror::Error;

use crate::models::Observation;

pub const OBSERVATION_TYPE: &str = "obs_st";

/// Names of the positional fields in an `obs_st` array.
pub const FIELD_NAMES: [&str; 18] = [
    "time_epoch",
    "wind_lull",
    "wind_avg",
    "wind_gust",
    "wind_direction",
    "wind_sample_interval",
    "station_pressure",
    "air_temperature",
    "relative_humidity",
    "illuminance",
    "uv",
    "solar_radiation",
    "precip_accumulated",
    "precipitation_type",
    "lightning_strike_avg_distance",
    "lightning_strike_count",
    "battery",
    "report_interval",
];

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("packet is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("packet is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("packet is not a JSON object")]
    NotAnObject,

    #[error("packet has no type")]
    MissingType,

    #[error("unsupported packet type: {0}")]
    UnsupportedType(String),

    #[error("obs_st packet has no observation array")]
    MissingObservations,

    #[error("observation has {actual} fields, expected {expected}")]
    TooFewFields { expected: usize, actual: usize },

    #[error("observation field {index} ({name}) is not numeric")]
    InvalidField { index: usize, name: &'static str },
}

impl DecodeError {
    /// Packets the hub sends routinely that simply aren't observations.
    pub fn is_other_packet_type(&self) -> bool {
        matches!(self, DecodeError::UnsupportedType(_))
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

pub fn decode(bytes: &[u8]) -> Result<Observation> {
    decode_str(std::str::from_utf8(bytes)?)
}

pub fn decode_str(s: &str) -> Result<Observation> {
    let Value::Object(mut packet) = serde_json::from_str::<Value>(s)? else {
        return Err(DecodeError::NotAnObject);
    };
    let kind = match packet.get("type") {
        Some(Value::String(kind)) => kind.as_str(),
        _ => return Err(DecodeError::MissingType),
    };
    if kind != OBSERVATION_TYPE {
        return Err(DecodeError::UnsupportedType(kind.to_owned()));
    }
    let Some(Value::Array(rows)) = packet.remove("obs") else {
        return Err(DecodeError::MissingObservations);
    };
    let Some(Value::Array(fields)) = rows.into_iter().next() else {
        return Err(DecodeError::MissingObservations);
    };
    if fields.len() < FIELD_NAMES.len() {
        return Err(DecodeError::TooFewFields {
            expected: FIELD_NAMES.len(),
            actual: fields.len(),
        });
    }

    Ok(Observation {
        epoch: integer(&fields, 0)?,
        wind_lull_mps: number(&fields, 1)?,
        wind_avg_mps: number(&fields, 2)?,
        wind_gust_mps: number(&fields, 3)?,
        wind_direction_deg: number(&fields, 4)?,
        wind_sample_interval_secs: number(&fields, 5)?,
        station_pressure_mb: number(&fields, 6)?,
        air_temperature_c: number(&fields, 7)?,
        relative_humidity_pct: number(&fields, 8)?,
        illuminance_lux: number(&fields, 9)?,
        uv_index: number(&fields, 10)?,
        solar_radiation_wm2: number(&fields, 11)?,
        precip_accumulated_mm: number(&fields, 12)?,
        precip_type_code: integer(&fields, 13)?,
        lightning_avg_distance_km: number(&fields, 14)?,
        lightning_strike_count: integer(&fields, 15)?
            .map(|c| u32::try_from(c).map_err(|_| invalid(15)))
            .transpose()?,
        battery_volts: number(&fields, 16)?,
        report_interval_min: number(&fields, 17)?,
    })
}

fn invalid(index: usize) -> DecodeError {
    DecodeError::InvalidField {
        index,
        name: FIELD_NAMES[index],
    }
}

/// `null` is an absent reading; anything else must be a number.
fn number(fields: &[Value], index: usize) -> Result<Option<f64>> {
    match &fields[index] {
        Value::Null => Ok(None),
        v => v.as_f64().map(Some).ok_or_else(|| invalid(index)),
    }
}

/// Integral fields; the hub sometimes encodes them as `1.0`.
fn integer(fields: &[Value], index: usize) -> Result<Option<i64>> {
    match &fields[index] {
        Value::Null => Ok(None),
        v => match v.as_i64() {
            Some(i) => Ok(Some(i)),
            None => v
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| Some(f as i64))
                .ok_or_else(|| invalid(index)),
        },
    }
}
