// Derived, consumer-facing record; field names are the published wire names.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::classification::{
    AdvancedPressureTrend, PrecipitationType, PressureTrend, RainfallIntensity,
    UvExposureCategory, WindGustForce,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub last_updated_epoch: Option<i64>,
    pub last_updated_iso_8601: Option<String>,
    pub lightning_detected: Option<bool>,
    pub lightning_strike_average_distance_km: Option<f64>,
    pub lightning_strike_average_distance_miles: Option<f64>,
    pub pressure_inhg: Option<f64>,
    pub pressure_mb: Option<f64>,
    pub pressure_trend_advanced_three_hours_description: Option<AdvancedPressureTrend>,
    pub pressure_trend_one_hour_description: Option<PressureTrend>,
    pub pressure_trend_one_hour_inhg: Option<f64>,
    pub pressure_trend_one_hour_mb: Option<f64>,
    pub pressure_trend_three_hours_description: Option<PressureTrend>,
    pub pressure_trend_three_hours_inhg: Option<f64>,
    pub pressure_trend_three_hours_mb: Option<f64>,
    pub precipitation_description: Option<RainfallIntensity>,
    pub precipitation_detected: Option<bool>,
    /// Six-decimal string when non-zero on the wire.
    #[serde(
        default,
        serialize_with = "serialize_inches",
        deserialize_with = "deserialize_inches"
    )]
    pub precipitation_inches_per_minute: Option<f64>,
    pub precipitation_mm_per_minute: Option<f64>,
    pub precipitation_type: Option<PrecipitationType>,
    pub relative_humidity: Option<f64>,
    pub solar_radiation: Option<f64>,
    pub temperature_c: Option<f64>,
    pub temperature_f: Option<f64>,
    pub uv_exposure_category: Option<UvExposureCategory>,
    pub uv_index: Option<f64>,
    pub wind_gust_description: Option<WindGustForce>,
    pub wind_gust_meters_per_second: Option<f64>,
    pub wind_gust_miles_per_hour: Option<f64>,
}

fn serialize_inches<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) if *v != 0.0 => s.serialize_str(&format!("{:.6}", v)),
        Some(v) => s.serialize_f64(*v),
        None => s.serialize_none(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn deserialize_inches<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match Option::<NumberOrString>::deserialize(d)? {
        None => Ok(None),
        Some(NumberOrString::Number(v)) => Ok(Some(v)),
        Some(NumberOrString::Text(t)) => t.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inches_render_as_padded_string_only_when_nonzero() {
        let mut s = Snapshot {
            precipitation_inches_per_minute: Some(0.000394),
            ..Default::default()
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["precipitation_inches_per_minute"], "0.000394");

        s.precipitation_inches_per_minute = Some(0.0);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["precipitation_inches_per_minute"], 0.0);

        s.precipitation_inches_per_minute = None;
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["precipitation_inches_per_minute"].is_null());
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let json = serde_json::to_value(Snapshot::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 28);
        assert!(obj.values().all(|v| v.is_null()));
    }

    #[test]
    fn wire_form_reads_back() {
        let s = Snapshot {
            precipitation_inches_per_minute: Some(0.000394),
            wind_gust_description: Some(WindGustForce::NearGale),
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
