// Threshold tables: map a measurement onto a named category.
// One generic range table serves every category; precipitation type is an exact code match.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a category enum whose serialized form is its consumer label
/// (variant name with underscores as spaces).
macro_rules! category {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

category!(
    /// Pressure tendency over a one- or three-hour lookback.
    PressureTrend {
        FallingRapidly => "FALLING RAPIDLY",
        FallingSlowly => "FALLING SLOWLY",
        Steady => "STEADY",
        RisingSlowly => "RISING SLOWLY",
        RisingRapidly => "RISING RAPIDLY",
    }
);

category!(
    /// Shape of the pressure curve over the three-hour window.
    AdvancedPressureTrend {
        ContinuouslyFalling => "CONTINUOUSLY FALLING",
        ContinuouslyRising => "CONTINUOUSLY RISING",
        FallingThenSlightlyRising => "FALLING THEN SLIGHTLY RISING",
        FallingThenSteady => "FALLING THEN STEADY",
        RisingThenSlightlyFalling => "RISING THEN SLIGHTLY FALLING",
        RisingThenSteady => "RISING THEN STEADY",
        SlightlyFallingThenRising => "SLIGHTLY FALLING THEN RISING",
        SlightlyRisingThenFalling => "SLIGHTLY RISING THEN FALLING",
        Steady => "STEADY",
        SteadyThenFalling => "STEADY THEN FALLING",
        SteadyThenRising => "STEADY THEN RISING",
        UnsteadyOrInconclusive => "UNSTEADY OR INCONCLUSIVE",
    }
);

category!(
    RainfallIntensity {
        None => "NONE",
        Light => "LIGHT",
        Moderate => "MODERATE",
        Heavy => "HEAVY",
        VeryHeavy => "VERY HEAVY",
    }
);

category!(
    UvExposureCategory {
        Low => "LOW",
        Moderate => "MODERATE",
        High => "HIGH",
        VeryHigh => "VERY HIGH",
        Extreme => "EXTREME",
    }
);

category!(
    /// Beaufort-style description of the wind gust in mph.
    WindGustForce {
        Calm => "CALM",
        LightAir => "LIGHT AIR",
        LightBreeze => "LIGHT BREEZE",
        GentleBreeze => "GENTLE BREEZE",
        ModerateBreeze => "MODERATE BREEZE",
        FreshBreeze => "FRESH BREEZE",
        StrongBreeze => "STRONG BREEZE",
        NearGale => "NEAR GALE",
        Gale => "GALE",
        StrongGale => "STRONG GALE",
        Storm => "STORM",
        ViolentStorm => "VIOLENT STORM",
        Hurricane => "HURRICANE",
    }
);

category!(
    PrecipitationType {
        None => "NONE",
        Rain => "RAIN",
        Hail => "HAIL",
    }
);

impl PrecipitationType {
    /// Exact match on the hub's precipitation type code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Rain),
            2 => Some(Self::Hail),
            _ => None,
        }
    }
}

/// Which side of each range is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundConvention {
    /// `(low, high]`
    LowerOpen,
    /// `[low, high)`
    UpperOpen,
}

/// One bucket; `None` bounds are unbounded.
#[derive(Debug, Clone, Copy)]
pub struct RangeEntry<T> {
    pub category: T,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

const fn entry<T>(category: T, low: Option<f64>, high: Option<f64>) -> RangeEntry<T> {
    RangeEntry {
        category,
        low,
        high,
    }
}

/// Ordered buckets that partition the real line.
#[derive(Debug, Clone, Copy)]
pub struct RangeTable<T: 'static> {
    pub convention: BoundConvention,
    pub entries: &'static [RangeEntry<T>],
}

impl<T: Copy + PartialEq + 'static> RangeTable<T> {
    /// First bucket containing `value`; `None` when the value is absent (or NaN).
    pub fn lookup(&self, value: Option<f64>) -> Option<T> {
        let value = value?;
        self.entries
            .iter()
            .find(|e| self.contains(e, value))
            .map(|e| e.category)
    }

    fn contains(&self, e: &RangeEntry<T>, value: f64) -> bool {
        match self.convention {
            BoundConvention::LowerOpen => {
                e.low.is_none_or(|low| low < value) && e.high.is_none_or(|high| value <= high)
            }
            BoundConvention::UpperOpen => {
                e.low.is_none_or(|low| low <= value) && e.high.is_none_or(|high| value < high)
            }
        }
    }

    pub fn entry(&self, category: T) -> Option<&RangeEntry<T>> {
        self.entries.iter().find(|e| e.category == category)
    }

    /// Half the width of a bounded bucket.
    pub fn half_width(&self, category: T) -> Option<f64> {
        let e = self.entry(category)?;
        Some((e.high? - e.low?) / 2.0)
    }
}

/// mb change per hour. STEADY band pinned at ±0.5.
pub const PRESSURE_TREND_ONE_HOUR: RangeTable<PressureTrend> = RangeTable {
    convention: BoundConvention::LowerOpen,
    entries: &[
        entry(PressureTrend::FallingRapidly, None, Some(-2.0)),
        entry(PressureTrend::FallingSlowly, Some(-2.0), Some(-0.5)),
        entry(PressureTrend::Steady, Some(-0.5), Some(0.5)),
        entry(PressureTrend::RisingSlowly, Some(0.5), Some(2.0)),
        entry(PressureTrend::RisingRapidly, Some(2.0), None),
    ],
};

/// mb change per three hours.
pub const PRESSURE_TREND_THREE_HOURS: RangeTable<PressureTrend> = RangeTable {
    convention: BoundConvention::LowerOpen,
    entries: &[
        entry(PressureTrend::FallingRapidly, None, Some(-6.0)),
        entry(PressureTrend::FallingSlowly, Some(-6.0), Some(-1.0)),
        entry(PressureTrend::Steady, Some(-1.0), Some(1.0)),
        entry(PressureTrend::RisingSlowly, Some(1.0), Some(6.0)),
        entry(PressureTrend::RisingRapidly, Some(6.0), None),
    ],
};

/// mm per minute.
pub const RAINFALL_INTENSITY: RangeTable<RainfallIntensity> = RangeTable {
    convention: BoundConvention::LowerOpen,
    entries: &[
        entry(RainfallIntensity::None, None, Some(0.000001)),
        entry(RainfallIntensity::Light, Some(0.000001), Some(0.008333)),
        entry(RainfallIntensity::Moderate, Some(0.008333), Some(0.066666)),
        entry(RainfallIntensity::Heavy, Some(0.066666), Some(0.133333)),
        entry(RainfallIntensity::VeryHeavy, Some(0.133333), None),
    ],
};

pub const UV_EXPOSURE: RangeTable<UvExposureCategory> = RangeTable {
    convention: BoundConvention::UpperOpen,
    entries: &[
        entry(UvExposureCategory::Low, None, Some(3.0)),
        entry(UvExposureCategory::Moderate, Some(3.0), Some(6.0)),
        entry(UvExposureCategory::High, Some(6.0), Some(8.0)),
        entry(UvExposureCategory::VeryHigh, Some(8.0), Some(11.0)),
        entry(UvExposureCategory::Extreme, Some(11.0), None),
    ],
};

/// mph.
pub const WIND_GUST_FORCE: RangeTable<WindGustForce> = RangeTable {
    convention: BoundConvention::UpperOpen,
    entries: &[
        entry(WindGustForce::Calm, None, Some(1.0)),
        entry(WindGustForce::LightAir, Some(1.0), Some(4.0)),
        entry(WindGustForce::LightBreeze, Some(4.0), Some(8.0)),
        entry(WindGustForce::GentleBreeze, Some(8.0), Some(13.0)),
        entry(WindGustForce::ModerateBreeze, Some(13.0), Some(19.0)),
        entry(WindGustForce::FreshBreeze, Some(19.0), Some(25.0)),
        entry(WindGustForce::StrongBreeze, Some(25.0), Some(32.0)),
        entry(WindGustForce::NearGale, Some(32.0), Some(38.0)),
        entry(WindGustForce::Gale, Some(38.0), Some(47.0)),
        entry(WindGustForce::StrongGale, Some(47.0), Some(55.0)),
        entry(WindGustForce::Storm, Some(55.0), Some(64.0)),
        entry(WindGustForce::ViolentStorm, Some(64.0), Some(73.0)),
        entry(WindGustForce::Hurricane, Some(73.0), None),
    ],
};

/// Fuzzy-equality tolerance for curve analysis: half the three-hour STEADY band.
pub fn steady_tolerance_mb() -> f64 {
    PRESSURE_TREND_THREE_HOURS
        .half_width(PressureTrend::Steady)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partitions<T: Copy + PartialEq + fmt::Debug + 'static>(table: &RangeTable<T>) {
        let entries = table.entries;
        assert!(entries.first().unwrap().low.is_none());
        assert!(entries.last().unwrap().high.is_none());
        for pair in entries.windows(2) {
            assert_eq!(pair[0].high, pair[1].low, "gap or overlap at {:?}", pair[1].category);
            assert!(pair[0].high.is_some());
        }
        // Each shared bound lands in exactly one bucket.
        for e in entries.iter().skip(1) {
            let b = e.low.unwrap();
            let hits = entries.iter().filter(|x| table.contains(x, b)).count();
            assert_eq!(hits, 1);
        }
    }

    #[test]
    fn every_table_partitions_the_line() {
        assert_partitions(&PRESSURE_TREND_ONE_HOUR);
        assert_partitions(&PRESSURE_TREND_THREE_HOURS);
        assert_partitions(&RAINFALL_INTENSITY);
        assert_partitions(&UV_EXPOSURE);
        assert_partitions(&WIND_GUST_FORCE);
    }

    #[test]
    fn uv_bounds_are_closed_below() {
        assert_eq!(UV_EXPOSURE.lookup(Some(2.99)), Some(UvExposureCategory::Low));
        assert_eq!(UV_EXPOSURE.lookup(Some(3.0)), Some(UvExposureCategory::Moderate));
        assert_eq!(UV_EXPOSURE.lookup(Some(6.0)), Some(UvExposureCategory::High));
        assert_eq!(UV_EXPOSURE.lookup(Some(11.0)), Some(UvExposureCategory::Extreme));
        assert_eq!(UV_EXPOSURE.lookup(Some(-1.0)), Some(UvExposureCategory::Low));
    }

    #[test]
    fn pressure_bounds_are_closed_above() {
        let t = PRESSURE_TREND_ONE_HOUR;
        assert_eq!(t.lookup(Some(-2.0)), Some(PressureTrend::FallingRapidly));
        assert_eq!(t.lookup(Some(-0.5)), Some(PressureTrend::FallingSlowly));
        assert_eq!(t.lookup(Some(0.0)), Some(PressureTrend::Steady));
        assert_eq!(t.lookup(Some(0.5)), Some(PressureTrend::Steady));
        assert_eq!(t.lookup(Some(0.51)), Some(PressureTrend::RisingSlowly));
        assert_eq!(t.lookup(Some(2.01)), Some(PressureTrend::RisingRapidly));
        let t3 = PRESSURE_TREND_THREE_HOURS;
        assert_eq!(t3.lookup(Some(1.0)), Some(PressureTrend::Steady));
        assert_eq!(t3.lookup(Some(-6.0)), Some(PressureTrend::FallingRapidly));
        assert_eq!(t3.lookup(Some(6.5)), Some(PressureTrend::RisingRapidly));
    }

    #[test]
    fn rainfall_zero_is_none() {
        assert_eq!(RAINFALL_INTENSITY.lookup(Some(0.0)), Some(RainfallIntensity::None));
        assert_eq!(RAINFALL_INTENSITY.lookup(Some(0.01)), Some(RainfallIntensity::Moderate));
        assert_eq!(RAINFALL_INTENSITY.lookup(Some(0.2)), Some(RainfallIntensity::VeryHeavy));
    }

    #[test]
    fn wind_gust_bands() {
        assert_eq!(WIND_GUST_FORCE.lookup(Some(0.0)), Some(WindGustForce::Calm));
        assert_eq!(WIND_GUST_FORCE.lookup(Some(22.4)), Some(WindGustForce::FreshBreeze));
        assert_eq!(WIND_GUST_FORCE.lookup(Some(73.0)), Some(WindGustForce::Hurricane));
    }

    #[test]
    fn absent_and_nan_map_to_nothing() {
        assert_eq!(UV_EXPOSURE.lookup(None), None);
        assert_eq!(WIND_GUST_FORCE.lookup(Some(f64::NAN)), None);
    }

    #[test]
    fn precipitation_type_codes() {
        assert_eq!(PrecipitationType::from_code(0), Some(PrecipitationType::None));
        assert_eq!(PrecipitationType::from_code(2), Some(PrecipitationType::Hail));
        assert_eq!(PrecipitationType::from_code(7), None);
    }

    #[test]
    fn steady_tolerance_is_half_the_three_hour_band() {
        assert_eq!(steady_tolerance_mb(), 1.0);
        assert_eq!(PRESSURE_TREND_ONE_HOUR.half_width(PressureTrend::Steady), Some(0.5));
        assert_eq!(PRESSURE_TREND_ONE_HOUR.half_width(PressureTrend::RisingRapidly), None);
    }

    #[test]
    fn labels_serialize_with_spaces() {
        assert_eq!(WindGustForce::FreshBreeze.label(), "FRESH BREEZE");
        assert_eq!(
            serde_json::to_string(&AdvancedPressureTrend::UnsteadyOrInconclusive).unwrap(),
            "\"UNSTEADY OR INCONCLUSIVE\""
        );
        assert_eq!(AdvancedPressureTrend::ALL.len(), 12);
    }
}
