//! Record types and errors for vessel lookups.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maritime Mobile Service Identity: a vessel's nine-digit identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mmsi(u32);

impl Mmsi {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Mmsi {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl TryFrom<u64> for Mmsi {
    type Error = std::num::TryFromIntError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        u32::try_from(id).map(Self)
    }
}

impl fmt::Display for Mmsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09}", self.0)
    }
}

/// Which lookup a record (or a failed lookup) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Ship base information.
    Registry,
    /// Sailing performance characteristics.
    Performance,
    /// Precomputed optimization suggestions.
    Optimization,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Registry => "ship registry",
            Self::Performance => "ship performance",
            Self::Optimization => "optimization",
        })
    }
}

/// Optional whole-number fields that also accept integral floats.
///
/// Spreadsheet exports write integer columns containing blanks as floats
/// (`9123456.0`). Those load as the integer they spell; fractional,
/// negative, or out-of-range values are rejected.
mod integral {
    use std::fmt;
    use std::marker::PhantomData;

    use serde::de::{self, Deserializer, Unexpected, Visitor};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<u64>,
    {
        deserializer.deserialize_option(OptionVisitor(PhantomData))
    }

    struct OptionVisitor<T>(PhantomData<T>);

    impl<'de, T: TryFrom<u64>> Visitor<'de> for OptionVisitor<T> {
        type Value = Option<T>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer
                .deserialize_any(WholeVisitor(PhantomData))
                .map(Some)
        }
    }

    struct WholeVisitor<T>(PhantomData<T>);

    impl<'de, T: TryFrom<u64>> Visitor<'de> for WholeVisitor<T> {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative whole number in range")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            T::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            let v = u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))?;
            self.visit_u64(v)
        }

        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
            if v.fract() != 0.0 || v < 0.0 || v >= u64::MAX as f64 {
                return Err(E::invalid_value(Unexpected::Float(v), &self));
            }
            self.visit_u64(v as u64)
        }
    }
}

/// A record that can be looked up by MMSI.
pub trait MmsiRecord {
    /// The lookup this record type serves.
    const KIND: RecordKind;

    /// The vessel this record describes, if the row names one.
    fn mmsi(&self) -> Option<Mmsi>;
}

/// Base registry information for a ship.
///
/// Every field is optional: registry exports are patchy. Rows without an
/// MMSI load fine but never match a lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipBaseInfo {
    /// Vessel MMSI.
    #[serde(deserialize_with = "integral::deserialize")]
    pub mmsi: Option<Mmsi>,
    /// IMO number.
    #[serde(deserialize_with = "integral::deserialize")]
    pub imo: Option<u32>,
    /// Radio call sign.
    pub callsign: Option<String>,
    /// English name.
    pub name_en: Option<String>,
    /// Chinese name.
    pub name_cn: Option<String>,
    /// Flag country.
    pub flag_ctry: Option<String>,
    /// Port of registry.
    pub registry_port: Option<String>,
    /// Year of build.
    #[serde(deserialize_with = "integral::deserialize")]
    pub build_year: Option<u16>,
    /// Deadweight tonnage.
    pub deadweight: Option<f64>,
    /// Gross register tonnage.
    pub grt: Option<f64>,
    /// Net tonnage.
    pub net: Option<f64>,
    /// Length overall, metres.
    pub length: Option<f64>,
    /// Beam, metres.
    pub width: Option<f64>,
    /// Height, metres.
    pub height: Option<f64>,
    /// Draught, metres.
    pub draught: Option<f64>,
    /// Maximum speed, knots.
    pub max_speed: Option<f64>,
    /// Managing company.
    pub manage_body: Option<String>,
    /// Owning company.
    pub owner_body: Option<String>,
}

impl MmsiRecord for ShipBaseInfo {
    const KIND: RecordKind = RecordKind::Registry;

    fn mmsi(&self) -> Option<Mmsi> {
        self.mmsi
    }
}

/// Sailing performance characteristics of a ship.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipPerformance {
    /// Vessel MMSI.
    #[serde(deserialize_with = "integral::deserialize")]
    pub mmsi: Option<Mmsi>,
    /// Chinese name.
    pub name_cn: Option<String>,
    /// English name.
    pub name_en: Option<String>,
    /// Main engine speed, rpm.
    pub engine_speed: Option<f64>,
    /// Propeller pitch.
    pub screw_pitch: Option<f64>,
    /// Theoretical speed, knots.
    pub theory_speed: Option<f64>,
    /// Actual speed at full load, knots.
    pub full_load_actual_speed: Option<f64>,
    /// Main engine fuel consumption at full load.
    pub full_load_main_engine_oil: Option<f64>,
    /// Auxiliary engine fuel consumption at full load.
    pub full_load_auxiliary_oil: Option<f64>,
    /// Actual speed in ballast, knots.
    pub ballast_actual_speed: Option<f64>,
    /// Main engine fuel consumption in ballast.
    pub ballast_main_engine_oil: Option<f64>,
    /// Auxiliary engine fuel consumption in ballast.
    pub ballast_auxiliary_oil: Option<f64>,
    /// Main engine fuel grade.
    pub main_engine_oil_type: Option<String>,
    /// Auxiliary engine fuel grade.
    pub auxiliary_oil_type: Option<String>,
}

impl MmsiRecord for ShipPerformance {
    const KIND: RecordKind = RecordKind::Performance;

    fn mmsi(&self) -> Option<Mmsi> {
        self.mmsi
    }
}

/// Errors that can occur while loading or querying lookup stores.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No record exists for the requested vessel.
    #[error("no {kind} record for MMSI {mmsi}")]
    NotFound {
        /// The lookup that was queried.
        kind: RecordKind,
        /// The requested vessel.
        mmsi: Mmsi,
    },

    /// A store document could not be parsed.
    #[error("failed to parse lookup data: {0}")]
    Parse(#[from] serde_json::Error),

    /// A key in an MMSI-keyed document is not a valid identifier.
    #[error("invalid MMSI key `{0}`")]
    InvalidKey(String),
}
