use serde::{Deserialize, Serialize};
use strum::Display;

/// Hardware category attached to vendor device records.
///
/// Codes follow the vendor API. Any code outside the documented set decodes
/// to [`DeviceType::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(from = "i64", into = "i64")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceType {
    /// Original Pulse One monitor
    PulseOne,
    /// Pulse Pro monitor
    PulsePro,
    /// Pulse Hub
    Hub,
    /// Standalone sensor attached to a hub (VWC, pH, EC, ...)
    Sensor,
    /// Control device; the vendor does not document what this is
    Control,
    /// Possibly an older or experimental device
    PulseZero,
    /// Fallback for codes not in the documented set
    Unknown,
}

impl From<i64> for DeviceType {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::PulseOne,
            1 => Self::PulsePro,
            2 => Self::Hub,
            3 => Self::Sensor,
            4 => Self::Control,
            5 => Self::PulseZero,
            _ => Self::Unknown,
        }
    }
}

impl From<DeviceType> for i64 {
    fn from(value: DeviceType) -> Self {
        match value {
            DeviceType::PulseOne => 0,
            DeviceType::PulsePro => 1,
            DeviceType::Hub => 2,
            DeviceType::Sensor => 3,
            DeviceType::Control => 4,
            DeviceType::PulseZero => 5,
            DeviceType::Unknown => -1,
        }
    }
}

/// Sensor model attached to hub device records.
///
/// Some of the VWC codes are educated guesses: the vendor sells several
/// soil-moisture probes (Acclima, TEROS 12 retrofit, two Terralink
/// variants) but documents a single list. Unlisted codes decode to
/// [`SensorType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(from = "i64", into = "i64")]
#[strum(serialize_all = "snake_case")]
pub enum SensorType {
    /// The hub itself
    Hub,
    /// Acclima TDR-310W soil moisture probe
    Vwc1,
    /// Temperature / humidity / VPD sensor
    Thv1,
    /// pH sensor
    Ph10,
    /// Electrical conductivity sensor
    Ec1,
    /// TEROS 12 retrofit kit soil moisture probe
    Vwc12,
    /// PAR (light) sensor
    Par1,
    /// Terralink soil moisture probe, Pulse-vendored
    Vwc2,
    /// ORP (redox potential) sensor
    Orp1,
    /// CO2 / temperature / humidity / lux sensor
    Thc1,
    /// Dissolved oxygen sensor
    Tdo1,
    /// Terralink soil moisture probe, Growlink retrofit
    Vwc3,
    /// Fallback for codes not in the documented set
    Unknown,
}

impl From<i64> for SensorType {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Hub,
            1 => Self::Vwc1,
            2 => Self::Thv1,
            3 => Self::Ph10,
            4 => Self::Ec1,
            5 => Self::Vwc12,
            8 => Self::Par1,
            9 => Self::Vwc2,
            10 => Self::Orp1,
            11 => Self::Thc1,
            12 => Self::Tdo1,
            13 => Self::Vwc3,
            _ => Self::Unknown,
        }
    }
}

impl From<SensorType> for i64 {
    fn from(value: SensorType) -> Self {
        match value {
            SensorType::Hub => 0,
            SensorType::Vwc1 => 1,
            SensorType::Thv1 => 2,
            SensorType::Ph10 => 3,
            SensorType::Ec1 => 4,
            SensorType::Vwc12 => 5,
            SensorType::Par1 => 8,
            SensorType::Vwc2 => 9,
            SensorType::Orp1 => 10,
            SensorType::Thc1 => 11,
            SensorType::Tdo1 => 12,
            SensorType::Vwc3 => 13,
            SensorType::Unknown => -1,
        }
    }
}

/// Kind of measurement carried by a single data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SensorReadingType {
    // Acclima (VWC1)
    Vwc1Rh,
    Vwc1Temperature,
    Vwc1Conductivity,
    Vwc1ConductivityPwe,

    // Terralink (VWC2)
    Vwc2Rh,
    Vwc2Temperature,
    Vwc2Conductivity,
    Vwc2ConductivityPwe,

    // TEROS 12 (VWC12)
    Vwc12Rh,
    Vwc12Temperature,
    Vwc12Conductivity,
    Vwc12ConductivityPwe,

    // General readings
    Ph,
    WaterTemperature,
    Vpd,
    DewPoint,
    AirTemperature,
    Orp,
    Co2,
    Dli,
    Ppfd,
    Ec,
    Thc1Light,
    Rh,
    OriginalDevicesLight,
    Do,

    /// Fallback for codes not in the documented set
    Unknown,
}

impl From<i64> for SensorReadingType {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Vwc1Rh,
            1 => Self::Vwc1Temperature,
            2 => Self::Vwc1Conductivity,
            3 => Self::Vwc1ConductivityPwe,
            4 => Self::Vwc2Rh,
            5 => Self::Vwc2Temperature,
            6 => Self::Vwc2Conductivity,
            7 => Self::Vwc2ConductivityPwe,
            8 => Self::Vwc12Rh,
            9 => Self::Vwc12Temperature,
            10 => Self::Vwc12Conductivity,
            11 => Self::Vwc12ConductivityPwe,
            12 => Self::Ph,
            13 => Self::WaterTemperature,
            14 => Self::Vpd,
            15 => Self::DewPoint,
            16 => Self::AirTemperature,
            17 => Self::Orp,
            18 => Self::Co2,
            19 => Self::Dli,
            20 => Self::Ppfd,
            21 => Self::Ec,
            22 => Self::Thc1Light,
            23 => Self::Rh,
            24 => Self::OriginalDevicesLight,
            25 => Self::Do,
            _ => Self::Unknown,
        }
    }
}

impl From<SensorReadingType> for i64 {
    fn from(value: SensorReadingType) -> Self {
        match value {
            SensorReadingType::Vwc1Rh => 0,
            SensorReadingType::Vwc1Temperature => 1,
            SensorReadingType::Vwc1Conductivity => 2,
            SensorReadingType::Vwc1ConductivityPwe => 3,
            SensorReadingType::Vwc2Rh => 4,
            SensorReadingType::Vwc2Temperature => 5,
            SensorReadingType::Vwc2Conductivity => 6,
            SensorReadingType::Vwc2ConductivityPwe => 7,
            SensorReadingType::Vwc12Rh => 8,
            SensorReadingType::Vwc12Temperature => 9,
            SensorReadingType::Vwc12Conductivity => 10,
            SensorReadingType::Vwc12ConductivityPwe => 11,
            SensorReadingType::Ph => 12,
            SensorReadingType::WaterTemperature => 13,
            SensorReadingType::Vpd => 14,
            SensorReadingType::DewPoint => 15,
            SensorReadingType::AirTemperature => 16,
            SensorReadingType::Orp => 17,
            SensorReadingType::Co2 => 18,
            SensorReadingType::Dli => 19,
            SensorReadingType::Ppfd => 20,
            SensorReadingType::Ec => 21,
            SensorReadingType::Thc1Light => 22,
            SensorReadingType::Rh => 23,
            SensorReadingType::OriginalDevicesLight => 24,
            SensorReadingType::Do => 25,
            SensorReadingType::Unknown => -1,
        }
    }
}

/// Alert category on triggered-threshold records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ThresholdType {
    Light,
    Temperature,
    Humidity,
    Power,
    Connectivity,
    BatteryV,
    Co2,
    Voc,
    Vpd,
    DewPoint,
    /// Fallback for codes not in the documented set
    Unknown,
}

impl From<i64> for ThresholdType {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Light,
            2 => Self::Temperature,
            3 => Self::Humidity,
            4 => Self::Power,
            5 => Self::Connectivity,
            6 => Self::BatteryV,
            7 => Self::Co2,
            8 => Self::Voc,
            11 => Self::Vpd,
            12 => Self::DewPoint,
            _ => Self::Unknown,
        }
    }
}

impl From<ThresholdType> for i64 {
    fn from(value: ThresholdType) -> Self {
        match value {
            ThresholdType::Light => 1,
            ThresholdType::Temperature => 2,
            ThresholdType::Humidity => 3,
            ThresholdType::Power => 4,
            ThresholdType::Connectivity => 5,
            ThresholdType::BatteryV => 6,
            ThresholdType::Co2 => 7,
            ThresholdType::Voc => 8,
            ThresholdType::Vpd => 11,
            ThresholdType::DewPoint => 12,
            ThresholdType::Unknown => -1,
        }
    }
}

/// Alert category for thresholds configured on a sensor device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SensorThresholdType {
    Vwc1,
    Temperature,
    Humidity,
    Vpd,
    DewPoint,
    Ph,
    Ec1Ec,
    Ec1Temp,
    Vwc1Pwec,
    Vwc12Vwc,
    Vwc12Pwec,
    Par1Ppfd,
    SubstrateTemp,
    SubstrateBulkEc,
    Ph1Temp,
    Par1Dli,
    Vwc2Vwc,
    Vwc2Pwec,
    Orp1Orp,
    Thc1Co2,
    Thc1Rh,
    Thc1Temp,
    Thc1DewPoint,
    Thc1Vpd,
    Tdo1Temp,
    Tdo1Do,
    Thc1Light,
    /// Fallback for codes not in the documented set
    Unknown,
}

impl From<i64> for SensorThresholdType {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Vwc1,
            2 => Self::Temperature,
            3 => Self::Humidity,
            4 => Self::Vpd,
            5 => Self::DewPoint,
            6 => Self::Ph,
            7 => Self::Ec1Ec,
            8 => Self::Ec1Temp,
            9 => Self::Vwc1Pwec,
            10 => Self::Vwc12Vwc,
            11 => Self::Vwc12Pwec,
            12 => Self::Par1Ppfd,
            13 => Self::SubstrateTemp,
            14 => Self::SubstrateBulkEc,
            15 => Self::Ph1Temp,
            16 => Self::Par1Dli,
            17 => Self::Vwc2Vwc,
            18 => Self::Vwc2Pwec,
            19 => Self::Orp1Orp,
            20 => Self::Thc1Co2,
            21 => Self::Thc1Rh,
            22 => Self::Thc1Temp,
            23 => Self::Thc1DewPoint,
            24 => Self::Thc1Vpd,
            25 => Self::Tdo1Temp,
            26 => Self::Tdo1Do,
            27 => Self::Thc1Light,
            _ => Self::Unknown,
        }
    }
}

impl From<SensorThresholdType> for i64 {
    fn from(value: SensorThresholdType) -> Self {
        match value {
            SensorThresholdType::Vwc1 => 1,
            SensorThresholdType::Temperature => 2,
            SensorThresholdType::Humidity => 3,
            SensorThresholdType::Vpd => 4,
            SensorThresholdType::DewPoint => 5,
            SensorThresholdType::Ph => 6,
            SensorThresholdType::Ec1Ec => 7,
            SensorThresholdType::Ec1Temp => 8,
            SensorThresholdType::Vwc1Pwec => 9,
            SensorThresholdType::Vwc12Vwc => 10,
            SensorThresholdType::Vwc12Pwec => 11,
            SensorThresholdType::Par1Ppfd => 12,
            SensorThresholdType::SubstrateTemp => 13,
            SensorThresholdType::SubstrateBulkEc => 14,
            SensorThresholdType::Ph1Temp => 15,
            SensorThresholdType::Par1Dli => 16,
            SensorThresholdType::Vwc2Vwc => 17,
            SensorThresholdType::Vwc2Pwec => 18,
            SensorThresholdType::Orp1Orp => 19,
            SensorThresholdType::Thc1Co2 => 20,
            SensorThresholdType::Thc1Rh => 21,
            SensorThresholdType::Thc1Temp => 22,
            SensorThresholdType::Thc1DewPoint => 23,
            SensorThresholdType::Thc1Vpd => 24,
            SensorThresholdType::Tdo1Temp => 25,
            SensorThresholdType::Tdo1Do => 26,
            SensorThresholdType::Thc1Light => 27,
            SensorThresholdType::Unknown => -1,
        }
    }
}

/// Alert category for thresholds configured on the hub itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum HubThresholdType {
    Power,
    Connectivity,
    /// Fallback for codes not in the documented set
    Unknown,
}

impl From<i64> for HubThresholdType {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::Power,
            2 => Self::Connectivity,
            _ => Self::Unknown,
        }
    }
}

impl From<HubThresholdType> for i64 {
    fn from(value: HubThresholdType) -> Self {
        match value {
            HubThresholdType::Power => 1,
            HubThresholdType::Connectivity => 2,
            HubThresholdType::Unknown => -1,
        }
    }
}
