// This file is part of the terraform-provider-paas project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Size-like parameters are exchanged with the API as `{dimension, value}` pairs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const BYTE: i64 = 1;
pub const KILOBYTE: i64 = 1 << 10;
pub const MEGABYTE: i64 = 1 << 20;
pub const GIGABYTE: i64 = 1 << 30;
pub const TERABYTE: i64 = 1 << 40;

pub const B: &str = "B";
pub const KIB: &str = "KiB";
pub const MIB: &str = "MiB";
pub const GIB: &str = "GiB";
pub const TIB: &str = "TiB";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("unsupported dimension: {0}")]
    UnsupportedDimension(String),
    #[error("value out of range: {value} {dimension}")]
    Overflow { value: i64, dimension: String },
}

/// Converts a dimension tag to its multiplier in bytes.
pub fn dimension_to_bytes(dimension: &str) -> Result<i64, UnitError> {
    match dimension {
        B => Ok(BYTE),
        KIB => Ok(KILOBYTE),
        MIB => Ok(MEGABYTE),
        GIB => Ok(GIGABYTE),
        TIB => Ok(TERABYTE),
        other => Err(UnitError::UnsupportedDimension(other.to_string())),
    }
}

/// Converts `value` expressed in `dimension` to bytes.
pub fn parse_bytes(value: i64, dimension: &str) -> Result<i64, UnitError> {
    let converted = dimension_to_bytes(dimension).and_then(|bytes| {
        value.checked_mul(bytes).ok_or_else(|| UnitError::Overflow {
            value,
            dimension: dimension.to_string(),
        })
    });
    match converted {
        Ok(bytes) => Ok(bytes),
        Err(err) => {
            tracing::error!("Error parsing value `{value} {dimension}` to bytes: {err}");
            Err(err)
        }
    }
}

/// Wire representation of a dimensioned value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionedValue {
    pub dimension: String,
    pub value: Value,
}

impl DimensionedValue {
    /// Value normalized to bytes, as always sent on expand.
    pub fn bytes(value: i64) -> Self {
        Self {
            dimension: B.to_string(),
            value: value.into(),
        }
    }

    pub fn gibibytes(value: f64) -> Self {
        Self {
            dimension: GIB.to_string(),
            value: value.into(),
        }
    }

    /// Decode the wire form, whatever keys the bag holds.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Integer magnitude, accepting whole floats sent by the API.
    fn integer(&self) -> Option<i64> {
        match &self.value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }

    /// Value converted to bytes.
    ///
    /// Conversion failures are reported as `None`: flatten leaves the field unset.
    pub fn to_bytes(&self) -> Option<i64> {
        parse_bytes(self.integer()?, &self.dimension).ok()
    }

    /// Value converted to (possibly fractional) gibibytes.
    pub fn to_gibibytes(&self) -> Option<f64> {
        let value = self.value.as_f64()?;
        let bytes = match dimension_to_bytes(&self.dimension) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!("Error parsing value `{value} {}` to GiB: {err}", self.dimension);
                return None;
            }
        };
        let gibibytes = value * bytes as f64 / GIGABYTE as f64;
        if !gibibytes.is_finite() {
            tracing::error!("Error parsing value `{value} {}` to GiB: out of range", self.dimension);
            return None;
        }
        Some(gibibytes)
    }

    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn binary_multipliers() {
        assert_eq!(dimension_to_bytes("B"), Ok(1));
        assert_eq!(dimension_to_bytes("KiB"), Ok(1024));
        assert_eq!(dimension_to_bytes("MiB"), Ok(1024 * 1024));
        assert_eq!(dimension_to_bytes("GiB"), Ok(1024 * 1024 * 1024));
        assert_eq!(dimension_to_bytes("TiB"), Ok(1024 * 1024 * 1024 * 1024));
    }

    #[test]
    fn unsupported_dimension() {
        assert_eq!(
            dimension_to_bytes("XiB"),
            Err(UnitError::UnsupportedDimension("XiB".to_string()))
        );
        assert!(dimension_to_bytes("kib").is_err());
        assert!(parse_bytes(3, "XiB").is_err());
    }

    #[test]
    fn parse_bytes_multiplies() {
        assert_eq!(parse_bytes(4, "KiB"), Ok(4096));
        assert_eq!(parse_bytes(1, "GiB"), Ok(1_073_741_824));
        assert_eq!(parse_bytes(128, "MiB"), Ok(128 * MEGABYTE));
    }

    #[test]
    fn parse_bytes_overflow() {
        assert_eq!(
            parse_bytes(10_000_000, "TiB"),
            Err(UnitError::Overflow {
                value: 10_000_000,
                dimension: "TiB".to_string(),
            })
        );
        assert!(parse_bytes(i64::MIN, "KiB").is_err());
        assert_eq!(parse_bytes(i64::MAX, "B"), Ok(i64::MAX));

        let huge = DimensionedValue::from_value(&json!({"dimension": "TiB", "value": 10_000_000}));
        assert_eq!(huge.and_then(|v| v.to_bytes()), None);

        let huge_float = DimensionedValue::from_value(&json!({"dimension": "TiB", "value": f64::MAX}));
        assert_eq!(huge_float.and_then(|v| v.to_gibibytes()), None);
    }

    #[test]
    fn dimensioned_value_wire_form() {
        assert_eq!(
            DimensionedValue::bytes(512).into_value(),
            json!({"dimension": "B", "value": 512})
        );

        let decoded = DimensionedValue::from_value(&json!({"dimension": "MiB", "value": 64}));
        assert_eq!(decoded.and_then(|v| v.to_bytes()), Some(64 * MEGABYTE));

        let whole_float = DimensionedValue::from_value(&json!({"dimension": "KiB", "value": 2.0}));
        assert_eq!(whole_float.and_then(|v| v.to_bytes()), Some(2048));

        let unknown = DimensionedValue::from_value(&json!({"dimension": "PiB", "value": 1}));
        assert_eq!(unknown.and_then(|v| v.to_bytes()), None);

        assert_eq!(DimensionedValue::from_value(&json!("1GiB")), None);
    }

    #[test]
    fn gibibyte_conversion() {
        let value = DimensionedValue::gibibytes(0.5);
        assert_eq!(value.to_gibibytes(), Some(0.5));

        let in_mib = DimensionedValue::from_value(&json!({"dimension": "MiB", "value": 512}));
        assert_eq!(in_mib.and_then(|v| v.to_gibibytes()), Some(0.5));
    }
}
