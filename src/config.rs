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

//! Operation timeouts of the PaaS service resource.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_UPDATE_TIMEOUT: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Timeouts of the `timeouts` block, e.g. `{ create = "45m", delete = "1h30m" }`.
///
/// Missing entries fall back to the provider defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(with = "duration_string")]
    pub create: Duration,
    #[serde(with = "duration_string")]
    pub update: Duration,
    #[serde(with = "duration_string")]
    pub delete: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: DEFAULT_CREATE_TIMEOUT,
            update: DEFAULT_UPDATE_TIMEOUT,
            delete: DEFAULT_DELETE_TIMEOUT,
        }
    }
}

/// Parse a duration written as a sequence of `<integer><unit>` pairs.
///
/// Supported units are `h`, `m`, `s` and `ms`, e.g. `"1h30m"`, `"90s"`, `"250ms"`.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("empty duration"));
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| anyhow!("missing unit in duration `{input}`"))?;
        if digits == 0 {
            return Err(anyhow!("invalid duration `{input}`"));
        }
        let value: u64 = rest[..digits].parse()?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let unit = match &rest[..unit_len] {
            "h" => Duration::from_secs(3600),
            "m" => Duration::from_secs(60),
            "s" => Duration::from_secs(1),
            "ms" => Duration::from_millis(1),
            other => return Err(anyhow!("unknown unit `{other}` in duration `{input}`")),
        };
        rest = &rest[unit_len..];

        let value = u32::try_from(value)
            .map_err(|_| anyhow!("duration `{input}` is too large"))?;
        total += unit * value;
    }
    Ok(total)
}

/// Render a duration with the largest units first, e.g. `1h30m`.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    let millis = duration.subsec_millis();
    if secs == 0 && millis == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (unit, len) in [("h", 3600), ("m", 60), ("s", 1)] {
        if secs >= len {
            out.push_str(&format!("{}{unit}", secs / len));
            secs %= len;
        }
    }
    if millis > 0 {
        out.push_str(&format!("{millis}ms"));
    }
    out
}

mod duration_string {
    use super::*;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_duration(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compound_durations() {
        assert_eq!(parse_duration("45m").unwrap(), Duration::from_secs(45 * 60));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn reject_malformed_durations() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("m10").is_err());
        assert!(parse_duration("10d").is_err());
    }

    #[test]
    fn format_round_trips() {
        for raw in ["1h30m", "15m", "2s", "1m500ms"] {
            assert_eq!(format_duration(parse_duration(raw).unwrap()), raw);
        }
    }

    #[test]
    fn timeouts_fall_back_to_defaults() {
        let timeouts: Timeouts = serde_json::from_str(r#"{"update": "2h"}"#).unwrap();
        assert_eq!(timeouts.create, DEFAULT_CREATE_TIMEOUT);
        assert_eq!(timeouts.update, Duration::from_secs(7200));
        assert_eq!(timeouts.delete, DEFAULT_DELETE_TIMEOUT);

        let timeouts: Timeouts = serde_json::from_str("{}").unwrap();
        assert_eq!(timeouts, Timeouts::default());
    }
}
