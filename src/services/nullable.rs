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

use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Error};

/// Boolean that may be left unset, encoded in configuration as `""`, `"true"` or `"false"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullableBool {
    #[default]
    Null,
    Value(bool),
}

impl NullableBool {
    pub fn is_null(&self) -> bool {
        matches!(self, NullableBool::Null)
    }

    pub fn value(&self) -> Option<bool> {
        match self {
            NullableBool::Null => None,
            NullableBool::Value(v) => Some(*v),
        }
    }
}

impl FromStr for NullableBool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(NullableBool::Null),
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(NullableBool::Value(true)),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(NullableBool::Value(false)),
            other => Err(anyhow!("cannot parse '{other}' as bool")),
        }
    }
}

impl Display for NullableBool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NullableBool::Null => Ok(()),
            NullableBool::Value(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for NullableBool {
    fn from(value: bool) -> Self {
        NullableBool::Value(value)
    }
}
