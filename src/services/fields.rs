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

//! Lenient access to configuration trees and parameter bags.
//!
//! Conversion never fails: a field that is missing or holds a value of the
//! wrong type is simply treated as not present.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::TfMap;

use super::nullable::NullableBool;
use super::units::DimensionedValue;

/// Optional wire field.
///
/// Unlike zero values, `Absent` is never sent: serializing it yields `null`,
/// which [`into_bag`] strips. Deserializing a mistyped value yields `Absent`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Present<T> {
    #[default]
    Absent,
    Set(T),
}

impl<T> Present<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Present::Set(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Present::Absent => None,
            Present::Set(v) => Some(v),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Present::Absent => None,
            Present::Set(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for Present<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Present::Set(v),
            None => Present::Absent,
        }
    }
}

impl<T: Serialize> Serialize for Present<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Present::Absent => serializer.serialize_none(),
            Present::Set(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Present<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Present::Absent);
        }
        Ok(serde_json::from_value(value).ok().into())
    }
}

/// Serialize typed parameters into a wire bag, dropping absent fields.
pub fn into_bag<T: Serialize>(parameters: &T) -> TfMap {
    match serde_json::to_value(parameters) {
        Ok(Value::Object(map)) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => TfMap::new(),
    }
}

/// Decode typed parameters from a wire bag, ignoring unknown or mistyped fields.
///
/// When a response key and its snake_case twin are both present, the response
/// key wins. A key that still breaks decoding is dropped on its own.
pub fn from_bag<T: DeserializeOwned + Default>(bag: &TfMap) -> T {
    let mut bag = bag.clone();
    let twins: Vec<String> = bag
        .keys()
        .filter_map(|key| {
            let snake = snake_case(key);
            (snake != *key && bag.contains_key(&snake)).then_some(snake)
        })
        .collect();
    for twin in twins {
        tracing::debug!("Ignoring `{twin}`: the response also holds its camelCase form");
        bag.remove(&twin);
    }

    match serde_json::from_value(Value::Object(bag.clone())) {
        Ok(parameters) => parameters,
        Err(err) => {
            tracing::debug!("Decoding parameters key by key: {err}");
            let mut accepted = TfMap::new();
            for (key, value) in bag {
                accepted.insert(key.clone(), value);
                if let Err(err) = serde_json::from_value::<T>(Value::Object(accepted.clone())) {
                    tracing::debug!("Ignoring `{key}`: {err}");
                    accepted.remove(&key);
                }
            }
            serde_json::from_value(Value::Object(accepted)).unwrap_or_default()
        }
    }
}

/// `maxConnections` and `tcp-backlog` become `max_connections` and `tcp_backlog`.
fn snake_case(key: &str) -> String {
    let mut snake = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            snake.push('_');
            snake.push(c.to_ascii_lowercase());
        } else if c == '-' {
            snake.push('_');
        } else {
            snake.push(c);
        }
    }
    snake
}

/// Read-only view on a declarative block.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a TfMap,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a TfMap) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            }),
            _ => None,
        }
    }

    /// Integer whose zero value means "not set".
    pub fn non_zero_int(&self, key: &str) -> Option<i64> {
        self.int(key).filter(|v| *v != 0)
    }

    /// Integer whose schema default is `sentinel`, meaning "not set".
    pub fn int_except(&self, key: &str, sentinel: i64) -> Option<i64> {
        self.int(key).filter(|v| *v != sentinel)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    pub fn non_zero_float(&self, key: &str) -> Option<f64> {
        self.float(key).filter(|v| *v != 0.0)
    }

    pub fn float_except(&self, key: &str, sentinel: f64) -> Option<f64> {
        self.float(key).filter(|v| *v != sentinel)
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key)?.as_str()
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.str(key).map(str::to_string)
    }

    pub fn non_empty_string(&self, key: &str) -> Option<String> {
        self.str(key).filter(|s| !s.is_empty()).map(str::to_string)
    }

    /// Tri-state boolean, `None` when unset (or not parsable).
    pub fn nullable_bool(&self, key: &str) -> Option<bool> {
        let raw = self.str(key)?;
        match raw.parse::<NullableBool>() {
            Ok(v) => v.value(),
            Err(err) => {
                tracing::debug!("Ignoring `{key}`: {err}");
                None
            }
        }
    }

    /// Byte count wrapped as `{dimension: "B", value}`, omitted when zero.
    pub fn bytes(&self, key: &str) -> Option<DimensionedValue> {
        self.non_zero_int(key).map(DimensionedValue::bytes)
    }

    /// Non-empty set of strings.
    pub fn string_set(&self, key: &str) -> Option<BTreeSet<String>> {
        let set: BTreeSet<String> = self
            .get(key)?
            .as_array()?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        (!set.is_empty()).then_some(set)
    }

    /// Non-empty map.
    pub fn map(&self, key: &str) -> Option<TfMap> {
        self.get(key)?.as_object().filter(|m| !m.is_empty()).cloned()
    }

    /// Non-empty list of nested blocks.
    pub fn blocks(&self, key: &str) -> Option<Vec<&'a TfMap>> {
        let blocks: Vec<&TfMap> = self
            .get(key)?
            .as_array()?
            .iter()
            .filter_map(Value::as_object)
            .collect();
        (!blocks.is_empty()).then_some(blocks)
    }

    /// Singleton nested block, stored as a one-element list.
    pub fn block(&self, key: &str) -> Option<&'a TfMap> {
        self.blocks(key)?.into_iter().next()
    }
}

/// Inserts a present field into a declarative tree.
pub fn put<T: Serialize>(tf: &mut TfMap, key: &str, value: &Present<T>) {
    if let Present::Set(v) = value {
        if let Ok(v) = serde_json::to_value(v) {
            tf.insert(key.to_string(), v);
        }
    }
}

/// Inserts a field into a declarative tree, using `sentinel` when the wire field is absent.
pub fn put_or<T: Serialize, S: Into<Value>>(tf: &mut TfMap, key: &str, value: &Present<T>, sentinel: S) {
    if value.is_set() {
        put(tf, key, value);
    } else {
        tf.insert(key.to_string(), sentinel.into());
    }
}

/// Inserts a dimensioned wire field as a plain byte count.
pub fn put_bytes(tf: &mut TfMap, key: &str, value: &Present<DimensionedValue>) {
    if let Some(bytes) = value.as_ref().and_then(DimensionedValue::to_bytes) {
        tf.insert(key.to_string(), bytes.into());
    }
}

/// Inserts a wire boolean as its tri-state string form.
pub fn put_nullable_bool(tf: &mut TfMap, key: &str, value: &Present<bool>) {
    if let Some(v) = value.as_ref() {
        tf.insert(key.to_string(), NullableBool::from(*v).to_string().into());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tree(value: Value) -> TfMap {
        value.as_object().cloned().unwrap()
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(alias = "maxConnections")]
        max_connections: Present<i64>,
        #[serde(rename = "tcp-backlog")]
        tcp_backlog: Present<i64>,
        name: Present<String>,
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let sample = Sample {
            max_connections: Present::Set(0),
            ..Default::default()
        };
        assert_eq!(into_bag(&sample), tree(json!({"max_connections": 0})));
    }

    #[test]
    fn decode_accepts_response_aliases_and_ignores_mistyped() {
        let sample: Sample = from_bag(&tree(json!({
            "maxConnections": 151,
            "tcp-backlog": "many",
            "name": "db",
            "unknown": true,
        })));
        assert_eq!(
            sample,
            Sample {
                max_connections: Present::Set(151),
                tcp_backlog: Present::Absent,
                name: Present::Set("db".to_string()),
            }
        );
    }

    #[test]
    fn duplicate_response_keys_keep_the_rest() {
        let sample: Sample = from_bag(&tree(json!({
            "maxConnections": 500,
            "max_connections": 100,
            "tcp-backlog": 511,
            "name": "db",
        })));
        assert_eq!(
            sample,
            Sample {
                max_connections: Present::Set(500),
                tcp_backlog: Present::Set(511),
                name: Present::Set("db".to_string()),
            }
        );
    }

    #[test]
    fn snake_case_twins() {
        assert_eq!(snake_case("innodbBufferPoolSize"), "innodb_buffer_pool_size");
        assert_eq!(snake_case("tcp-keepalive"), "tcp_keepalive");
        assert_eq!(snake_case("version"), "version");
    }

    #[test]
    fn lenient_reads() {
        let map = tree(json!({
            "zero": 0,
            "count": 3,
            "whole": 4.0,
            "ratio": 0.5,
            "text": "",
            "word": "on",
            "flag": "true",
            "unset": "",
            "tags": ["b", "a", "b"],
            "empty": [],
            "labels": {"k": "v"},
            "null": null,
        }));
        let fields = Fields::new(&map);

        assert_eq!(fields.non_zero_int("zero"), None);
        assert_eq!(fields.int("zero"), Some(0));
        assert_eq!(fields.int("count"), Some(3));
        assert_eq!(fields.int("whole"), Some(4));
        assert_eq!(fields.int("ratio"), None);
        assert_eq!(fields.int("word"), None);
        assert_eq!(fields.int_except("count", 3), None);
        assert_eq!(fields.float("ratio"), Some(0.5));
        assert_eq!(fields.non_empty_string("text"), None);
        assert_eq!(fields.string("text"), Some(String::new()));
        assert_eq!(fields.nullable_bool("flag"), Some(true));
        assert_eq!(fields.nullable_bool("unset"), None);
        assert_eq!(
            fields.string_set("tags"),
            Some(BTreeSet::from(["a".to_string(), "b".to_string()]))
        );
        assert_eq!(fields.string_set("empty"), None);
        assert!(fields.map("labels").is_some());
        assert_eq!(fields.get("null"), None);
        assert_eq!(fields.bytes("count"), Some(DimensionedValue::bytes(3)));
        assert_eq!(fields.bytes("zero"), None);
    }

    #[test]
    fn flatten_writers() {
        let mut tf = TfMap::new();
        put(&mut tf, "a", &Present::Set(1));
        put(&mut tf, "b", &Present::<i64>::Absent);
        put_or(&mut tf, "c", &Present::<i64>::Absent, -1);
        put_bytes(&mut tf, "d", &Present::Set(DimensionedValue::bytes(10)));
        put_bytes(
            &mut tf,
            "e",
            &Present::Set(DimensionedValue {
                dimension: "XiB".to_string(),
                value: 1.into(),
            }),
        );
        put_nullable_bool(&mut tf, "f", &Present::Set(false));

        assert_eq!(tf, tree(json!({"a": 1, "c": -1, "d": 10, "f": "false"})));
    }
}
