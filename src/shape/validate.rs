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

use std::collections::BTreeSet;

use serde_json::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::services::nullable::NullableBool;
use crate::utils::DisplayJoinable;
use crate::TfMap;

use super::{is_set, Field, FieldType, Mode, Shape};

/// Value check attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    OneOf(Vec<&'static str>),
    IntBetween(i64, i64),
    IntAtLeast(i64),
    IntOneOf(&'static [i64]),
    IntDivisibleBy(i64),
    FloatBetween(f64, f64),
    FloatAtLeast(f64),
    LenBetween(usize, usize),
    NotContainingAny(&'static str),
    /// Passes when at least one of the inner checks passes.
    Any(Vec<Validation>),
}

impl Validation {
    pub fn one_of(allowed: &[&'static str]) -> Self {
        Validation::OneOf(allowed.to_vec())
    }

    pub fn check(&self, name: &str, value: &Value) -> Result<(), String> {
        match self {
            Validation::OneOf(allowed) => {
                let v = expect_str(name, value)?;
                if allowed.contains(&v) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected {name} to be one of [{}], got {v}",
                        allowed.iter().join_with(" ")
                    ))
                }
            }
            Validation::IntBetween(min, max) => {
                let v = expect_int(name, value)?;
                if (*min..=*max).contains(&v) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected {name} to be in the range ({min} - {max}), got {v}"
                    ))
                }
            }
            Validation::IntAtLeast(min) => {
                let v = expect_int(name, value)?;
                if v >= *min {
                    Ok(())
                } else {
                    Err(format!("expected {name} to be at least ({min}), got {v}"))
                }
            }
            Validation::IntOneOf(allowed) => {
                let v = expect_int(name, value)?;
                if allowed.contains(&v) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected {name} to be one of [{}], got {v}",
                        allowed.iter().join_with(" ")
                    ))
                }
            }
            Validation::IntDivisibleBy(divisor) => {
                let v = expect_int(name, value)?;
                if v % divisor == 0 {
                    Ok(())
                } else {
                    Err(format!("expected {name} to be divisible by {divisor}, got: {v}"))
                }
            }
            Validation::FloatBetween(min, max) => {
                let v = expect_float(name, value)?;
                if *min <= v && v <= *max {
                    Ok(())
                } else {
                    Err(format!(
                        "expected {name} to be in the range ({min} - {max}), got {v}"
                    ))
                }
            }
            Validation::FloatAtLeast(min) => {
                let v = expect_float(name, value)?;
                if v >= *min {
                    Ok(())
                } else {
                    Err(format!("expected {name} to be at least ({min}), got {v}"))
                }
            }
            Validation::LenBetween(min, max) => {
                let len = expect_str(name, value)?.chars().count();
                if (*min..=*max).contains(&len) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected length of {name} to be in the range ({min} - {max}), got {len}"
                    ))
                }
            }
            Validation::NotContainingAny(chars) => {
                let v = expect_str(name, value)?;
                match v.chars().find(|c| chars.contains(*c)) {
                    None => Ok(()),
                    Some(c) => Err(format!(
                        "expected value of {name} to not contain any of {chars:?}, found {c:?}"
                    )),
                }
            }
            Validation::Any(validations) => {
                let mut errors = Vec::with_capacity(validations.len());
                for validation in validations {
                    match validation.check(name, value) {
                        Ok(()) => return Ok(()),
                        Err(err) => errors.push(err),
                    }
                }
                Err(errors.iter().join_with("; ").to_string())
            }
        }
    }
}

fn expect_str<'a>(name: &str, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected type of {name} to be string"))
}

fn expect_int(name: &str, value: &Value) -> Result<i64, String> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .ok_or_else(|| format!("expected type of {name} to be integer"))
}

fn expect_float(name: &str, value: &Value) -> Result<f64, String> {
    value
        .as_f64()
        .ok_or_else(|| format!("expected type of {name} to be float"))
}

fn check_type(name: &str, field: &FieldType, value: &Value) -> Result<(), String> {
    let ok = match field {
        FieldType::Bool => value.is_boolean(),
        FieldType::Int => expect_int(name, value).is_ok(),
        FieldType::Float => value.is_number(),
        FieldType::String => value.is_string(),
        FieldType::NullableBool => {
            let raw = expect_str(name, value)?;
            return raw
                .parse::<NullableBool>()
                .map(|_| ())
                .map_err(|err| format!("{name}: {err}"));
        }
        FieldType::Map => value
            .as_object()
            .is_some_and(|m| m.values().all(Value::is_string)),
        FieldType::StringSet => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        FieldType::Block { .. } => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_object)),
    };
    if ok {
        Ok(())
    } else {
        Err(format!("unexpected type for {name}"))
    }
}

fn child(path: &AttributePath, name: &str) -> AttributePath {
    path.clone().attribute(name.to_string())
}

impl Shape {
    /// Check a configuration tree, reporting every problem into `diags`.
    ///
    /// Cross-field constraints refer to sibling fields of the same block.
    pub fn validate(&self, diags: &mut Diagnostics, tree: &TfMap, path: AttributePath) {
        let mut reported_groups = BTreeSet::new();

        for (name, field) in &self.fields {
            let value = tree.get(name).filter(|v| !v.is_null());
            let attr_path = child(&path, name);

            if value.is_none() {
                if field.mode == Mode::Required {
                    diags.error(
                        "Missing required argument",
                        format!("The argument \"{name}\" is required, but no definition was found."),
                        attr_path.clone(),
                    );
                }
            } else if field.mode == Mode::Computed {
                diags.error(
                    "Value for unconfigurable attribute",
                    format!("Can't configure a value for \"{name}\": its value will be decided automatically."),
                    attr_path.clone(),
                );
            }

            if let Some(value) = value {
                self.validate_value(diags, name, field, value, &attr_path);
            }

            if !field.exactly_one_of.is_empty() {
                let group: BTreeSet<&str> = field
                    .exactly_one_of
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(name.as_str()))
                    .collect();
                let specified: Vec<&str> = group
                    .iter()
                    .copied()
                    .filter(|key| is_set(tree.get(*key)))
                    .collect();
                if specified.len() != 1 && reported_groups.insert(group.clone()) {
                    let names = group.iter().join_with(",").to_string();
                    let detail = if specified.is_empty() {
                        format!("\"{name}\": one of `{names}` must be specified")
                    } else {
                        format!(
                            "\"{name}\": only one of `{names}` can be specified, but `{}` were specified.",
                            specified.iter().join_with(",")
                        )
                    };
                    diags.error("Invalid combination of arguments", detail, attr_path.clone());
                }
            }

            if !is_set(value) {
                continue;
            }

            for other in &field.conflicts_with {
                if is_set(tree.get(other)) {
                    diags.error(
                        "Conflicting configuration arguments",
                        format!("\"{name}\": conflicts with {other}"),
                        attr_path.clone(),
                    );
                }
            }

            let missing: Vec<&String> = field
                .required_with
                .iter()
                .filter(|other| !is_set(tree.get(*other)))
                .collect();
            if !missing.is_empty() {
                diags.error(
                    "Missing required argument",
                    format!(
                        "\"{name}\": all of `{}` must be specified",
                        std::iter::once(name)
                            .chain(field.required_with.iter())
                            .join_with(",")
                    ),
                    attr_path.clone(),
                );
            }
        }
    }

    fn validate_value(
        &self,
        diags: &mut Diagnostics,
        name: &str,
        field: &Field,
        value: &Value,
        attr_path: &AttributePath,
    ) {
        if let Err(err) = check_type(name, &field.field_type, value) {
            diags.error("Invalid value type", err, attr_path.clone());
            return;
        }

        match (&field.field_type, value) {
            (FieldType::Block { shape, .. }, Value::Array(items)) => {
                if let Some(max) = field.max_items {
                    if items.len() > max {
                        diags.error(
                            "Too many list items",
                            format!(
                                "Attribute {name} supports {max} item maximum, but config has {}",
                                items.len()
                            ),
                            attr_path.clone(),
                        );
                    }
                }
                for (i, item) in items.iter().enumerate() {
                    if let Value::Object(item) = item {
                        shape.validate(diags, item, attr_path.clone().index(i as i64));
                    }
                }
            }
            (FieldType::StringSet, Value::Array(items)) => {
                for item in items {
                    self.report_checks(diags, name, field, item, attr_path);
                }
            }
            _ => self.report_checks(diags, name, field, value, attr_path),
        }
    }

    fn report_checks(
        &self,
        diags: &mut Diagnostics,
        name: &str,
        field: &Field,
        value: &Value,
        attr_path: &AttributePath,
    ) {
        for validation in &field.validations {
            if let Err(err) = validation.check(name, value) {
                diags.error("Invalid value", err, attr_path.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn tree(value: Value) -> TfMap {
        value.as_object().cloned().unwrap()
    }

    fn errors(shape: &Shape, value: Value) -> usize {
        let mut diags = Diagnostics::default();
        shape.validate(&mut diags, &tree(value), AttributePath::default());
        diags.errors.len()
    }

    #[test]
    fn validations() {
        let v = json!(5);
        assert!(Validation::IntBetween(1, 10).check("n", &v).is_ok());
        assert!(Validation::IntBetween(6, 10).check("n", &v).is_err());
        assert!(Validation::IntAtLeast(5).check("n", &v).is_ok());
        assert!(Validation::IntDivisibleBy(2).check("n", &v).is_err());
        assert!(Validation::FloatBetween(0.0, 1.0).check("n", &json!(0.5)).is_ok());
        assert!(Validation::FloatAtLeast(0.25).check("n", &json!(0.1)).is_err());
        assert!(Validation::one_of(&["ON", "OFF"]).check("s", &json!("ON")).is_ok());
        assert!(Validation::one_of(&["ON", "OFF"]).check("s", &json!("on")).is_err());
        assert!(Validation::LenBetween(8, 128).check("p", &json!("short")).is_err());
        assert!(Validation::NotContainingAny("`'\"\\").check("p", &json!("a'b")).is_err());
        assert!(Validation::NotContainingAny("`'\"\\").check("p", &json!("a-b")).is_ok());

        let limit = Validation::Any(vec![
            Validation::IntOneOf(&[-1]),
            Validation::IntBetween(1, 10000),
        ]);
        assert!(limit.check("n", &json!(-1)).is_ok());
        assert!(limit.check("n", &json!(200)).is_ok());
        assert!(limit.check("n", &json!(0)).is_err());
    }

    #[test]
    fn required_and_types() {
        let shape = Shape::new()
            .field("version", Field::string().required())
            .field("flag", Field::nullable_bool())
            .field("tags", Field::string_set().validate(Validation::one_of(&["a", "b"])));

        assert_eq!(errors(&shape, json!({"version": "1"})), 0);
        assert_eq!(errors(&shape, json!({})), 1);
        assert_eq!(errors(&shape, json!({"version": 1})), 1);
        assert_eq!(errors(&shape, json!({"version": "1", "flag": "maybe"})), 1);
        assert_eq!(errors(&shape, json!({"version": "1", "tags": ["a", "c"]})), 1);
    }

    #[test]
    fn nested_blocks_and_cardinality() {
        let user = Shape::new().field("name", Field::string().required());
        let shape = Shape::new().field("user", Field::list(user).max_items(2));

        assert_eq!(errors(&shape, json!({"user": [{"name": "a"}]})), 0);
        assert_eq!(errors(&shape, json!({"user": [{"name": "a"}, {}]})), 1);
        assert_eq!(
            errors(&shape, json!({"user": [{"name": "a"}, {"name": "b"}, {"name": "c"}]})),
            1
        );
    }

    #[test]
    fn cross_field_constraints() {
        let shape = Shape::new()
            .field(
                "redis",
                Field::list(Shape::new())
                    .max_items(1)
                    .exactly_one_of(["redis", "mysql"])
                    .conflicts_with(["backup_settings"]),
            )
            .field(
                "mysql",
                Field::list(Shape::new())
                    .max_items(1)
                    .exactly_one_of(["redis", "mysql"])
                    .required_with(["data_volume"]),
            );

        assert_eq!(errors(&shape, json!({"redis": [{}]})), 0);
        assert_eq!(errors(&shape, json!({"redis": [{}], "mysql": [{}], "data_volume": [{}]})), 1);
        assert_eq!(errors(&shape, json!({})), 1);
        assert_eq!(errors(&shape, json!({"redis": [{}], "backup_settings": [{}]})), 1);
        assert_eq!(errors(&shape, json!({"mysql": [{}]})), 1);
        assert_eq!(errors(&shape, json!({"mysql": [{}], "data_volume": [{}]})), 0);
    }
}
