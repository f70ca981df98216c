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

//! Declarative description of nested configuration blocks.
//!
//! A [`Shape`] lists the fields of one block. It is rendered into a Terraform
//! schema with [`Shape::to_block`], checked against a configuration tree with
//! [`Shape::validate`], and used to fill schema defaults with
//! [`Shape::apply_defaults`].

use std::collections::BTreeMap;

use serde_json::Value;

use crate::TfMap;

mod block;
mod validate;

pub use validate::Validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Required,
    Optional,
    Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    List,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    String,
    /// Tri-state boolean stored as `""`, `"true"` or `"false"`.
    NullableBool,
    /// Map of strings.
    Map,
    StringSet,
    Block {
        shape: Shape,
        nesting: Nesting,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub field_type: FieldType,
    pub mode: Mode,
    pub default: Option<Value>,
    pub force_new: bool,
    pub sensitive: bool,
    /// Checks applied to the value, or to every element of a set.
    pub validations: Vec<Validation>,
    pub max_items: Option<usize>,
    pub exactly_one_of: Vec<String>,
    pub conflicts_with: Vec<String>,
    pub required_with: Vec<String>,
}

impl Field {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            mode: Mode::Optional,
            default: None,
            force_new: false,
            sensitive: false,
            validations: Vec::new(),
            max_items: None,
            exactly_one_of: Vec::new(),
            conflicts_with: Vec::new(),
            required_with: Vec::new(),
        }
    }

    pub fn bool() -> Self {
        Self::new(FieldType::Bool)
    }

    pub fn int() -> Self {
        Self::new(FieldType::Int)
    }

    pub fn float() -> Self {
        Self::new(FieldType::Float)
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn nullable_bool() -> Self {
        Self::new(FieldType::NullableBool)
    }

    pub fn map() -> Self {
        Self::new(FieldType::Map)
    }

    pub fn string_set() -> Self {
        Self::new(FieldType::StringSet)
    }

    pub fn list(shape: Shape) -> Self {
        Self::new(FieldType::Block {
            shape,
            nesting: Nesting::List,
        })
    }

    pub fn set(shape: Shape) -> Self {
        Self::new(FieldType::Block {
            shape,
            nesting: Nesting::Set,
        })
    }

    pub fn required(mut self) -> Self {
        self.mode = Mode::Required;
        self
    }

    pub fn computed(mut self) -> Self {
        self.mode = Mode::Computed;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn validate(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn exactly_one_of<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.exactly_one_of = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn conflicts_with<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.conflicts_with = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn required_with<I: IntoIterator<Item = S>, S: Into<String>>(mut self, names: I) -> Self {
        self.required_with = names.into_iter().map(Into::into).collect();
        self
    }

    /// Read-only counterpart of the field: computed, without defaults nor checks.
    ///
    /// Nested collections become sets, singleton blocks keep their nesting.
    pub fn to_computed(&self) -> Field {
        let field_type = match &self.field_type {
            FieldType::Block { shape, nesting } => FieldType::Block {
                shape: shape.data_source(),
                nesting: if self.max_items == Some(1) {
                    *nesting
                } else {
                    Nesting::Set
                },
            },
            other => other.clone(),
        };
        Field {
            sensitive: self.sensitive,
            ..Field::new(field_type).computed()
        }
    }
}

/// Fields of one configuration block, keyed by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub fields: BTreeMap<String, Field>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.insert(name, field);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field: Field) {
        self.fields.insert(name.into(), field);
    }

    pub fn extend(&mut self, other: Shape) {
        self.fields.extend(other.fields);
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Shape of the data source view, derived field by field.
    pub fn data_source(&self) -> Shape {
        Shape {
            fields: self
                .fields
                .iter()
                .map(|(name, field)| (name.clone(), field.to_computed()))
                .collect(),
        }
    }

    /// Fill missing fields with their schema default, recursing into nested blocks.
    pub fn apply_defaults(&self, tree: &mut TfMap) {
        for (name, field) in &self.fields {
            match &field.field_type {
                FieldType::Block { shape, .. } => {
                    if let Some(Value::Array(items)) = tree.get_mut(name) {
                        for item in items.iter_mut() {
                            if let Value::Object(item) = item {
                                shape.apply_defaults(item);
                            }
                        }
                    }
                }
                _ => {
                    let missing = tree.get(name).map_or(true, Value::is_null);
                    if let (true, Some(default)) = (missing, &field.default) {
                        tree.insert(name.clone(), default.clone());
                    }
                }
            }
        }
    }
}

/// Whether a field counts as set in a configuration tree.
pub(crate) fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}
