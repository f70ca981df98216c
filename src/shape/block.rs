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

use std::collections::HashMap;

use tf_provider::{Attribute, AttributeConstraint, AttributeType, Block, Description, NestedBlock};

use super::{Field, FieldType, Mode, Nesting, Shape};

impl Field {
    fn attribute_type(&self) -> Option<AttributeType> {
        match &self.field_type {
            FieldType::Bool => Some(AttributeType::Bool),
            FieldType::Int | FieldType::Float => Some(AttributeType::Number),
            FieldType::String | FieldType::NullableBool => Some(AttributeType::String),
            FieldType::Map => Some(AttributeType::Map(AttributeType::String.into())),
            FieldType::StringSet => Some(AttributeType::Set(AttributeType::String.into())),
            FieldType::Block { .. } => None,
        }
    }

    fn constraint(&self) -> AttributeConstraint {
        match (self.mode, &self.default) {
            (Mode::Required, _) => AttributeConstraint::Required,
            (Mode::Computed, _) => AttributeConstraint::Computed,
            (Mode::Optional, Some(_)) => AttributeConstraint::OptionalComputed,
            (Mode::Optional, None) => AttributeConstraint::Optional,
        }
    }
}

impl Shape {
    /// Render the shape as a Terraform schema block.
    ///
    /// Scalar fields become attributes, nested shapes become list or set blocks.
    pub fn to_block(&self, description: &str) -> Block {
        let mut attributes = HashMap::new();
        let mut blocks = HashMap::new();

        for (name, field) in &self.fields {
            match &field.field_type {
                FieldType::Block { shape, nesting } => {
                    let block = shape.to_block(name);
                    let nested = match nesting {
                        Nesting::List => NestedBlock::List(block),
                        Nesting::Set => NestedBlock::Set(block),
                    };
                    blocks.insert(name.clone(), nested);
                }
                _ => {
                    let Some(attr_type) = field.attribute_type() else {
                        continue;
                    };
                    attributes.insert(
                        name.clone(),
                        Attribute {
                            attr_type,
                            description: Description::plain(name.clone()),
                            constraint: field.constraint(),
                            sensitive: field.sensitive,
                            ..Default::default()
                        },
                    );
                }
            }
        }

        Block {
            version: 1,
            attributes,
            blocks,
            description: Description::plain(description.to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_and_nested_blocks() {
        let user = Shape::new().field("name", Field::string().required());
        let shape = Shape::new()
            .field("version", Field::string().required())
            .field("port", Field::int().default(5432))
            .field("class", Field::string().computed())
            .field("password", Field::string().sensitive())
            .field("tags", Field::string_set())
            .field("user", Field::list(user));

        let block = shape.to_block("mysql");

        assert_eq!(block.attributes.len(), 5);
        assert_eq!(block.blocks.len(), 1);
        assert!(matches!(
            block.attributes["version"].constraint,
            AttributeConstraint::Required
        ));
        assert!(matches!(
            block.attributes["port"].constraint,
            AttributeConstraint::OptionalComputed
        ));
        assert!(matches!(
            block.attributes["class"].constraint,
            AttributeConstraint::Computed
        ));
        assert!(matches!(
            block.attributes["tags"].constraint,
            AttributeConstraint::Optional
        ));
        assert!(block.attributes["password"].sensitive);
        assert!(matches!(block.blocks["user"], NestedBlock::List(_)));
    }
}
