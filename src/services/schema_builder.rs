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

use crate::shape::{Field, Shape, Validation};

use super::{ServiceClass, ServiceManager, ServiceType};

const MAX_USERS: usize = 1000;
const MAX_DATABASES: usize = 1000;

fn logging_shape() -> Shape {
    Shape::new()
        .field("log_to", Field::string())
        .field("logging_tags", Field::string_set())
}

fn monitoring_shape() -> Shape {
    Shape::new()
        .field("monitor_by", Field::string())
        .field("monitoring_labels", Field::map())
}

fn user_shape(parameters: Shape) -> Field {
    let mut shape = Shape::new()
        .field("id", Field::string().computed())
        .field("name", Field::string().required());
    shape.extend(parameters);
    Field::list(shape).max_items(MAX_USERS)
}

impl ServiceManager {
    fn database_shape(&self) -> Field {
        let mut shape = Shape::new()
            .field("backup_enabled", Field::bool().default(false))
            .field("id", Field::string().computed())
            .field("name", Field::string().required());
        if self.users_enabled {
            shape.insert(
                "user",
                user_shape((self.overrides.database_user_parameters_shape)()),
            );
        }
        shape.extend((self.overrides.database_parameters_shape)());
        Field::list(shape).max_items(MAX_DATABASES)
    }

    /// Fields of the service block: class, service parameters, and the
    /// user, database, logging and monitoring blocks the manager supports.
    pub fn parameters_shape(&self) -> Shape {
        let mut shape = Shape::new().field(
            "class",
            Field::string()
                .default(self.default_class.as_str())
                .force_new()
                .validate(Validation::OneOf(
                    self.classes.iter().map(ServiceClass::as_str).collect(),
                )),
        );
        shape.extend((self.overrides.service_parameters_shape)());

        if self.users_enabled {
            shape.insert("user", user_shape((self.overrides.user_parameters_shape)()));
        }
        if self.databases_enabled {
            shape.insert("database", self.database_shape());
        }
        if self.logging_enabled {
            shape.insert("logging", Field::list(logging_shape()).max_items(1));
        }
        if self.monitoring_enabled {
            shape.insert("monitoring", Field::list(monitoring_shape()).max_items(1));
        }
        shape
    }

    /// Service block of the resource.
    ///
    /// Only one service block may be set on a resource; the block also
    /// carries the manager's constraints on its sibling fields.
    pub fn resource_schema(&self) -> Field {
        let mut conflicts_with = Vec::new();
        if !self.allow_arbitrator {
            conflicts_with.push("arbitrator_required");
        }
        if !self.allow_backup {
            conflicts_with.push("backup_settings");
        }
        let required_with = if self.data_volume_required {
            vec!["data_volume"]
        } else {
            Vec::new()
        };

        Field::list(self.parameters_shape())
            .max_items(1)
            .force_new()
            .exactly_one_of(ServiceType::values().iter().map(ServiceType::as_str))
            .conflicts_with(conflicts_with)
            .required_with(required_with)
    }

    /// Read-only service block of the data source.
    pub fn data_source_schema(&self) -> Field {
        self.resource_schema().to_computed()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tf_provider::{AttributePath, Diagnostics, NestedBlock};

    use super::*;
    use crate::shape::{FieldType, Mode, Nesting};
    use crate::services::Registry;

    fn nested(field: &Field) -> &Shape {
        match &field.field_type {
            FieldType::Block { shape, .. } => shape,
            other => panic!("not a block: {other:?}"),
        }
    }

    #[test]
    fn service_block_constraints() {
        let registry = Registry::new();

        let redis = registry.manager("redis").unwrap().resource_schema();
        assert_eq!(redis.max_items, Some(1));
        assert!(redis.force_new);
        assert_eq!(redis.exactly_one_of.len(), ServiceType::values().len());
        assert_eq!(redis.conflicts_with, vec!["arbitrator_required", "backup_settings"]);
        assert_eq!(redis.required_with, vec!["data_volume"]);

        let mysql = registry.manager("mysql").unwrap().resource_schema();
        assert!(mysql.conflicts_with.is_empty());

        let memcached = registry.manager("memcached").unwrap().resource_schema();
        assert_eq!(memcached.conflicts_with, vec!["arbitrator_required", "backup_settings"]);
    }

    #[test]
    fn class_selector() {
        let registry = Registry::new();
        let redis = registry.manager("redis").unwrap().parameters_shape();
        let class = redis.get("class").unwrap();

        assert_eq!(class.default, Some(json!("cacher")));
        assert!(class.validations[0].check("class", &json!("database")).is_ok());
        assert!(class.validations[0].check("class", &json!("search")).is_err());
    }

    #[test]
    fn nested_users_use_database_user_shape() {
        let registry = Registry::new();
        let mysql = registry.manager("mysql").unwrap().parameters_shape();

        let user = nested(mysql.get("user").unwrap());
        assert!(user.get("host").is_some());
        assert!(user.get("privileges").is_none());

        let database = mysql.get("database").unwrap();
        assert_eq!(database.max_items, Some(1000));
        let database = nested(database);
        assert_eq!(database.get("backup_enabled").unwrap().default, Some(json!(false)));
        assert_eq!(database.get("id").unwrap().mode, Mode::Computed);

        let database_user = nested(database.get("user").unwrap());
        assert!(database_user.get("privileges").is_some());
        assert!(database_user.get("host").is_none());
    }

    #[test]
    fn optional_blocks_follow_capabilities() {
        let registry = Registry::new();

        let memcached = registry.manager("memcached").unwrap().parameters_shape();
        assert!(memcached.get("logging").is_none());
        assert!(memcached.get("user").is_none());
        // memcached only has a plain monitoring flag
        assert_eq!(memcached.get("monitoring").unwrap().field_type, FieldType::Bool);

        let pgsql = registry.manager("pgsql").unwrap().parameters_shape();
        let pgsql_database = nested(pgsql.get("database").unwrap());
        assert!(pgsql_database.get("user").is_some());
        assert!(pgsql.get("logging").is_some());

        let mongodb = registry.manager("mongodb").unwrap().parameters_shape();
        assert_eq!(mongodb.get("monitoring").unwrap().max_items, Some(1));
    }

    #[test]
    fn data_source_schema_is_computed() {
        let registry = Registry::new();
        let schema = registry.manager("pgsql").unwrap().data_source_schema();

        assert_eq!(schema.mode, Mode::Computed);
        assert!(schema.exactly_one_of.is_empty());
        let shape = nested(&schema);
        assert!(shape.fields.values().all(|field| field.mode == Mode::Computed));
        assert!(matches!(
            shape.get("database").unwrap().field_type,
            FieldType::Block {
                nesting: Nesting::Set,
                ..
            }
        ));
        assert!(shape.get("password").is_none());
        let user = nested(shape.get("user").unwrap());
        assert!(user.get("password").unwrap().sensitive);
    }

    #[test]
    fn only_one_service_block() {
        let registry = Registry::new();
        let shape = registry.resource_shape();
        let tree = json!({
            "redis": [{"version": "7.0.11"}],
            "mysql": [{"vendor": "mysql", "version": "8.0"}],
            "data_volume": [{}],
        });

        let mut diags = Diagnostics::default();
        shape.validate(&mut diags, tree.as_object().unwrap(), AttributePath::default());
        assert!(!diags.errors.is_empty());

        let single = json!({
            "redis": [{"version": "7.0.11"}],
            "data_volume": [{}],
        });
        let mut diags = Diagnostics::default();
        shape.validate(&mut diags, single.as_object().unwrap(), AttributePath::default());
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn renders_terraform_block() {
        let registry = Registry::new();
        let shape = registry.resource_shape();
        let block = shape.to_block("PaaS service");

        assert!(matches!(block.blocks.get("redis"), Some(NestedBlock::List(_))));
        let Some(NestedBlock::List(redis)) = block.blocks.get("redis") else {
            unreachable!()
        };
        assert!(redis.attributes.contains_key("tcp_backlog"));
        assert!(redis.blocks.contains_key("logging"));
    }
}
