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

//! Shared expand/flatten layer of every manager.
//!
//! Handles the parts common to all service types (logging and monitoring
//! blocks, users, databases) and delegates the rest to the overrides.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::paas::api::{DatabaseCreateRequest, DatabaseResponse, Service, UserCreateRequest, UserResponse};
use crate::TfMap;

use super::fields::{from_bag, into_bag, put, Fields, Present};
use super::{ServiceManager, ServiceParameters};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Logging {
    logging: Present<bool>,
    #[serde(alias = "logTo")]
    log_to: Present<String>,
    #[serde(alias = "loggingTags")]
    logging_tags: Present<BTreeSet<String>>,
}

impl Logging {
    fn expand(block: Option<&TfMap>) -> Self {
        let Some(block) = block else {
            return Self {
                logging: Present::Set(false),
                ..Default::default()
            };
        };
        let fields = Fields::new(block);
        Self {
            logging: Present::Set(true),
            log_to: fields.non_empty_string("log_to").into(),
            logging_tags: fields.string_set("logging_tags").into(),
        }
    }

    fn flatten(&self) -> Option<Value> {
        if self.logging.as_ref() != Some(&true) {
            return None;
        }
        let mut block = TfMap::new();
        put(&mut block, "log_to", &self.log_to);
        put(&mut block, "logging_tags", &self.logging_tags);
        Some(Value::Array(vec![Value::Object(block)]))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Monitoring {
    monitoring: Present<bool>,
    #[serde(alias = "monitorBy")]
    monitor_by: Present<String>,
    #[serde(alias = "monitoringLabels")]
    monitoring_labels: Present<TfMap>,
}

impl Monitoring {
    fn expand(block: Option<&TfMap>) -> Self {
        let Some(block) = block else {
            return Self {
                monitoring: Present::Set(false),
                ..Default::default()
            };
        };
        let fields = Fields::new(block);
        Self {
            monitoring: Present::Set(true),
            monitor_by: fields.non_empty_string("monitor_by").into(),
            monitoring_labels: fields.map("monitoring_labels").into(),
        }
    }

    fn flatten(&self) -> Option<Value> {
        if self.monitoring.as_ref() != Some(&true) {
            return None;
        }
        let mut block = TfMap::new();
        put(&mut block, "monitor_by", &self.monitor_by);
        put(&mut block, "monitoring_labels", &self.monitoring_labels);
        Some(Value::Array(vec![Value::Object(block)]))
    }
}

fn objects(list: &[Value]) -> impl Iterator<Item = &TfMap> {
    list.iter().filter_map(Value::as_object)
}

impl ServiceManager {
    /// Service-level parameters of a service block, in wire representation.
    ///
    /// Managers with logging or monitoring always send the matching flag,
    /// `false` when the block is absent.
    pub fn expand_service_parameters(&self, tree: &TfMap) -> ServiceParameters {
        let fields = Fields::new(tree);
        let mut parameters = ServiceParameters::new();

        if self.logging_enabled {
            parameters.extend(into_bag(&Logging::expand(fields.block("logging"))));
        }
        if self.monitoring_enabled {
            parameters.extend(into_bag(&Monitoring::expand(fields.block("monitoring"))));
        }

        parameters.extend((self.overrides.expand_service_parameters)(tree));
        parameters
    }

    pub fn expand_users(&self, list: &[Value], for_database: bool) -> Vec<UserCreateRequest> {
        objects(list)
            .map(|tree| self.expand_user(tree, for_database))
            .collect()
    }

    /// User of the service, or of one of its databases when `for_database` is set.
    pub fn expand_user(&self, tree: &TfMap, for_database: bool) -> UserCreateRequest {
        let parameters = if for_database {
            (self.overrides.expand_database_user_parameters)(tree)
        } else {
            (self.overrides.expand_user_parameters)(tree)
        };
        UserCreateRequest {
            name: Fields::new(tree).non_empty_string("name"),
            parameters,
        }
    }

    pub fn expand_databases(&self, list: &[Value]) -> Vec<DatabaseCreateRequest> {
        objects(list).map(|tree| self.expand_database(tree)).collect()
    }

    pub fn expand_database(&self, tree: &TfMap) -> DatabaseCreateRequest {
        let fields = Fields::new(tree);
        let users = fields
            .get("user")
            .and_then(Value::as_array)
            .map(|users| self.expand_users(users, true))
            .unwrap_or_default();

        DatabaseCreateRequest {
            backup_enabled: fields.bool("backup_enabled"),
            name: fields.non_empty_string("name"),
            users,
            parameters: (self.overrides.expand_database_parameters)(tree),
        }
    }

    /// Users declared in a service block, empty when the manager has none.
    pub fn users_from_block(&self, tree: &TfMap) -> Vec<UserCreateRequest> {
        if !self.users_enabled {
            return Vec::new();
        }
        match Fields::new(tree).get("user").and_then(Value::as_array) {
            Some(list) => self.expand_users(list, false),
            None => Vec::new(),
        }
    }

    /// Databases declared in a service block, empty when the manager has none.
    pub fn databases_from_block(&self, tree: &TfMap) -> Vec<DatabaseCreateRequest> {
        if !self.databases_enabled {
            return Vec::new();
        }
        match Fields::new(tree).get("database").and_then(Value::as_array) {
            Some(list) => self.expand_databases(list),
            None => Vec::new(),
        }
    }

    /// Service block rebuilt from the API representation.
    ///
    /// Parameters, users and databases are separate in the API but share a
    /// single block in configuration.
    pub fn flatten_service_parameters_users_databases(
        &self,
        parameters: &ServiceParameters,
        users: &[UserResponse],
        databases: &[DatabaseResponse],
    ) -> TfMap {
        let mut tree = (self.overrides.flatten_service_parameters)(parameters);

        if self.users_enabled {
            tree.insert("user".to_string(), self.flatten_users(users, false).into());
        }
        if self.databases_enabled {
            tree.insert("database".to_string(), self.flatten_databases(databases).into());
        }

        if self.logging_enabled {
            if let Some(block) = from_bag::<Logging>(parameters).flatten() {
                tree.insert("logging".to_string(), block);
            }
        }
        if self.monitoring_enabled {
            if let Some(block) = from_bag::<Monitoring>(parameters).flatten() {
                tree.insert("monitoring".to_string(), block);
            }
        }

        tree
    }

    /// Service block of a described service, including its class.
    pub fn flatten_service(&self, service: &Service) -> TfMap {
        let mut tree = self.flatten_service_parameters_users_databases(
            &service.parameters,
            &service.users,
            &service.databases,
        );
        if let Some(class) = &service.service_class {
            tree.insert("class".to_string(), class.clone().into());
        }
        tree
    }

    pub fn flatten_users(&self, users: &[UserResponse], for_database: bool) -> Vec<Value> {
        users
            .iter()
            .map(|user| Value::Object(self.flatten_user(user, for_database)))
            .collect()
    }

    pub fn flatten_user(&self, user: &UserResponse, for_database: bool) -> TfMap {
        let mut tree = TfMap::new();
        if let Some(id) = &user.id {
            tree.insert("id".to_string(), id.clone().into());
        }
        if let Some(name) = &user.name {
            tree.insert("name".to_string(), name.clone().into());
        }

        let parameters = if for_database {
            (self.overrides.flatten_database_user_parameters)(&user.parameters)
        } else {
            (self.overrides.flatten_user_parameters)(&user.parameters)
        };
        tree.extend(parameters);
        tree
    }

    pub fn flatten_databases(&self, databases: &[DatabaseResponse]) -> Vec<Value> {
        databases
            .iter()
            .map(|database| Value::Object(self.flatten_database(database)))
            .collect()
    }

    pub fn flatten_database(&self, database: &DatabaseResponse) -> TfMap {
        let mut tree = TfMap::new();
        if let Some(backup_enabled) = database.backup_enabled {
            tree.insert("backup_enabled".to_string(), backup_enabled.into());
        }
        if let Some(id) = &database.id {
            tree.insert("id".to_string(), id.clone().into());
        }
        if let Some(name) = &database.name {
            tree.insert("name".to_string(), name.clone().into());
        }
        if let Some(users) = &database.users {
            tree.insert("user".to_string(), self.flatten_users(users, true).into());
        }
        tree.extend((self.overrides.flatten_database_parameters)(&database.parameters));
        tree
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::Registry;

    fn tree(value: Value) -> TfMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn logging_and_monitoring_flags() {
        let registry = Registry::new();
        let rabbitmq = registry.manager("rabbitmq").unwrap();

        let parameters = rabbitmq.expand_service_parameters(&tree(json!({
            "version": "3.9.16",
            "logging": [{"log_to": "", "logging_tags": ["a", "b"]}],
        })));

        assert_eq!(parameters["logging"], json!(true));
        assert_eq!(parameters["logging_tags"], json!(["a", "b"]));
        assert!(!parameters.contains_key("log_to"));
        assert_eq!(parameters["monitoring"], json!(false));
        assert!(!parameters.contains_key("monitor_by"));
        assert_eq!(parameters["version"], json!("3.9.16"));
    }

    #[test]
    fn logging_blocks_rebuilt_from_response() {
        let registry = Registry::new();
        let es = registry.manager("elasticsearch").unwrap();

        let tree = es.flatten_service_parameters_users_databases(
            &tree(json!({
                "logging": true,
                "logTo": "ops-logs",
                "loggingTags": ["x"],
                "monitoring": false,
                "monitorBy": "ignored",
                "version": "8.2.2",
            })),
            &[],
            &[],
        );

        assert_eq!(
            tree["logging"],
            json!([{"log_to": "ops-logs", "logging_tags": ["x"]}])
        );
        assert!(!tree.contains_key("monitoring"));
        assert!(!tree.contains_key("user"));
        assert!(!tree.contains_key("database"));
    }

    #[test]
    fn databases_with_users() {
        let registry = Registry::new();
        let mysql = registry.manager("mysql").unwrap();

        let databases = mysql.databases_from_block(&tree(json!({
            "database": [{
                "backup_enabled": true,
                "name": "app",
                "charset": "utf8mb4",
                "user": [{"name": "reader", "privileges": ["SELECT"]}],
            }],
        })));

        assert_eq!(databases.len(), 1);
        let database = &databases[0];
        assert_eq!(database.backup_enabled, Some(true));
        assert_eq!(database.name.as_deref(), Some("app"));
        assert_eq!(database.parameters["charset"], json!("utf8mb4"));
        assert_eq!(database.users.len(), 1);
        assert_eq!(database.users[0].name.as_deref(), Some("reader"));
        assert_eq!(database.users[0].parameters["privileges"], json!(["SELECT"]));
    }

    #[test]
    fn blocks_without_users_or_databases() {
        let registry = Registry::new();
        let redis = registry.manager("redis").unwrap();
        let block = tree(json!({"user": [{"name": "ignored"}]}));

        assert!(redis.users_from_block(&block).is_empty());
        assert!(redis.databases_from_block(&block).is_empty());

        let pgsql = registry.manager("pgsql").unwrap();
        assert!(pgsql.users_from_block(&tree(json!({}))).is_empty());
    }

    #[test]
    fn flatten_database_users_only_when_present() {
        let registry = Registry::new();
        let pgsql = registry.manager("pgsql").unwrap();

        let database = DatabaseResponse {
            backup_enabled: Some(false),
            id: Some("db-1".to_string()),
            name: Some("app".to_string()),
            users: None,
            parameters: tree(json!({"owner": "admin", "encoding": "UTF8"})),
        };
        let flat = pgsql.flatten_database(&database);

        assert_eq!(flat["id"], json!("db-1"));
        assert_eq!(flat["owner"], json!("admin"));
        assert!(!flat.contains_key("user"));

        let database = DatabaseResponse {
            users: Some(vec![UserResponse {
                id: Some("u-1".to_string()),
                name: Some("reader".to_string()),
                ..Default::default()
            }]),
            ..database
        };
        assert_eq!(
            pgsql.flatten_database(&database)["user"],
            json!([{"id": "u-1", "name": "reader"}])
        );
    }

    #[test]
    fn flatten_service_adds_class() {
        let registry = Registry::new();
        let memcached = registry.manager("memcached").unwrap();

        let service = Service {
            service_class: Some("cacher".to_string()),
            parameters: tree(json!({"monitoring": true})),
            ..Default::default()
        };

        assert_eq!(
            Value::Object(memcached.flatten_service(&service)),
            json!({"class": "cacher", "monitoring": true})
        );
    }
}
