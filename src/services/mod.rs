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

//! Per-service-type parameter managers.
//!
//! Every supported service type is described by a [`ServiceManager`]: shared
//! metadata (classes, capabilities) plus a table of service-specific
//! overrides used to expand declarative trees into API parameter bags,
//! flatten them back, and build the configuration shapes.
//!
//! Expand: configuration -> API. Flatten: API -> configuration.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Error};

use crate::shape::Shape;
use crate::TfMap;

mod converter;
mod elasticsearch;
pub mod fields;
mod memcached;
mod mongodb;
mod mysql;
pub mod nullable;
pub mod parameter_values;
mod pgsql;
mod rabbitmq;
mod redis;
mod schema_builder;
pub mod units;

pub use elasticsearch::ElasticSearchParameters;
pub use memcached::MemcachedParameters;
pub use mongodb::{MongoDbDatabaseUserParameters, MongoDbParameters, MongoDbUserParameters};
pub use mysql::{
    MySqlDatabaseParameters, MySqlDatabaseUserParameters, MySqlParameters, MySqlUserParameters,
};
pub use pgsql::{PostgreSqlDatabaseParameters, PostgreSqlParameters, PostgreSqlUserParameters};
pub use rabbitmq::RabbitMqParameters;
pub use redis::RedisParameters;

/// Service-level parameters in wire representation.
pub type ServiceParameters = TfMap;
/// Parameters of a service user in wire representation.
pub type UserParameters = TfMap;
/// Parameters of a database in wire representation.
pub type DatabaseParameters = TfMap;
/// Parameters of a database user in wire representation.
pub type DatabaseUserParameters = TfMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceType {
    ElasticSearch,
    Memcached,
    MongoDb,
    MySql,
    PostgreSql,
    RabbitMq,
    Redis,
}

impl ServiceType {
    pub fn values() -> &'static [ServiceType] {
        &[
            ServiceType::ElasticSearch,
            ServiceType::Memcached,
            ServiceType::MongoDb,
            ServiceType::MySql,
            ServiceType::PostgreSql,
            ServiceType::RabbitMq,
            ServiceType::Redis,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ElasticSearch => "elasticsearch",
            ServiceType::Memcached => "memcached",
            ServiceType::MongoDb => "mongodb",
            ServiceType::MySql => "mysql",
            ServiceType::PostgreSql => "pgsql",
            ServiceType::RabbitMq => "rabbitmq",
            ServiceType::Redis => "redis",
        }
    }
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::values()
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| anyhow!("Unknown service type: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceClass {
    Cacher,
    Database,
    MessageBroker,
    Search,
}

impl ServiceClass {
    pub fn values() -> &'static [ServiceClass] {
        &[
            ServiceClass::Cacher,
            ServiceClass::Database,
            ServiceClass::MessageBroker,
            ServiceClass::Search,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceClass::Cacher => "cacher",
            ServiceClass::Database => "database",
            ServiceClass::MessageBroker => "message_broker",
            ServiceClass::Search => "search",
        }
    }
}

impl Display for ServiceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceClass::values()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| anyhow!("Unknown service class: {s}"))
    }
}

/// Service-specific behavior of a manager.
///
/// Entries a service does not override keep the defaults of [`NONE`]:
/// no parameters and empty shapes.
#[derive(Debug)]
pub(crate) struct Overrides {
    pub service_parameters_shape: fn() -> Shape,
    pub user_parameters_shape: fn() -> Shape,
    pub database_parameters_shape: fn() -> Shape,
    pub database_user_parameters_shape: fn() -> Shape,

    pub expand_service_parameters: fn(&TfMap) -> ServiceParameters,
    pub expand_user_parameters: fn(&TfMap) -> UserParameters,
    pub expand_database_parameters: fn(&TfMap) -> DatabaseParameters,
    pub expand_database_user_parameters: fn(&TfMap) -> DatabaseUserParameters,

    pub flatten_service_parameters: fn(&ServiceParameters) -> TfMap,
    pub flatten_user_parameters: fn(&UserParameters) -> TfMap,
    pub flatten_database_parameters: fn(&DatabaseParameters) -> TfMap,
    pub flatten_database_user_parameters: fn(&DatabaseUserParameters) -> TfMap,
}

fn no_shape() -> Shape {
    Shape::new()
}

fn no_parameters(_: &TfMap) -> TfMap {
    TfMap::new()
}

pub(crate) const NONE: Overrides = Overrides {
    service_parameters_shape: no_shape,
    user_parameters_shape: no_shape,
    database_parameters_shape: no_shape,
    database_user_parameters_shape: no_shape,
    expand_service_parameters: no_parameters,
    expand_user_parameters: no_parameters,
    expand_database_parameters: no_parameters,
    expand_database_user_parameters: no_parameters,
    flatten_service_parameters: no_parameters,
    flatten_user_parameters: no_parameters,
    flatten_database_parameters: no_parameters,
    flatten_database_user_parameters: no_parameters,
};

/// Manager of one PaaS service type.
///
/// Managers are immutable and owned by a [`Registry`].
#[derive(Debug)]
pub struct ServiceManager {
    pub service_type: ServiceType,
    pub classes: &'static [ServiceClass],
    pub default_class: ServiceClass,
    pub allow_arbitrator: bool,
    pub allow_backup: bool,
    pub data_volume_required: bool,
    pub users_enabled: bool,
    pub databases_enabled: bool,
    pub logging_enabled: bool,
    pub monitoring_enabled: bool,
    pub(crate) overrides: &'static Overrides,
}

impl ServiceManager {
    pub fn service_type(&self) -> &'static str {
        self.service_type.as_str()
    }
}

/// Closed table of the managers of every supported service type.
#[derive(Debug)]
pub struct Registry {
    managers: BTreeMap<&'static str, ServiceManager>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let managers = [
            elasticsearch::manager(),
            memcached::manager(),
            mongodb::manager(),
            mysql::manager(),
            pgsql::manager(),
            rabbitmq::manager(),
            redis::manager(),
        ];
        Self {
            managers: managers
                .into_iter()
                .map(|manager| (manager.service_type(), manager))
                .collect(),
        }
    }

    /// Manager of `service_type`, `None` for an unknown type.
    pub fn manager(&self, service_type: &str) -> Option<&ServiceManager> {
        let manager = self.managers.get(service_type);
        if manager.is_none() {
            tracing::error!("Unknown service type: {service_type}");
        }
        manager
    }

    pub fn managers(&self) -> impl Iterator<Item = &ServiceManager> {
        self.managers.values()
    }

    pub fn managed_service_types(&self) -> Vec<&'static str> {
        self.managers.keys().copied().collect()
    }

    /// Manager of the single service block populated in a resource configuration.
    pub fn manager_for_config(&self, tree: &TfMap) -> Option<&ServiceManager> {
        let manager = self
            .managers
            .values()
            .find(|manager| crate::shape::is_set(tree.get(manager.service_type())));
        if manager.is_none() {
            tracing::warn!("There is no service specified in configuration.");
        }
        manager
    }

    /// Shape holding the service block of every registered service type.
    pub fn resource_shape(&self) -> Shape {
        let mut shape = Shape::new();
        for manager in self.managers() {
            shape.insert(manager.service_type(), manager.resource_schema());
        }
        shape
    }

    pub fn data_source_shape(&self) -> Shape {
        let mut shape = Shape::new();
        for manager in self.managers() {
            shape.insert(manager.service_type(), manager.data_source_schema());
        }
        shape
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn every_service_type_is_registered() {
        let registry = Registry::new();
        let mut expected: Vec<_> = ServiceType::values().iter().map(|t| t.as_str()).collect();
        expected.sort_unstable();

        assert_eq!(registry.managed_service_types(), expected);
        for service_type in ServiceType::values() {
            let manager = registry.manager(service_type.as_str()).unwrap();
            assert_eq!(manager.service_type, *service_type);
            assert!(manager.classes.contains(&manager.default_class));
        }
    }

    #[test]
    fn unknown_service_type_is_absent() {
        let registry = Registry::new();
        assert!(registry.manager("not-a-real-type").is_none());
        assert!("not-a-real-type".parse::<ServiceType>().is_err());
    }

    #[test]
    fn names_round_trip() {
        for service_type in ServiceType::values() {
            assert_eq!(service_type.to_string().parse::<ServiceType>().unwrap(), *service_type);
        }
        for class in ServiceClass::values() {
            assert_eq!(class.to_string().parse::<ServiceClass>().unwrap(), *class);
        }
        assert_eq!(ServiceType::PostgreSql.as_str(), "pgsql");
        assert_eq!(ServiceClass::MessageBroker.as_str(), "message_broker");
    }

    #[test]
    fn manager_for_config_finds_populated_block() {
        let registry = Registry::new();
        let tree = json!({
            "name": "cache",
            "mysql": [],
            "redis": [{"version": "7.0.11"}],
        });

        let manager = registry.manager_for_config(tree.as_object().unwrap());
        assert_eq!(manager.map(|m| m.service_type), Some(ServiceType::Redis));

        let empty = json!({"name": "nothing"});
        assert!(registry.manager_for_config(empty.as_object().unwrap()).is_none());
    }

    #[test]
    fn capabilities() {
        let registry = Registry::new();
        let redis = registry.manager("redis").unwrap();
        assert_eq!(redis.classes, &[ServiceClass::Database, ServiceClass::Cacher]);
        assert_eq!(redis.default_class, ServiceClass::Cacher);

        let memcached = registry.manager("memcached").unwrap();
        assert!(!memcached.logging_enabled);
        assert!(!memcached.monitoring_enabled);

        for name in ["mysql", "pgsql"] {
            let manager = registry.manager(name).unwrap();
            assert!(manager.allow_backup && manager.users_enabled && manager.databases_enabled);
        }
    }
}
