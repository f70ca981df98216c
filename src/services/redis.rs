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

use serde::{Deserialize, Serialize};

use crate::shape::{Field, Shape, Validation};
use crate::TfMap;

use super::fields::{from_bag, into_bag, put, Fields, Present};
use super::{Overrides, ServiceClass, ServiceManager, ServiceParameters, ServiceType, NONE};

const MAXMEMORY_POLICIES: &[&str] = &[
    "noeviction",
    "allkeys-lru",
    "allkeys-lfu",
    "volatile-lru",
    "volatile-lfu",
    "allkeys-random",
    "volatile-random",
    "volatile-ttl",
];

static OVERRIDES: Overrides = Overrides {
    service_parameters_shape: service_shape,
    expand_service_parameters: expand_service,
    flatten_service_parameters: flatten_service,
    ..NONE
};

pub(super) fn manager() -> ServiceManager {
    ServiceManager {
        service_type: ServiceType::Redis,
        classes: &[ServiceClass::Database, ServiceClass::Cacher],
        default_class: ServiceClass::Cacher,
        allow_arbitrator: false,
        allow_backup: false,
        data_volume_required: true,
        users_enabled: false,
        databases_enabled: false,
        logging_enabled: true,
        monitoring_enabled: true,
        overrides: &OVERRIDES,
    }
}

fn service_shape() -> Shape {
    Shape::new()
        .field(
            "cluster_type",
            Field::string()
                .force_new()
                .validate(Validation::one_of(&["native", "sentinel"])),
        )
        .field(
            "databases",
            Field::int()
                .force_new()
                .validate(Validation::IntBetween(1, 2147483647)),
        )
        .field(
            "maxmemory_policy",
            Field::string()
                .force_new()
                .default("noeviction")
                .validate(Validation::one_of(MAXMEMORY_POLICIES)),
        )
        .field("options", Field::map().force_new())
        .field(
            "password",
            Field::string()
                .sensitive()
                .force_new()
                .validate(Validation::LenBetween(8, 128))
                .validate(Validation::NotContainingAny("`'\"\\")),
        )
        .field("persistence_aof", Field::bool().force_new().default(false))
        .field("persistence_rdb", Field::bool().force_new().default(false))
        .field(
            "timeout",
            Field::int()
                .force_new()
                .default(0)
                .validate(Validation::IntBetween(0, 2147483647)),
        )
        .field(
            "tcp_backlog",
            Field::int()
                .force_new()
                .default(511)
                .validate(Validation::IntBetween(1, 4096)),
        )
        .field(
            "tcp_keepalive",
            Field::int()
                .force_new()
                .default(300)
                .validate(Validation::IntAtLeast(0)),
        )
        .field(
            "version",
            Field::string()
                .required()
                .force_new()
                .validate(Validation::one_of(&["5.0.14", "6.2.6", "7.0.11"])),
        )
}

/// Redis service parameters.
///
/// A few wire keys keep the hyphenated names of the Redis configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisParameters {
    #[serde(alias = "clusterType")]
    pub cluster_type: Present<String>,
    pub databases: Present<i64>,
    #[serde(rename = "maxmemory-policy")]
    pub maxmemory_policy: Present<String>,
    pub options: Present<TfMap>,
    pub password: Present<String>,
    #[serde(alias = "persistenceAof")]
    pub persistence_aof: Present<bool>,
    #[serde(alias = "persistenceRdb")]
    pub persistence_rdb: Present<bool>,
    /// Zero disables the idle timeout, so it is always sent.
    pub timeout: Present<i64>,
    #[serde(rename = "tcp-backlog")]
    pub tcp_backlog: Present<i64>,
    #[serde(rename = "tcp-keepalive")]
    pub tcp_keepalive: Present<i64>,
    pub version: Present<String>,
}

impl RedisParameters {
    pub fn expand(tree: &TfMap) -> Self {
        let fields = Fields::new(tree);
        Self {
            cluster_type: fields.non_empty_string("cluster_type").into(),
            databases: fields.non_zero_int("databases").into(),
            maxmemory_policy: fields.non_empty_string("maxmemory_policy").into(),
            options: fields.map("options").into(),
            password: fields.non_empty_string("password").into(),
            persistence_aof: fields.bool("persistence_aof").into(),
            persistence_rdb: fields.bool("persistence_rdb").into(),
            timeout: fields.int("timeout").into(),
            tcp_backlog: fields.int("tcp_backlog").into(),
            tcp_keepalive: fields.int("tcp_keepalive").into(),
            version: fields.string("version").into(),
        }
    }

    pub fn flatten(&self) -> TfMap {
        let mut tree = TfMap::new();
        put(&mut tree, "cluster_type", &self.cluster_type);
        put(&mut tree, "databases", &self.databases);
        put(&mut tree, "maxmemory_policy", &self.maxmemory_policy);
        put(&mut tree, "options", &self.options);
        put(&mut tree, "password", &self.password);
        put(&mut tree, "persistence_aof", &self.persistence_aof);
        put(&mut tree, "persistence_rdb", &self.persistence_rdb);
        put(&mut tree, "timeout", &self.timeout);
        put(&mut tree, "tcp_backlog", &self.tcp_backlog);
        put(&mut tree, "tcp_keepalive", &self.tcp_keepalive);
        put(&mut tree, "version", &self.version);
        tree
    }
}

fn expand_service(tree: &TfMap) -> ServiceParameters {
    into_bag(&RedisParameters::expand(tree))
}

fn flatten_service(parameters: &ServiceParameters) -> TfMap {
    from_bag::<RedisParameters>(parameters).flatten()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn expand_uses_hyphenated_keys() {
        let tree = json!({
            "cluster_type": "native",
            "databases": 0,
            "maxmemory_policy": "allkeys-lru",
            "persistence_aof": false,
            "persistence_rdb": true,
            "timeout": 0,
            "tcp_backlog": 511,
            "tcp_keepalive": 0,
            "version": "7.0.11",
        });

        assert_eq!(
            Value::Object(expand_service(tree.as_object().unwrap())),
            json!({
                "cluster_type": "native",
                "maxmemory-policy": "allkeys-lru",
                "persistence_aof": false,
                "persistence_rdb": true,
                "timeout": 0,
                "tcp-backlog": 511,
                "tcp-keepalive": 0,
                "version": "7.0.11",
            })
        );
    }

    #[test]
    fn flatten_camel_case_response() {
        let response = json!({
            "clusterType": "sentinel",
            "databases": 16,
            "maxmemory-policy": "noeviction",
            "persistenceAof": true,
            "persistenceRdb": false,
            "timeout": 30,
            "tcp-backlog": 1024,
            "tcp-keepalive": 60,
            "version": "6.2.6",
        });

        assert_eq!(
            Value::Object(flatten_service(response.as_object().unwrap())),
            json!({
                "cluster_type": "sentinel",
                "databases": 16,
                "maxmemory_policy": "noeviction",
                "persistence_aof": true,
                "persistence_rdb": false,
                "timeout": 30,
                "tcp_backlog": 1024,
                "tcp_keepalive": 60,
                "version": "6.2.6",
            })
        );
    }

    #[test]
    fn round_trip_with_defaults() {
        let mut tree = json!({"version": "5.0.14", "password": "redis-pass"})
            .as_object()
            .cloned()
            .unwrap();
        service_shape().apply_defaults(&mut tree);

        assert_eq!(flatten_service(&expand_service(&tree)), tree);
    }
}
