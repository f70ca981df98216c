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


use serde_json::{json, Value};
use terraform_provider_paas::paas::Service;
use terraform_provider_paas::services::units::MEGABYTE;
use terraform_provider_paas::services::Registry;
use terraform_provider_paas::TfMap;
use tf_provider::{AttributePath, Diagnostics};

fn tree(value: Value) -> TfMap {
    value.as_object().cloned().unwrap()
}

/// Applies the schema defaults of a service block, as the host framework would.
fn with_defaults(registry: &Registry, service_type: &str, block: Value) -> TfMap {
    let mut block = tree(block);
    registry
        .manager(service_type)
        .unwrap()
        .parameters_shape()
        .apply_defaults(&mut block);
    block
}

#[test]
fn mysql_block_to_requests() {
    let registry = Registry::new();
    let mysql = registry.manager("mysql").unwrap();
    let block = with_defaults(
        &registry,
        "mysql",
        json!({
            "vendor": "percona",
            "version": "8.0",
            "max_connections": 400,
            "gcs_fc_master_slave": "",
            "logging": [{"log_to": "elk", "logging_tags": ["db"]}],
            "user": [{"name": "admin", "password": "s3cret-pass", "host": "%"}],
            "database": [{
                "name": "app",
                "backup_enabled": true,
                "user": [{"name": "admin", "privileges": ["ALL"]}],
            }],
        }),
    );

    let parameters = mysql.expand_service_parameters(&block);
    assert_eq!(parameters["logging"], json!(true));
    assert_eq!(parameters["log_to"], json!("elk"));
    assert_eq!(parameters["monitoring"], json!(false));
    assert_eq!(parameters["max_connections"], json!(400));
    assert_eq!(
        parameters["max_allowed_packet"],
        json!({"dimension": "B", "value": 16 * MEGABYTE})
    );
    assert!(!parameters.contains_key("gcs_fc_factor"));
    assert!(!parameters.contains_key("gcs_fc_master_slave"));
    assert!(!parameters.contains_key("thread_cache_size"));

    let users = mysql.users_from_block(&block);
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name.as_deref(), Some("admin"));
    assert_eq!(
        Value::Object(users[0].parameters.clone()),
        json!({"host": "%", "password": "s3cret-pass"})
    );

    let databases = mysql.databases_from_block(&block);
    assert_eq!(databases.len(), 1);
    assert_eq!(databases[0].backup_enabled, Some(true));
    assert_eq!(
        Value::Object(databases[0].parameters.clone()),
        json!({"charset": "utf8", "collate": "utf8_unicode_ci"})
    );
    assert_eq!(
        Value::Object(databases[0].users[0].parameters.clone()),
        json!({"privileges": ["ALL"]})
    );
}

#[test]
fn mysql_service_response_to_block() {
    let registry = Registry::new();
    let mysql = registry.manager("mysql").unwrap();
    let service: Service = serde_json::from_value(json!({
        "id": "fm-cluster-9",
        "serviceType": "mysql",
        "serviceClass": "database",
        "status": "READY",
        "parameters": {
            "vendor": "mariadb",
            "version": "10.6",
            "maxConnections": 300,
            "innodbBufferPoolSize": {"dimension": "GiB", "value": 2},
            "gcsFcSinglePrimary": false,
            "monitoring": true,
            "monitorBy": "zabbix",
            "logging": false,
        },
        "users": [{"id": "u-1", "name": "admin", "parameters": {"host": "%"}}],
        "databases": [{
            "id": "db-1",
            "name": "app",
            "backupEnabled": false,
            "parameters": {"charset": "utf8mb4"},
            "users": [{"name": "admin", "parameters": {"options": ["GRANT"]}}],
        }],
    }))
    .unwrap();

    let block = mysql.flatten_service(&service);

    assert_eq!(block["class"], json!("database"));
    assert_eq!(block["max_connections"], json!(300));
    assert_eq!(block["innodb_buffer_pool_size"], json!(2 * 1024 * MEGABYTE));
    assert_eq!(block["gcs_fc_single_primary"], json!("false"));
    assert_eq!(block["gcs_fc_factor"], json!(-1.0));
    assert_eq!(block["thread_cache_size"], json!(-1));
    assert_eq!(block["monitoring"], json!([{"monitor_by": "zabbix"}]));
    assert!(!block.contains_key("logging"));
    assert_eq!(
        block["user"],
        json!([{"id": "u-1", "name": "admin", "host": "%"}])
    );
    assert_eq!(
        block["database"],
        json!([{
            "backup_enabled": false,
            "id": "db-1",
            "name": "app",
            "charset": "utf8mb4",
            "user": [{"name": "admin", "options": ["GRANT"]}],
        }])
    );
}

#[test]
fn pgsql_sentinels_survive_round_trip() {
    let registry = Registry::new();
    let pgsql = registry.manager("pgsql").unwrap();
    let block = with_defaults(&registry, "pgsql", json!({"version": "13.7"}));

    let parameters = pgsql.expand_service_parameters(&block);
    assert!(!parameters.contains_key("wal_keep_segments"));
    assert!(!parameters.contains_key("max_parallel_maintenance_workers"));

    let flat = pgsql.flatten_service_parameters_users_databases(&TfMap::new(), &[], &[]);
    assert_eq!(flat["wal_keep_segments"], json!(-1));
    assert_eq!(flat["max_parallel_maintenance_workers"], json!(-1));
    assert_eq!(flat["user"], json!([]));
    assert_eq!(flat["database"], json!([]));
}

#[test]
fn every_service_round_trips_its_defaults() {
    let registry = Registry::new();
    let configs = [
        ("elasticsearch", json!({"version": "7.17.4", "password": "elastic-pass"})),
        ("memcached", json!({"monitoring": true})),
        ("mongodb", json!({"version": "5.0.13", "storage_engine_cache_size": 0.5})),
        ("mysql", json!({"vendor": "mysql", "version": "8.0"})),
        ("pgsql", json!({"version": "14.4"})),
        ("rabbitmq", json!({"version": "3.10.0", "password": "rabbit-pass"})),
        ("redis", json!({"version": "7.0.11", "password": "redis-pass"})),
    ];

    for (service_type, config) in configs {
        let manager = registry.manager(service_type).unwrap();
        let block = with_defaults(&registry, service_type, config);

        let parameters = manager.expand_service_parameters(&block);
        let flat = manager.flatten_service_parameters_users_databases(&parameters, &[], &[]);

        for (key, value) in block.iter().filter(|(key, _)| *key != "class") {
            assert_eq!(flat.get(key), Some(value), "{service_type}.{key}");
        }
    }
}

#[test]
fn unknown_service_type() {
    let registry = Registry::new();
    assert!(registry.manager("oracle").is_none());
    assert!(registry
        .manager_for_config(&tree(json!({"oracle": [{"version": "19c"}]})))
        .is_none());
}

#[test]
fn service_blocks_are_mutually_exclusive() {
    let registry = Registry::new();
    let shape = registry.resource_shape();

    let both = json!({
        "redis": [{"version": "7.0.11"}],
        "mysql": [{"vendor": "mysql", "version": "8.0"}],
        "data_volume": [{"size": 16}],
    });
    let mut diags = Diagnostics::default();
    shape.validate(&mut diags, both.as_object().unwrap(), AttributePath::default());
    assert!(!diags.errors.is_empty());

    let none = json!({"data_volume": [{"size": 16}]});
    let mut diags = Diagnostics::default();
    shape.validate(&mut diags, none.as_object().unwrap(), AttributePath::default());
    assert!(!diags.errors.is_empty());
}

#[test]
fn invalid_parameter_values_are_reported() {
    let registry = Registry::new();
    let shape = registry.resource_shape();
    let config = json!({
        "pgsql": [{
            "version": "9.6",
            "work_mem": 2048,
            "autovacuum_vacuum_cost_delay": 0,
        }],
        "data_volume": [{"size": 16}],
    });

    let mut diags = Diagnostics::default();
    shape.validate(&mut diags, config.as_object().unwrap(), AttributePath::default());
    assert_eq!(diags.errors.len(), 3);
}
