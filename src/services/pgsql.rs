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


//! PostgreSQL services.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::shape::{Field, Shape, Validation};
use crate::TfMap;

use super::fields::{from_bag, into_bag, put, put_bytes, put_or, Fields, Present};
use super::parameter_values::{
    POSTGRESQL_DATABASE_EXTENSIONS, POSTGRESQL_DATABASE_LOCALES,
    POSTGRESQL_MAX_PARALLEL_MAINTENANCE_WORKERS_DEFAULT, POSTGRESQL_WAL_KEEP_SEGMENTS_DEFAULT,
};
use super::units::{DimensionedValue, GIGABYTE, KILOBYTE, MEGABYTE};
use super::{
    DatabaseParameters, Overrides, ServiceClass, ServiceManager, ServiceParameters, ServiceType,
    UserParameters, NONE,
};

static OVERRIDES: Overrides = Overrides {
    service_parameters_shape: service_shape,
    user_parameters_shape: user_shape,
    database_parameters_shape: database_shape,
    expand_service_parameters: expand_service,
    expand_user_parameters: expand_user,
    expand_database_parameters: expand_database,
    flatten_service_parameters: flatten_service,
    flatten_user_parameters: flatten_user,
    flatten_database_parameters: flatten_database,
    ..NONE
};

pub(super) fn manager() -> ServiceManager {
    ServiceManager {
        service_type: ServiceType::PostgreSql,
        classes: &[ServiceClass::Database],
        default_class: ServiceClass::Database,
        allow_arbitrator: true,
        allow_backup: true,
        data_volume_required: true,
        users_enabled: true,
        databases_enabled: true,
        logging_enabled: true,
        monitoring_enabled: true,
        overrides: &OVERRIDES,
    }
}

/// `-1` or a value in `min..=max`.
fn unset_or_between(min: i64, max: i64) -> Validation {
    Validation::Any(vec![
        Validation::IntOneOf(&[-1]),
        Validation::IntBetween(min, max),
    ])
}

/// Memory size in bytes, a multiple of `unit`.
fn memory(default: i64, min: i64, max: i64, unit: i64) -> Field {
    Field::int()
        .force_new()
        .default(default)
        .validate(Validation::IntBetween(min, max))
        .validate(Validation::IntDivisibleBy(unit))
}

fn int_field(default: i64, min: i64, max: i64) -> Field {
    Field::int()
        .force_new()
        .default(default)
        .validate(Validation::IntBetween(min, max))
}

fn service_shape() -> Shape {
    Shape::new()
        .field(
            "autovacuum",
            Field::string()
                .force_new()
                .default("ON")
                .validate(Validation::one_of(&["ON", "OFF"])),
        )
        .field("autovacuum_max_workers", int_field(3, 1, 262143))
        .field(
            "autovacuum_vacuum_cost_delay",
            Field::int().force_new().validate(unset_or_between(1, 100)),
        )
        .field(
            "autovacuum_vacuum_cost_limit",
            Field::int()
                .force_new()
                .default(-1)
                .validate(unset_or_between(1, 10000)),
        )
        .field(
            "autovacuum_analyze_scale_factor",
            Field::float()
                .force_new()
                .default(0.1)
                .validate(Validation::FloatBetween(0.0, 100.0)),
        )
        .field(
            "autovacuum_vacuum_scale_factor",
            Field::float()
                .force_new()
                .default(0.2)
                .validate(Validation::FloatBetween(0.0, 100.0)),
        )
        .field("effective_cache_size", int_field(524288, 1, 2147483647))
        .field("effective_io_concurrency", int_field(1, 0, 1000))
        .field(
            "maintenance_work_mem",
            memory(64 * MEGABYTE, MEGABYTE, 2 * GIGABYTE, KILOBYTE),
        )
        .field("max_connections", int_field(100, 1, 262143))
        .field(
            "max_wal_size",
            memory(GIGABYTE, 2 * MEGABYTE, 2147483647 * MEGABYTE, MEGABYTE),
        )
        .field(
            "max_parallel_maintenance_workers",
            int_field(POSTGRESQL_MAX_PARALLEL_MAINTENANCE_WORKERS_DEFAULT, 0, 1024),
        )
        .field("max_parallel_workers", int_field(8, 0, 1024))
        .field("max_parallel_workers_per_gather", int_field(2, 0, 1024))
        .field("max_worker_processes", int_field(8, 0, 262143))
        .field(
            "min_wal_size",
            memory(80 * MEGABYTE, 32 * MEGABYTE, 2147483647 * MEGABYTE, MEGABYTE),
        )
        .field("options", Field::map().force_new())
        .field(
            "replication_mode",
            Field::string().force_new().validate(Validation::one_of(&[
                "asynchronous",
                "synchronous",
                "synchronous_strict",
            ])),
        )
        .field("shared_buffers", int_field(1024, 16, 1073741823))
        .field(
            "version",
            Field::string().required().force_new().validate(Validation::one_of(&[
                "10.21", "11.16", "12.11", "13.7", "14.4", "15.2",
            ])),
        )
        .field(
            "wal_keep_segments",
            int_field(POSTGRESQL_WAL_KEEP_SEGMENTS_DEFAULT, 0, 2147483647),
        )
        .field(
            "wal_buffers",
            Field::int()
                .force_new()
                .validate(Validation::IntBetween(8, 262143)),
        )
        .field(
            "work_mem",
            memory(4 * MEGABYTE, 64 * KILOBYTE, 2147483647 * KILOBYTE, KILOBYTE),
        )
}

fn user_shape() -> Shape {
    Shape::new().field(
        "password",
        Field::string()
            .required()
            .sensitive()
            .validate(Validation::LenBetween(8, 128))
            .validate(Validation::NotContainingAny("`'\"\\")),
    )
}

fn database_shape() -> Shape {
    Shape::new()
        .field("backup_id", Field::string())
        .field("backup_db_name", Field::string())
        .field("encoding", Field::string().default("UTF8"))
        .field(
            "extensions",
            Field::string_set().validate(Validation::one_of(POSTGRESQL_DATABASE_EXTENSIONS)),
        )
        .field(
            "locale",
            Field::string()
                .default("ru_RU.UTF-8")
                .validate(Validation::one_of(POSTGRESQL_DATABASE_LOCALES)),
        )
        .field("owner", Field::string().required())
}

/// PostgreSQL service parameters.
///
/// `max_parallel_maintenance_workers` and `wal_keep_segments` default to
/// `-1`, which is never sent and is restored when the API omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgreSqlParameters {
    pub autovacuum: Present<String>,
    #[serde(alias = "autovacuumMaxWorkers")]
    pub autovacuum_max_workers: Present<i64>,
    #[serde(alias = "autovacuumVacuumCostDelay")]
    pub autovacuum_vacuum_cost_delay: Present<i64>,
    #[serde(alias = "autovacuumVacuumCostLimit")]
    pub autovacuum_vacuum_cost_limit: Present<i64>,
    #[serde(alias = "autovacuumAnalyzeScaleFactor")]
    pub autovacuum_analyze_scale_factor: Present<f64>,
    #[serde(alias = "autovacuumVacuumScaleFactor")]
    pub autovacuum_vacuum_scale_factor: Present<f64>,
    #[serde(alias = "effectiveCacheSize")]
    pub effective_cache_size: Present<i64>,
    #[serde(alias = "effectiveIoConcurrency")]
    pub effective_io_concurrency: Present<i64>,
    #[serde(alias = "maintenanceWorkMem")]
    pub maintenance_work_mem: Present<DimensionedValue>,
    #[serde(alias = "maxConnections")]
    pub max_connections: Present<i64>,
    #[serde(alias = "maxWalSize")]
    pub max_wal_size: Present<DimensionedValue>,
    #[serde(alias = "maxParallelMaintenanceWorkers")]
    pub max_parallel_maintenance_workers: Present<i64>,
    #[serde(alias = "maxParallelWorkers")]
    pub max_parallel_workers: Present<i64>,
    #[serde(alias = "maxParallelWorkersPerGather")]
    pub max_parallel_workers_per_gather: Present<i64>,
    #[serde(alias = "maxWorkerProcesses")]
    pub max_worker_processes: Present<i64>,
    #[serde(alias = "minWalSize")]
    pub min_wal_size: Present<DimensionedValue>,
    pub options: Present<TfMap>,
    #[serde(alias = "replicationMode")]
    pub replication_mode: Present<String>,
    #[serde(alias = "sharedBuffers")]
    pub shared_buffers: Present<i64>,
    pub version: Present<String>,
    #[serde(alias = "walKeepSegments")]
    pub wal_keep_segments: Present<i64>,
    #[serde(alias = "walBuffers")]
    pub wal_buffers: Present<i64>,
    #[serde(alias = "workMem")]
    pub work_mem: Present<DimensionedValue>,
}

impl PostgreSqlParameters {
    pub fn expand(tree: &TfMap) -> Self {
        let f = Fields::new(tree);
        Self {
            autovacuum: f.non_empty_string("autovacuum").into(),
            autovacuum_max_workers: f.non_zero_int("autovacuum_max_workers").into(),
            autovacuum_vacuum_cost_delay: f.non_zero_int("autovacuum_vacuum_cost_delay").into(),
            autovacuum_vacuum_cost_limit: f.non_zero_int("autovacuum_vacuum_cost_limit").into(),
            autovacuum_analyze_scale_factor: f
                .non_zero_float("autovacuum_analyze_scale_factor")
                .into(),
            autovacuum_vacuum_scale_factor: f
                .non_zero_float("autovacuum_vacuum_scale_factor")
                .into(),
            effective_cache_size: f.non_zero_int("effective_cache_size").into(),
            effective_io_concurrency: f.int("effective_io_concurrency").into(),
            maintenance_work_mem: f.bytes("maintenance_work_mem").into(),
            max_connections: f.non_zero_int("max_connections").into(),
            max_wal_size: f.bytes("max_wal_size").into(),
            max_parallel_maintenance_workers: f
                .int_except(
                    "max_parallel_maintenance_workers",
                    POSTGRESQL_MAX_PARALLEL_MAINTENANCE_WORKERS_DEFAULT,
                )
                .into(),
            max_parallel_workers: f.int("max_parallel_workers").into(),
            max_parallel_workers_per_gather: f.int("max_parallel_workers_per_gather").into(),
            max_worker_processes: f.int("max_worker_processes").into(),
            min_wal_size: f.bytes("min_wal_size").into(),
            options: f.map("options").into(),
            replication_mode: f.non_empty_string("replication_mode").into(),
            shared_buffers: f.non_zero_int("shared_buffers").into(),
            version: f.non_empty_string("version").into(),
            wal_keep_segments: f
                .int_except("wal_keep_segments", POSTGRESQL_WAL_KEEP_SEGMENTS_DEFAULT)
                .into(),
            wal_buffers: f.non_zero_int("wal_buffers").into(),
            work_mem: f.bytes("work_mem").into(),
        }
    }

    pub fn flatten(&self) -> TfMap {
        let mut tree = TfMap::new();
        put(&mut tree, "autovacuum", &self.autovacuum);
        put(&mut tree, "autovacuum_max_workers", &self.autovacuum_max_workers);
        put(&mut tree, "autovacuum_vacuum_cost_delay", &self.autovacuum_vacuum_cost_delay);
        put(&mut tree, "autovacuum_vacuum_cost_limit", &self.autovacuum_vacuum_cost_limit);
        put(
            &mut tree,
            "autovacuum_analyze_scale_factor",
            &self.autovacuum_analyze_scale_factor,
        );
        put(
            &mut tree,
            "autovacuum_vacuum_scale_factor",
            &self.autovacuum_vacuum_scale_factor,
        );
        put(&mut tree, "effective_cache_size", &self.effective_cache_size);
        put(&mut tree, "effective_io_concurrency", &self.effective_io_concurrency);
        put_bytes(&mut tree, "maintenance_work_mem", &self.maintenance_work_mem);
        put(&mut tree, "max_connections", &self.max_connections);
        put_bytes(&mut tree, "max_wal_size", &self.max_wal_size);
        put_or(
            &mut tree,
            "max_parallel_maintenance_workers",
            &self.max_parallel_maintenance_workers,
            POSTGRESQL_MAX_PARALLEL_MAINTENANCE_WORKERS_DEFAULT,
        );
        put(&mut tree, "max_parallel_workers", &self.max_parallel_workers);
        put(
            &mut tree,
            "max_parallel_workers_per_gather",
            &self.max_parallel_workers_per_gather,
        );
        put(&mut tree, "max_worker_processes", &self.max_worker_processes);
        put_bytes(&mut tree, "min_wal_size", &self.min_wal_size);
        put(&mut tree, "options", &self.options);
        put(&mut tree, "replication_mode", &self.replication_mode);
        put(&mut tree, "shared_buffers", &self.shared_buffers);
        put(&mut tree, "version", &self.version);
        put_or(
            &mut tree,
            "wal_keep_segments",
            &self.wal_keep_segments,
            POSTGRESQL_WAL_KEEP_SEGMENTS_DEFAULT,
        );
        put(&mut tree, "wal_buffers", &self.wal_buffers);
        put_bytes(&mut tree, "work_mem", &self.work_mem);
        tree
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgreSqlUserParameters {
    pub password: Present<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgreSqlDatabaseParameters {
    #[serde(alias = "backupId")]
    pub backup_id: Present<String>,
    #[serde(alias = "backupDbName")]
    pub backup_db_name: Present<String>,
    pub encoding: Present<String>,
    pub extensions: Present<BTreeSet<String>>,
    pub locale: Present<String>,
    pub owner: Present<String>,
}

fn expand_service(tree: &TfMap) -> ServiceParameters {
    into_bag(&PostgreSqlParameters::expand(tree))
}

fn flatten_service(parameters: &ServiceParameters) -> TfMap {
    from_bag::<PostgreSqlParameters>(parameters).flatten()
}

fn expand_user(tree: &TfMap) -> UserParameters {
    into_bag(&PostgreSqlUserParameters {
        password: Fields::new(tree).non_empty_string("password").into(),
    })
}

fn flatten_user(parameters: &UserParameters) -> TfMap {
    let user: PostgreSqlUserParameters = from_bag(parameters);
    let mut tree = TfMap::new();
    put(&mut tree, "password", &user.password);
    tree
}

fn expand_database(tree: &TfMap) -> DatabaseParameters {
    let f = Fields::new(tree);
    into_bag(&PostgreSqlDatabaseParameters {
        backup_id: f.non_empty_string("backup_id").into(),
        backup_db_name: f.non_empty_string("backup_db_name").into(),
        encoding: f.non_empty_string("encoding").into(),
        extensions: f.string_set("extensions").into(),
        locale: f.non_empty_string("locale").into(),
        owner: f.non_empty_string("owner").into(),
    })
}

fn flatten_database(parameters: &DatabaseParameters) -> TfMap {
    let database: PostgreSqlDatabaseParameters = from_bag(parameters);
    let mut tree = TfMap::new();
    put(&mut tree, "backup_id", &database.backup_id);
    put(&mut tree, "backup_db_name", &database.backup_db_name);
    put(&mut tree, "encoding", &database.encoding);
    put(&mut tree, "extensions", &database.extensions);
    put(&mut tree, "locale", &database.locale);
    put(&mut tree, "owner", &database.owner);
    tree
}
