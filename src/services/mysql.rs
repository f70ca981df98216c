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

//! MySQL-compatible services (MySQL, MariaDB, Percona XtraDB).
//!
//! Sizes are configured in bytes and sent as `{dimension: "B", value}`.
//! `gcs_fc_factor`, `innodb_thread_concurrency` and `thread_cache_size` use
//! `-1` as "not set".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::shape::{Field, Shape, Validation};
use crate::TfMap;

use super::fields::{from_bag, into_bag, put, put_bytes, put_nullable_bool, put_or, Fields, Present};
use super::parameter_values::{
    MYSQL_DATABASE_USER_PRIVILEGES, MYSQL_GCS_FC_FACTOR_DEFAULT,
    MYSQL_INNODB_THREAD_CONCURRENCY_DEFAULT, MYSQL_THREAD_CACHE_SIZE_DEFAULT,
};
use super::units::{DimensionedValue, GIGABYTE, KILOBYTE, MEGABYTE};
use super::{
    DatabaseParameters, DatabaseUserParameters, Overrides, ServiceClass, ServiceManager,
    ServiceParameters, ServiceType, UserParameters,
};

const MAX_INT: i64 = (1 << 62) - 1;

static OVERRIDES: Overrides = Overrides {
    service_parameters_shape: service_shape,
    user_parameters_shape: user_shape,
    database_parameters_shape: database_shape,
    database_user_parameters_shape: database_user_shape,
    expand_service_parameters: expand_service,
    expand_user_parameters: expand_user,
    expand_database_parameters: expand_database,
    expand_database_user_parameters: expand_database_user,
    flatten_service_parameters: flatten_service,
    flatten_user_parameters: flatten_user,
    flatten_database_parameters: flatten_database,
    flatten_database_user_parameters: flatten_database_user,
};

pub(super) fn manager() -> ServiceManager {
    ServiceManager {
        service_type: ServiceType::MySql,
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

fn int_between(default: Option<i64>, min: i64, max: i64) -> Field {
    let field = Field::int()
        .force_new()
        .validate(Validation::IntBetween(min, max));
    match default {
        Some(default) => field.default(default),
        None => field,
    }
}

fn service_shape() -> Shape {
    Shape::new()
        .field("connect_timeout", int_between(Some(10), 2, 31536000))
        .field("galera_options", Field::map().force_new())
        .field(
            "gcache_size",
            Field::int()
                .force_new()
                .validate(Validation::IntAtLeast(128 * MEGABYTE)),
        )
        .field(
            "gcs_fc_factor",
            Field::float()
                .force_new()
                .default(MYSQL_GCS_FC_FACTOR_DEFAULT)
                .validate(Validation::FloatBetween(0.0, 1.0)),
        )
        .field("gcs_fc_limit", int_between(None, 1, 2147483647))
        .field("gcs_fc_master_slave", Field::nullable_bool().force_new())
        .field("gcs_fc_single_primary", Field::nullable_bool().force_new())
        .field("innodb_buffer_pool_instances", int_between(None, 1, 64))
        .field(
            "innodb_buffer_pool_size",
            int_between(Some(128 * MEGABYTE), 5 * MEGABYTE, MAX_INT),
        )
        .field(
            "innodb_change_buffering",
            Field::string().force_new().validate(Validation::one_of(&[
                "inserts", "deletes", "changes", "purges", "all", "none",
            ])),
        )
        .field("innodb_flush_log_at_trx_commit", int_between(Some(1), 0, 2))
        .field("innodb_io_capacity", int_between(Some(200), 100, MAX_INT))
        .field("innodb_io_capacity_max", int_between(None, 100, MAX_INT))
        .field(
            "innodb_log_file_size",
            int_between(None, 4 * MEGABYTE, 512 * GIGABYTE),
        )
        .field("innodb_log_files_in_group", int_between(Some(2), 2, 100))
        .field("innodb_purge_threads", int_between(Some(4), 1, 32))
        .field(
            "innodb_thread_concurrency",
            Field::int()
                .force_new()
                .default(MYSQL_INNODB_THREAD_CONCURRENCY_DEFAULT)
                .validate(Validation::IntBetween(0, 1000)),
        )
        .field(
            "innodb_strict_mode",
            Field::string()
                .force_new()
                .default("OFF")
                .validate(Validation::one_of(&["ON", "OFF"])),
        )
        .field("innodb_sync_array_size", int_between(None, 1, 1024))
        .field(
            "max_allowed_packet",
            int_between(Some(16 * MEGABYTE), 16 * MEGABYTE, GIGABYTE),
        )
        .field("max_connect_errors", int_between(Some(100), 1, MAX_INT))
        .field("max_connections", int_between(Some(151), 1, 100000))
        .field(
            "max_heap_table_size",
            int_between(Some(16 * MEGABYTE), 16 * KILOBYTE, 4294966272),
        )
        .field("options", Field::map().force_new())
        .field(
            "pxc_strict_mode",
            Field::string().force_new().validate(Validation::one_of(&[
                "DISABLED",
                "PERMISSIVE",
                "ENFORCING",
                "MASTER",
            ])),
        )
        .field("table_open_cache", int_between(None, 1, 1048576))
        .field(
            "thread_cache_size",
            Field::int()
                .force_new()
                .default(MYSQL_THREAD_CACHE_SIZE_DEFAULT)
                .validate(Validation::IntBetween(0, 16384)),
        )
        .field(
            "tmp_table_size",
            int_between(Some(16 * MEGABYTE), KILOBYTE, 4294967295),
        )
        .field(
            "transaction_isolation",
            Field::string()
                .force_new()
                .default("REPEATABLE-READ")
                .validate(Validation::one_of(&[
                    "READ-UNCOMMITTED",
                    "READ-COMMITTED",
                    "REPEATABLE-READ",
                    "SERIALIZABLE",
                ])),
        )
        .field(
            "vendor",
            Field::string()
                .required()
                .force_new()
                .validate(Validation::one_of(&["mariadb", "percona", "mysql"])),
        )
        .field("version", Field::string().required().force_new())
        .field("wait_timeout", int_between(Some(28800), 1, 31536000))
}

fn user_shape() -> Shape {
    Shape::new()
        .field("host", Field::string().validate(Validation::LenBetween(1, 60)))
        .field(
            "password",
            Field::string()
                .required()
                .sensitive()
                .validate(Validation::NotContainingAny("`'\"\\")),
        )
}

fn database_shape() -> Shape {
    Shape::new()
        .field("backup_id", Field::string())
        .field("backup_db_name", Field::string())
        .field("charset", Field::string().default("utf8"))
        .field("collate", Field::string().default("utf8_unicode_ci"))
}

fn database_user_shape() -> Shape {
    Shape::new()
        .field(
            "options",
            Field::string_set()
                .force_new()
                .validate(Validation::one_of(&["GRANT", "NONE"])),
        )
        .field(
            "privileges",
            Field::string_set().validate(Validation::one_of(MYSQL_DATABASE_USER_PRIVILEGES)),
        )
}

/// MySQL service parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MySqlParameters {
    #[serde(alias = "connectTimeout")]
    pub connect_timeout: Present<i64>,
    #[serde(alias = "galeraOptions")]
    pub galera_options: Present<TfMap>,
    #[serde(alias = "gcacheSize")]
    pub gcache_size: Present<DimensionedValue>,
    #[serde(alias = "gcsFcFactor")]
    pub gcs_fc_factor: Present<f64>,
    #[serde(alias = "gcsFcLimit")]
    pub gcs_fc_limit: Present<i64>,
    #[serde(alias = "gcsFcMasterSlave")]
    pub gcs_fc_master_slave: Present<bool>,
    #[serde(alias = "gcsFcSinglePrimary")]
    pub gcs_fc_single_primary: Present<bool>,
    #[serde(alias = "innodbBufferPoolInstances")]
    pub innodb_buffer_pool_instances: Present<i64>,
    #[serde(alias = "innodbBufferPoolSize")]
    pub innodb_buffer_pool_size: Present<DimensionedValue>,
    #[serde(alias = "innodbChangeBuffering")]
    pub innodb_change_buffering: Present<String>,
    /// `0` is a valid flush policy and is always sent.
    #[serde(alias = "innodbFlushLogAtTrxCommit")]
    pub innodb_flush_log_at_trx_commit: Present<i64>,
    #[serde(alias = "innodbIoCapacity")]
    pub innodb_io_capacity: Present<i64>,
    #[serde(alias = "innodbIoCapacityMax")]
    pub innodb_io_capacity_max: Present<i64>,
    #[serde(alias = "innodbLogFileSize")]
    pub innodb_log_file_size: Present<DimensionedValue>,
    #[serde(alias = "innodbLogFilesInGroup")]
    pub innodb_log_files_in_group: Present<i64>,
    #[serde(alias = "innodbPurgeThreads")]
    pub innodb_purge_threads: Present<i64>,
    #[serde(alias = "innodbThreadConcurrency")]
    pub innodb_thread_concurrency: Present<i64>,
    #[serde(alias = "innodbStrictMode")]
    pub innodb_strict_mode: Present<String>,
    #[serde(alias = "innodbSyncArraySize")]
    pub innodb_sync_array_size: Present<i64>,
    #[serde(alias = "maxAllowedPacket")]
    pub max_allowed_packet: Present<DimensionedValue>,
    #[serde(alias = "maxConnectErrors")]
    pub max_connect_errors: Present<i64>,
    #[serde(alias = "maxConnections")]
    pub max_connections: Present<i64>,
    #[serde(alias = "maxHeapTableSize")]
    pub max_heap_table_size: Present<DimensionedValue>,
    pub options: Present<TfMap>,
    #[serde(alias = "pxcStrictMode")]
    pub pxc_strict_mode: Present<String>,
    #[serde(alias = "tableOpenCache")]
    pub table_open_cache: Present<i64>,
    #[serde(alias = "threadCacheSize")]
    pub thread_cache_size: Present<i64>,
    #[serde(alias = "tmpTableSize")]
    pub tmp_table_size: Present<DimensionedValue>,
    #[serde(alias = "transactionIsolation")]
    pub transaction_isolation: Present<String>,
    pub vendor: Present<String>,
    pub version: Present<String>,
    #[serde(alias = "waitTimeout")]
    pub wait_timeout: Present<i64>,
}

impl MySqlParameters {
    pub fn expand(tree: &TfMap) -> Self {
        let f = Fields::new(tree);
        Self {
            connect_timeout: f.non_zero_int("connect_timeout").into(),
            galera_options: f.map("galera_options").into(),
            gcache_size: f.bytes("gcache_size").into(),
            gcs_fc_factor: f
                .float_except("gcs_fc_factor", MYSQL_GCS_FC_FACTOR_DEFAULT)
                .into(),
            gcs_fc_limit: f.non_zero_int("gcs_fc_limit").into(),
            gcs_fc_master_slave: f.nullable_bool("gcs_fc_master_slave").into(),
            gcs_fc_single_primary: f.nullable_bool("gcs_fc_single_primary").into(),
            innodb_buffer_pool_instances: f.non_zero_int("innodb_buffer_pool_instances").into(),
            innodb_buffer_pool_size: f.bytes("innodb_buffer_pool_size").into(),
            innodb_change_buffering: f.non_empty_string("innodb_change_buffering").into(),
            innodb_flush_log_at_trx_commit: f.int("innodb_flush_log_at_trx_commit").into(),
            innodb_io_capacity: f.non_zero_int("innodb_io_capacity").into(),
            innodb_io_capacity_max: f.non_zero_int("innodb_io_capacity_max").into(),
            innodb_log_file_size: f.bytes("innodb_log_file_size").into(),
            innodb_log_files_in_group: f.non_zero_int("innodb_log_files_in_group").into(),
            innodb_purge_threads: f.non_zero_int("innodb_purge_threads").into(),
            innodb_thread_concurrency: f
                .int_except("innodb_thread_concurrency", MYSQL_INNODB_THREAD_CONCURRENCY_DEFAULT)
                .into(),
            innodb_strict_mode: f.non_empty_string("innodb_strict_mode").into(),
            innodb_sync_array_size: f.non_zero_int("innodb_sync_array_size").into(),
            max_allowed_packet: f.bytes("max_allowed_packet").into(),
            max_connect_errors: f.non_zero_int("max_connect_errors").into(),
            max_connections: f.non_zero_int("max_connections").into(),
            max_heap_table_size: f.bytes("max_heap_table_size").into(),
            options: f.map("options").into(),
            pxc_strict_mode: f.non_empty_string("pxc_strict_mode").into(),
            table_open_cache: f.non_zero_int("table_open_cache").into(),
            thread_cache_size: f
                .int_except("thread_cache_size", MYSQL_THREAD_CACHE_SIZE_DEFAULT)
                .into(),
            tmp_table_size: f.bytes("tmp_table_size").into(),
            transaction_isolation: f.non_empty_string("transaction_isolation").into(),
            vendor: f.non_empty_string("vendor").into(),
            version: f.non_empty_string("version").into(),
            wait_timeout: f.non_zero_int("wait_timeout").into(),
        }
    }

    pub fn flatten(&self) -> TfMap {
        let mut tree = TfMap::new();
        put(&mut tree, "connect_timeout", &self.connect_timeout);
        put(&mut tree, "galera_options", &self.galera_options);
        put_bytes(&mut tree, "gcache_size", &self.gcache_size);
        put_or(&mut tree, "gcs_fc_factor", &self.gcs_fc_factor, MYSQL_GCS_FC_FACTOR_DEFAULT);
        put(&mut tree, "gcs_fc_limit", &self.gcs_fc_limit);
        put_nullable_bool(&mut tree, "gcs_fc_master_slave", &self.gcs_fc_master_slave);
        put_nullable_bool(&mut tree, "gcs_fc_single_primary", &self.gcs_fc_single_primary);
        put(&mut tree, "innodb_buffer_pool_instances", &self.innodb_buffer_pool_instances);
        put_bytes(&mut tree, "innodb_buffer_pool_size", &self.innodb_buffer_pool_size);
        put(&mut tree, "innodb_change_buffering", &self.innodb_change_buffering);
        put(&mut tree, "innodb_flush_log_at_trx_commit", &self.innodb_flush_log_at_trx_commit);
        put(&mut tree, "innodb_io_capacity", &self.innodb_io_capacity);
        put(&mut tree, "innodb_io_capacity_max", &self.innodb_io_capacity_max);
        put_bytes(&mut tree, "innodb_log_file_size", &self.innodb_log_file_size);
        put(&mut tree, "innodb_log_files_in_group", &self.innodb_log_files_in_group);
        put(&mut tree, "innodb_purge_threads", &self.innodb_purge_threads);
        put_or(
            &mut tree,
            "innodb_thread_concurrency",
            &self.innodb_thread_concurrency,
            MYSQL_INNODB_THREAD_CONCURRENCY_DEFAULT,
        );
        put(&mut tree, "innodb_strict_mode", &self.innodb_strict_mode);
        put(&mut tree, "innodb_sync_array_size", &self.innodb_sync_array_size);
        put_bytes(&mut tree, "max_allowed_packet", &self.max_allowed_packet);
        put(&mut tree, "max_connect_errors", &self.max_connect_errors);
        put(&mut tree, "max_connections", &self.max_connections);
        put_bytes(&mut tree, "max_heap_table_size", &self.max_heap_table_size);
        put(&mut tree, "options", &self.options);
        put(&mut tree, "pxc_strict_mode", &self.pxc_strict_mode);
        put(&mut tree, "table_open_cache", &self.table_open_cache);
        put_or(
            &mut tree,
            "thread_cache_size",
            &self.thread_cache_size,
            MYSQL_THREAD_CACHE_SIZE_DEFAULT,
        );
        put_bytes(&mut tree, "tmp_table_size", &self.tmp_table_size);
        put(&mut tree, "transaction_isolation", &self.transaction_isolation);
        put(&mut tree, "vendor", &self.vendor);
        put(&mut tree, "version", &self.version);
        put(&mut tree, "wait_timeout", &self.wait_timeout);
        tree
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MySqlUserParameters {
    pub host: Present<String>,
    pub password: Present<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MySqlDatabaseParameters {
    #[serde(alias = "backupId")]
    pub backup_id: Present<String>,
    #[serde(alias = "backupDbName")]
    pub backup_db_name: Present<String>,
    pub charset: Present<String>,
    pub collate: Present<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MySqlDatabaseUserParameters {
    pub options: Present<BTreeSet<String>>,
    pub privileges: Present<BTreeSet<String>>,
}

fn expand_service(tree: &TfMap) -> ServiceParameters {
    into_bag(&MySqlParameters::expand(tree))
}

fn flatten_service(parameters: &ServiceParameters) -> TfMap {
    from_bag::<MySqlParameters>(parameters).flatten()
}

fn expand_user(tree: &TfMap) -> UserParameters {
    let f = Fields::new(tree);
    into_bag(&MySqlUserParameters {
        host: f.non_empty_string("host").into(),
        password: f.non_empty_string("password").into(),
    })
}

fn flatten_user(parameters: &UserParameters) -> TfMap {
    let user: MySqlUserParameters = from_bag(parameters);
    let mut tree = TfMap::new();
    put(&mut tree, "host", &user.host);
    put(&mut tree, "password", &user.password);
    tree
}

fn expand_database(tree: &TfMap) -> DatabaseParameters {
    let f = Fields::new(tree);
    into_bag(&MySqlDatabaseParameters {
        backup_id: f.non_empty_string("backup_id").into(),
        backup_db_name: f.non_empty_string("backup_db_name").into(),
        charset: f.non_empty_string("charset").into(),
        collate: f.non_empty_string("collate").into(),
    })
}

fn flatten_database(parameters: &DatabaseParameters) -> TfMap {
    let database: MySqlDatabaseParameters = from_bag(parameters);
    let mut tree = TfMap::new();
    put(&mut tree, "backup_id", &database.backup_id);
    put(&mut tree, "backup_db_name", &database.backup_db_name);
    put(&mut tree, "charset", &database.charset);
    put(&mut tree, "collate", &database.collate);
    tree
}

fn expand_database_user(tree: &TfMap) -> DatabaseUserParameters {
    let f = Fields::new(tree);
    into_bag(&MySqlDatabaseUserParameters {
        options: f.string_set("options").into(),
        privileges: f.string_set("privileges").into(),
    })
}

fn flatten_database_user(parameters: &DatabaseUserParameters) -> TfMap {
    let user: MySqlDatabaseUserParameters = from_bag(parameters);
    let mut tree = TfMap::new();
    put(&mut tree, "options", &user.options);
    put(&mut tree, "privileges", &user.privileges);
    tree
}
