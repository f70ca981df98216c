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

use serde::{Deserialize, Serialize};

use crate::shape::{Field, Shape, Validation};
use crate::TfMap;

use super::fields::{from_bag, into_bag, put, Fields, Present};
use super::units::DimensionedValue;
use super::{
    DatabaseUserParameters, Overrides, ServiceClass, ServiceManager, ServiceParameters,
    ServiceType, UserParameters, NONE,
};

static OVERRIDES: Overrides = Overrides {
    service_parameters_shape: service_shape,
    user_parameters_shape: user_shape,
    database_user_parameters_shape: database_user_shape,
    expand_service_parameters: expand_service,
    expand_user_parameters: expand_user,
    expand_database_user_parameters: expand_database_user,
    flatten_service_parameters: flatten_service,
    flatten_user_parameters: flatten_user,
    flatten_database_user_parameters: flatten_database_user,
    ..NONE
};

pub(super) fn manager() -> ServiceManager {
    ServiceManager {
        service_type: ServiceType::MongoDb,
        classes: &[ServiceClass::Database],
        default_class: ServiceClass::Database,
        allow_arbitrator: true,
        allow_backup: false,
        data_volume_required: true,
        users_enabled: true,
        databases_enabled: true,
        logging_enabled: true,
        monitoring_enabled: true,
        overrides: &OVERRIDES,
    }
}

fn service_shape() -> Shape {
    Shape::new()
        .field(
            "journal_commit_interval",
            Field::int()
                .force_new()
                .default(100)
                .validate(Validation::IntBetween(1, 500)),
        )
        .field(
            "maxconns",
            Field::int()
                .force_new()
                .default(51200)
                .validate(Validation::IntBetween(10, 51200)),
        )
        .field("options", Field::map().force_new())
        .field(
            "profile",
            Field::string()
                .force_new()
                .default("slowOp")
                .validate(Validation::one_of(&["off", "slowOp", "all"])),
        )
        .field(
            "slowms",
            Field::int()
                .force_new()
                .default(100)
                .validate(Validation::IntBetween(0, 36000000)),
        )
        .field(
            "storage_engine_cache_size",
            Field::float()
                .force_new()
                .validate(Validation::FloatAtLeast(0.25)),
        )
        .field("quiet", Field::bool().force_new().default(false))
        .field(
            "verbositylevel",
            Field::string()
                .force_new()
                .validate(Validation::one_of(&["v", "vv", "vvv", "vvvv", "vvvvv"])),
        )
        .field(
            "version",
            Field::string().required().force_new().validate(Validation::one_of(&[
                "3.6.23", "4.0.28", "4.2.23", "4.4.17", "5.0.13",
            ])),
        )
}

fn user_shape() -> Shape {
    Shape::new().field(
        "password",
        Field::string()
            .required()
            .sensitive()
            .validate(Validation::NotContainingAny("`'\"\\")),
    )
}

fn database_user_shape() -> Shape {
    Shape::new().field(
        "roles",
        Field::string_set().validate(Validation::one_of(&["read", "readWrite", "dbAdmin", "dbOwner"])),
    )
}

/// MongoDB service parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoDbParameters {
    #[serde(alias = "journalCommitInterval")]
    pub journal_commit_interval: Present<i64>,
    pub maxconns: Present<i64>,
    pub options: Present<TfMap>,
    pub profile: Present<String>,
    pub slowms: Present<i64>,
    /// Sent in GiB.
    #[serde(alias = "storageEngineCacheSize")]
    pub storage_engine_cache_size: Present<DimensionedValue>,
    /// The API calls `verbose` what is configured as `quiet`.
    pub verbose: Present<bool>,
    pub verbositylevel: Present<String>,
    pub version: Present<String>,
}

impl MongoDbParameters {
    pub fn expand(tree: &TfMap) -> Self {
        let fields = Fields::new(tree);
        Self {
            journal_commit_interval: fields.non_zero_int("journal_commit_interval").into(),
            maxconns: fields.non_zero_int("maxconns").into(),
            options: fields.map("options").into(),
            profile: fields.non_empty_string("profile").into(),
            slowms: fields.int("slowms").into(),
            storage_engine_cache_size: fields
                .non_zero_float("storage_engine_cache_size")
                .map(DimensionedValue::gibibytes)
                .into(),
            verbose: fields.bool("quiet").into(),
            verbositylevel: fields.non_empty_string("verbositylevel").into(),
            version: fields.non_empty_string("version").into(),
        }
    }

    pub fn flatten(&self) -> TfMap {
        let mut tree = TfMap::new();
        put(&mut tree, "journal_commit_interval", &self.journal_commit_interval);
        put(&mut tree, "maxconns", &self.maxconns);
        put(&mut tree, "options", &self.options);
        put(&mut tree, "profile", &self.profile);
        put(&mut tree, "slowms", &self.slowms);
        if let Some(size) = self
            .storage_engine_cache_size
            .as_ref()
            .and_then(DimensionedValue::to_gibibytes)
        {
            tree.insert("storage_engine_cache_size".to_string(), size.into());
        }
        put(&mut tree, "quiet", &self.verbose);
        put(&mut tree, "verbositylevel", &self.verbositylevel);
        put(&mut tree, "version", &self.version);
        tree
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoDbUserParameters {
    pub password: Present<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoDbDatabaseUserParameters {
    pub roles: Present<BTreeSet<String>>,
}

fn expand_service(tree: &TfMap) -> ServiceParameters {
    into_bag(&MongoDbParameters::expand(tree))
}

fn flatten_service(parameters: &ServiceParameters) -> TfMap {
    from_bag::<MongoDbParameters>(parameters).flatten()
}

fn expand_user(tree: &TfMap) -> UserParameters {
    into_bag(&MongoDbUserParameters {
        password: Fields::new(tree).non_empty_string("password").into(),
    })
}

fn flatten_user(parameters: &UserParameters) -> TfMap {
    let user: MongoDbUserParameters = from_bag(parameters);
    let mut tree = TfMap::new();
    put(&mut tree, "password", &user.password);
    tree
}

fn expand_database_user(tree: &TfMap) -> DatabaseUserParameters {
    into_bag(&MongoDbDatabaseUserParameters {
        roles: Fields::new(tree).string_set("roles").into(),
    })
}

fn flatten_database_user(parameters: &DatabaseUserParameters) -> TfMap {
    let user: MongoDbDatabaseUserParameters = from_bag(parameters);
    let mut tree = TfMap::new();
    put(&mut tree, "roles", &user.roles);
    tree
}
