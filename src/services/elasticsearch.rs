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

const VERSIONS: &[&str] = &[
    "7.11.2", "7.12.1", "7.13.1", "7.14.2", "7.15.2", "7.16.3", "7.17.4", "8.0.1", "8.1.3",
    "8.2.2",
];

static OVERRIDES: Overrides = Overrides {
    service_parameters_shape: service_shape,
    expand_service_parameters: expand_service,
    flatten_service_parameters: flatten_service,
    ..NONE
};

pub(super) fn manager() -> ServiceManager {
    ServiceManager {
        service_type: ServiceType::ElasticSearch,
        classes: &[ServiceClass::Search],
        default_class: ServiceClass::Search,
        allow_arbitrator: true,
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
        .field("kibana", Field::bool().force_new().default(false))
        .field("options", Field::map().force_new())
        .field(
            "password",
            Field::string()
                .sensitive()
                .force_new()
                .validate(Validation::LenBetween(7, 129))
                .validate(Validation::NotContainingAny("^-!:;%'`\"\\")),
        )
        .field(
            "version",
            Field::string()
                .required()
                .force_new()
                .validate(Validation::one_of(VERSIONS)),
        )
}

/// Elasticsearch service parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticSearchParameters {
    pub kibana: Present<bool>,
    pub options: Present<TfMap>,
    pub password: Present<String>,
    pub version: Present<String>,
}

impl ElasticSearchParameters {
    pub fn expand(tree: &TfMap) -> Self {
        let fields = Fields::new(tree);
        Self {
            kibana: fields.bool("kibana").into(),
            options: fields.map("options").into(),
            password: fields.non_empty_string("password").into(),
            version: fields.string("version").into(),
        }
    }

    pub fn flatten(&self) -> TfMap {
        let mut tree = TfMap::new();
        put(&mut tree, "kibana", &self.kibana);
        put(&mut tree, "options", &self.options);
        put(&mut tree, "password", &self.password);
        put(&mut tree, "version", &self.version);
        tree
    }
}

fn expand_service(tree: &TfMap) -> ServiceParameters {
    into_bag(&ElasticSearchParameters::expand(tree))
}

fn flatten_service(parameters: &ServiceParameters) -> TfMap {
    from_bag::<ElasticSearchParameters>(parameters).flatten()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn expand_sends_version_and_kibana() {
        let tree = json!({"kibana": false, "password": "", "version": ""});
        assert_eq!(
            Value::Object(expand_service(tree.as_object().unwrap())),
            json!({"kibana": false, "version": ""})
        );
    }

    #[test]
    fn flatten_round_trip() {
        let tree = json!({
            "kibana": true,
            "options": {"indices.query.bool.max_clause_count": "2048"},
            "password": "s3cr3t-pass",
            "version": "8.2.2",
        });
        let tree = tree.as_object().unwrap();
        assert_eq!(&flatten_service(&expand_service(tree)), tree);
    }

    #[test]
    fn password_rejects_forbidden_characters() {
        let shape = service_shape();
        let password = shape.get("password").unwrap();
        assert!(password
            .validations
            .iter()
            .any(|v| v.check("password", &json!("with:colon")).is_err()));
        assert!(password
            .validations
            .iter()
            .all(|v| v.check("password", &json!("plainpass")).is_ok()));
    }
}
