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

static OVERRIDES: Overrides = Overrides {
    service_parameters_shape: service_shape,
    expand_service_parameters: expand_service,
    flatten_service_parameters: flatten_service,
    ..NONE
};

pub(super) fn manager() -> ServiceManager {
    ServiceManager {
        service_type: ServiceType::RabbitMq,
        classes: &[ServiceClass::MessageBroker],
        default_class: ServiceClass::MessageBroker,
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
        .field("options", Field::map().force_new())
        .field(
            "password",
            Field::string()
                .required()
                .sensitive()
                .force_new()
                .validate(Validation::LenBetween(8, 128))
                .validate(Validation::NotContainingAny("`'\"\\")),
        )
        .field(
            "version",
            Field::string()
                .required()
                .force_new()
                .validate(Validation::one_of(&["3.8.30", "3.9.16", "3.10.0"])),
        )
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RabbitMqParameters {
    pub options: Present<TfMap>,
    pub password: Present<String>,
    pub version: Present<String>,
}

impl RabbitMqParameters {
    pub fn expand(tree: &TfMap) -> Self {
        let fields = Fields::new(tree);
        Self {
            options: fields.map("options").into(),
            password: fields.non_empty_string("password").into(),
            version: fields.string("version").into(),
        }
    }

    pub fn flatten(&self) -> TfMap {
        let mut tree = TfMap::new();
        put(&mut tree, "options", &self.options);
        put(&mut tree, "password", &self.password);
        put(&mut tree, "version", &self.version);
        tree
    }
}

fn expand_service(tree: &TfMap) -> ServiceParameters {
    into_bag(&RabbitMqParameters::expand(tree))
}

fn flatten_service(parameters: &ServiceParameters) -> TfMap {
    from_bag::<RabbitMqParameters>(parameters).flatten()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn empty_options_are_omitted() {
        let tree = json!({"options": {}, "password": "guest-pass", "version": "3.10.0"});
        assert_eq!(
            Value::Object(expand_service(tree.as_object().unwrap())),
            json!({"password": "guest-pass", "version": "3.10.0"})
        );
    }

    #[test]
    fn flatten_ignores_unknown_fields() {
        let response = json!({
            "version": "3.9.16",
            "options": {"vm_memory_high_watermark": "0.6"},
            "logging": false,
            "clusterSize": 3,
        });
        assert_eq!(
            Value::Object(flatten_service(response.as_object().unwrap())),
            json!({"version": "3.9.16", "options": {"vm_memory_high_watermark": "0.6"}})
        );
    }
}
