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

//! Memcached has no logging block and a plain `monitoring` flag instead of
//! the monitoring block of other services.

use serde::{Deserialize, Serialize};

use crate::shape::{Field, Shape};
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
        service_type: ServiceType::Memcached,
        classes: &[ServiceClass::Cacher],
        default_class: ServiceClass::Cacher,
        allow_arbitrator: false,
        allow_backup: false,
        data_volume_required: true,
        users_enabled: false,
        databases_enabled: false,
        logging_enabled: false,
        monitoring_enabled: false,
        overrides: &OVERRIDES,
    }
}

fn service_shape() -> Shape {
    Shape::new().field("monitoring", Field::bool().force_new().default(false))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemcachedParameters {
    pub monitoring: Present<bool>,
}

impl MemcachedParameters {
    pub fn expand(tree: &TfMap) -> Self {
        Self {
            monitoring: Fields::new(tree).bool("monitoring").into(),
        }
    }

    pub fn flatten(&self) -> TfMap {
        let mut tree = TfMap::new();
        put(&mut tree, "monitoring", &self.monitoring);
        tree
    }
}

fn expand_service(tree: &TfMap) -> ServiceParameters {
    into_bag(&MemcachedParameters::expand(tree))
}

fn flatten_service(parameters: &ServiceParameters) -> TfMap {
    from_bag::<MemcachedParameters>(parameters).flatten()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn only_monitoring_flag_is_sent() {
        let manager = manager();
        let tree = json!({"monitoring": true, "logging": [{"log_to": "x"}]});

        assert_eq!(
            Value::Object(manager.expand_service_parameters(tree.as_object().unwrap())),
            json!({"monitoring": true})
        );
        assert_eq!(
            Value::Object(manager.expand_service_parameters(&TfMap::new())),
            json!({})
        );
    }

    #[test]
    fn flatten_plain_flag() {
        let manager = manager();
        let tree = manager.flatten_service_parameters_users_databases(
            json!({"monitoring": false}).as_object().unwrap(),
            &[],
            &[],
        );
        assert_eq!(Value::Object(tree), json!({"monitoring": false}));
    }
}
