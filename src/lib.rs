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

//! Reconciliation core of the PaaS service resource.
//!
//! Two pieces live here:
//! - [`services`]: the per-service-type managers that expand declarative
//!   configuration trees into API parameter bags, flatten API responses back,
//!   and describe the nested configuration [`shape`].
//! - [`paas`] and [`state_change`]: the polling machinery that drives a
//!   service through its intermediate statuses until the create, update or
//!   delete operation settles.

pub mod config;
pub mod paas;
pub mod services;
pub mod shape;
pub mod state_change;

mod utils;

/// Declarative configuration tree of a single block, as handed over by the host framework.
pub type TfMap = serde_json::Map<String, serde_json::Value>;
