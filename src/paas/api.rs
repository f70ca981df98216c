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

use std::fmt::Display;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::{DatabaseParameters, ServiceParameters, UserParameters};

use super::{SERVICE_NOT_FOUND_CODE, SERVICE_STATUS_ERROR};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub parameters: UserParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserCreateRequest>,
    pub parameters: DatabaseParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserResponse {
    pub id: Option<String>,
    pub name: Option<String>,
    pub parameters: UserParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseResponse {
    pub backup_enabled: Option<bool>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub users: Option<Vec<UserResponse>>,
    pub parameters: DatabaseParameters,
}

/// PaaS service as described by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: String,
    pub name: Option<String>,
    pub service_type: String,
    pub service_class: Option<String>,
    pub status: String,
    pub is_rolled_back: bool,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    pub parameters: ServiceParameters,
    pub users: Vec<UserResponse>,
    pub databases: Vec<DatabaseResponse>,
}

impl Service {
    /// Error reported by the API, only set while the service is in `ERROR` status.
    pub fn remote_error(&self) -> Option<RemoteError> {
        if self.status != SERVICE_STATUS_ERROR {
            return None;
        }
        Some(RemoteError {
            code: self.error_code.clone().unwrap_or_default(),
            description: self.error_description.clone().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    pub service_type: String,
    pub service_class: String,
    pub parameters: ServiceParameters,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserCreateRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<DatabaseCreateRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arbitrator_required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_availability: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subnet_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
}

/// Modification of a running service.
///
/// `None` leaves the collection untouched, an empty list removes every entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyServiceRequest {
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserCreateRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<DatabaseCreateRequest>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteServiceRequest {
    pub service_id: String,
}

/// Error returned by the API, identified by its code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code == SERVICE_NOT_FOUND_CODE
    }
}

/// Whether an error returned by a [`PaasClient`] reports a missing service.
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_not_found)
}

/// Error code and description of a service in `ERROR` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub code: String,
    pub description: String,
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "code: {}, description: {}", self.code, self.description)
    }
}

/// Remote PaaS control plane.
///
/// Failures reported by the API are returned as [`ApiError`].
#[async_trait]
pub trait PaasClient: Send + Sync {
    /// Describe a service, `None` when the API answered without a service.
    async fn describe_service(&self, id: &str) -> Result<Option<Service>>;

    async fn create_service(&self, request: CreateServiceRequest) -> Result<Service>;

    async fn modify_service(&self, request: ModifyServiceRequest) -> Result<Service>;

    async fn delete_service(&self, request: DeleteServiceRequest) -> Result<Service>;
}
