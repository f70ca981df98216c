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

//! Remote PaaS services: client seam, lookups and operation waiters.

pub mod api;
mod find;
mod status;
mod wait;

pub use api::{ApiError, PaasClient, RemoteError, Service};
pub use find::{find_service_by_id, NotFoundError};
pub use status::StatusService;
pub use wait::{
    wait_service_created, wait_service_deleted, wait_service_updated, ServiceWaitError,
    ServiceWaitErrorKind, ROLLED_BACK_MESSAGE,
};

pub const SERVICE_STATUS_PENDING: &str = "PENDING";
pub const SERVICE_STATUS_CLAIMED: &str = "CLAIMED";
pub const SERVICE_STATUS_CREATING: &str = "CREATING";
pub const SERVICE_STATUS_PROVISIONING: &str = "PROVISIONING";
pub const SERVICE_STATUS_UPDATING: &str = "UPDATING";
pub const SERVICE_STATUS_RECOVERING: &str = "RECOVERING";
pub const SERVICE_STATUS_DELETING: &str = "DELETING";
pub const SERVICE_STATUS_DELETED: &str = "DELETED";
pub const SERVICE_STATUS_READY: &str = "READY";
pub const SERVICE_STATUS_ERROR: &str = "ERROR";

pub const SERVICE_NOT_FOUND_CODE: &str = "Document.NotFound";
