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

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::state_change::{wait_for_state, StateChangeConf, WaitError, WaitFailure};

use super::api::{PaasClient, RemoteError, Service};
use super::status::StatusService;
use super::{
    SERVICE_STATUS_CLAIMED, SERVICE_STATUS_CREATING, SERVICE_STATUS_DELETED,
    SERVICE_STATUS_DELETING, SERVICE_STATUS_PENDING, SERVICE_STATUS_PROVISIONING,
    SERVICE_STATUS_READY, SERVICE_STATUS_RECOVERING, SERVICE_STATUS_UPDATING,
};

pub const ROLLED_BACK_MESSAGE: &str = "an error occurred while updating the service and it was rolled back to the previous version. Please check the updated parameters and apply the changes again";

#[derive(Debug, Error)]
pub enum ServiceWaitErrorKind {
    #[error(transparent)]
    Wait(#[from] WaitError),
    /// The update failed and the service came back `READY` on its previous version.
    #[error("{}", ROLLED_BACK_MESSAGE)]
    RolledBack,
}

fn last_error(remote: &Option<RemoteError>) -> String {
    remote
        .as_ref()
        .map(|remote| format!(" (last error: {remote})"))
        .unwrap_or_default()
}

/// Failure of a service wait.
///
/// Carries the last observed service and, when it ended in `ERROR`, the
/// error reported by the API.
#[derive(Debug, Error)]
#[error("service {id}: {kind}{}", last_error(.remote_error))]
pub struct ServiceWaitError {
    pub id: String,
    #[source]
    pub kind: ServiceWaitErrorKind,
    remote_error: Option<RemoteError>,
    service: Option<Box<Service>>,
}

impl ServiceWaitError {
    fn new(id: &str, kind: ServiceWaitErrorKind, service: Option<Service>) -> Self {
        Self {
            id: id.to_string(),
            kind,
            remote_error: service.as_ref().and_then(Service::remote_error),
            service: service.map(Box::new),
        }
    }

    fn from_failure(id: &str, failure: WaitFailure<Service>) -> Self {
        Self::new(id, failure.error.into(), failure.last)
    }

    pub fn remote_error(&self) -> Option<&RemoteError> {
        self.remote_error.as_ref()
    }

    pub fn service(&self) -> Option<&Service> {
        self.service.as_deref()
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ServiceWaitErrorKind::Wait(WaitError::Timeout { .. }))
    }
}

/// Wait until a freshly created service is `READY`.
pub async fn wait_service_created(
    ctx: &CancellationToken,
    client: &dyn PaasClient,
    id: &str,
    timeout: Duration,
) -> Result<Service, ServiceWaitError> {
    let conf = StateChangeConf::new(
        &[
            SERVICE_STATUS_PENDING,
            SERVICE_STATUS_CLAIMED,
            SERVICE_STATUS_CREATING,
            SERVICE_STATUS_PROVISIONING,
        ],
        &[SERVICE_STATUS_READY],
        timeout,
    );
    tracing::info!("Waiting for service {id} to be created");

    match wait_for_state(&conf, ctx, &StatusService::new(client, id)).await {
        Ok(Some(service)) => Ok(service),
        Ok(None) => Err(ServiceWaitError::new(
            id,
            ServiceWaitErrorKind::Wait(WaitError::NotFound { checks: 0 }),
            None,
        )),
        Err(failure) => Err(ServiceWaitError::from_failure(id, failure)),
    }
}

/// Wait until a modified service is `READY` again.
///
/// A service that comes back `READY` after a rollback is reported as
/// [`ServiceWaitErrorKind::RolledBack`].
pub async fn wait_service_updated(
    ctx: &CancellationToken,
    client: &dyn PaasClient,
    id: &str,
    timeout: Duration,
) -> Result<Service, ServiceWaitError> {
    let conf = StateChangeConf::new(
        &[SERVICE_STATUS_UPDATING, SERVICE_STATUS_RECOVERING],
        &[SERVICE_STATUS_READY],
        timeout,
    );
    tracing::info!("Waiting for service {id} to be updated");

    match wait_for_state(&conf, ctx, &StatusService::new(client, id)).await {
        Ok(Some(service)) if service.is_rolled_back => {
            tracing::warn!("Service {id} was rolled back");
            Err(ServiceWaitError::new(
                id,
                ServiceWaitErrorKind::RolledBack,
                Some(service),
            ))
        }
        Ok(Some(service)) => Ok(service),
        Ok(None) => Err(ServiceWaitError::new(
            id,
            ServiceWaitErrorKind::Wait(WaitError::NotFound { checks: 0 }),
            None,
        )),
        Err(failure) => Err(ServiceWaitError::from_failure(id, failure)),
    }
}

/// Wait until a service is gone.
///
/// Returns `None` when the service disappeared, or the service itself when
/// the API reports it `DELETED`.
pub async fn wait_service_deleted(
    ctx: &CancellationToken,
    client: &dyn PaasClient,
    id: &str,
    timeout: Duration,
) -> Result<Option<Service>, ServiceWaitError> {
    let conf = StateChangeConf::new(
        &[
            SERVICE_STATUS_PENDING,
            SERVICE_STATUS_CLAIMED,
            SERVICE_STATUS_DELETING,
        ],
        &[SERVICE_STATUS_DELETED],
        timeout,
    )
    .with_not_found_checks(0);
    tracing::info!("Waiting for service {id} to be deleted");

    match wait_for_state(&conf, ctx, &StatusService::new(client, id)).await {
        Ok(service) => Ok(service),
        Err(WaitFailure {
            error: WaitError::NotFound { .. },
            ..
        }) => {
            tracing::info!("Service {id} is gone");
            Ok(None)
        }
        Err(failure) => Err(ServiceWaitError::from_failure(id, failure)),
    }
}
