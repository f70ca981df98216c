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

use anyhow::Result;
use async_trait::async_trait;

use crate::state_change::StateRefresh;

use super::api::{PaasClient, Service};
use super::find::{find_service_by_id, NotFoundError};

/// Status probe of a single service.
pub struct StatusService<'a> {
    client: &'a dyn PaasClient,
    id: &'a str,
}

impl<'a> StatusService<'a> {
    pub fn new(client: &'a dyn PaasClient, id: &'a str) -> Self {
        Self { client, id }
    }
}

#[async_trait]
impl<'a> StateRefresh for StatusService<'a> {
    type Output = Service;

    async fn refresh(&self) -> Result<Option<(Service, String)>> {
        match find_service_by_id(self.client, self.id).await {
            Ok(service) => {
                let status = service.status.clone();
                Ok(Some((service, status)))
            }
            Err(err) if err.is::<NotFoundError>() => {
                tracing::info!("Service {} not found: {err}", self.id);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
