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
use thiserror::Error;

use super::api::{is_not_found, PaasClient, Service};

/// The service does not exist, or the API answered without one.
#[derive(Debug, Error)]
pub enum NotFoundError {
    #[error("service {id} not found: {source}")]
    Missing {
        id: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("empty result while describing service {id}")]
    EmptyResult { id: String },
}

/// Describe a service once, mapping every "not found" answer to [`NotFoundError`].
pub async fn find_service_by_id(client: &dyn PaasClient, id: &str) -> Result<Service> {
    match client.describe_service(id).await {
        Ok(Some(service)) => Ok(service),
        Ok(None) => Err(NotFoundError::EmptyResult { id: id.to_string() }.into()),
        Err(err) if is_not_found(&err) => Err(NotFoundError::Missing {
            id: id.to_string(),
            source: err,
        }
        .into()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;
    use crate::paas::api::{
        ApiError, CreateServiceRequest, DeleteServiceRequest, ModifyServiceRequest,
    };
    use crate::paas::SERVICE_NOT_FOUND_CODE;

    /// Answers every describe with the same outcome.
    enum Describe {
        Found,
        Empty,
        NotFound,
        Failing,
    }

    #[async_trait]
    impl PaasClient for Describe {
        async fn describe_service(&self, id: &str) -> Result<Option<Service>> {
            match self {
                Describe::Found => Ok(Some(Service {
                    id: id.to_string(),
                    status: "READY".to_string(),
                    ..Default::default()
                })),
                Describe::Empty => Ok(None),
                Describe::NotFound => {
                    Err(ApiError::new(SERVICE_NOT_FOUND_CODE, "no such service").into())
                }
                Describe::Failing => Err(ApiError::new("Internal", "try again later").into()),
            }
        }

        async fn create_service(&self, _: CreateServiceRequest) -> Result<Service> {
            Err(anyhow!("unused"))
        }

        async fn modify_service(&self, _: ModifyServiceRequest) -> Result<Service> {
            Err(anyhow!("unused"))
        }

        async fn delete_service(&self, _: DeleteServiceRequest) -> Result<Service> {
            Err(anyhow!("unused"))
        }
    }

    #[tokio::test]
    async fn found() {
        let service = find_service_by_id(&Describe::Found, "fm-1").await.unwrap();
        assert_eq!(service.id, "fm-1");
    }

    #[tokio::test]
    async fn not_found_answers() {
        for client in [Describe::Empty, Describe::NotFound] {
            let err = find_service_by_id(&client, "fm-1").await.unwrap_err();
            assert!(err.is::<NotFoundError>(), "{err}");
        }

        let err = find_service_by_id(&Describe::NotFound, "fm-1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "service fm-1 not found: Document.NotFound: no such service"
        );
    }

    #[tokio::test]
    async fn other_errors_pass_through() {
        let err = find_service_by_id(&Describe::Failing, "fm-1").await.unwrap_err();
        assert!(!err.is::<NotFoundError>());
        assert_eq!(err.downcast_ref::<ApiError>().unwrap().code, "Internal");
    }
}
