use crate::services::api::{routes, ApiClient, ApiRequestBuilder, ApiResult, ApiVersion};

use super::schema::{BuildCause, MessageResponse, PauseRequest, ScheduleRequest};

// =============================================================================
// PIPELINE CRUD
// =============================================================================

/// Pipeline operations. Mutations return the server's message; scheduling is
/// usually answered with 202, which surfaces as an accepted result.
#[derive(Clone)]
pub struct PipelineCrud {
    client: ApiClient,
}

impl PipelineCrud {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn pause(&self, pipeline: &str, cause: &str) -> ApiResult<MessageResponse> {
        let body = PauseRequest {
            pause_cause: cause.to_string(),
        };
        let request = match ApiRequestBuilder::post(routes::pipeline_pause_path(pipeline))
            .version(ApiVersion::V1)
            .json(&body)
        {
            Ok(request) => request,
            Err(e) => return ApiResult::transport_failure(&e.to_string()).json(),
        };

        self.client.send(request).await.json()
    }

    pub async fn unpause(&self, pipeline: &str) -> ApiResult<MessageResponse> {
        let request =
            ApiRequestBuilder::post(routes::pipeline_unpause_path(pipeline)).version(ApiVersion::V1);
        self.client.send(request).await.json()
    }

    pub async fn unlock(&self, pipeline: &str) -> ApiResult<MessageResponse> {
        let request =
            ApiRequestBuilder::post(routes::pipeline_unlock_path(pipeline)).version(ApiVersion::V1);
        self.client.send(request).await.json()
    }

    /// An empty request goes out without a body so the server applies its defaults.
    pub async fn schedule(&self, pipeline: &str, options: &ScheduleRequest) -> ApiResult<MessageResponse> {
        let mut request =
            ApiRequestBuilder::post(routes::pipeline_schedule_path(pipeline)).version(ApiVersion::V1);

        if !options.is_empty() {
            request = match request.json(options) {
                Ok(request) => request,
                Err(e) => return ApiResult::transport_failure(&e.to_string()).json(),
            };
        }

        self.client.send(request).await.json()
    }

    pub async fn build_cause(&self, pipeline: &str, counter: u64) -> ApiResult<BuildCause> {
        let request = ApiRequestBuilder::get(routes::build_cause_path(pipeline, counter));
        self.client.send(request).await.json()
    }
}
