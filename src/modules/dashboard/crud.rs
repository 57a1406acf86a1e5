use crate::services::api::{
    routes, ApiClient, ApiRequestBuilder, ApiResult, ApiVersion, ObjectWithEtag,
};

use super::model::Dashboard;

// =============================================================================
// DASHBOARD CRUD
// =============================================================================

#[derive(Clone)]
pub struct DashboardCrud {
    client: ApiClient,
    view: Option<String>,
}

impl DashboardCrud {
    pub fn new(client: ApiClient, view: Option<String>) -> Self {
        Self { client, view }
    }

    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    /// Fetch the dashboard. With an etag the server may answer 304, which
    /// comes back as an error result with `is_not_modified()` set.
    pub async fn fetch(&self, etag: Option<&str>) -> ApiResult<ObjectWithEtag<Dashboard>> {
        let request = ApiRequestBuilder::get(routes::dashboard_path(self.view.as_deref(), false))
            .version(ApiVersion::V4)
            .maybe_etag(etag);

        self.client.send(request).await.json::<Dashboard>().with_etag()
    }
}
