//! Paths of the server's JSON API.
//!
//! Every function is pure: it only templates and percent-encodes. Results are
//! relative to the server root and resolved by `ApiClient`.

use lazy_static::lazy_static;
use reqwest::Url;

lazy_static! {
    static ref ROUTE_BASE: Url = Url::parse("http://localhost/").unwrap();
}

fn api_path(segments: &[&str], query: &[(&str, &str)]) -> String {
    let mut url = ROUTE_BASE.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().push("go").push("api").extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

pub fn dashboard_path(view_name: Option<&str>, allow_empty: bool) -> String {
    let allow_empty = if allow_empty { "true" } else { "false" };
    match view_name {
        Some(view) => api_path(&["dashboard"], &[("viewName", view), ("allowEmpty", allow_empty)]),
        None => api_path(&["dashboard"], &[("allowEmpty", allow_empty)]),
    }
}

pub fn pipeline_selection_path() -> String {
    api_path(&["internal", "pipeline_selection"], &[])
}

pub fn build_cause_path(pipeline: &str, counter: u64) -> String {
    let counter = counter.to_string();
    api_path(&["internal", "build_cause", pipeline, &counter], &[])
}

pub fn pipeline_pause_path(pipeline: &str) -> String {
    api_path(&["pipelines", pipeline, "pause"], &[])
}

pub fn pipeline_unpause_path(pipeline: &str) -> String {
    api_path(&["pipelines", pipeline, "unpause"], &[])
}

pub fn pipeline_unlock_path(pipeline: &str) -> String {
    api_path(&["pipelines", pipeline, "unlock"], &[])
}

pub fn pipeline_schedule_path(pipeline: &str) -> String {
    api_path(&["pipelines", pipeline, "schedule"], &[])
}

pub fn pipeline_history_path(pipeline: &str, page_size: Option<u32>) -> String {
    match page_size {
        Some(size) => {
            let size = size.to_string();
            api_path(&["pipelines", pipeline, "history"], &[("page_size", &size)])
        }
        None => api_path(&["pipelines", pipeline, "history"], &[]),
    }
}

pub fn pipeline_groups_path(group: Option<&str>) -> String {
    collection_or_member(&["admin", "pipeline_groups"], group)
}

pub fn artifact_stores_path(id: Option<&str>) -> String {
    collection_or_member(&["admin", "artifact_stores"], id)
}

pub fn elastic_profiles_path(id: Option<&str>) -> String {
    collection_or_member(&["elastic", "profiles"], id)
}

pub fn cluster_profiles_path(id: Option<&str>) -> String {
    collection_or_member(&["admin", "elastic", "cluster_profiles"], id)
}

pub fn config_repos_path(id: Option<&str>) -> String {
    collection_or_member(&["admin", "config_repos"], id)
}

pub fn agents_path(uuid: Option<&str>) -> String {
    collection_or_member(&["agents"], uuid)
}

pub fn plugin_info_path(plugin_type: Option<&str>) -> String {
    match plugin_type {
        Some(t) => api_path(&["admin", "plugin_info"], &[("type", t)]),
        None => api_path(&["admin", "plugin_info"], &[]),
    }
}

pub fn material_connection_check_path() -> String {
    api_path(&["admin", "internal", "material_test"], &[])
}

pub fn pac_config_files_path(plugin_id: &str) -> String {
    api_path(&["admin", "internal", "pac", "config_files", plugin_id], &[])
}

pub fn server_health_messages_path() -> String {
    api_path(&["server_health_messages"], &[])
}

fn collection_or_member(segments: &[&str], id: Option<&str>) -> String {
    match id {
        Some(id) => {
            let mut all = segments.to_vec();
            all.push(id);
            api_path(&all, &[])
        }
        None => api_path(segments, &[]),
    }
}
