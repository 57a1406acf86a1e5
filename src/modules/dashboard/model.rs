use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// DASHBOARD
// =============================================================================

/// Dashboard payload (`application/vnd.go.cd.v4+json`). Every field is
/// defaulted so a partial or newer payload still parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(rename = "_embedded", default)]
    pub embedded: DashboardEmbedded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardEmbedded {
    #[serde(default)]
    pub pipeline_groups: Vec<PipelineGroup>,
    #[serde(default)]
    pub pipelines: Vec<DashboardPipeline>,
}

impl Dashboard {
    pub fn groups(&self) -> &[PipelineGroup] {
        &self.embedded.pipeline_groups
    }

    pub fn pipelines(&self) -> &[DashboardPipeline] {
        &self.embedded.pipelines
    }

    pub fn pipeline(&self, name: &str) -> Option<&DashboardPipeline> {
        self.embedded.pipelines.iter().find(|p| p.name == name)
    }

    /// Pipelines of a group, in the order the group lists them.
    pub fn pipelines_in_group(&self, group: &str) -> Vec<&DashboardPipeline> {
        self.embedded
            .pipeline_groups
            .iter()
            .find(|g| g.name == group)
            .map(|g| g.pipelines.iter().filter_map(|name| self.pipeline(name)).collect())
            .unwrap_or_default()
    }

    pub fn paused_pipelines(&self) -> Vec<&DashboardPipeline> {
        self.embedded.pipelines.iter().filter(|p| p.is_paused()).collect()
    }
}

// =============================================================================
// PIPELINE GROUP
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pipelines: Vec<String>,
    #[serde(default)]
    pub can_administer: bool,
}

// =============================================================================
// PIPELINE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPipeline {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_updated_timestamp: Option<i64>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub can_pause: bool,
    #[serde(default)]
    pub can_operate: bool,
    #[serde(default)]
    pub can_administer: bool,
    #[serde(default)]
    pub from_config_repo: bool,
    #[serde(default)]
    pub pause_info: PauseInfo,
    #[serde(rename = "_embedded", default)]
    pub embedded: PipelineEmbedded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineEmbedded {
    #[serde(default)]
    pub instances: Vec<PipelineInstance>,
}

impl DashboardPipeline {
    pub fn is_paused(&self) -> bool {
        self.pause_info.paused
    }

    pub fn instances(&self) -> &[PipelineInstance] {
        &self.embedded.instances
    }

    /// The most recent run is listed last.
    pub fn latest_instance(&self) -> Option<&PipelineInstance> {
        self.embedded.instances.last()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PauseInfo {
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub paused_by: Option<String>,
    #[serde(default)]
    pub pause_reason: Option<String>,
}

// =============================================================================
// INSTANCE / STAGE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineInstance {
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub counter: u64,
    #[serde(default)]
    pub triggered_by: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
    #[serde(rename = "_embedded", default)]
    pub embedded: InstanceEmbedded,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceEmbedded {
    #[serde(default)]
    pub stages: Vec<StageSummary>,
}

impl PipelineInstance {
    pub fn stages(&self) -> &[StageSummary] {
        &self.embedded.stages
    }

    /// Status of the furthest stage that has run, `None` before any stage ran.
    pub fn status(&self) -> Option<&str> {
        self.embedded
            .stages
            .iter()
            .rev()
            .find(|s| !s.status.eq_ignore_ascii_case("Unknown"))
            .map(|s| s.status.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub counter: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<String>,
}

/// Counters arrive as numbers or as numeric strings depending on the endpoint.
fn lenient_counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Counter {
        Number(u64),
        Text(String),
        Missing(Option<()>),
    }

    match Counter::deserialize(deserializer)? {
        Counter::Number(n) => Ok(n),
        Counter::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Counter::Missing(_) => Ok(0),
    }
}
