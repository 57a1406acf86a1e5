use serde::{Deserialize, Serialize};

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseRequest {
    pub pause_cause: String,
}

/// Trigger options. An empty request schedules with the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<MaterialSelection>,
    #[serde(default)]
    pub update_materials_before_scheduling: bool,
}

impl ScheduleRequest {
    pub fn is_empty(&self) -> bool {
        self.environment_variables.is_empty()
            && self.materials.is_empty()
            && !self.update_materials_before_scheduling
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub secure: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSelection {
    pub fingerprint: String,
    pub revision: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildCause {
    #[serde(default)]
    pub approver: String,
    #[serde(default)]
    pub is_forced: bool,
    #[serde(default)]
    pub trigger_message: String,
    #[serde(default)]
    pub material_revisions: Vec<MaterialRevision>,
}

impl BuildCause {
    pub fn changed_materials(&self) -> impl Iterator<Item = &MaterialRevision> {
        self.material_revisions.iter().filter(|r| r.changed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialRevision {
    #[serde(default)]
    pub changed: bool,
    #[serde(default)]
    pub material: MaterialInfo,
    #[serde(default)]
    pub modifications: Vec<Modification>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(rename = "type", default)]
    pub material_type: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub modified_time: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}
