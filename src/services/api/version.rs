use serde::{Deserialize, Serialize};

/// API version tags understood by the server.
/// Each maps to a vendor media type sent in the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    V10,
    V11,
    #[default]
    Latest,
}

impl ApiVersion {
    pub fn accept_header(&self) -> &'static str {
        match self {
            Self::V1 => "application/vnd.go.cd.v1+json",
            Self::V2 => "application/vnd.go.cd.v2+json",
            Self::V3 => "application/vnd.go.cd.v3+json",
            Self::V4 => "application/vnd.go.cd.v4+json",
            Self::V5 => "application/vnd.go.cd.v5+json",
            Self::V6 => "application/vnd.go.cd.v6+json",
            Self::V7 => "application/vnd.go.cd.v7+json",
            Self::V8 => "application/vnd.go.cd.v8+json",
            Self::V9 => "application/vnd.go.cd.v9+json",
            Self::V10 => "application/vnd.go.cd.v10+json",
            Self::V11 => "application/vnd.go.cd.v11+json",
            Self::Latest => "application/vnd.go.cd+json",
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.accept_header())
    }
}
