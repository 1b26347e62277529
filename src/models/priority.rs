use serde::{Deserialize, Serialize};

/// The provider's route-optimization objective selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "TIME")]
    Time,
    #[serde(rename = "DISTANCE")]
    Distance,
    #[serde(rename = "RECOMMEND")]
    Recommend,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Time => "TIME",
            Priority::Distance => "DISTANCE",
            Priority::Recommend => "RECOMMEND",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TIME" => Ok(Priority::Time),
            "DISTANCE" => Ok(Priority::Distance),
            "RECOMMEND" => Ok(Priority::Recommend),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Time
    }
}
