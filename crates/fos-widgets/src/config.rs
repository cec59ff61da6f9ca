//! Document Configuration

use serde::{Deserialize, Serialize};

/// Options for a document backed by the in-process host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial document title
    pub title: String,

    /// Document URL
    pub url: String,

    /// Maximum number of widgets the host will allocate (`None` = unbounded)
    pub max_nodes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: "about:blank".to_string(),
            max_nodes: None,
        }
    }
}
