use std::collections::BTreeMap;

use serde::Deserialize;

fn default_group() -> String {
    "default-producer-group".to_string()
}

/// Producer settings, usually read from the `[producer]` table of the TOML config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProducerConfig {
    #[serde(default = "default_group")]
    pub group: String,

    /// Free-form client properties. Not interpreted by the standalone producer.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            group: default_group(),
            properties: BTreeMap::new(),
        }
    }
}

impl ProducerConfig {
    pub fn with_group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            ..Default::default()
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
