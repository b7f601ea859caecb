use serde::{Deserialize, Serialize};

/// A card design. `preview_url` points at the front-cover art, either as a
/// storage object path or as an absolute/relative URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}
