use serde::{Deserialize, Serialize};

/// A tracked project. Empty text and list fields are left out of responses.
///
/// `project_id` and `user_id` are assigned by the server; values sent by a
/// client are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rebo_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub site_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dev_dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}
