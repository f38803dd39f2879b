use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object stored in the workspace tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    Notebook,
    Directory,
    Library,
    File,
    Repo,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectType::Notebook => "NOTEBOOK",
            ObjectType::Directory => "DIRECTORY",
            ObjectType::Library => "LIBRARY",
            ObjectType::File => "FILE",
            ObjectType::Repo => "REPO",
            ObjectType::Unknown => "UNKNOWN",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub path: String,
    pub object_type: ObjectType,
    /// Notebook language: PYTHON, SCALA, SQL or R
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
}
