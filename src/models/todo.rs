use serde::{Deserialize, Deserializer, Serialize};

/// A single item on a list.
///
/// Todo ids are unique within the owning list only. Names carry no uniqueness
/// constraint; two todos on the same list may share a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub name: String,
    pub completed: bool,
}

impl Todo {
    /// A freshly created todo. New todos always start incomplete.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
        }
    }
}

/// Input for adding a todo to a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoInput {
    pub name: String,
}

/// Input for marking a todo complete or incomplete.
///
/// `completed` accepts a JSON boolean or the form-style string `"true"`;
/// any other string reads as `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleTodoInput {
    #[serde(deserialize_with = "completed_flag")]
    pub completed: bool,
}

fn completed_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(text) => text == "true",
    })
}
