use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct PrintMessageParams {
    /// Text to write to the editor output log
    pub message: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct GetOutputLogParams {
    /// Number of most recent lines to return (defaults to 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<usize>,
}
