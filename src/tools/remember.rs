use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RememberParams {
    #[schemars(description = "The natural language content of the memory")]
    pub content: String,

    #[schemars(
        description = "Mindmap outline of the concepts this memory touches. One root line like 'root((Topic))', then one indented concept per line (deeper indentation = child). 'A → B' chains are allowed."
    )]
    pub schema: String,

    #[schemars(
        description = "Engram type: 'atomic' (standalone fact), 'link' (connects other memories), 'pattern' (recurring pattern). Defaults to 'atomic'."
    )]
    pub r#type: Option<String>,
}
