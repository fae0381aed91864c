//! MCP tool surface
//!
//! The server exposes a fixed set of tools:
//!
//! ## Catalog
//! - `list_components` - List every component in the catalog index
//! - `get_component` - Fetch one component's full specification
//! - `search_components` - Keyword search over names and descriptions
//!
//! ## Working copy
//! - `check_updates` - Report new upstream commits and the files they touch

use serde::{Deserialize, Serialize};

pub const LIST_COMPONENTS: &str = "list_components";
pub const GET_COMPONENT: &str = "get_component";
pub const SEARCH_COMPONENTS: &str = "search_components";
pub const CHECK_UPDATES: &str = "check_updates";

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    /// Concatenated text of all content blocks.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: LIST_COMPONENTS.to_string(),
            description: "List all available iOS UIKit components with their descriptions"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDefinition {
            name: GET_COMPONENT.to_string(),
            description: "Get full specification for an iOS component including properties, usage examples, and tags".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Component name (e.g., ChipsView, ContextMenuView)"
                    }
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: SEARCH_COMPONENTS.to_string(),
            description: "Search for iOS components by keyword (matches name or description)"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (e.g., 'filter', 'menu', 'avatar')"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: CHECK_UPDATES.to_string(),
            description: "Check the upstream repository for new commits and list the components and specs they change".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tool_definitions() {
        let tools = get_tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![LIST_COMPONENTS, GET_COMPONENT, SEARCH_COMPONENTS, CHECK_UPDATES]
        );
    }

    #[test]
    fn test_tool_result_text() {
        let result = ToolResult::text("Success");
        assert!(result.is_error.is_none());
        assert!(!result.is_error());
        assert_eq!(result.text_content(), "Success");
    }

    #[test]
    fn test_tool_result_error() {
        let result = ToolResult::error("Failed");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.text_content(), "Failed");
    }

    #[test]
    fn test_tool_result_serialize() {
        let result = ToolResult::text("Hello, world!");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "Hello, world!");
        assert!(json.get("isError").is_none());

        let error_json = serde_json::to_value(ToolResult::error("Something went wrong")).unwrap();
        assert_eq!(error_json["isError"], true);
    }

    #[test]
    fn test_tool_definition_serializes_input_schema_camel_case() {
        let json = serde_json::to_value(&get_tool_definitions()[0]).unwrap();
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
    }

    #[test]
    fn test_each_tool_has_valid_schema() {
        for tool in &get_tool_definitions() {
            let schema = tool.input_schema.as_object().unwrap();
            assert_eq!(
                schema.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "Tool {} schema type should be 'object'",
                tool.name
            );
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn test_tools_with_required_fields() {
        let tools = get_tool_definitions();
        let required = |name: &str| -> Vec<String> {
            tools
                .iter()
                .find(|t| t.name == name)
                .unwrap()
                .input_schema
                .get("required")
                .and_then(|r| r.as_array())
                .map(|r| r.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default()
        };

        assert_eq!(required(GET_COMPONENT), vec!["name"]);
        assert_eq!(required(SEARCH_COMPONENTS), vec!["query"]);
        assert!(required(LIST_COMPONENTS).is_empty());
        assert!(required(CHECK_UPDATES).is_empty());
    }
}
