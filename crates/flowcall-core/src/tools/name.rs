//! Tool name wire convention
//!
//! MCP-routed tools are exposed to the model as `_-_-_<server>_-_-_<tool>`.
//! `handoff` and every `handoff_to_*` name are local pseudo-tools and never
//! leave the process.

/// Separator between the segments of an MCP tool name
pub const MCP_DELIMITER: &str = "_-_-_";

/// Name of the bare handoff pseudo-tool
pub const HANDOFF_TOOL: &str = "handoff";

/// Prefix of targeted handoff pseudo-tools
pub const HANDOFF_PREFIX: &str = "handoff_to_";

/// Where a requested tool call is routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName<'a> {
    /// Local pseudo-tool signalling a control transfer
    Handoff,
    /// Tool `tool` on MCP server `server`
    Mcp { server: &'a str, tool: &'a str },
}

impl<'a> ToolName<'a> {
    /// Route a tool name
    ///
    /// Returns `None` for anything that is neither a handoff name nor
    /// exactly three `_-_-_`-delimited segments.
    pub fn parse(name: &'a str) -> Option<Self> {
        if is_handoff(name) {
            return Some(ToolName::Handoff);
        }

        let segments: Vec<&str> = name.split(MCP_DELIMITER).collect();
        match segments.as_slice() {
            [_, server, tool] => Some(ToolName::Mcp {
                server: *server,
                tool: *tool,
            }),
            _ => None,
        }
    }

    /// Format the wire name of an MCP tool
    pub fn mcp(server: &str, tool: &str) -> String {
        format!("{}{}{}{}", MCP_DELIMITER, server, MCP_DELIMITER, tool)
    }
}

/// `handoff` or `handoff_to_*`
pub fn is_handoff(name: &str) -> bool {
    name == HANDOFF_TOOL || name.starts_with(HANDOFF_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mcp_name() {
        assert_eq!(
            ToolName::parse("_-_-_search_-_-_lookup"),
            Some(ToolName::Mcp {
                server: "search",
                tool: "lookup"
            })
        );
        assert_eq!(ToolName::mcp("search", "lookup"), "_-_-_search_-_-_lookup");
    }

    #[test]
    fn test_parse_handoff() {
        assert_eq!(ToolName::parse("handoff"), Some(ToolName::Handoff));
        assert_eq!(ToolName::parse("handoff_to_billing"), Some(ToolName::Handoff));
        assert!(!is_handoff("handoffs"));
        assert!(!is_handoff("please_handoff"));
    }

    #[test]
    fn test_invalid_names() {
        for name in [
            "lookup",
            "search_-_-_lookup",
            "_-_-_search",
            "_-_-_a_-_-_b_-_-_c",
            "",
        ] {
            assert_eq!(ToolName::parse(name), None, "{name}");
        }
    }
}
