//! Command tree documents.
//!
//! The SDK ships its tree as a source file holding a single literal
//! assignment (`STATIC_COMPLETION_CLI_TREE = {...}`). The literal is read as
//! data with the YAML parser, whose flow syntax covers both JSON and the
//! dict-literal notation the SDK uses. Nothing in the file is ever executed.

use crate::completion::tree::CommandTree;
use crate::loader::error::LoadError;

/// Parses `text` into a tree. When `variable` is given and assigned in the
/// text, only the right-hand side of that assignment is parsed.
pub fn parse_tree(origin: &str, text: &str, variable: Option<&str>) -> Result<CommandTree, LoadError> {
    let literal = variable.and_then(|name| assignment_literal(text, name)).unwrap_or(text);

    serde_yaml::from_str(literal).map_err(|e| LoadError::MalformedTree {
        origin: origin.to_string(),
        error: e.to_string(),
    })
}

/// Strict JSON variant for `.json` documents.
pub fn parse_json_tree(origin: &str, text: &str) -> Result<CommandTree, LoadError> {
    serde_json::from_str(text).map_err(|e| LoadError::MalformedTree {
        origin: origin.to_string(),
        error: e.to_string(),
    })
}

/// Everything after `<variable> =` when the assignment starts a line.
fn assignment_literal<'a>(text: &'a str, variable: &str) -> Option<&'a str> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if let Some(rest) = line.strip_prefix(variable)
            && let Some(value) = rest.trim_start().strip_prefix('=')
            && !value.starts_with('=')
        {
            let start = offset + (line.len() - value.len());
            return Some(&text[start..]);
        }
        offset += line.len();
    }
    None
}
