use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::reaction::ReactionKind;

/// Patch operations understood by the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchKind {
    /// Append a value to an array, ignoring duplicates
    ArrayAdd,
}

/// One element of a `PATCH` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    /// Operation to apply
    pub op: PatchKind,
    /// JSON pointer into the document body
    pub path: String,
    /// Operand
    pub value: Value,
}

impl PatchOp {
    /// Appends `user` to the reactor list of `kind`.
    pub fn add_reaction(kind: ReactionKind, user: &str) -> Self {
        Self {
            op: PatchKind::ArrayAdd,
            path: format!("/reactions/{kind}"),
            value: Value::String(user.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_reaction_wire_format() {
        let body = vec![PatchOp::add_reaction(ReactionKind::Like, "ada")];
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!([{"op": "ArrayAdd", "path": "/reactions/like", "value": "ada"}])
        );
    }
}
