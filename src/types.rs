/// Shared types used across the codebase

use std::fmt;

/// Mutations guarded by the ownership gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Update => f.write_str("update"),
            Mutation::Delete => f.write_str("delete"),
        }
    }
}
