use thiserror::Error;

/// A broken link found by `check_links`
///
/// Node positions are reported as slab indexes. They are only meaningful for comparing against
/// each other within a single tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("root node {root} has father {father}")]
    RootHasFather {
        root: usize,
        father: usize,
    },

    #[error("node {child} is a child of {holder} but names {father:?} as its father")]
    FatherMismatch {
        child: usize,
        holder: usize,
        father: Option<usize>,
    },

    #[error("node {holder} links to {child}, which is no longer stored")]
    Dangling {
        child: usize,
        holder: usize,
    },

    #[error("node {node} is reachable through more than one child slot")]
    SharedNode {
        node: usize,
    },

    #[error("{live} nodes are stored but only {reachable} are reachable from the root")]
    Unreachable {
        live: usize,
        reachable: usize,
    },
}
