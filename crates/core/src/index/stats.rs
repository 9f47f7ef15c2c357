use serde::Serialize;
use std::fmt;

/// Summary of what the index currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndexStatistics {
    pub location_count: usize,
    pub source_count: usize,
    pub node_count: usize,
    pub context_count: usize,
}

impl fmt::Display for IndexStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} locations, {} sources, {} nodes, {} contexts",
            self.location_count, self.source_count, self.node_count, self.context_count
        )
    }
}
