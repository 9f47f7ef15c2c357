//! Split relationship index: facts about program elements, partitioned into
//! one persisted node per indexed unit and aggregated per library.

pub mod codec;
pub mod collections;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod node;
pub mod store;

pub use config::IndexConfig;
pub use error::{IndexError, Result};
pub use index::{IndexStatistics, PassRecorder, SplitIndex};
pub use store::{FileNodeStore, MemoryNodeStore, NodeStore};
