//! The unit of storage: every relationship fact found in one compilation unit.

mod format;
mod key;
#[allow(clippy::module_inception)]
mod node;

pub use format::{FORMAT_VERSION, RawNode, decode_node, decode_raw, encode_node};
pub use key::{LocationRecord, RelationKey};
pub use node::IndexNode;
