//! The host data tree.
//!
//! Generated code describes each YANG container and list entry with a
//! [`RecordType`]; values are [`Record`]s whose fields hold [`DataNode`]s.
//! Leaves hold [`Scalar`]s and keyed lists are maps from [`ListKey`] to
//! entry records.

mod record;
mod scalar;
mod tag;

pub use record::{DataNode, FieldDef, FieldShape, Record, RecordError, RecordType, RecordTypeBuilder};
pub use scalar::{ListKey, Scalar};
pub use tag::{local_name, PathTag, PathTagError};
