//! The data model: unlinked per-class records, their shared field/method/
//! annotation shapes, constant values, and the graph's relation kinds.

pub mod constant;
pub mod record;
pub mod relation;
pub mod unlinked;

pub use constant::ConstantValue;
pub use record::{AnnotationRecord, AnnotationValue, FieldRecord, Modifiers, MethodRecord};
pub use relation::RelationKind;
pub use unlinked::{InnerClassEntry, UnlinkedClassRecord};
