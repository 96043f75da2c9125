//! Binary classfile parsing: the classical layout of magic number,
//! version, constant pool, access flags, `this_class`/`super_class`,
//! interfaces, fields, methods, and attributes, decoded directly into an
//! [`crate::model::unlinked::UnlinkedClassRecord`] without ever starting a
//! JVM.

pub(crate) mod attribute;
mod annotation;
mod class_parser;
mod constant_pool;
mod error;
mod field_info;
mod method_info;
mod reader;

pub use class_parser::parse_class;
pub use error::ParseError;
