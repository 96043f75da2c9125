//! Class-file attribute parsing.
//!
//! Only the attributes this engine's data model actually needs
//! are decoded: `Signature`, `RuntimeVisible/InvisibleAnnotations`,
//! `RuntimeVisible/InvisibleParameterAnnotations`, `ConstantValue`,
//! `Exceptions`, `MethodParameters`, `AnnotationDefault`, `InnerClasses`,
//! and `EnclosingMethod`. Everything else is skipped by its declared
//! length without being named in [`Attribute`] at all.

use std::io::Read;

use super::annotation::{parse_annotations, parse_parameter_annotations};
use super::constant_pool::{ConstantPool, Entry};
use super::error::ParseError;
use super::reader::ValueReaderExt;
use crate::model::constant::ConstantValue;
use crate::model::record::{AnnotationRecord, AnnotationValue};
use crate::model::unlinked::InnerClassEntry;
use crate::types::ClassName;

/// One decoded attribute this engine cares about.
#[derive(Debug)]
pub(crate) enum Attribute {
    ConstantValue(ConstantValue),
    Signature(String),
    RuntimeVisibleAnnotations(Vec<AnnotationRecord>),
    RuntimeInvisibleAnnotations(Vec<AnnotationRecord>),
    RuntimeVisibleParameterAnnotations(Vec<Vec<AnnotationRecord>>),
    RuntimeInvisibleParameterAnnotations(Vec<Vec<AnnotationRecord>>),
    Exceptions(Vec<ClassName>),
    MethodParameters(Vec<Option<String>>),
    AnnotationDefault(AnnotationValue),
    InnerClasses(Vec<InnerClassEntry>),
    /// `(enclosing class, enclosing method name)`. Wrapped as a tuple field
    /// rather than a struct variant so `extract_attributes!`'s uniform
    /// `Attribute::$attr(it)` match arm can bind it like every other
    /// attribute.
    EnclosingMethod((ClassName, Option<String>)),
}

/// Reads the `attributes_count` + attribute table shared by class files,
/// fields, and methods, keeping only the attributes this engine recognizes.
pub(super) fn parse_attributes<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<Vec<Attribute>, ParseError> {
    let count: u16 = reader.read_value()?;
    let mut out = Vec::with_capacity(count.into());
    for _ in 0..count {
        if let Some(attr) = parse_one_attribute(reader, pool)? {
            out.push(attr);
        }
    }
    Ok(out)
}

fn parse_one_attribute<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<Option<Attribute>, ParseError> {
    let name_index: u16 = reader.read_value()?;
    let name = pool.get_str(name_index)?;
    let length: u32 = reader.read_value()?;
    match name {
        "ConstantValue" => {
            let index: u16 = reader.read_value()?;
            Ok(Some(Attribute::ConstantValue(pool.get_constant_value(index)?)))
        }
        "Signature" => {
            let index: u16 = reader.read_value()?;
            Ok(Some(Attribute::Signature(pool.get_str(index)?.to_owned())))
        }
        "RuntimeVisibleAnnotations" => Ok(Some(Attribute::RuntimeVisibleAnnotations(
            parse_annotations(reader, pool)?,
        ))),
        "RuntimeInvisibleAnnotations" => Ok(Some(Attribute::RuntimeInvisibleAnnotations(
            parse_annotations(reader, pool)?,
        ))),
        "RuntimeVisibleParameterAnnotations" => Ok(Some(
            Attribute::RuntimeVisibleParameterAnnotations(parse_parameter_annotations(reader, pool)?),
        )),
        "RuntimeInvisibleParameterAnnotations" => Ok(Some(
            Attribute::RuntimeInvisibleParameterAnnotations(parse_parameter_annotations(reader, pool)?),
        )),
        "Exceptions" => {
            let count: u16 = reader.read_value()?;
            let exceptions = (0..count)
                .map(|_| {
                    let index: u16 = reader.read_value()?;
                    pool.get_class_name(index)
                })
                .collect::<Result<_, _>>()?;
            Ok(Some(Attribute::Exceptions(exceptions)))
        }
        "MethodParameters" => {
            let count: u8 = reader.read_value()?;
            let names = (0..count)
                .map(|_| {
                    let name_index: u16 = reader.read_value()?;
                    let _access_flags: u16 = reader.read_value()?;
                    Ok(if name_index == 0 {
                        None
                    } else {
                        Some(pool.get_str(name_index)?.to_owned())
                    })
                })
                .collect::<Result<_, ParseError>>()?;
            Ok(Some(Attribute::MethodParameters(names)))
        }
        "AnnotationDefault" => Ok(Some(Attribute::AnnotationDefault(
            super::annotation::parse_annotation_default(reader, pool)?,
        ))),
        "InnerClasses" => {
            let count: u16 = reader.read_value()?;
            let mut entries = Vec::with_capacity(count.into());
            for _ in 0..count {
                let inner_index: u16 = reader.read_value()?;
                let inner = pool.get_class_name(inner_index)?;
                let outer_index: u16 = reader.read_value()?;
                let outer = if outer_index == 0 {
                    None
                } else {
                    Some(pool.get_class_name(outer_index)?)
                };
                let _inner_name_index: u16 = reader.read_value()?;
                let _inner_access_flags: u16 = reader.read_value()?;
                entries.push(InnerClassEntry { inner, outer });
            }
            Ok(Some(Attribute::InnerClasses(entries)))
        }
        "EnclosingMethod" => {
            let class_index: u16 = reader.read_value()?;
            let class = pool.get_class_name(class_index)?;
            let method_index: u16 = reader.read_value()?;
            let method_name = if method_index == 0 {
                None
            } else {
                let Entry::NameAndType { name_index, .. } = pool.get_entry(method_index)? else {
                    return Err(ParseError::MismatchedConstantPoolEntryType {
                        expected: "NameAndType",
                        found: "other",
                    });
                };
                Some(pool.get_str(*name_index)?.to_owned())
            };
            Ok(Some(Attribute::EnclosingMethod((class, method_name))))
        }
        _ => {
            super::reader::read_byte_chunk(reader, length as usize)?;
            Ok(None)
        }
    }
}
