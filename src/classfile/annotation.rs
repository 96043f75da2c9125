//! `element_value` and annotation-structure parsing.
//!
//! Decodes straight into the data model's [`AnnotationRecord`] /
//! [`AnnotationValue`] rather than an intermediate classfile-shaped
//! type: this engine has no use for an annotation representation that
//! isn't already the one the graph stores.

use std::io::Read;

use super::constant_pool::ConstantPool;
use super::error::ParseError;
use super::reader::ValueReaderExt;
use crate::model::constant::ConstantValue;
use crate::model::record::{AnnotationRecord, AnnotationValue};
use crate::types::{ClassName, FieldType};

/// Parses one `annotation` structure (JVMS §4.7.16).
pub(super) fn parse_annotation<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<AnnotationRecord, ParseError> {
    let type_index: u16 = reader.read_value()?;
    let descriptor = pool.get_str(type_index)?;
    let annotation_class = annotation_class_name(descriptor)?;
    let num_pairs: u16 = reader.read_value()?;
    let mut params = Vec::with_capacity(num_pairs.into());
    for _ in 0..num_pairs {
        let name_index: u16 = reader.read_value()?;
        let name = pool.get_str(name_index)?.to_owned();
        let value = parse_element_value(reader, pool)?;
        params.push((name, value));
    }
    Ok(AnnotationRecord::new(annotation_class, params))
}

/// Parses a list of `annotation` structures, each preceded by a `u16` count
/// (the shape shared by `RuntimeVisibleAnnotations` and
/// `RuntimeInvisibleAnnotations`).
pub(super) fn parse_annotations<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<Vec<AnnotationRecord>, ParseError> {
    let count: u16 = reader.read_value()?;
    (0..count).map(|_| parse_annotation(reader, pool)).collect()
}

/// Parses `RuntimeVisible/InvisibleParameterAnnotations`: a `u8` parameter
/// count, each followed by one annotation list.
pub(super) fn parse_parameter_annotations<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<Vec<Vec<AnnotationRecord>>, ParseError> {
    let num_parameters: u8 = reader.read_value()?;
    (0..num_parameters)
        .map(|_| parse_annotations(reader, pool))
        .collect()
}

/// Parses a bare `element_value` (used by `AnnotationDefault`, which has no
/// surrounding name/count wrapper).
pub(super) fn parse_annotation_default<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<AnnotationValue, ParseError> {
    parse_element_value(reader, pool)
}

fn parse_element_value<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<AnnotationValue, ParseError> {
    let tag: u8 = reader.read_value()?;
    match tag {
        b'B' | b'C' | b'I' | b'S' => {
            let index: u16 = reader.read_value()?;
            Ok(AnnotationValue::Const(pool.get_constant_value(index)?))
        }
        b'Z' => {
            let index: u16 = reader.read_value()?;
            let ConstantValue::Integer(v) = pool.get_constant_value(index)? else {
                return Err(ParseError::MalformedClassFile(
                    "boolean element value did not resolve to an Integer constant",
                ));
            };
            Ok(AnnotationValue::Bool(v != 0))
        }
        b'D' | b'F' | b'J' => {
            let index: u16 = reader.read_value()?;
            Ok(AnnotationValue::Const(pool.get_constant_value(index)?))
        }
        b's' => {
            let index: u16 = reader.read_value()?;
            Ok(AnnotationValue::Const(ConstantValue::String(
                pool.get_str(index)?.to_owned(),
            )))
        }
        b'e' => {
            let type_index: u16 = reader.read_value()?;
            let enum_type = annotation_class_name(pool.get_str(type_index)?)?;
            let const_name_index: u16 = reader.read_value()?;
            let const_name = pool.get_str(const_name_index)?.to_owned();
            Ok(AnnotationValue::EnumConstant { enum_type, const_name })
        }
        b'c' => {
            let class_info_index: u16 = reader.read_value()?;
            let descriptor = pool.get_str(class_info_index)?.to_owned();
            let field_type = descriptor
                .parse::<FieldType>()
                .unwrap_or(FieldType::Object(ClassName::new(descriptor)));
            Ok(AnnotationValue::Class(field_type))
        }
        b'@' => Ok(AnnotationValue::Annotation(Box::new(parse_annotation(
            reader, pool,
        )?))),
        b'[' => {
            let count: u16 = reader.read_value()?;
            let values = (0..count)
                .map(|_| parse_element_value(reader, pool))
                .collect::<Result<_, _>>()?;
            Ok(AnnotationValue::Array(values))
        }
        other => Err(ParseError::InvalidElementValueTag(other)),
    }
}

/// Annotation-type names in the constant pool are full field descriptors
/// (`Lcom/acme/Dep;`), not bare binary names; this strips the wrapper.
fn annotation_class_name(descriptor: &str) -> Result<ClassName, ParseError> {
    let inner = descriptor
        .strip_prefix('L')
        .and_then(|s| s.strip_suffix(';'))
        .ok_or(ParseError::MalformedClassFile(
            "annotation type descriptor was not a class type",
        ))?;
    Ok(ClassName::new(inner))
}
