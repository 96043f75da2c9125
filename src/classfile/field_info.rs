//! `field_info` structure parsing.

use std::io::Read;
use std::str::FromStr;

use super::attribute::parse_attributes;
use super::constant_pool::ConstantPool;
use super::error::ParseError;
use super::reader::ValueReaderExt;
use crate::macros::extract_attributes;
use crate::model::record::{FieldRecord, Modifiers};
use crate::types::FieldType;

/// Parses one `field_info` structure (JVMS §4.5).
pub(super) fn parse_field<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<FieldRecord, ParseError> {
    let access_flags: u16 = reader.read_value()?;
    let modifiers = Modifiers::from_bits_truncate(access_flags);
    let name_index: u16 = reader.read_value()?;
    let name = pool.get_str(name_index)?.to_owned();
    let descriptor_index: u16 = reader.read_value()?;
    let field_type = FieldType::from_str(pool.get_str(descriptor_index)?)?;

    let attrs = parse_attributes(reader, pool)?;
    extract_attributes!(for attrs in "field_info" by {
        let constant_value: ConstantValue,
        let signature: Signature,
        let visible_annotations: RuntimeVisibleAnnotations,
        let invisible_annotations: RuntimeInvisibleAnnotations,
    });

    let mut annotations = visible_annotations.unwrap_or_default();
    annotations.extend(invisible_annotations.unwrap_or_default());

    Ok(FieldRecord {
        modifiers,
        name,
        field_type,
        signature,
        parsed_signature: None,
        constant_value,
        annotations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(bytes: &mut Vec<u8>, s: &str) {
        bytes.push(1);
        bytes.extend((s.len() as u16).to_be_bytes());
        bytes.extend(s.as_bytes());
    }

    #[test]
    fn parses_a_plain_int_field() {
        let mut pool_bytes = Vec::new();
        utf8(&mut pool_bytes, "count"); // 1
        utf8(&mut pool_bytes, "I"); // 2
        let mut pool_reader = pool_bytes.as_slice();
        let pool = ConstantPool::from_reader(&mut pool_reader, 3).unwrap();

        let mut body = Vec::new();
        body.extend(0x0002u16.to_be_bytes()); // ACC_PRIVATE
        body.extend(1u16.to_be_bytes()); // name
        body.extend(2u16.to_be_bytes()); // descriptor
        body.extend(0u16.to_be_bytes()); // no attributes

        let mut reader = body.as_slice();
        let field = parse_field(&mut reader, &pool).unwrap();
        assert_eq!(field.name, "count");
        assert_eq!(field.field_type, FieldType::from_str("I").unwrap());
        assert!(field.modifiers.contains(Modifiers::PRIVATE));
        assert!(field.constant_value.is_none());
    }
}
