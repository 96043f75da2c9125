//! The constant pool and its entries.

use std::io::Read;

use super::error::ParseError;
use super::reader::{FromReader, ValueReaderExt, read_byte_chunk};
use crate::model::constant::ConstantValue;
use crate::types::ClassName;

#[derive(Debug, Clone)]
enum Slot {
    Entry(Entry),
    /// The unused second half of a Long/Double's two-slot footprint.
    Padding,
}

/// The constant pool of a single classfile.
#[derive(Debug, Clone)]
pub struct ConstantPool {
    inner: Vec<Slot>,
}

/// A single constant pool entry.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Entry {
    /// Modified UTF-8 (CESU-8) string.
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Entry {
    const fn kind_name(&self) -> &'static str {
        match self {
            Self::Utf8(_) => "Utf8",
            Self::Integer(_) => "Integer",
            Self::Float(_) => "Float",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Class { .. } => "Class",
            Self::String { .. } => "String",
            Self::FieldRef { .. } => "Fieldref",
            Self::MethodRef { .. } => "Methodref",
            Self::InterfaceMethodRef { .. } => "InterfaceMethodref",
            Self::NameAndType { .. } => "NameAndType",
            Self::MethodHandle { .. } => "MethodHandle",
            Self::MethodType { .. } => "MethodType",
            Self::Dynamic { .. } => "Dynamic",
            Self::InvokeDynamic { .. } => "InvokeDynamic",
            Self::Module { .. } => "Module",
            Self::Package { .. } => "Package",
        }
    }

    fn parse<R: Read + ?Sized>(reader: &mut R) -> Result<Self, ParseError> {
        let tag: u8 = reader.read_value()?;
        match tag {
            1 => {
                let length: u16 = reader.read_value()?;
                let bytes = read_byte_chunk(reader, length.into())?;
                let s = cesu8::from_java_cesu8(&bytes).map_err(|_| ParseError::BrokenUtf8)?;
                Ok(Self::Utf8(s.into_owned()))
            }
            3 => Ok(Self::Integer(reader.read_value()?)),
            4 => Ok(Self::Float(reader.read_value()?)),
            5 => Ok(Self::Long(reader.read_value()?)),
            6 => Ok(Self::Double(reader.read_value()?)),
            7 => Ok(Self::Class { name_index: reader.read_value()? }),
            8 => Ok(Self::String { string_index: reader.read_value()? }),
            9 => Ok(Self::FieldRef {
                class_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            }),
            10 => Ok(Self::MethodRef {
                class_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            }),
            11 => Ok(Self::InterfaceMethodRef {
                class_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            }),
            12 => Ok(Self::NameAndType {
                name_index: reader.read_value()?,
                descriptor_index: reader.read_value()?,
            }),
            15 => Ok(Self::MethodHandle {
                reference_kind: reader.read_value()?,
                reference_index: reader.read_value()?,
            }),
            16 => Ok(Self::MethodType { descriptor_index: reader.read_value()? }),
            17 => Ok(Self::Dynamic {
                bootstrap_method_attr_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            }),
            18 => Ok(Self::InvokeDynamic {
                bootstrap_method_attr_index: reader.read_value()?,
                name_and_type_index: reader.read_value()?,
            }),
            19 => Ok(Self::Module { name_index: reader.read_value()? }),
            20 => Ok(Self::Package { name_index: reader.read_value()? }),
            other => Err(ParseError::UnexpectedConstantPoolTag(other)),
        }
    }
}

/// A constant pool index did not point at a live entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bad constant pool index: {0}")]
pub struct BadConstantPoolIndex(pub u16);

impl ConstantPool {
    /// Parses `constant_pool_count - 1` entries (the pool is 1-indexed and
    /// `Long`/`Double` entries occupy two slots).
    pub(crate) fn from_reader<R: Read + ?Sized>(
        reader: &mut R,
        constant_pool_count: u16,
    ) -> Result<Self, ParseError> {
        let count = usize::from(constant_pool_count);
        let mut inner = Vec::with_capacity(count);
        inner.push(Slot::Padding);
        while inner.len() < count {
            let entry = Entry::parse(reader)?;
            if matches!(entry, Entry::Long(_) | Entry::Double(_)) {
                inner.push(Slot::Entry(entry));
                inner.push(Slot::Padding);
            } else {
                inner.push(Slot::Entry(entry));
            }
        }
        Ok(Self { inner })
    }

    /// Looks up the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BadConstantPoolIndex`] if `index` is zero, out of range,
    /// or the unused second half of a Long/Double.
    pub fn get_entry(&self, index: u16) -> Result<&Entry, BadConstantPoolIndex> {
        match self.inner.get(usize::from(index)) {
            Some(Slot::Entry(entry)) => Ok(entry),
            _ => Err(BadConstantPoolIndex(index)),
        }
    }

    /// Looks up a [`Entry::Utf8`] string at `index`.
    ///
    /// # Errors
    ///
    /// [`ParseError::BadConstantPoolIndex`] if the index is invalid,
    /// [`ParseError::MismatchedConstantPoolEntryType`] if it is not a
    /// UTF-8 entry.
    pub fn get_str(&self, index: u16) -> Result<&str, ParseError> {
        match self.get_entry(index)? {
            Entry::Utf8(s) => Ok(s.as_str()),
            other => Err(ParseError::MismatchedConstantPoolEntryType {
                expected: "Utf8",
                found: other.kind_name(),
            }),
        }
    }

    /// Resolves a [`Entry::Class`] at `index` to a [`ClassName`].
    ///
    /// # Errors
    ///
    /// As [`ConstantPool::get_str`], plus the same if the entry is not a
    /// `Class` entry.
    pub fn get_class_name(&self, index: u16) -> Result<ClassName, ParseError> {
        match self.get_entry(index)? {
            Entry::Class { name_index } => Ok(ClassName::new(self.get_str(*name_index)?)),
            other => Err(ParseError::MismatchedConstantPoolEntryType {
                expected: "Class",
                found: other.kind_name(),
            }),
        }
    }

    /// Resolves the pool-expressible constant value at `index` (integer,
    /// float, long, double, or string).
    ///
    /// # Errors
    ///
    /// As [`ConstantPool::get_entry`], plus a mismatch error if the entry
    /// is not one of the constant kinds.
    pub fn get_constant_value(&self, index: u16) -> Result<ConstantValue, ParseError> {
        match self.get_entry(index)? {
            Entry::Integer(v) => Ok(ConstantValue::Integer(*v)),
            Entry::Float(v) => Ok(ConstantValue::Float(*v)),
            Entry::Long(v) => Ok(ConstantValue::Long(*v)),
            Entry::Double(v) => Ok(ConstantValue::Double(*v)),
            Entry::String { string_index } => {
                Ok(ConstantValue::String(self.get_str(*string_index)?.to_owned()))
            }
            other => Err(ParseError::MismatchedConstantPoolEntryType {
                expected: "constant value",
                found: other.kind_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8_entry(s: &str) -> Vec<u8> {
        let mut bytes = vec![1u8];
        bytes.extend((s.len() as u16).to_be_bytes());
        bytes.extend(s.as_bytes());
        bytes
    }

    #[test]
    fn parses_utf8_and_class_entries() {
        let mut bytes = Vec::new();
        bytes.extend(utf8_entry("java/lang/Object")); // index 1
        bytes.extend([7u8, 0, 1]); // index 2: Class -> name_index 1
        let mut reader = bytes.as_slice();
        let pool = ConstantPool::from_reader(&mut reader, 3).unwrap();
        assert_eq!(pool.get_str(1).unwrap(), "java/lang/Object");
        assert_eq!(pool.get_class_name(2).unwrap().as_str(), "java/lang/Object");
    }

    #[test]
    fn long_and_double_occupy_two_slots() {
        let mut bytes = Vec::new();
        bytes.push(5u8); // Long tag
        bytes.extend(42i64.to_be_bytes());
        bytes.extend(utf8_entry("after")); // index 3 (index 2 is padding)
        let mut reader = bytes.as_slice();
        let pool = ConstantPool::from_reader(&mut reader, 4).unwrap();
        assert!(pool.get_entry(2).is_err());
        assert_eq!(pool.get_str(3).unwrap(), "after");
    }

    #[test]
    fn index_zero_is_always_invalid() {
        let mut reader = [].as_slice();
        let pool = ConstantPool::from_reader(&mut reader, 1).unwrap();
        assert!(pool.get_entry(0).is_err());
    }
}
