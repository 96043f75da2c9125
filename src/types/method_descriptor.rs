//! Non-generic JVM method descriptors.

use std::str::FromStr;

use itertools::Itertools;

use super::{ClassName, field_type::{FieldType, PrimitiveType}};

/// The descriptor of a method: its parameter types and its return type.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, derive_more::Display)]
#[display(
    "({}){return_type}",
    parameter_types.iter().map(FieldType::descriptor).join("")
)]
pub struct MethodDescriptor {
    /// The types of the parameters, in order.
    pub parameter_types: Vec<FieldType>,
    /// The return type.
    pub return_type: ReturnType,
}

/// A method's return type.
#[derive(
    Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, derive_more::Display, derive_more::From,
)]
pub enum ReturnType {
    /// The method returns a specific type.
    Some(FieldType),
    /// The method returns `void`.
    #[display("void")]
    Void,
}

const PARAM_START: char = '(';
const PARAM_END: char = ')';
const ARRAY_MARKER: char = '[';
const OBJECT_MARKER: char = 'L';
const OBJECT_END: char = ';';

impl FromStr for MethodDescriptor {
    type Err = InvalidDescriptor;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let remaining = descriptor.strip_prefix(PARAM_START).ok_or(InvalidDescriptor)?;
        let (parameter_types, remaining) = parse_params(remaining)?;
        let return_type = ReturnType::from_str(remaining)?;
        Ok(Self {
            parameter_types,
            return_type,
        })
    }
}

fn parse_params(mut remaining: &str) -> Result<(Vec<FieldType>, &str), InvalidDescriptor> {
    let mut parameter_types = Vec::new();
    loop {
        if let Some(remaining) = remaining.strip_prefix(PARAM_END) {
            return Ok((parameter_types, remaining));
        }
        let (dimension, after_dim) = parse_array_dimension(remaining)?;
        let (base_type, after_param) = parse_next_param(after_dim)?;
        let param_type = (0..dimension).fold(base_type, |acc, _| acc.into_array_type());
        parameter_types.push(param_type);
        remaining = after_param;
    }
}

fn parse_next_param(input: &str) -> Result<(FieldType, &str), InvalidDescriptor> {
    let (first_char, remaining) = input
        .chars()
        .next()
        .map(|c| (c, &input[c.len_utf8()..]))
        .ok_or(InvalidDescriptor)?;

    match first_char {
        primitive @ ('Z' | 'C' | 'F' | 'D' | 'B' | 'S' | 'I' | 'J') => {
            let param_type = PrimitiveType::try_from(primitive).map(FieldType::Base)?;
            Ok((param_type, remaining))
        }
        OBJECT_MARKER => {
            let (class_name, rest) = remaining.split_once(OBJECT_END).ok_or(InvalidDescriptor)?;
            Ok((FieldType::Object(ClassName::new(class_name)), rest))
        }
        _ => Err(InvalidDescriptor),
    }
}

fn parse_array_dimension(input: &str) -> Result<(u8, &str), InvalidDescriptor> {
    let count = input.chars().take_while(|&c| c == ARRAY_MARKER).count();
    let remaining = &input[count..];
    let dimension = u8::try_from(count).map_err(|_| InvalidDescriptor)?;
    Ok((dimension, remaining))
}

/// The descriptor string was not a valid method or field descriptor.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid descriptor")]
pub struct InvalidDescriptor;

impl FromStr for ReturnType {
    type Err = InvalidDescriptor;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        if descriptor == "V" {
            Ok(ReturnType::Void)
        } else {
            FieldType::from_str(descriptor).map(ReturnType::Some)
        }
    }
}

impl ReturnType {
    /// Renders the descriptor string for this return type.
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            ReturnType::Some(it) => it.descriptor(),
            ReturnType::Void => "V".to_owned(),
        }
    }
}
