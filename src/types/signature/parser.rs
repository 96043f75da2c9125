//! Recursive-descent reader for the JVM generic signature grammar.

use crate::types::ClassName;

use super::{ClassSignature, ClassTypeSignature, MethodSignature, TypeArgument, TypeParameter, TypeSignature};

/// The signature string did not conform to the grammar.
///
/// A record whose `Signature` attribute fails to parse degrades to raw
/// string storage only; this error is surfaced as a non-fatal diagnostic,
/// never as a scan failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed type signature `{signature}` at byte {position}")]
pub struct SignatureError {
    signature: String,
    position: usize,
}

struct Cursor<'a> {
    full: &'a str,
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { full: s, rest: s }
    }

    fn position(&self) -> usize {
        self.full.len() - self.rest.len()
    }

    fn err(&self) -> SignatureError {
        SignatureError {
            signature: self.full.to_owned(),
            position: self.position(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let mut chars = self.rest.chars();
        let c = chars.next()?;
        self.rest = chars.as_str();
        Some(c)
    }

    fn expect(&mut self, c: char) -> Result<(), SignatureError> {
        if self.bump() == Some(c) {
            Ok(())
        } else {
            Err(self.err())
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.rest = &self.rest[c.len_utf8()..];
            true
        } else {
            false
        }
    }

    fn take_until(&mut self, stop: &[char]) -> &'a str {
        let end = self
            .rest
            .find(|c| stop.contains(&c))
            .unwrap_or(self.rest.len());
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        taken
    }
}

/// Parses a class signature (`<T:...>Lsuper;Liface;...`).
///
/// # Errors
///
/// Returns [`SignatureError`] if the grammar is violated anywhere.
pub fn parse_class_signature(s: &str) -> Result<ClassSignature, SignatureError> {
    let mut cur = Cursor::new(s);
    let type_parameters = parse_type_parameters(&mut cur)?;
    let superclass = parse_class_type_signature(&mut cur)?;
    let mut superinterfaces = Vec::new();
    while cur.peek() == Some('L') {
        superinterfaces.push(parse_class_type_signature(&mut cur)?);
    }
    if !cur.rest.is_empty() {
        return Err(cur.err());
    }
    Ok(ClassSignature {
        type_parameters,
        superclass,
        superinterfaces,
    })
}

/// Parses a method signature (`<T:...>(Targs)Tret^Tthrows`).
///
/// # Errors
///
/// Returns [`SignatureError`] if the grammar is violated anywhere.
pub fn parse_method_signature(s: &str) -> Result<MethodSignature, SignatureError> {
    let mut cur = Cursor::new(s);
    let type_parameters = parse_type_parameters(&mut cur)?;
    cur.expect('(')?;
    let mut parameters = Vec::new();
    while cur.peek() != Some(')') {
        parameters.push(parse_type_signature_inner(&mut cur)?);
    }
    cur.expect(')')?;
    let return_type = if cur.eat('V') {
        None
    } else {
        Some(parse_type_signature_inner(&mut cur)?)
    };
    let mut throws = Vec::new();
    while cur.eat('^') {
        throws.push(if cur.peek() == Some('T') {
            parse_type_variable(&mut cur)?
        } else {
            TypeSignature::Class(parse_class_type_signature(&mut cur)?)
        });
    }
    if !cur.rest.is_empty() {
        return Err(cur.err());
    }
    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

/// Parses a standalone field/type signature, e.g. `Ljava/util/List<TT;>;` or `[I`.
///
/// # Errors
///
/// Returns [`SignatureError`] if the grammar is violated anywhere.
pub fn parse_type_signature(s: &str) -> Result<TypeSignature, SignatureError> {
    let mut cur = Cursor::new(s);
    let sig = parse_type_signature_inner(&mut cur)?;
    if !cur.rest.is_empty() {
        return Err(cur.err());
    }
    Ok(sig)
}

fn parse_type_parameters(cur: &mut Cursor<'_>) -> Result<Vec<TypeParameter>, SignatureError> {
    let mut params = Vec::new();
    if !cur.eat('<') {
        return Ok(params);
    }
    while cur.peek() != Some('>') {
        let name = cur.take_until(&[':']).to_owned();
        cur.expect(':')?;
        let class_bound = if cur.peek() == Some(':') {
            None
        } else {
            Some(parse_type_signature_inner(cur)?)
        };
        let mut interface_bounds = Vec::new();
        while cur.eat(':') {
            interface_bounds.push(parse_type_signature_inner(cur)?);
        }
        params.push(TypeParameter {
            name,
            class_bound,
            interface_bounds,
        });
    }
    cur.expect('>')?;
    Ok(params)
}

fn parse_type_variable(cur: &mut Cursor<'_>) -> Result<TypeSignature, SignatureError> {
    cur.expect('T')?;
    let name = cur.take_until(&[';']).to_owned();
    cur.expect(';')?;
    Ok(TypeSignature::TypeVariable(name))
}

fn parse_type_signature_inner(cur: &mut Cursor<'_>) -> Result<TypeSignature, SignatureError> {
    match cur.peek() {
        Some('[') => {
            cur.bump();
            Ok(TypeSignature::Array(Box::new(parse_type_signature_inner(cur)?)))
        }
        Some('T') => parse_type_variable(cur),
        Some('L') => Ok(TypeSignature::Class(parse_class_type_signature(cur)?)),
        Some(c @ ('B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z')) => {
            cur.bump();
            Ok(TypeSignature::Base(c))
        }
        _ => Err(cur.err()),
    }
}

fn parse_class_type_signature(cur: &mut Cursor<'_>) -> Result<ClassTypeSignature, SignatureError> {
    cur.expect('L')?;
    let name = cur.take_until(&['<', ';', '.']).to_owned();
    let type_arguments = parse_type_arguments(cur)?;
    let mut sig = ClassTypeSignature {
        class_name: ClassName::new(name),
        type_arguments,
        inner: None,
    };
    let mut tail = &mut sig;
    while cur.eat('.') {
        let inner_name = cur.take_until(&['<', ';', '.']).to_owned();
        let inner_args = parse_type_arguments(cur)?;
        let new_inner = ClassTypeSignature {
            class_name: ClassName::new(inner_name),
            type_arguments: inner_args,
            inner: None,
        };
        tail.inner = Some(Box::new(new_inner));
        tail = tail.inner.as_mut().expect("just inserted");
    }
    cur.expect(';')?;
    Ok(sig)
}

fn parse_type_arguments(cur: &mut Cursor<'_>) -> Result<Vec<TypeArgument>, SignatureError> {
    let mut args = Vec::new();
    if !cur.eat('<') {
        return Ok(args);
    }
    while cur.peek() != Some('>') {
        args.push(match cur.peek() {
            Some('*') => {
                cur.bump();
                TypeArgument::Unbounded
            }
            Some('+') => {
                cur.bump();
                TypeArgument::Extends(parse_type_signature_inner(cur)?)
            }
            Some('-') => {
                cur.bump();
                TypeArgument::Super(parse_type_signature_inner(cur)?)
            }
            _ => TypeArgument::Exact(parse_type_signature_inner(cur)?),
        });
    }
    cur.expect('>')?;
    Ok(args)
}
