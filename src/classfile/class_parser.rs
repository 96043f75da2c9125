//! The top-level classfile driver (JVMS §4.1): magic, version, constant
//! pool, access flags, `this_class`/`super_class`, interfaces, fields,
//! methods, and class attributes, assembled into an
//! [`UnlinkedClassRecord`].

use std::io::Read;

use super::attribute::parse_attributes;
use super::constant_pool::ConstantPool;
use super::error::ParseError;
use super::field_info::parse_field;
use super::method_info::parse_method;
use super::reader::ValueReaderExt;
use crate::classpath::ClassPathElement;
use crate::macros::extract_attributes;
use crate::model::record::Modifiers;
use crate::model::unlinked::UnlinkedClassRecord;
use crate::spec::ScanSpec;
use crate::types::ClassName;

const JAVA_CLASS_MAGIC: u32 = 0xCAFE_BABE;

/// `java.lang.annotation.Inherited`'s binary name, used to detect the
/// `@Inherited` meta-annotation on annotation-type classes.
const INHERITED_ANNOTATION: &str = "java/lang/annotation/Inherited";

/// Parses one classfile, applying the scan spec's member-visibility and
/// indexing filters as the record is assembled.
///
/// Returns `Ok(None)` if the class name fails [`ScanSpec::accepts_class`]
/// (this short-circuits before the interfaces/fields/methods/
/// attributes tables are parsed at all — only the constant pool and the
/// handful of fixed-size fields needed to learn the class's own name have
/// to be read first, since `this_class` is itself a constant pool index).
///
/// # Errors
///
/// [`ParseError`] for any structural problem in the classfile. A failure
/// here is scoped to this one file; callers treat it as non-fatal.
pub fn parse_class<R: Read + ?Sized>(
    reader: &mut R,
    spec: &ScanSpec,
    origin: ClassPathElement,
) -> Result<Option<UnlinkedClassRecord>, ParseError> {
    let magic: u32 = reader.read_value()?;
    if magic != JAVA_CLASS_MAGIC {
        return Err(ParseError::NotAClassFile);
    }
    let minor: u16 = reader.read_value()?;
    let major: u16 = reader.read_value()?;
    if !(45..=68).contains(&major) {
        return Err(ParseError::UnsupportedVersion { major, minor });
    }

    let constant_pool_count: u16 = reader.read_value()?;
    let pool = ConstantPool::from_reader(reader, constant_pool_count)?;

    let access_flags: u16 = reader.read_value()?;
    let modifiers = Modifiers::from_bits_truncate(access_flags);
    let is_interface = modifiers.contains(Modifiers::INTERFACE);
    let is_annotation = modifiers.contains(Modifiers::ANNOTATION);

    let this_class_index: u16 = reader.read_value()?;
    let name = pool.get_class_name(this_class_index)?;

    if !spec.accepts_class(name.as_str()) {
        return Ok(None);
    }

    let super_class_index: u16 = reader.read_value()?;
    let superclass = match super_class_index {
        0 if name.as_str() == "java/lang/Object" => None,
        0 if modifiers.contains(Modifiers::MODULE) => None,
        0 => return Err(ParseError::MalformedClassFile(
            "class must have a superclass except for java/lang/Object or a module",
        )),
        index => Some(pool.get_class_name(index)?),
    };

    let interfaces_count: u16 = reader.read_value()?;
    let interfaces = (0..interfaces_count)
        .map(|_| {
            let index: u16 = reader.read_value()?;
            pool.get_class_name(index)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let fields_count: u16 = reader.read_value()?;
    let all_fields = (0..fields_count)
        .map(|_| parse_field(reader, &pool))
        .collect::<Result<Vec<_>, _>>()?;

    let methods_count: u16 = reader.read_value()?;
    let all_methods = (0..methods_count)
        .map(|_| parse_method(reader, &pool))
        .collect::<Result<Vec<_>, _>>()?;

    let class_attrs = parse_attributes(reader, &pool)?;

    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing)? != 0 {
        return Err(ParseError::UnexpectedData);
    }

    extract_attributes!(for class_attrs in "class_file" by {
        let signature: Signature,
        let visible_annotations: RuntimeVisibleAnnotations,
        let invisible_annotations: RuntimeInvisibleAnnotations,
        let inner_classes_attr: InnerClasses,
        let enclosing_method_attr: EnclosingMethod,
    });

    let mut annotations = visible_annotations.unwrap_or_default();
    annotations.extend(invisible_annotations.unwrap_or_default());
    let is_inherited_annotation =
        is_annotation && annotations.iter().any(|a| a.annotation_class.as_str() == INHERITED_ANNOTATION);

    let enclosing_method = enclosing_method_attr;

    let fields = filter_fields(all_fields, spec);
    let (methods, annotation_defaults) = filter_methods(all_methods, spec);

    Ok(Some(UnlinkedClassRecord {
        name,
        modifiers,
        is_interface,
        is_annotation,
        superclass,
        interfaces,
        signature,
        enclosing_method,
        inner_classes: inner_classes_attr.unwrap_or_default(),
        annotations,
        fields,
        methods,
        annotation_defaults,
        origin,
        is_inherited_annotation,
    }))
}

fn filter_fields(
    fields: Vec<crate::model::record::FieldRecord>,
    spec: &ScanSpec,
) -> Vec<crate::model::record::FieldRecord> {
    if !spec.index_fields {
        return Vec::new();
    }
    fields
        .into_iter()
        .filter(|f| spec.ignore_field_visibility || f.modifiers.is_public())
        .map(|mut f| {
            if !spec.index_static_final_field_constants {
                f.constant_value = None;
            }
            if !spec.index_field_annotations && !spec.enable_annotation_info {
                f.annotations.clear();
            }
            f
        })
        .collect()
}

fn filter_methods(
    methods: Vec<(crate::model::record::MethodRecord, Option<crate::model::record::AnnotationValue>)>,
    spec: &ScanSpec,
) -> (Vec<crate::model::record::MethodRecord>, Vec<(String, crate::model::record::AnnotationValue)>) {
    let wants_methods = spec.index_methods || spec.index_method_annotations;
    let mut annotation_defaults = Vec::new();
    if !wants_methods {
        for (method, default) in methods {
            if let Some(value) = default {
                annotation_defaults.push((method.name, value));
            }
        }
        return (Vec::new(), annotation_defaults);
    }

    let visible_only = spec.index_methods;
    let methods = methods
        .into_iter()
        .filter(|(m, _)| spec.ignore_method_visibility || m.modifiers.is_public())
        .filter_map(|(mut m, default)| {
            if let Some(value) = default {
                annotation_defaults.push((m.name.clone(), value));
            }
            if !spec.index_method_annotations && !spec.enable_annotation_info {
                m.annotations.clear();
                m.parameter_annotations.iter_mut().for_each(Vec::clear);
            }
            let has_annotations = !m.annotations.is_empty();
            if visible_only || has_annotations {
                Some(m)
            } else {
                None
            }
        })
        .collect();

    (methods, annotation_defaults)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(bytes: &mut Vec<u8>, s: &str) {
        bytes.push(1);
        bytes.extend((s.len() as u16).to_be_bytes());
        bytes.extend(s.as_bytes());
    }

    fn class_entry(bytes: &mut Vec<u8>, name_index: u16) {
        bytes.push(7);
        bytes.extend(name_index.to_be_bytes());
    }

    fn test_origin() -> ClassPathElement {
        ClassPathElement::new(
            std::path::PathBuf::from("/classes"),
            None,
            crate::classpath::ClasspathRootKind::Directory,
        )
    }

    /// Builds a minimal classfile for `class com/acme/A extends java/lang/Object`.
    fn minimal_class_bytes() -> Vec<u8> {
        let mut pool = Vec::new();
        utf8(&mut pool, "com/acme/A"); // 1
        class_entry(&mut pool, 1); // 2: Class -> com/acme/A
        utf8(&mut pool, "java/lang/Object"); // 3
        class_entry(&mut pool, 3); // 4: Class -> java/lang/Object

        let mut body = Vec::new();
        body.extend(JAVA_CLASS_MAGIC.to_be_bytes());
        body.extend(0u16.to_be_bytes()); // minor
        body.extend(61u16.to_be_bytes()); // major
        body.extend(5u16.to_be_bytes()); // constant_pool_count
        body.extend(&pool);
        body.extend(0x0021u16.to_be_bytes()); // ACC_PUBLIC | ACC_SUPER
        body.extend(2u16.to_be_bytes()); // this_class
        body.extend(4u16.to_be_bytes()); // super_class
        body.extend(0u16.to_be_bytes()); // interfaces_count
        body.extend(0u16.to_be_bytes()); // fields_count
        body.extend(0u16.to_be_bytes()); // methods_count
        body.extend(0u16.to_be_bytes()); // attributes_count
        body
    }

    #[test]
    fn parses_a_minimal_class() {
        let spec = ScanSpec::builder().build().unwrap();
        let bytes = minimal_class_bytes();
        let mut reader = bytes.as_slice();
        let record = parse_class(&mut reader, &spec, test_origin()).unwrap().unwrap();
        assert_eq!(record.name.as_str(), "com/acme/A");
        assert_eq!(record.superclass.as_ref().map(ClassName::as_str), Some("java/lang/Object"));
        assert!(!record.is_interface);
        assert!(record.fields.is_empty());
    }

    #[test]
    fn blacklisted_class_short_circuits_to_none() {
        let spec = ScanSpec::builder()
            .with_blacklist_packages(["com/acme/"])
            .build()
            .unwrap();
        let bytes = minimal_class_bytes();
        let mut reader = bytes.as_slice();
        let result = parse_class(&mut reader, &spec, test_origin()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn bad_magic_is_rejected() {
        let spec = ScanSpec::builder().build().unwrap();
        let bytes = vec![0, 0, 0, 0];
        let mut reader = bytes.as_slice();
        let err = parse_class(&mut reader, &spec, test_origin()).unwrap_err();
        assert!(matches!(err, ParseError::NotAClassFile));
    }
}
