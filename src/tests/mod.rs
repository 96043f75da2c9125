//! Shared helpers for assembling synthetic classfile byte buffers.
//!
//! Most modules hand-roll a handful of constant pool entries inline because
//! that is all they need. A few call sites (the top-level scan pipeline in
//! particular) want a complete classfile with a superclass, interfaces,
//! fields, methods, and an annotation, so that logic lives here once instead
//! of being copied around.

use crate::model::record::AnnotationRecord;

const MAGIC: u32 = 0xCAFE_BABE;

/// A growable constant pool plus a running count, indices assigned in the
/// order entries are added (the pool is 1-indexed; index 0 is never valid).
#[derive(Default)]
struct Pool {
    bytes: Vec<u8>,
    count: u16,
}

impl Pool {
    fn push_utf8(&mut self, s: &str) -> u16 {
        self.bytes.push(1); // CONSTANT_Utf8
        self.bytes.extend((s.len() as u16).to_be_bytes());
        self.bytes.extend(s.as_bytes());
        self.count += 1;
        self.count
    }

    fn push_class(&mut self, binary_name: &str) -> u16 {
        let name_index = self.push_utf8(binary_name);
        self.bytes.push(7); // CONSTANT_Class
        self.bytes.extend(name_index.to_be_bytes());
        self.count += 1;
        self.count
    }
}

/// Builds a minimal-but-complete classfile byte buffer: a public class with
/// an optional superclass, interfaces, fields, methods, and a single marker
/// annotation, assembled one constant pool entry at a time.
///
/// This only covers what the scan pipeline's own tests need; it is not a
/// general-purpose classfile assembler.
pub(crate) struct ClassFileBuilder {
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    is_interface: bool,
    is_annotation: bool,
    annotation: Option<String>,
    fields: Vec<(String, String)>,
    methods: Vec<String>,
}

impl ClassFileBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            superclass: Some("java/lang/Object".to_owned()),
            interfaces: Vec::new(),
            is_interface: false,
            is_annotation: false,
            annotation: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub(crate) fn superclass(mut self, name: &str) -> Self {
        self.superclass = Some(name.to_owned());
        self
    }

    pub(crate) fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_owned());
        self
    }

    pub(crate) fn marker_annotation(mut self, annotation_class: &str) -> Self {
        self.annotation = Some(annotation_class.to_owned());
        self
    }

    pub(crate) fn field(mut self, name: &str, descriptor: &str) -> Self {
        self.fields.push((name.to_owned(), descriptor.to_owned()));
        self
    }

    pub(crate) fn method(mut self, name: &str) -> Self {
        self.methods.push(name.to_owned());
        self
    }

    pub(crate) fn is_interface(mut self, yes: bool) -> Self {
        self.is_interface = yes;
        self
    }

    #[must_use]
    pub(crate) fn build(self) -> Vec<u8> {
        let mut pool = Pool::default();

        let this_class = pool.push_class(&self.name);
        let super_class = match &self.superclass {
            Some(name) => pool.push_class(name),
            None => 0,
        };
        let interface_indices: Vec<u16> = self.interfaces.iter().map(|i| pool.push_class(i)).collect();

        let annotation_attr = self.annotation.as_ref().map(|class| {
            let attr_name = pool.push_utf8("RuntimeVisibleAnnotations");
            let annotation_class = pool.push_utf8(&format!("L{class};"));
            (attr_name, annotation_class)
        });

        let field_entries: Vec<(u16, u16)> = self
            .fields
            .iter()
            .map(|(name, descriptor)| (pool.push_utf8(name), pool.push_utf8(descriptor)))
            .collect();

        let method_entries: Vec<(u16, u16)> = self
            .methods
            .iter()
            .map(|name| (pool.push_utf8(name), pool.push_utf8("()V")))
            .collect();

        let mut out = Vec::new();
        out.extend(MAGIC.to_be_bytes());
        out.extend(0u16.to_be_bytes()); // minor
        out.extend(61u16.to_be_bytes()); // major (Java 17)
        out.extend((pool.count + 1).to_be_bytes());
        out.extend(&pool.bytes);

        let mut access = 0x0021u16; // ACC_PUBLIC | ACC_SUPER
        if self.is_interface {
            access |= 0x0200; // ACC_INTERFACE
            access |= 0x0400; // ACC_ABSTRACT
        }
        if self.is_annotation {
            access |= 0x2000; // ACC_ANNOTATION
            access |= 0x0200;
        }
        out.extend(access.to_be_bytes());
        out.extend(this_class.to_be_bytes());
        out.extend(super_class.to_be_bytes());

        out.extend((interface_indices.len() as u16).to_be_bytes());
        for idx in interface_indices {
            out.extend(idx.to_be_bytes());
        }

        out.extend((field_entries.len() as u16).to_be_bytes());
        for (name_index, descriptor_index) in field_entries {
            out.extend(0x0001u16.to_be_bytes()); // ACC_PUBLIC
            out.extend(name_index.to_be_bytes());
            out.extend(descriptor_index.to_be_bytes());
            out.extend(0u16.to_be_bytes()); // no field attributes
        }

        out.extend((method_entries.len() as u16).to_be_bytes());
        for (name_index, descriptor_index) in method_entries {
            out.extend(0x0001u16.to_be_bytes()); // ACC_PUBLIC
            out.extend(name_index.to_be_bytes());
            out.extend(descriptor_index.to_be_bytes());
            out.extend(0u16.to_be_bytes()); // no method attributes
        }

        match annotation_attr {
            Some((attr_name, annotation_class)) => {
                out.extend(1u16.to_be_bytes()); // attributes_count
                out.extend(attr_name.to_be_bytes());
                // num_annotations(2) + type_index(2) + num_element_value_pairs(2)
                out.extend(8u32.to_be_bytes());
                out.extend(1u16.to_be_bytes()); // num_annotations
                out.extend(annotation_class.to_be_bytes()); // type_index
                out.extend(0u16.to_be_bytes()); // num_element_value_pairs
            }
            None => out.extend(0u16.to_be_bytes()),
        }

        out
    }
}

/// A bare-bones [`AnnotationRecord`] with no parameters, for tests that only
/// care about which annotation is present, not its arguments.
pub(crate) fn marker_annotation(class_name: &str) -> AnnotationRecord {
    AnnotationRecord::new(crate::types::ClassName::new(class_name), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classfile::parse_class;
    use crate::classpath::{ClassPathElement, ClasspathRootKind};
    use crate::spec::ScanSpec;

    fn origin() -> ClassPathElement {
        ClassPathElement::new(std::path::PathBuf::from("/classes"), None, ClasspathRootKind::Directory)
    }

    #[test]
    fn builder_produces_a_parseable_class() {
        let bytes = ClassFileBuilder::new("com/acme/Widget")
            .interface("com/acme/Gadget")
            .marker_annotation("com/acme/Marker")
            .field("count", "I")
            .method("run")
            .build();

        let spec = ScanSpec::builder()
            .index_fields(true)
            .index_methods(true)
            .enable_annotation_info(true)
            .build()
            .unwrap();
        let mut reader = bytes.as_slice();
        let record = parse_class(&mut reader, &spec, origin()).unwrap().unwrap();

        assert_eq!(record.name.as_str(), "com/acme/Widget");
        assert_eq!(record.superclass.as_ref().map(crate::types::ClassName::as_str), Some("java/lang/Object"));
        assert_eq!(record.interfaces.len(), 1);
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.methods.len(), 1);
        assert_eq!(record.annotations.len(), 1);
    }
}
