//! `method_info` structure parsing.

use std::io::Read;
use std::str::FromStr;

use super::attribute::parse_attributes;
use super::constant_pool::ConstantPool;
use super::error::ParseError;
use super::reader::ValueReaderExt;
use crate::macros::extract_attributes;
use crate::model::record::{AnnotationValue, MethodRecord, Modifiers};
use crate::types::MethodDescriptor;

/// Parses one `method_info` structure (JVMS §4.6).
///
/// Returns the default value carried by an `AnnotationDefault` attribute
/// alongside the record: that value belongs to the owning class's
/// `annotation_defaults` table (keyed by method name), not to the method
/// record itself, since it is only ever meaningful on annotation-type
/// interface methods.
pub(super) fn parse_method<R: Read + ?Sized>(
    reader: &mut R,
    pool: &ConstantPool,
) -> Result<(MethodRecord, Option<AnnotationValue>), ParseError> {
    let access_flags: u16 = reader.read_value()?;
    let modifiers = Modifiers::from_bits_truncate(access_flags);
    let name_index: u16 = reader.read_value()?;
    let name = pool.get_str(name_index)?.to_owned();
    let descriptor_index: u16 = reader.read_value()?;
    let descriptor = MethodDescriptor::from_str(pool.get_str(descriptor_index)?)?;

    let attrs = parse_attributes(reader, pool)?;
    extract_attributes!(for attrs in "method_info" by {
        let signature: Signature,
        let exceptions: Exceptions,
        let parameter_names: MethodParameters,
        let visible_annotations: RuntimeVisibleAnnotations,
        let invisible_annotations: RuntimeInvisibleAnnotations,
        let visible_param_annotations: RuntimeVisibleParameterAnnotations,
        let invisible_param_annotations: RuntimeInvisibleParameterAnnotations,
        let annotation_default: AnnotationDefault,
    });
    let mut annotations = visible_annotations.unwrap_or_default();
    annotations.extend(invisible_annotations.unwrap_or_default());

    let parameter_annotations = merge_parameter_annotations(
        descriptor.parameter_types.len(),
        visible_param_annotations,
        invisible_param_annotations,
    );

    let method = MethodRecord {
        modifiers,
        name,
        descriptor,
        signature,
        parameter_names: parameter_names.unwrap_or_default(),
        annotations,
        parameter_annotations,
        exceptions: exceptions.unwrap_or_default(),
    };
    Ok((method, annotation_default))
}

fn merge_parameter_annotations(
    arity: usize,
    visible: Option<Vec<Vec<crate::model::record::AnnotationRecord>>>,
    invisible: Option<Vec<Vec<crate::model::record::AnnotationRecord>>>,
) -> Vec<Vec<crate::model::record::AnnotationRecord>> {
    let mut per_param = vec![Vec::new(); arity];
    for source in [visible, invisible].into_iter().flatten() {
        for (slot, anns) in per_param.iter_mut().zip(source) {
            slot.extend(anns);
        }
    }
    per_param
}
