//! Pool-expressible constant values.

/// A `static final` field's resolved initializer, or an annotation
/// parameter's literal value.
///
/// Only constants the constant pool can express directly are represented;
/// expression-initialized finals never produce one of these.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum ConstantValue {
    /// A `byte`, `short`, `char`, `boolean`, or `int`-typed constant (the
    /// pool only ever stores these as a 32-bit integer).
    Integer(i32),
    /// A `float`-typed constant.
    Float(f32),
    /// A `long`-typed constant.
    Long(i64),
    /// A `double`-typed constant.
    Double(f64),
    /// A `String`-typed constant.
    String(String),
}
