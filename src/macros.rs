#![deny(meta_variable_misuse)]

/// Pulls named variants out of a `Vec<Attribute>`, erroring on duplicates
/// and on any attribute not named in the pattern.
macro_rules! extract_attributes {
    (for $attrs: ident in $env:literal by {
         $( let $var: ident: $attr: ident $($uw: ident)?, )*
         $( if let $var_true: ident: $attr_true: ident, )*
    }) => {
        $( let mut $var = None; )*
        $( let mut $var_true = false; )*
        {
            use crate::classfile::attribute::Attribute;
            for attr in $attrs {
                match attr {
                $(
                    Attribute::$attr(it) => if $var.replace(it).is_some() {
                        return Err(crate::classfile::ParseError::MalformedClassFile(concat!(
                            "duplicate ", stringify!($attr), " attribute in ", $env
                        )));
                    },
                )*
                $(
                    Attribute::$attr_true => {
                        $var_true = true;
                    },
                )*
                    _unexpected => {}
                }
            }
        }
        $( $(let $var = $var.$uw();)? )*
    };
}

pub(crate) use extract_attributes;
