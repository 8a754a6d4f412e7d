//! Helper macros

/// Declare a one-byte wire enum with an `Unknown(u8)` fallback.
///
/// Generates `From<u8>` and `From<Enum> for u8`. `From<u8>` never produces
/// `Unknown` for a value that has a named variant.
macro_rules! byte_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value without a named variant
            Unknown(u8),
        }

        impl From<u8> for $name {
            fn from(byte: u8) -> Self {
                match byte {
                    $( $value => $name::$variant, )+
                    other => $name::Unknown(other),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                match value {
                    $( $name::$variant => $value, )+
                    $name::Unknown(other) => other,
                }
            }
        }
    };
}

/// Implement `DataObject` for a `byte_enum!` type carried as a one-byte value.
macro_rules! byte_object {
    ($name:ident, $object:literal) => {
        impl $crate::objects::DataObject for $name {
            fn decode(value: &[u8]) -> Result<Self, $crate::objects::ObjectError> {
                $crate::objects::expect_len($object, value, 1)?;
                Ok(value[0].into())
            }

            fn encode(&self, out: &mut Vec<u8>) -> Result<(), $crate::objects::ObjectError> {
                out.push((*self).into());
                Ok(())
            }
        }
    };
}
