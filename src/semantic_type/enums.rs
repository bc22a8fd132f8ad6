//! Shared behaviour of the semantic type enumerations.
//!
//! Every enumeration packed into an identifier has a `None` value (0, "unset")
//! and a `Match` value (all bits of its field set). The [`semantic_enum!`]
//! macro generates the enum together with its byte conversions and names.

use std::borrow::Cow;

/// Common interface of the enumerations stored in a semantic type identifier.
pub trait SemanticEnum: Copy + Eq + Sized + 'static {
    /// The zero value, meaning "unset".
    const NONE: Self;
    /// The all-bits-set value.
    const MATCH: Self;
    /// Every value of the enumeration, in discriminant order.
    const ALL: &'static [Self];

    fn from_u8(value: u8) -> Option<Self>;
    fn as_u8(self) -> u8;
    fn name(self) -> &'static str;

    /// Decode `value`, mapping unknown bit patterns to [`Self::NONE`].
    fn from_u8_or_none(value: u8) -> Self {
        Self::from_u8(value).unwrap_or(Self::NONE)
    }

    fn is_none(self) -> bool {
        self == Self::NONE
    }

    fn is_match(self) -> bool {
        self == Self::MATCH
    }
}

/// A value that occupies one 8-bit slot of the content sub-descriptor.
pub trait SlotValue: Copy + Default + Eq {
    /// Decode a raw slot byte. Unknown values decode to the unset value.
    fn from_slot(raw: u8) -> Self;
    fn to_slot(self) -> u8;
    /// Human-readable rendering used by `Display` impls.
    fn label(self) -> Cow<'static, str>;
}

macro_rules! semantic_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl $name {
            pub const fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )+
                    _ => None,
                }
            }

            pub const fn as_u8(self) -> u8 {
                self as u8
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::None
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl $crate::semantic_type::SemanticEnum for $name {
            const NONE: Self = Self::None;
            const MATCH: Self = Self::Match;
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn from_u8(value: u8) -> Option<Self> {
                $name::from_u8(value)
            }

            fn as_u8(self) -> u8 {
                $name::as_u8(self)
            }

            fn name(self) -> &'static str {
                $name::name(self)
            }
        }

        impl $crate::semantic_type::SlotValue for $name {
            fn from_slot(raw: u8) -> Self {
                <Self as $crate::semantic_type::SemanticEnum>::from_u8_or_none(raw)
            }

            fn to_slot(self) -> u8 {
                self.as_u8()
            }

            fn label(self) -> std::borrow::Cow<'static, str> {
                std::borrow::Cow::Borrowed(self.name())
            }
        }
    };
}

pub(crate) use semantic_enum;

semantic_enum! {
    /// Custom slot with no content-specific meaning.
    pub enum EmptyCustomType {
        None = 0x00 => "None",
        Match = 0xFF => "Match",
    }
}

semantic_enum! {
    /// Custom-mask slot with no content-specific meaning.
    pub enum EmptyMaskType {
        None = 0x00 => "None",
        Match = 0xFF => "Match",
    }
}
