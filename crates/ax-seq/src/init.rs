//! Bulk initialisation from tagged values.
//!
//! Literal lists are written with [`items!`](crate::items) and pushed into
//! any sequence whose element type implements [`FromItem`]:
//!
//! ```
//! use ax_core::stuff::I32;
//! use ax_core::Traverse;
//! use ax_seq::{init, items, Array};
//!
//! let mut a = Array::new(I32);
//! init(&mut a, items![1, 2, 3]).unwrap();
//! assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

use std::fmt;

use ax_core::{AxError, Seq};

/// A tagged initializer value.
#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    /// `i8`
    I8(i8),
    /// `i16`
    I16(i16),
    /// `i32`
    I32(i32),
    /// `i64`
    I64(i64),
    /// `u8`
    U8(u8),
    /// `u16`
    U16(u16),
    /// `u32`
    U32(u32),
    /// `u64`
    U64(u64),
    /// `f32`
    F32(f32),
    /// `f64`
    F64(f64),
    /// `bool`
    Bool(bool),
    /// Owned string.
    Str(String),
}

impl Item {
    /// Name of the carried type.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Bool(_) => "bool",
            Self::Str(_) => "str",
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}

/// Element types that can be produced from an [`Item`].
pub trait FromItem: Sized {
    /// Extract the value, `None` if the tag does not match.
    fn from_item(item: Item) -> Option<Self>;
}

macro_rules! item_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Item {
                fn from(v: $ty) -> Self {
                    Item::$variant(v)
                }
            }

            impl FromItem for $ty {
                fn from_item(item: Item) -> Option<Self> {
                    match item {
                        Item::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

item_conversions! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => Str,
}

impl From<&str> for Item {
    fn from(v: &str) -> Self {
        Item::Str(v.to_owned())
    }
}

/// Build a `Vec<Item>` from literals.
#[macro_export]
macro_rules! items {
    ($($value:expr),* $(,)?) => {
        ::std::vec![$($crate::Item::from($value)),*]
    };
}

/// Push every item into `seq`, in order.
///
/// Stops at the first push that fails and truncates `seq` back to its
/// size on entry, so a failed call leaves the sequence as it was.
///
/// # Panics
///
/// If an item's tag does not match the element type.
pub fn init<S>(seq: &mut S, items: impl IntoIterator<Item = Item>) -> Result<(), AxError>
where
    S: Seq,
    S::Elem: FromItem,
{
    let start = seq.size();
    for item in items {
        let tag = item.tag();
        let Some(value) = S::Elem::from_item(item) else {
            panic!(
                "initializer item of type {tag} does not fit element type {}",
                seq.elem_tr().name
            );
        };
        if let Err(e) = seq.push(value) {
            seq.trunc(start)?;
            return Err(e);
        }
    }
    Ok(())
}
