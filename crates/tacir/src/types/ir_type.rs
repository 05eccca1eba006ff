//! C type tree as seen by the IR
//!
//! Only what the IR needs to know about a type: its category, its size and
//! alignment on an LP64 target, and how to print it.

use std::fmt;

/// A node in the type tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IrType {
    pub kind: IrTypeKind,
    /// Size in bytes
    pub size: usize,
    /// Alignment in bytes
    pub align: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrTypeKind {
    /// Void type (no value)
    Void,

    /// Integer type, including `char` and `_Bool`
    Int {
        bits: u8,        // 8, 16, 32, 64
        signed: bool,
    },

    /// Floating point
    Real { bits: u8 },  // 32, 64

    /// Pointer type
    Pointer(Box<IrType>),

    /// Array type; `count` is `None` for incomplete arrays
    Array {
        element: Box<IrType>,
        count: Option<usize>,
    },
}

impl IrType {
    // ==================== LP64 type constructors ====================

    /// Void type (size 0)
    pub fn void() -> Self {
        Self { kind: IrTypeKind::Void, size: 0, align: 1 }
    }

    /// Plain `char` (signed on this target)
    pub fn char() -> Self {
        Self::int(8, true)
    }

    /// `int`
    pub fn int32() -> Self {
        Self::int(32, true)
    }

    /// `long`
    pub fn long() -> Self {
        Self::int(64, true)
    }

    /// Integer of the given width. Size and alignment are the width in bytes.
    pub fn int(bits: u8, signed: bool) -> Self {
        let size = usize::from(bits / 8);
        Self { kind: IrTypeKind::Int { bits, signed }, size, align: size }
    }

    /// `double`
    pub fn double() -> Self {
        Self { kind: IrTypeKind::Real { bits: 64 }, size: 8, align: 8 }
    }

    /// Pointer type (64-bit)
    pub fn ptr(inner: IrType) -> Self {
        Self {
            kind: IrTypeKind::Pointer(Box::new(inner)),
            size: 8,
            align: 8,
        }
    }

    /// Array type. Incomplete arrays have size 0 until completed.
    pub fn array(element: IrType, count: Option<usize>) -> Self {
        let size = element.size * count.unwrap_or(0);
        let align = element.align;
        Self {
            kind: IrTypeKind::Array {
                element: Box::new(element),
                count,
            },
            size,
            align,
        }
    }

    // ==================== Type queries ====================

    pub fn is_void(&self) -> bool {
        matches!(self.kind, IrTypeKind::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.kind, IrTypeKind::Int { .. })
    }

    pub fn is_real(&self) -> bool {
        matches!(self.kind, IrTypeKind::Real { .. })
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, IrTypeKind::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, IrTypeKind::Array { .. })
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IrTypeKind::Void => write!(f, "void"),
            IrTypeKind::Int { bits, signed } => {
                if !signed {
                    write!(f, "unsigned ")?;
                }
                match bits {
                    8 => write!(f, "char"),
                    16 => write!(f, "short"),
                    32 => write!(f, "int"),
                    _ => write!(f, "long"),
                }
            }
            IrTypeKind::Real { bits: 32 } => write!(f, "float"),
            IrTypeKind::Real { .. } => write!(f, "double"),
            IrTypeKind::Pointer(inner) => write!(f, "{} *", inner),
            IrTypeKind::Array { element, count: Some(n) } => write!(f, "[{}] {}", n, element),
            IrTypeKind::Array { element, count: None } => write!(f, "[] {}", element),
        }
    }
}
