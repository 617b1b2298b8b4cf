//! µC type system
//!
//! Types are built once from declared syntax and compared structurally.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of basic types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BasicKind {
    Char,
    Int,
    Void,
}

impl BasicKind {
    /// Look up a built-in type name
    pub fn from_name(name: &str) -> Option<BasicKind> {
        match name {
            "char" => Some(BasicKind::Char),
            "int" => Some(BasicKind::Int),
            "void" => Some(BasicKind::Void),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Char => "char",
            BasicKind::Int => "int",
            BasicKind::Void => "void",
        }
    }
}

/// A function parameter; the name is optional
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: Option<String>,
    pub ty: Type,
}

/// Parameter names do not take part in type equality.
impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for Field {}

/// µC types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Basic(BasicKind),
    /// Array of `len` elements; a length of 0 means unsized (`int[]`)
    Array { elem: Box<Type>, len: usize },
    Function { result: Box<Type>, params: Vec<Field> },
}

impl Type {
    pub const CHAR: Type = Type::Basic(BasicKind::Char);
    pub const INT: Type = Type::Basic(BasicKind::Int);
    pub const VOID: Type = Type::Basic(BasicKind::Void);

    pub fn array(elem: Type, len: usize) -> Type {
        Type::Array {
            elem: Box::new(elem),
            len,
        }
    }

    pub fn function(result: Type, params: Vec<Field>) -> Type {
        Type::Function {
            result: Box::new(result),
            params,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Basic(BasicKind::Void))
    }

    /// `char` or `int`
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Basic(BasicKind::Char | BasicKind::Int))
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Type::Basic(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    /// Element type of an array
    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Result type of a function
    pub fn result(&self) -> Option<&Type> {
        match self {
            Type::Function { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Parameters of a function
    pub fn params(&self) -> Option<&[Field]> {
        match self {
            Type::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Whether a function takes no arguments, spelled `(void)`
    pub fn takes_void(&self) -> bool {
        matches!(self.params(), Some([only]) if only.ty.is_void())
    }

    /// Whether a value of this type may be passed for a parameter of type
    /// `param`. Equal types match, and so does an array for an unsized
    /// array parameter of the same element type.
    pub fn is_compatible_arg(&self, param: &Type) -> bool {
        match (self, param) {
            (Type::Array { elem, .. }, Type::Array { elem: param_elem, len: 0 }) => {
                elem == param_elem
            }
            _ => self == param,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Basic(kind) => write!(f, "{}", kind.name()),
            Type::Array { elem, len: 0 } => write!(f, "{}[]", elem),
            Type::Array { elem, len } => write!(f, "{}[{}]", elem, len),
            Type::Function { result, params } => {
                write!(f, "{}(", result)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.ty)?;
                }
                write!(f, ")")
            }
        }
    }
}
