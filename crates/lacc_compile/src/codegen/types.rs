//! LA-to-C type translation.
//!
//! | LA type | variable | parameter |
//! |---------|----------|-----------|
//! | `inteiro` | `int` | `int` |
//! | `real` | `float` | `float` |
//! | `logico` | `int` | `int` |
//! | `literal` | `char name[80]` | `char* name` |
//! | `^T` | `Tc*` | `Tc*` (`char**` for `literal`) |
//! | record | typedef name | typedef name |
//!
//! String buffers have a fixed 80-byte capacity everywhere: variables,
//! record fields, and `fgets` reads.

use lacc_base::Interner;

use crate::analysis::types::Ty;

/// Fixed capacity of every `literal` buffer.
pub(crate) const STRING_CAPACITY: usize = 80;

/// The bare C spelling of a type, without declarator decoration.
pub(crate) fn c_scalar(ty: &Ty, interner: &Interner) -> String {
    match ty {
        Ty::Inteiro | Ty::Logico => "int".to_string(),
        Ty::Real => "float".to_string(),
        Ty::Literal => "char".to_string(),
        Ty::Pointer(inner) => format!("{}*", c_scalar(inner, interner)),
        Ty::Record(sym) => interner.resolve(*sym).to_string(),
        // unreachable after a clean analysis; keep the output well-formed
        Ty::Unknown => "int".to_string(),
    }
}

/// One variable declaration line. `literal` variables become fixed buffers
/// regardless of any written bound.
pub(crate) fn c_var_decl(
    name: &str,
    ty: &Ty,
    array_len: Option<&str>,
    interner: &Interner,
) -> String {
    match ty {
        Ty::Literal => format!("char {}[{}];", name, STRING_CAPACITY),
        _ => match array_len {
            Some(len) => format!("{} {}[{}];", c_scalar(ty, interner), name, len),
            None => format!("{} {};", c_scalar(ty, interner), name),
        },
    }
}

/// Parameter spelling: strings decay to `char*`, pointers to strings to
/// `char**`.
pub(crate) fn c_param(name: &str, ty: &Ty, interner: &Interner) -> String {
    match ty {
        Ty::Literal => format!("char* {}", name),
        Ty::Pointer(inner) if **inner == Ty::Literal => format!("char** {}", name),
        _ => format!("{} {}", c_scalar(ty, interner), name),
    }
}

/// Function return spelling; a `literal` result travels as `char*`.
pub(crate) fn c_return(ty: &Ty, interner: &Interner) -> String {
    match ty {
        Ty::Literal => "char*".to_string(),
        _ => c_scalar(ty, interner),
    }
}

/// A struct member line, tab-indented like the rest of the typedef body.
pub(crate) fn c_field_decl(name: &str, ty: &Ty, interner: &Interner) -> String {
    match ty {
        Ty::Literal => format!("\tchar {}[{}];", name, STRING_CAPACITY),
        _ => format!("\t{} {};", c_scalar(ty, interner), name),
    }
}

/// `printf`/`scanf` conversion for a value of the given declared type.
pub(crate) fn printf_format(ty: &Ty) -> &'static str {
    match ty {
        Ty::Real => "%f",
        Ty::Literal => "%s",
        _ => "%d",
    }
}
