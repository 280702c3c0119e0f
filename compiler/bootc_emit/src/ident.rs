//! Identifier sanitization and qualification.
//!
//! C identifiers can only contain ASCII alphanumerics and underscores, and
//! cannot start with a digit. Everything the emitter names goes through
//! [`sanitize_identifier`] or [`qualify`] first.

/// Maximum length of a sanitized identifier.
///
/// C99 guarantees 63 significant initial characters for internal names.
pub const MAX_IDENT_LEN: usize = 63;

/// Map an arbitrary string to a valid, non-empty C identifier.
///
/// A leading `_` is prepended when the first character is not an ASCII
/// letter or underscore; every other character outside `[A-Za-z0-9_]`
/// becomes `_`. The result is truncated to [`MAX_IDENT_LEN`].
pub fn sanitize_identifier(s: &str) -> String {
    let mut result = String::with_capacity(s.len().min(MAX_IDENT_LEN) + 1);

    match s.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => result.push('_'),
    }

    for c in s.chars() {
        if result.len() >= MAX_IDENT_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else {
            result.push('_');
        }
    }

    result
}

/// Build a `prefix + module + "_" + name` symbol.
///
/// Module and name are sanitized independently; empty parts count as
/// absent:
///
/// | module | name | result |
/// |--------|------|--------|
/// | yes | yes | `prefix` `module` `_` `name` |
/// | no | yes | `prefix` `name` |
/// | yes | no | `prefix` `module` `_module` |
/// | no | no | `prefix` `fallback` |
pub fn qualify(prefix: &str, module: Option<&str>, name: Option<&str>, fallback: &str) -> String {
    let module = module.filter(|m| !m.is_empty()).map(sanitize_identifier);
    let name = name.filter(|n| !n.is_empty()).map(sanitize_identifier);

    let mut result = String::with_capacity(prefix.len() + 2 * MAX_IDENT_LEN + 1);
    result.push_str(prefix);
    match (module, name) {
        (Some(module), Some(name)) => {
            result.push_str(&module);
            result.push('_');
            result.push_str(&name);
        }
        (None, Some(name)) => result.push_str(&name),
        (Some(module), None) => {
            result.push_str(&module);
            result.push_str("_module");
        }
        (None, None) => result.push_str(fallback),
    }
    result
}

/// Sanitize a local, parameter or field name, stepping around C keywords.
pub fn local_identifier(s: &str) -> String {
    let mut result = sanitize_identifier(s);
    if is_c_keyword(&result) {
        result.push('_');
    }
    result
}

/// Check whether `s` can be emitted as a C identifier unchanged.
pub fn is_valid_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && s.len() <= MAX_IDENT_LEN
        && !is_c_keyword(s)
}

/// C11 keywords plus the `stdbool.h` spellings the emitter relies on.
pub fn is_c_keyword(s: &str) -> bool {
    matches!(
        s,
        "auto"
            | "break"
            | "case"
            | "char"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "extern"
            | "float"
            | "for"
            | "goto"
            | "if"
            | "inline"
            | "int"
            | "long"
            | "register"
            | "restrict"
            | "return"
            | "short"
            | "signed"
            | "sizeof"
            | "static"
            | "struct"
            | "switch"
            | "typedef"
            | "union"
            | "unsigned"
            | "void"
            | "volatile"
            | "while"
            | "bool"
            | "true"
            | "false"
            | "_Bool"
            | "_Generic"
            | "_Noreturn"
            | "_Static_assert"
            | "_Thread_local"
            | "_Alignas"
            | "_Alignof"
            | "_Atomic"
            | "_Complex"
            | "_Imaginary"
    )
}
