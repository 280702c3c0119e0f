//! Symbol Mangling for C Emission
//!
//! Turns `(module, name)` pairs into C symbols that stay stable across runs
//! and do not collide across modules.
//!
//! # Mangling Scheme
//!
//! ```text
//! <prefix><module>_<name>[__<hash>]
//! ```
//!
//! Where:
//! - `<prefix>` is the configured namespace prefix (default `bootc_`)
//! - `<module>` and `<name>` are sanitized independently
//! - `<hash>` (hashed style only) is 8 lowercase hex digits: the 64-bit
//!   FNV-1a hash of `module::name` with its halves folded by XOR
//!
//! # Examples
//!
//! | Symbol | Simple | Hashed |
//! |--------|--------|--------|
//! | `main` in root | `bootc_main` | `bootc_main__<hash of "::main">` |
//! | `add` in `math` | `bootc_math_add` | `bootc_math_add__<hash of "math::add">` |
//! | `Pair` in `demo.core` | `bootc_demo_core_Pair` | `bootc_demo_core_Pair__<hash>` |
//!
//! The hash suffix keeps `a.b::c` and `a::b_c` apart even though both
//! sanitize to the same simple name.

use std::fmt::Write;

use crate::ident::qualify;
use crate::options::{EmitOptions, MangleStyle};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fallback name for a function with neither module nor name.
const FUNCTION_FALLBACK: &str = "fn";

/// Fallback name for a type with neither module nor name.
const TYPE_FALLBACK: &str = "type";

/// 64-bit FNV-1a.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Fold a 64-bit hash to 32 bits by XOR of its halves.
#[inline]
pub fn fold32(hash: u64) -> u32 {
    #[allow(clippy::cast_possible_truncation, reason = "both operands fit in 32 bits")]
    let folded = ((hash >> 32) ^ (hash & 0xffff_ffff)) as u32;
    folded
}

/// Deterministic symbol mangler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mangler {
    style: MangleStyle,
    prefix: String,
}

impl Mangler {
    pub fn new(style: MangleStyle, prefix: impl Into<String>) -> Self {
        Self {
            style,
            prefix: prefix.into(),
        }
    }

    /// Mangler configured from (normalized) options.
    pub fn from_options(options: &EmitOptions) -> Self {
        Self::new(options.mangle, options.namespace_prefix())
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Mangle a function symbol.
    ///
    /// # Arguments
    ///
    /// * `module` - The owning module (e.g. "demo.core"), empty for root
    /// * `name` - The function name
    pub fn mangle_function(&self, module: &str, name: &str) -> String {
        self.mangle(module, name, FUNCTION_FALLBACK)
    }

    /// Mangle a record type symbol.
    pub fn mangle_type(&self, module: &str, name: &str) -> String {
        self.mangle(module, name, TYPE_FALLBACK)
    }

    fn mangle(&self, module: &str, name: &str, fallback: &str) -> String {
        let mut result = qualify(&self.prefix, Some(module), Some(name), fallback);
        if self.style == MangleStyle::Hashed {
            let hash = fold32(fnv1a64(Self::hash_key(module, name).as_bytes()));
            let _ = write!(result, "__{hash:08x}");
        }
        result
    }

    /// The literal byte sequence the hashed style digests.
    fn hash_key(module: &str, name: &str) -> String {
        let mut key = String::with_capacity(module.len() + name.len() + 2);
        key.push_str(module);
        key.push_str("::");
        key.push_str(name);
        key
    }
}
