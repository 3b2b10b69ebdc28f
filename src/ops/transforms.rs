// src/ops/transforms.rs

//! Pure string transforms applied by machines.
//!
//! All transforms work on `char`s and are total: inputs below the minimum
//! length for an operation are returned unchanged.

use crate::types::{MachineId, Operation};

/// Apply `op` to `product`.
pub fn apply(op: Operation, product: &str) -> String {
    match op {
        Operation::Enhance => enhance(product),
        Operation::Reverse => reverse(product),
        Operation::Chop => chop(product),
        Operation::Trim => trim(product),
        Operation::Split => split(product),
    }
}

/// Duplicate the first and last character: `"ABC"` becomes `"AABCC"`.
pub fn enhance(product: &str) -> String {
    let (Some(first), Some(last)) = (product.chars().next(), product.chars().next_back()) else {
        return String::new();
    };

    let mut out = String::with_capacity(product.len() + first.len_utf8() + last.len_utf8());
    out.push(first);
    out.push_str(product);
    out.push(last);
    out
}

pub fn reverse(product: &str) -> String {
    product.chars().rev().collect()
}

/// Drop the last character, unless there is at most one.
pub fn chop(product: &str) -> String {
    let len = product.chars().count();
    if len <= 1 {
        return product.to_string();
    }
    product.chars().take(len - 1).collect()
}

/// Drop the first and last character, unless there are at most two.
pub fn trim(product: &str) -> String {
    let len = product.chars().count();
    if len <= 2 {
        return product.to_string();
    }
    product.chars().skip(1).take(len - 2).collect()
}

/// Keep the left half. For odd lengths the middle character stays left.
pub fn split(product: &str) -> String {
    let len = product.chars().count();
    product.chars().take(len.div_ceil(2)).collect()
}

/// Merge children outputs ordered by child id, regardless of the order in
/// which they were received.
pub fn combine(mut parts: Vec<(MachineId, String)>) -> String {
    parts.sort_by_key(|(id, _)| *id);
    parts.into_iter().map(|(_, product)| product).collect()
}
