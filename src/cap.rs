//! Strict-compiler caps: keep every macro signature within 127 parameters.
use crate::family::Family;

pub const STRICT_PARAM_LIMIT: usize = 127;

/// `min(max_n, 127 - fixed_args)`, never below zero.
pub fn strict_cap(max_n: usize, fixed_args: usize) -> usize {
    max_n.min(STRICT_PARAM_LIMIT.saturating_sub(fixed_args))
}

/// As [`strict_cap`], floored to a multiple of `group`.
pub fn strict_cap_multiple(max_n: usize, fixed_args: usize, group: usize) -> usize {
    let cap = strict_cap(max_n, fixed_args);
    if group == 0 { cap } else { cap / group * group }
}

/// Largest N emitted for `family` (with `arity` for tuples).
pub fn family_max(family: Family, arity: usize, max_n: usize, strict: bool) -> usize {
    if !strict {
        return max_n;
    }
    let group = family.group_size().unwrap_or(arity);
    strict_cap_multiple(max_n, family.fixed_args(), group)
}
