//! Structural comparison of type descriptors.
//!
//! Type infos are ordered by:
//!
//! 1. identity (same constructor, same argument storage) => `Equal`
//! 2. number of applied arguments
//! 3. module name, then type name, then declared arity
//! 4. arguments, depth-first, left to right
//!
//! Each step is a total order and they are combined lexicographically, so
//! the result is a total order too. Constructor ids never take part: the
//! table guarantees one descriptor per `(module, name, arity)`, so two type
//! infos tie on step 3 only when they share a constructor.

use std::cmp::Ordering;

use crate::descriptor::TypeCtorInfo;
use crate::error::ConsistencyError;
use crate::stack::ensure_sufficient_stack;
use crate::table::DescriptorTable;
use crate::type_info::TypeInfo;

/// Order two type constructors by identity, then arity, then names.
pub fn compare_type_ctor(a: &TypeCtorInfo, b: &TypeCtorInfo) -> Ordering {
    if std::ptr::eq(a, b) {
        return Ordering::Equal;
    }
    a.arity
        .cmp(&b.arity)
        .then_with(|| a.module_name.cmp(&b.module_name))
        .then_with(|| a.type_name.cmp(&b.type_name))
}

/// Order two type infos structurally.
///
/// Fails only on a consistency violation: a constructor that is not in
/// `table`, or an application whose argument count the constructor does not
/// accept.
pub fn compare_type_info(
    table: &DescriptorTable,
    a: &TypeInfo,
    b: &TypeInfo,
) -> Result<Ordering, ConsistencyError> {
    ensure_sufficient_stack(|| compare_applied(table, a, b))
}

/// `compare_type_info(a, b) == Equal`.
pub fn unify_type_info(
    table: &DescriptorTable,
    a: &TypeInfo,
    b: &TypeInfo,
) -> Result<bool, ConsistencyError> {
    Ok(compare_type_info(table, a, b)? == Ordering::Equal)
}

fn compare_applied(
    table: &DescriptorTable,
    a: &TypeInfo,
    b: &TypeInfo,
) -> Result<Ordering, ConsistencyError> {
    if a.same_object(b) {
        return Ok(Ordering::Equal);
    }

    let ctor_a = checked_ctor(table, a)?;
    let ctor_b = checked_ctor(table, b)?;

    let ord = a
        .arity()
        .cmp(&b.arity())
        .then_with(|| ctor_a.module_name.cmp(&ctor_b.module_name))
        .then_with(|| ctor_a.type_name.cmp(&ctor_b.type_name))
        .then_with(|| ctor_a.arity.cmp(&ctor_b.arity));
    if ord != Ordering::Equal {
        return Ok(ord);
    }

    for (x, y) in a.args().iter().zip(b.args()) {
        let ord = ensure_sufficient_stack(|| compare_applied(table, x, y))?;
        if ord != Ordering::Equal {
            return Ok(ord);
        }
    }
    Ok(Ordering::Equal)
}

fn checked_ctor<'t>(
    table: &'t DescriptorTable,
    info: &TypeInfo,
) -> Result<&'t TypeCtorInfo, ConsistencyError> {
    let ctor = table.resolve(info.ctor())?;
    if ctor.accepts_arity(info.arity()) {
        Ok(ctor)
    } else {
        Err(ConsistencyError::ArityMismatch {
            ctor: ctor.key(),
            expected: ctor.arity,
            found: info.arity(),
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests panic on unexpected state"
)]
