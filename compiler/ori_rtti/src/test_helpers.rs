//! Descriptor fixtures shared by the unit tests.

#![allow(clippy::expect_used, reason = "fixtures are built from known-good data")]

use std::sync::Arc;

use crate::{
    CodeAddr, DescriptorTable, FunctorDesc, FunctorsInfo, LayoutInfo, TypeCtorId, TypeCtorInfo,
    TypeCtorRep, TypeInfo,
};

/// A descriptor whose entries point at the first three code addresses.
pub fn ctor(module_name: &str, type_name: &str, arity: u32, rep: TypeCtorRep) -> TypeCtorInfo {
    TypeCtorInfo {
        arity,
        unify_entry: CodeAddr::from_raw(0),
        index_entry: CodeAddr::from_raw(1),
        compare_entry: CodeAddr::from_raw(2),
        rep,
        functors: FunctorsInfo::Special,
        layout: LayoutInfo::Opaque,
        module_name: Arc::from(module_name),
        type_name: Arc::from(type_name),
    }
}

/// Ids of the constructors registered by [`fixture`].
#[derive(Clone, Copy, Debug)]
pub struct Ids {
    pub int: TypeCtorId,
    pub string: TypeCtorId,
    pub ctor1: TypeCtorId,
    pub ctor2: TypeCtorId,
    pub list: TypeCtorId,
    pub pair: TypeCtorId,
    pub tuple: TypeCtorId,
}

impl Ids {
    pub fn int(self) -> TypeInfo {
        TypeInfo::new(self.int)
    }

    pub fn string(self) -> TypeInfo {
        TypeInfo::new(self.string)
    }

    pub fn list_of(self, elem: TypeInfo) -> TypeInfo {
        TypeInfo::applied(self.list, [elem])
    }

    pub fn pair_of(self, a: TypeInfo, b: TypeInfo) -> TypeInfo {
        TypeInfo::applied(self.pair, [a, b])
    }
}

/// A small table covering constants, fixed arity and variable arity.
pub fn fixture() -> (DescriptorTable, Ids) {
    let mut table = DescriptorTable::new();
    let mut add = |info: TypeCtorInfo| table.insert(info).expect("fixture keys are unique");

    let int = add(ctor("builtin", "int", 0, TypeCtorRep::Int));
    let string = add(ctor("builtin", "string", 0, TypeCtorRep::String));
    let ctor1 = add(ctor("mod", "ctor1", 0, TypeCtorRep::Enum));
    let ctor2 = add(ctor("mod", "ctor2", 0, TypeCtorRep::Enum));
    let list = add(TypeCtorInfo {
        functors: FunctorsInfo::Du(Arc::from(vec![
            FunctorDesc::new("[]", 0),
            FunctorDesc::new("[|]", 2),
        ])),
        layout: LayoutInfo::Tagged,
        ..ctor("list", "list", 1, TypeCtorRep::Du)
    });
    let pair = add(ctor("pair", "pair", 2, TypeCtorRep::Du));
    let tuple = add(ctor("builtin", "tuple", 0, TypeCtorRep::Tuple));

    let ids = Ids {
        int,
        string,
        ctor1,
        ctor2,
        list,
        pair,
        tuple,
    };
    (table, ids)
}
