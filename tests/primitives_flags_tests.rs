#![cfg(feature = "dev")]
//! Tests for the processing-flags bitset.

use regrid_rs::prelude::*;

#[test]
fn test_none_is_empty() {
    assert!(Flags::NONE.is_empty());
    assert_eq!(Flags::NONE.bits(), 0);
    assert!(!Flags::USEBAD.is_empty());
}

#[test]
fn test_combination_contains_each_member() {
    let flags = Flags::USEBAD | Flags::USEVAR | Flags::CONSERVEFLUX;
    assert!(flags.contains(Flags::USEBAD));
    assert!(flags.contains(Flags::USEVAR));
    assert!(flags.contains(Flags::CONSERVEFLUX));
    assert!(!flags.contains(Flags::GENVAR));
    assert!(flags.contains(Flags::USEBAD | Flags::USEVAR));
    assert!(!flags.contains(Flags::USEBAD | Flags::GENVAR));
}

#[test]
fn test_every_flag_contains_none() {
    for flag in [
        Flags::USEBAD,
        Flags::USEVAR,
        Flags::CONSERVEFLUX,
        Flags::GENVAR,
        Flags::VARWGT,
        Flags::REBININIT,
        Flags::REBINEND,
    ] {
        assert!(flag.contains(Flags::NONE));
    }
}

#[test]
fn test_flags_are_distinct_bits() {
    let all = [
        Flags::USEBAD,
        Flags::USEVAR,
        Flags::CONSERVEFLUX,
        Flags::GENVAR,
        Flags::VARWGT,
        Flags::REBININIT,
        Flags::REBINEND,
        Flags::RESERVED1,
        Flags::RESERVED2,
        Flags::RESERVED3,
        Flags::RESERVED4,
    ];
    for (i, a) in all.iter().enumerate() {
        assert_eq!(a.bits().count_ones(), 1);
        for b in &all[i + 1..] {
            assert_eq!((*a & *b).bits(), 0);
        }
    }
}

#[test]
fn test_bitor_assign() {
    let mut flags = Flags::NONE;
    flags |= Flags::REBININIT;
    flags |= Flags::REBINEND;
    assert!(flags.contains(Flags::REBININIT | Flags::REBINEND));
}
