//! Constructor identifiers are carried on the wire as CBOR tags. Small
//! identifiers get a compact tag of their own; everything else shares
//! [`ANY_TAG`] and carries the identifier inside the payload.

/// Tag used for constructors that have no compact tag. The payload is then a
/// 2-element array `[constructor, fields]`.
pub const ANY_TAG: u64 = 102;

/// Compact tag for a constructor, if it has one.
pub fn convert_constr_to_tag(constr: u64) -> Option<u64> {
    match constr {
        0..=6 => Some(121 + constr),
        7..=127 => Some(1280 - 7 + constr),
        _ => None,
    }
}

/// Constructor identified by a compact tag. [`ANY_TAG`] is not compact and
/// yields `None`, like any other unrecognized tag.
pub fn convert_tag_to_constr(tag: u64) -> Option<u64> {
    match tag {
        121..=127 => Some(tag - 121),
        1280..=1400 => Some(tag - 1280 + 7),
        _ => None,
    }
}

/// Whether a CBOR tag introduces a constructor at all.
pub fn is_constr_tag(tag: u64) -> bool {
    tag == ANY_TAG || convert_tag_to_constr(tag).is_some()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn compact_range_low() {
        for constr in 0..=6 {
            assert_eq!(convert_constr_to_tag(constr), Some(121 + constr));
        }
    }

    #[test]
    fn compact_range_high() {
        assert_eq!(convert_constr_to_tag(7), Some(1280));
        assert_eq!(convert_constr_to_tag(8), Some(1281));
        assert_eq!(convert_constr_to_tag(127), Some(1400));
    }

    #[test]
    fn general_range() {
        assert_eq!(convert_constr_to_tag(128), None);
        assert_eq!(convert_constr_to_tag(130), None);
        assert_eq!(convert_constr_to_tag(u64::MAX), None);
    }

    #[test]
    fn tags_invert() {
        for constr in 0..=127 {
            let tag = convert_constr_to_tag(constr).unwrap();
            assert_eq!(convert_tag_to_constr(tag), Some(constr));
        }
    }

    #[test]
    fn unknown_tags() {
        assert_eq!(convert_tag_to_constr(ANY_TAG), None);
        assert_eq!(convert_tag_to_constr(120), None);
        assert_eq!(convert_tag_to_constr(128), None);
        assert_eq!(convert_tag_to_constr(1279), None);
        assert_eq!(convert_tag_to_constr(1401), None);
        assert!(is_constr_tag(ANY_TAG));
        assert!(!is_constr_tag(2));
    }
}
