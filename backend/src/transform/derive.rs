//! ID3/ID4 derivation and run-wide deduplication.
//!
//! ```text
//! ID  ──correspondence──▶ ID2
//! ID3 = code + "_" + ID2                      (dedup key)
//! ID4 = first 14 chars of ID3 + last 4 of ID  (no padding)
//! ```
//!
//! Slicing counts `char`s, so multi-byte identifiers are never split.

use crate::models::{
    CorrespondenceTable, DeriveOutcome, DerivedPair, SeenKeys, ID3_PREFIX_LEN, ID3_SEPARATOR,
    ID_SUFFIX_LEN,
};

/// `code + "_" + id2`
pub fn compose_id3(code: &str, id2: &str) -> String {
    let mut id3 = String::with_capacity(code.len() + ID3_SEPARATOR.len() + id2.len());
    id3.push_str(code);
    id3.push_str(ID3_SEPARATOR);
    id3.push_str(id2);
    id3
}

/// First 14 characters of `id3` followed by the last 4 of `primary_id`.
///
/// Shorter inputs contribute whatever they have.
pub fn compose_id4(id3: &str, primary_id: &str) -> String {
    let suffix_start = primary_id.chars().count().saturating_sub(ID_SUFFIX_LEN);
    id3.chars()
        .take(ID3_PREFIX_LEN)
        .chain(primary_id.chars().skip(suffix_start))
        .collect()
}

/// Derive the output pair for one input row.
///
/// On [`DeriveOutcome::Emitted`] the ID3 has been added to `seen`; the other
/// outcomes leave `seen` untouched.
pub fn derive_identifier_pair(
    primary_id: &str,
    code: &str,
    correspondence: &CorrespondenceTable,
    seen: &mut SeenKeys,
) -> DeriveOutcome {
    let Some(id2) = correspondence.secondary_id(primary_id) else {
        return DeriveOutcome::Unresolved;
    };

    let id3 = compose_id3(code, id2);
    if seen.contains(&id3) {
        return DeriveOutcome::Duplicate { id3 };
    }

    let id4 = compose_id4(&id3, primary_id);
    seen.insert(id3.clone());
    DeriveOutcome::Emitted(DerivedPair { id3, id4 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CorrespondenceTable {
        [
            ("AB12", "XY99"),
            ("8d 7d 2c_Ah9h", "8d 7d 2c_P000"),
            ("7", "Z"),
        ]
        .into_iter()
        .collect()
    }

    fn emitted(outcome: DeriveOutcome) -> DerivedPair {
        match outcome {
            DeriveOutcome::Emitted(pair) => pair,
            other => panic!("expected a pair, got {other:?}"),
        }
    }

    #[test]
    fn test_short_id3_is_not_padded() {
        let mut seen = SeenKeys::new();
        let pair = emitted(derive_identifier_pair("AB12", "Q1", &table(), &mut seen));

        assert_eq!(pair.id3, "Q1_XY99");
        assert_eq!(pair.id4, "Q1_XY99AB12");
        assert!(seen.contains("Q1_XY99"));
    }

    #[test]
    fn test_long_id3_is_truncated_to_14() {
        let mut seen = SeenKeys::new();
        let pair = emitted(derive_identifier_pair("8d 7d 2c_Ah9h", "AF21", &table(), &mut seen));

        assert_eq!(pair.id3, "AF21_8d 7d 2c_P000");
        assert_eq!(pair.id4, "AF21_8d 7d 2c_Ah9h");
        assert_eq!(pair.id4.chars().count(), 14 + 4);
    }

    #[test]
    fn test_short_primary_id_is_taken_whole() {
        let mut seen = SeenKeys::new();
        let pair = emitted(derive_identifier_pair("7", "C", &table(), &mut seen));

        assert_eq!(pair.id3, "C_Z");
        assert_eq!(pair.id4, "C_Z7");
    }

    #[test]
    fn test_unresolved_leaves_seen_untouched() {
        let mut seen = SeenKeys::new();
        let outcome = derive_identifier_pair("missing", "Q1", &table(), &mut seen);

        assert_eq!(outcome, DeriveOutcome::Unresolved);
        assert!(seen.is_empty());
    }

    #[test]
    fn test_second_occurrence_is_duplicate() {
        let mut seen = SeenKeys::new();
        emitted(derive_identifier_pair("AB12", "Q1", &table(), &mut seen));
        let outcome = derive_identifier_pair("AB12", "Q1", &table(), &mut seen);

        assert_eq!(outcome, DeriveOutcome::Duplicate { id3: "Q1_XY99".into() });
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_different_primary_ids_same_id3_dedup() {
        // Two primary ids resolving to the same ID2 collide on ID3.
        let table: CorrespondenceTable = [("AAAA1111", "S"), ("BBBB2222", "S")].into_iter().collect();
        let mut seen = SeenKeys::new();

        let first = emitted(derive_identifier_pair("AAAA1111", "K", &table, &mut seen));
        let second = derive_identifier_pair("BBBB2222", "K", &table, &mut seen);

        assert_eq!(first.id4, "K_S1111");
        assert!(matches!(second, DeriveOutcome::Duplicate { .. }));
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(compose_id4("É_ÀÂÇÈÉÊËÌÍÎÏÑÒ", "ñandú"), "É_ÀÂÇÈÉÊËÌÍÎÏÑandú");
    }
}
