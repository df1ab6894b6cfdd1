//! Built-in descriptions, from the classic Venn diagrams down to small shapes used in tests.

use crate::model::Description;

pub const VENN_3: &str = "a b c abc ab ac bc";
pub const VENN_4: &str = "a b c d ab ac ad bc bd cd abc abd acd bcd abcd";
pub const VENN_5: &str = "a b c d e ab ac ad ae bc bd be cd ce de abc abd abe acd ace ade bcd bce bde cde abcd abce abde acde bcde abcde";

/// (name, description) pairs, in display order.
pub const EXAMPLES: [(&str, &str); 8] = [
    ("Single", "a"),
    ("Disjoint", "a b"),
    ("Overlap", "a b ab"),
    ("Nested", "a ab abc"),
    ("Chain", "a b c ab bc"),
    ("Venn-3", VENN_3),
    ("Venn-4", VENN_4),
    ("Venn-5", VENN_5),
];

/// Description of the example named `name` (case-insensitive).
pub fn example(name: &str) -> Option<Description> {
    EXAMPLES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .and_then(|(_, d)| d.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn all_parse() {
        for (name, description) in EXAMPLES {
            let d: Description = description.parse().unwrap_or_else(|e| panic!("{}: {}", name, e));
            assert!(!d.is_empty(), "{}", name);
        }
    }

    #[test]
    fn venn_sizes() {
        for (name, curves) in [("venn-3", 3), ("Venn-4", 4), ("VENN-5", 5)] {
            let d = example(name).unwrap();
            assert_eq!(d.num_curves(), curves);
            assert_eq!(d.num_zones(), 1 << curves);
        }
        assert_eq!(example("venn-6"), None);
    }
}
