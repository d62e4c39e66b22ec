//! Parameter normalization: drop absent values, then sort by key.

use crate::core::types::ParameterSet;

/// Normalize a parameter set before encoding and signing.
///
/// 1. Absent (`None`) values are removed; an entry left without values is
///    removed entirely. Empty strings are kept.
/// 2. Entries are sorted by key bytes, ascending. The sort is stable and the
///    values of a repeated key keep their original order.
///
/// Applying this twice gives the same result as applying it once.
pub fn normalize(params: &ParameterSet) -> ParameterSet {
    let mut normalized = params.clone();
    let entries = normalized.entries_mut();

    for (_, values) in entries.iter_mut() {
        values.retain(Option::is_some);
    }
    entries.retain(|(_, values)| !values.is_empty());
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::codec;

    #[test]
    fn test_null_filtering() {
        let params = ParameterSet::new().with("a", Some("1")).with("b", None);
        let expected = ParameterSet::new().with("a", Some("1"));
        assert_eq!(normalize(&params), expected);
    }

    #[test]
    fn test_empty_string_is_kept() {
        let params = ParameterSet::new().with("foo", Some("")).with("bar", None);
        let normalized = normalize(&params);
        assert_eq!(normalized.keys().collect::<Vec<_>>(), vec!["foo"]);
        assert_eq!(normalized.get("foo"), Some(&[Some(String::new())][..]));
    }

    #[test]
    fn test_sorts_by_key() {
        let a = ParameterSet::new()
            .with("id", Some("5"))
            .with("format", Some("json"));
        let b = ParameterSet::new()
            .with("format", Some("json"))
            .with("id", Some("5"));

        assert_eq!(codec::encode(&normalize(&a)), "format=json&id=5");
        assert_eq!(normalize(&a), normalize(&b));
    }

    #[test]
    fn test_sort_is_ordinal_not_locale() {
        let params = ParameterSet::new()
            .with("b", Some("1"))
            .with("a", Some("1"))
            .with("Z", Some("1"))
            .with("_", Some("1"));
        let normalized = normalize(&params);
        // 'Z' (0x5A) < '_' (0x5F) < 'a' (0x61)
        assert_eq!(
            normalized.keys().collect::<Vec<_>>(),
            vec!["Z", "_", "a", "b"]
        );
    }

    #[test]
    fn test_repeated_key_values_keep_order() {
        let params = codec::parse("tag=z&a=1&tag&tag=b").unwrap();
        let normalized = normalize(&params);
        assert_eq!(codec::encode(&normalized), "a=1&tag=z&tag=b");
    }

    #[test]
    fn test_idempotent() {
        let params = codec::parse("z=&y&x=3&a=1&a=0&m=hello+world").unwrap();
        let once = normalize(&params);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_round_trip_through_codec() {
        let params = codec::parse("id=5&format=json&foo=&name=a+b%26c").unwrap();
        let normalized = normalize(&params);
        let reparsed = codec::parse(&codec::encode(&normalized)).unwrap();
        assert_eq!(reparsed, normalized);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let params = ParameterSet::new().with("b", Some("1")).with("a", None);
        let before = params.clone();
        let _ = normalize(&params);
        assert_eq!(params, before);
    }
}
