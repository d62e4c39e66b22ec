//! RFC1738-style query string codec.
//!
//! This is the `application/x-www-form-urlencoded` flavour used by the remote
//! verifier: ASCII alphanumerics and `-`, `_`, `.` pass through, a space
//! becomes `+`, and every other byte is percent-encoded with upper-case hex.
//! Note that `~` and `*` are escaped, unlike RFC 3986 or the WHATWG form
//! serializer.

use crate::core::errors::AuthError;
use crate::core::types::ParameterSet;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Encode a single key or value.
pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ENCODE_SET)
        .map(|chunk| if chunk == "%20" { "+" } else { chunk })
        .collect()
}

/// Decode a single key or value (`+` is a space).
///
/// Every `%` must start a two-digit hex escape and the decoded bytes must be
/// UTF-8.
pub fn decode_component(input: &str) -> Result<String, AuthError> {
    let bytes = input.as_bytes();
    if let Some(offset) = bytes.iter().enumerate().position(|(i, b)| {
        *b == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    }) {
        return Err(AuthError::MalformedRequest(format!(
            "Invalid percent escape at offset {} in '{}'",
            offset, input
        )));
    }

    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| {
            AuthError::MalformedRequest(format!("Query component '{}' is not valid UTF-8", input))
        })
}

/// Parse a raw query string (without the leading `?`).
///
/// Pieces are split on `&` and then on the first `=`. A piece without `=`
/// yields an absent value; `a=` yields an empty string.
pub fn parse(query: &str) -> Result<ParameterSet, AuthError> {
    let mut params = ParameterSet::new();
    if query.is_empty() {
        return Ok(params);
    }

    for piece in query.split('&') {
        let (key, value) = match piece.split_once('=') {
            Some((key, value)) => (key, Some(decode_component(value)?)),
            None => (piece, None),
        };
        params.insert(decode_component(key)?, value);
    }

    Ok(params)
}

/// Encode parameters as `key=value` pairs joined by `&`, in the given order.
///
/// Repeated values repeat the key. An absent value is written as the bare key;
/// normalized sets never contain one.
pub fn encode(params: &ParameterSet) -> String {
    let mut pairs = Vec::new();

    for (key, values) in params.iter() {
        let key = encode_component(key);
        for value in values {
            match value {
                Some(value) => pairs.push(format!("{}={}", key, encode_component(value))),
                None => pairs.push(key.clone()),
            }
        }
    }

    pairs.join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component_rfc1738() {
        assert_eq!(encode_component("abcXYZ019-_."), "abcXYZ019-_.");
        assert_eq!(encode_component("a b"), "a+b");
        assert_eq!(encode_component("~*'()"), "%7E%2A%27%28%29");
        assert_eq!(encode_component("a&b=c/d?"), "a%26b%3Dc%2Fd%3F");
        assert_eq!(encode_component("+"), "%2B");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("a+b").unwrap(), "a b");
        assert_eq!(decode_component("a%20b").unwrap(), "a b");
        assert_eq!(decode_component("%7e%7E").unwrap(), "~~");
        assert_eq!(decode_component("%C3%A9").unwrap(), "é");
        assert_eq!(decode_component("").unwrap(), "");
    }

    #[test]
    fn test_decode_component_rejects_bad_escapes() {
        assert!(matches!(
            decode_component("100%"),
            Err(AuthError::MalformedRequest(_))
        ));
        assert!(matches!(
            decode_component("%zz"),
            Err(AuthError::MalformedRequest(_))
        ));
        assert!(matches!(
            decode_component("%FF"),
            Err(AuthError::MalformedRequest(_))
        ));
        assert!(matches!(
            decode_component("%+1"),
            Err(AuthError::MalformedRequest(_))
        ));
        assert!(matches!(
            decode_component("ok%4"),
            Err(AuthError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_decode_component_plus_and_escaped_plus() {
        assert_eq!(decode_component("1+%2B+1").unwrap(), "1 + 1");
        assert_eq!(decode_component("%25").unwrap(), "%");
    }

    #[test]
    fn test_parse_preserves_first_seen_order() {
        let params = parse("id=5&format=json&foo=").unwrap();
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["id", "format", "foo"]);
        assert_eq!(params.get("foo"), Some(&[Some(String::new())][..]));
    }

    #[test]
    fn test_parse_absent_value() {
        let params = parse("a=1&b=&c").unwrap();
        assert_eq!(params.get("a"), Some(&[Some("1".to_string())][..]));
        assert_eq!(params.get("b"), Some(&[Some(String::new())][..]));
        assert_eq!(params.get("c"), Some(&[None][..]));
    }

    #[test]
    fn test_parse_repeated_keys_accumulate() {
        let params = parse("tag=b&x=1&tag=a").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(
            params.get("tag"),
            Some(&[Some("b".to_string()), Some("a".to_string())][..])
        );
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let params = parse("q=a=b").unwrap();
        assert_eq!(params.get("q"), Some(&[Some("a=b".to_string())][..]));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_encode_does_not_sort() {
        let params = ParameterSet::new()
            .with("id", Some("5"))
            .with("format", Some("json"));
        assert_eq!(encode(&params), "id=5&format=json");
    }

    #[test]
    fn test_encode_repeats_key_for_each_value() {
        let params = ParameterSet::new()
            .with("tag", Some("rock"))
            .with("tag", Some("jazz & blues"));
        assert_eq!(encode(&params), "tag=rock&tag=jazz+%26+blues");
    }

    #[test]
    fn test_parse_then_encode_canonicalizes_escapes() {
        let params = parse("name=the%20who&city=new+york&x=%7e").unwrap();
        assert_eq!(encode(&params), "name=the+who&city=new+york&x=%7E");
    }
}
