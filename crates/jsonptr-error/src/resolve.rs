//! Offset to pointer resolution.
//!
//! Given the raw bytes of a document that has already been accepted by the
//! decoder, and the offset of the first byte of some value in it,
//! [`pointer_at_offset`] replays the bytes up to that offset and rebuilds the
//! keys and indices that lead to the value.

use bstr::ByteSlice;

use crate::{JsonPointer, PathComponent, de::decode_str};

/// One open container while replaying.
#[derive(Debug)]
enum Frame<'a> {
    Object {
        /// Raw lexeme of the current member's key, quotes included.
        key: Option<&'a [u8]>,
        /// The next string in this object is a key.
        awaiting_key: bool,
    },
    Array {
        index: usize,
    },
}

/// Returns the pointer to the value whose first byte is at `offset`.
///
/// `document` must be well-formed JSON up to `offset` (trailing bytes are
/// never read past the value start, so a prefix of a stream works). Keys are
/// decoded with the same rules the decoder applies to strings.
///
/// An offset at the opening quote of an object key resolves to the member
/// with that key; the decoder reports map-key type errors there.
///
/// ```rust
/// use jsonptr_error::pointer_at_offset;
///
/// let doc = br#"{"a/b": [10, {"~": null}]}"#;
/// assert_eq!(pointer_at_offset(doc, 9).to_string(), "/a~1b/0");
/// assert_eq!(pointer_at_offset(doc, 19).to_string(), "/a~1b/1/~0");
/// assert_eq!(pointer_at_offset(b"true", 0).to_string(), "");
/// ```
///
/// # Panics
///
/// Panics on input that is not well-formed or an offset that is not the
/// start of a value: an unbalanced closing bracket, a `,` outside any
/// container, an unterminated string, an offset inside a string, or an
/// offset past the end of the document.
#[must_use]
pub fn pointer_at_offset(document: &[u8], offset: usize) -> JsonPointer {
    assert!(
        offset <= document.len(),
        "offset {offset} is past the end of a {}-byte document",
        document.len()
    );

    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut cursor = 0;
    while cursor < offset {
        match document[cursor] {
            b'{' => stack.push(Frame::Object {
                key: None,
                awaiting_key: true,
            }),
            b'[' => stack.push(Frame::Array { index: 0 }),
            b'}' | b']' => {
                if stack.pop().is_none() {
                    panic!("unbalanced closing bracket at offset {cursor}");
                }
            }
            b',' => match stack.last_mut() {
                Some(Frame::Object { awaiting_key, .. }) => *awaiting_key = true,
                Some(Frame::Array { index }) => *index += 1,
                None => panic!("',' outside any container at offset {cursor}"),
            },
            b'"' => {
                let end = string_end(document, cursor);
                record_key(&mut stack, &document[cursor..=end]);
                cursor = end;
            }
            _ => {}
        }
        cursor += 1;
    }
    assert_eq!(cursor, offset, "offset {offset} is inside a string, not at a value start");

    if document.get(offset) == Some(&b'"') {
        let end = string_end(document, offset);
        record_key(&mut stack, &document[offset..=end]);
    }

    let pointer = stack
        .iter()
        .map(|frame| match frame {
            Frame::Object { key: Some(key), .. } => PathComponent::Key(decode_key(key).into()),
            Frame::Object { key: None, .. } => {
                panic!("offset {offset} is inside an object but not in any member")
            }
            Frame::Array { index } => PathComponent::Index(*index),
        })
        .collect::<JsonPointer>();
    log::trace!("resolved offset {offset} to {pointer:?}");
    pointer
}

/// Makes `lexeme` the key of the innermost object if that object expects one.
fn record_key<'a>(stack: &mut [Frame<'a>], lexeme: &'a [u8]) {
    if let Some(Frame::Object { key, awaiting_key }) = stack.last_mut() {
        if *awaiting_key {
            *key = Some(lexeme);
            *awaiting_key = false;
        }
    }
}

/// Index of the quote that closes the string opened at `open`.
fn string_end(document: &[u8], open: usize) -> usize {
    let mut at = open + 1;
    loop {
        let found = document
            .get(at..)
            .and_then(|rest| rest.find_byteset(b"\\\""));
        let Some(found) = found else {
            panic!("unterminated string starting at offset {open}");
        };
        at += found;
        if document[at] == b'"' {
            return at;
        }
        // skip the escaped byte
        at += 2;
    }
}

fn decode_key(lexeme: &[u8]) -> String {
    decode_str(lexeme).unwrap_or_else(|_| {
        String::from_utf8_lossy(&lexeme[1..lexeme.len() - 1]).into_owned()
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::pointer;

    /// Offset of the first occurrence of `needle` in `doc`.
    fn at(doc: &str, needle: &str) -> usize {
        doc.find(needle).unwrap()
    }

    #[rstest]
    #[case(r#"["a"]"#, "\"a\"", pointer![0])]
    #[case("[1,true,1]", "true", pointer![1])]
    #[case(r#"{"~":1}"#, "1", pointer!["~"])]
    #[case(r#"{"/":[1]}"#, "1", pointer!["/", 0])]
    #[case(r#" {  "\u002f" : [ 1]}"#, "1", pointer!["/", 0])]
    #[case(r#"[{},{"a":1}]"#, "1", pointer![1, "a"])]
    #[case(r#"{"a":true,"b":2}"#, "2", pointer!["b"])]
    #[case(r#""a""#, "\"a\"", pointer![])]
    fn resolves(#[case] doc: &str, #[case] needle: &str, #[case] expected: JsonPointer) {
        assert_eq!(pointer_at_offset(doc.as_bytes(), at(doc, needle)), expected);
    }

    #[rstest]
    #[case(r#"{"a\"b": 1}"#, "1", r#"/a"b"#)]
    #[case(r#"{"a\\": 1}"#, "1", r"/a\")]
    #[case(r#"{"x": "\\\"", "y": 2}"#, "2", "/y")]
    #[case(r#"{"😀": 1}"#, "1", "/\u{1F600}")]
    #[case(r#"{"\ud83d": 1}"#, "1", "/\u{FFFD}")]
    #[case(r#"{"k": "{[,"}"#, "\"{", "/k")]
    fn decodes_keys_like_the_decoder(
        #[case] doc: &str,
        #[case] needle: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            pointer_at_offset(doc.as_bytes(), at(doc, needle)).to_string(),
            expected
        );
    }

    #[test]
    fn empty_object_inside_array_does_not_start_a_key() {
        let doc = r#"[{}, "x", {"a": [{}, "y"]}]"#;
        assert_eq!(pointer_at_offset(doc.as_bytes(), at(doc, "\"x\"")), pointer![1]);
        assert_eq!(
            pointer_at_offset(doc.as_bytes(), at(doc, "\"y\"")),
            pointer![2, "a", 1]
        );
    }

    #[test]
    fn string_values_are_not_keys() {
        let doc = r#"{"a": "b", "c": ["d", {"e": "f"}]}"#;
        assert_eq!(
            pointer_at_offset(doc.as_bytes(), at(doc, "\"f\"")),
            pointer!["c", 1, "e"]
        );
    }

    #[test]
    fn key_offset_names_the_member() {
        let doc = r#"{"1": true, "x": false}"#;
        assert_eq!(pointer_at_offset(doc.as_bytes(), at(doc, "\"x\"")), pointer!["x"]);
        assert_eq!(pointer_at_offset(doc.as_bytes(), 1), pointer!["1"]);
    }

    #[test]
    fn container_offsets() {
        let doc = r#"{"a": {"b": []}}"#;
        assert_eq!(pointer_at_offset(doc.as_bytes(), 0), pointer![]);
        assert_eq!(pointer_at_offset(doc.as_bytes(), at(doc, "{\"b")), pointer!["a"]);
        assert_eq!(pointer_at_offset(doc.as_bytes(), at(doc, "[]")), pointer!["a", "b"]);
    }

    #[test]
    fn later_top_level_values_resolve_on_their_own() {
        let doc = r#"{"a": 1} [0, {"b": null}]"#;
        assert_eq!(pointer_at_offset(doc.as_bytes(), at(doc, "null")), pointer![1, "b"]);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let doc = br#"[1, 2, {"#;
        assert_eq!(pointer_at_offset(doc, 4), pointer![1]);
    }

    #[test]
    #[should_panic(expected = "unbalanced closing bracket")]
    fn panics_on_unbalanced_close() {
        let _ = pointer_at_offset(b"]1", 1);
    }

    #[test]
    #[should_panic(expected = "outside any container")]
    fn panics_on_top_level_comma() {
        let _ = pointer_at_offset(b"1,2", 2);
    }

    #[test]
    #[should_panic(expected = "unterminated string")]
    fn panics_on_unterminated_string() {
        let _ = pointer_at_offset(br#"["abc"#, 3);
    }

    #[test]
    #[should_panic(expected = "inside a string")]
    fn panics_inside_a_key() {
        let _ = pointer_at_offset(br#"{"abc": 1}"#, 3);
    }

    #[test]
    #[should_panic(expected = "past the end")]
    fn panics_past_the_end() {
        let _ = pointer_at_offset(b"[]", 3);
    }
}
