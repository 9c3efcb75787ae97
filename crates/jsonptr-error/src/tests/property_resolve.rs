use std::fmt;

use quickcheck::QuickCheck;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};

use super::arbitrary::{Doc, Style, write};
use crate::{Decoder, DecoderOptions, JsonDecoder, pointer_at_offset};

fn tests() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// Property: every value start in a document resolves to the pointer it was
/// written under.
#[test]
fn resolves_every_value_start() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, style: Style) -> bool {
        let (text, located) = write(&doc, style);
        located
            .iter()
            .all(|at| pointer_at_offset(text.as_bytes(), at.offset) == at.pointer)
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Doc, Style) -> bool);
}

/// Property: the rendered pointer navigates a parsed copy of the document to
/// the value that starts at the offset.
#[test]
fn rendered_pointer_navigates_to_the_value() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, style: Style) -> bool {
        let (text, located) = write(&doc, style);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        located.iter().all(|at| {
            let rendered = pointer_at_offset(text.as_bytes(), at.offset).to_string();
            parsed.pointer(&rendered) == Some(&at.doc.to_value())
        })
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Doc, Style) -> bool);
}

/// Accepts any JSON value that contains no numbers.
struct NoNumbers;

impl<'de> Deserialize<'de> for NoNumbers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NoNumbers)
    }
}

impl<'de> Visitor<'de> for NoNumbers {
    type Value = NoNumbers;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("anything but a number")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self, E> {
        Ok(self)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self, E> {
        Err(E::invalid_type(Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self, E> {
        Err(E::invalid_type(Unexpected::Signed(v), &self))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self, A::Error> {
        while seq.next_element::<NoNumbers>()?.is_some() {}
        Ok(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self, A::Error> {
        while map.next_entry::<String, NoNumbers>()?.is_some() {}
        Ok(self)
    }
}

/// Property: the decoder reports the first number of the document, located
/// by pointer, whatever the read size.
#[test]
fn decoder_points_at_the_first_mismatch() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Doc, style: Style, read_size: u8) -> bool {
        let (text, located) = write(&doc, style);
        let first_number = located.iter().find(|at| matches!(at.doc, Doc::Int(_)));

        let options = DecoderOptions {
            read_buffer_size: usize::from(read_size % 16) + 1,
            ..DecoderOptions::default()
        };
        let mut decoder = Decoder::with_options(text.as_bytes(), options);
        match (decoder.decode::<NoNumbers>(), first_number) {
            (Ok(Some(NoNumbers)), None) => true,
            (Err(err), Some(at)) => err.pointer() == Some(&at.pointer),
            _ => false,
        }
    }

    QuickCheck::new()
        .tests(tests())
        .quickcheck(prop as fn(Doc, Style, u8) -> bool);
}
