#![no_main]
use std::collections::HashMap;

use arbitrary::Arbitrary;
use jsonptr_error::{Decoder, DecoderOptions, Error, JsonDecoder};
use libfuzzer_sys::fuzz_target;

/// A shape most documents fail to match somewhere below the root.
type Target = Vec<HashMap<String, Option<bool>>>;

#[derive(Debug, Arbitrary)]
struct Input {
    read_size: u8,
    use_number: bool,
    disallow_unknown_fields: bool,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let options = DecoderOptions {
        use_number: input.use_number,
        disallow_unknown_fields: input.disallow_unknown_fields,
        read_buffer_size: usize::from(input.read_size) + 1,
        ..DecoderOptions::default()
    };

    // Streaming: the first error is final and repeats verbatim.
    let mut decoder = Decoder::with_options(input.data.as_slice(), options);
    let failure = loop {
        match decoder.decode::<Target>() {
            Ok(Some(_)) => {}
            Ok(None) => break None,
            Err(err) => break Some(err),
        }
    };
    if let Some(err) = failure {
        let again = decoder.decode::<Target>().unwrap_err();
        assert_eq!(again.to_string(), err.to_string());
        assert!(!decoder.more());
        assert!(decoder.buffered().is_empty());
    }

    // One-shot: a located error on a well-formed document names a value
    // that exists in it.
    if let Err(Error::Pointer(located)) = jsonptr_error::from_slice::<Target>(&input.data) {
        if let Ok(document) = serde_json::from_slice::<serde_json::Value>(&input.data) {
            assert!(
                document.pointer(&located.rendered_pointer()).is_some(),
                "{located} does not resolve in {document}"
            );
        }
    }
});
