use crate::read::DEFAULT_CHUNK_SIZE;

/// Configuration for [`Decoder`](crate::Decoder) and the lower-level
/// decoders it wraps.
///
/// # Examples
///
/// ```rust
/// use jsonptr_error::{Decoder, DecoderOptions};
///
/// let options = DecoderOptions {
///     disallow_unknown_fields: true,
///     ..Default::default()
/// };
/// let _decoder = Decoder::with_options(&b"{}"[..], options);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DecoderOptions {
    /// Deliver numbers to untyped targets (`deserialize_any`) as their
    /// literal text instead of as `u64`, `i64` or `f64`. Decode into
    /// [`Number`](crate::Number) to keep the text.
    ///
    /// # Default
    ///
    /// `false`
    pub use_number: bool,

    /// Reject object members that a struct target does not declare.
    ///
    /// # Default
    ///
    /// `false`
    pub disallow_unknown_fields: bool,

    /// Maximum nesting of arrays and objects inside one decoded value.
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,

    /// Size of each read issued to the underlying source.
    ///
    /// # Default
    ///
    /// `4096`
    pub read_buffer_size: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            use_number: false,
            disallow_unknown_fields: false,
            max_depth: 128,
            read_buffer_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
