use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Encodings tried on every upload, in order
///
/// `encoding_rs` follows the WHATWG label table, where `latin1` and
/// `iso-8859-1` both resolve to windows-1252. That decoder maps every byte,
/// so the list is effectively never exhausted.
pub fn default_encodings() -> [&'static Encoding; 2] {
    [UTF_8, WINDOWS_1252]
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode raw upload bytes with the first encoding that accepts them
///
/// Each candidate decodes strictly: a single malformed sequence rejects that
/// encoding and moves on to the next one. A UTF-8 byte-order mark is dropped
/// before the UTF-8 attempt.
///
/// # Arguments
/// * `bytes` - The uploaded payload
/// * `encodings` - Candidates in priority order
///
/// # Returns
/// * `Option<(String, &'static Encoding)>` - Decoded text and the encoding that produced it,
///   or `None` when every candidate failed
pub fn decode_bytes(
    bytes: &[u8],
    encodings: &[&'static Encoding],
) -> Option<(String, &'static Encoding)> {
    encodings.iter().find_map(|&encoding| {
        let input = if encoding == UTF_8 {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
        } else {
            bytes
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(input)
            .map(|text| (text.into_owned(), encoding))
    })
}
