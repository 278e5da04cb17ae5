use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

/// Looks up a WHATWG encoding label such as `"utf-8"`, `"shift_jis"` or `"latin1"`.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Strict decode: malformed input yields `None` instead of replacement characters.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Strict encode: characters the target cannot represent yield `None`.
pub fn encode(text: &str, encoding: &'static Encoding) -> Option<Vec<u8>> {
    // encoding_rs only decodes UTF-16, it never encodes to it
    if encoding == UTF_16LE {
        return Some(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Some(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (bytes, used, had_errors) = encoding.encode(text);
    (!had_errors && used == encoding).then(|| bytes.into_owned())
}
