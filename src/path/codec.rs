/// Percent-decodes one path segment. A segment whose decoded bytes are not
/// valid UTF-8 is kept in its raw form rather than rejected; malformed
/// escape sequences pass through unchanged.
pub(crate) fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

pub(crate) fn encode_segment(decoded: &str) -> String {
    urlencoding::encode(decoded).into_owned()
}
