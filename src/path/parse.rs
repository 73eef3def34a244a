use memchr::memchr;

use crate::segment::ParsedPath;

use super::codec::decode_segment;

/// Decomposes a raw path into decoded segments plus a trailing-slash
/// indicator. One trailing slash is stripped and recorded; the leading
/// slash is not a segment of its own.
#[tracing::instrument(level = "trace", skip(raw), fields(path_len = raw.len() as u64))]
pub fn parse_pathname(raw: &str) -> ParsedPath {
    let (body, trailing_slash) = match raw.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };
    let body = body.strip_prefix('/').unwrap_or(body);

    let mut segments = Vec::new();
    if !body.is_empty() {
        let bytes = body.as_bytes();
        let mut start = 0usize;
        while let Some(offset) = memchr(b'/', &bytes[start..]) {
            segments.push(decode_segment(&body[start..start + offset]));
            start += offset + 1;
        }
        segments.push(decode_segment(&body[start..]));
    }

    ParsedPath {
        segments,
        trailing_slash,
    }
}
