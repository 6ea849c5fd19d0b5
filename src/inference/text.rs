//! String evidence: timestamp detection and string-encoded primitives.
use chrono::DateTime;

/// RFC 3339 with optional fractional seconds, as `encoding/json` accepts it
/// for `time.Time`: an upper-case `T` and `Z`, and no leap second.
pub fn looks_like_time(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.get(10) == Some(&b'T')
        && bytes.get(17..19) != Some(b"60".as_slice())
        && !s.ends_with('z')
        && DateTime::parse_from_rfc3339(s).is_ok()
}

/// Which primitive kinds a string's text also parses as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoded {
    pub bool_: bool,
    pub int: bool,
    pub float: bool,
}

pub fn encoded_kinds(s: &str) -> Encoded {
    Encoded {
        bool_: s == "true" || s == "false",
        int: s.parse::<i64>().is_ok(),
        float: s.parse::<f64>().is_ok(),
    }
}
