//! Best-effort text decoding for instrument exports
//!
//! Probe-card testers write their CSV logs in whatever codepage the host PC
//! was configured with (legacy Thai codepages are common in the field), so
//! the byte buffer is sniffed statistically and decoded tolerantly. Decoding
//! never fails: malformed sequences are replaced, and the rest of the
//! pipeline only ever sees valid UTF-8.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Result of the decoding adapter: the decoded text plus what was detected.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    /// Name of the encoding actually used to decode (e.g. "windows-874").
    pub encoding: &'static str,
    /// True if any byte sequence was malformed and replaced.
    pub had_errors: bool,
}

/// Detect the most likely encoding of `bytes` and decode them.
///
/// Valid UTF-8 is taken at face value before any statistical guessing.
/// For the rest, the detector's guess is trusted unless it picks a
/// multi-byte CJK encoding for a buffer that is almost entirely ASCII
/// with lone high bytes; a handful of stray `µ` or `°` bytes in an
/// otherwise-ASCII export is a single-byte codepage, not CJK text, and
/// pairing those bytes with their ASCII neighbours would corrupt the
/// column headers.
pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    if let Ok(text) = std::str::from_utf8(bytes) {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        return DecodedText {
            text: text.to_owned(),
            encoding: UTF_8.name(),
            had_errors: false,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, true);
    let encoding = if is_multibyte_cjk(guess) && lone_high_bytes(bytes) {
        WINDOWS_1252
    } else {
        guess
    };

    // decode() BOM-sniffs first, so a UTF-16 BOM overrides the guess.
    let (text, actual, had_errors) = encoding.decode(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding: actual.name(),
        had_errors,
    }
}

/// True if non-ASCII bytes are rare (under a tenth of the buffer) and
/// never adjacent. Multi-byte CJK sequences always come in runs.
fn lone_high_bytes(bytes: &[u8]) -> bool {
    let high = bytes.iter().filter(|b| !b.is_ascii()).count();
    if high == 0 || high * 10 > bytes.len() {
        return false;
    }
    !bytes.windows(2).any(|w| !w[0].is_ascii() && !w[1].is_ascii())
}

fn is_multibyte_cjk(encoding: &'static Encoding) -> bool {
    matches!(
        encoding.name(),
        "Big5" | "EUC-JP" | "EUC-KR" | "GBK" | "gb18030" | "Shift_JIS"
    )
}
