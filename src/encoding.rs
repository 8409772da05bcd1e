//! Charset detection for controller responses.
//!
//! Touchline firmware revisions disagree about the encoding of room names
//! (UTF-8 on some, a Windows code page on others) and the XML declaration is
//! not reliable, so the raw bytes are sniffed before parsing.

use std::borrow::Cow;
use std::fmt;

use encoding_rs::Encoding;

/// Strategy mapping raw response bytes to their probable encoding.
pub trait EncodingDetector: Send + Sync {
    fn detect(&self, bytes: &[u8]) -> &'static Encoding;
}

/// Byte-order mark first, then `chardetng` heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffingDetector;

impl EncodingDetector for SniffingDetector {
    fn detect(&self, bytes: &[u8]) -> &'static Encoding {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            return encoding;
        }
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(bytes, true);
        detector.guess(None, true)
    }
}

/// Always reports the same encoding.
#[derive(Clone, Copy)]
pub struct FixedEncoding(pub &'static Encoding);

impl EncodingDetector for FixedEncoding {
    fn detect(&self, _bytes: &[u8]) -> &'static Encoding {
        self.0
    }
}

impl fmt::Debug for FixedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedEncoding").field(&self.0.name()).finish()
    }
}

/// Decode `bytes` with the encoding chosen by `detector`.
pub(crate) fn decode<'a>(
    detector: &dyn EncodingDetector,
    bytes: &'a [u8],
) -> (Cow<'a, str>, &'static Encoding) {
    let encoding = detector.detect(bytes);
    let (text, used, _) = encoding.decode(bytes);
    (text, used)
}

/// Drop a leading `<?xml ...?>` declaration. The text is already transcoded,
/// so a declared encoding would only mislead the parser.
pub(crate) fn strip_xml_declaration(text: &str) -> &str {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml")
        && let Some(end) = trimmed.find("?>")
    {
        return &trimmed[end + 2..];
    }
    text
}
