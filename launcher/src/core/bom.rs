//! Byte-order-mark detection for script headers.

use serde::Serialize;

/// Text encoding of a script header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// UTF-8, with or without a marker. Plain ASCII lands here too.
    Utf8,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

/// A byte-order-mark signature and the encoding it announces.
#[derive(Debug)]
pub struct ByteOrderMark {
    pub signature: &'static [u8],
    pub encoding: Encoding,
}

/// Known markers, longest first: `FF FE 00 00` must win over `FF FE`.
pub const BYTE_ORDER_MARKS: &[ByteOrderMark] = &[
    ByteOrderMark {
        signature: &[0xFF, 0xFE, 0x00, 0x00],
        encoding: Encoding::Utf32Le,
    },
    ByteOrderMark {
        signature: &[0x00, 0x00, 0xFE, 0xFF],
        encoding: Encoding::Utf32Be,
    },
    ByteOrderMark {
        signature: &[0xEF, 0xBB, 0xBF],
        encoding: Encoding::Utf8,
    },
    ByteOrderMark {
        signature: &[0xFF, 0xFE],
        encoding: Encoding::Utf16Le,
    },
    ByteOrderMark {
        signature: &[0xFE, 0xFF],
        encoding: Encoding::Utf16Be,
    },
];

/// Encoding chosen for a header plus the number of marker bytes to skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    pub encoding: Encoding,
    pub skip: usize,
}

/// Match the leading bytes of `header` against [`BYTE_ORDER_MARKS`].
///
/// Headers without a marker (including empty or truncated ones) decode as
/// UTF-8 from offset 0.
pub fn detect(header: &[u8]) -> Detected {
    BYTE_ORDER_MARKS
        .iter()
        .find(|bom| header.starts_with(bom.signature))
        .map(|bom| Detected {
            encoding: bom.encoding,
            skip: bom.signature.len(),
        })
        .unwrap_or(Detected {
            encoding: Encoding::Utf8,
            skip: 0,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_signature_is_detected_with_its_length() {
        for bom in BYTE_ORDER_MARKS {
            let mut header = bom.signature.to_vec();
            header.extend_from_slice(b"#!");
            let detected = detect(&header);
            assert_eq!(detected.encoding, bom.encoding, "{:?}", bom.signature);
            assert_eq!(detected.skip, bom.signature.len());
        }
    }

    #[test]
    fn utf32_le_is_preferred_over_utf16_le_prefix() {
        let detected = detect(&[0xFF, 0xFE, 0x00, 0x00, b'#', 0, 0, 0]);
        assert_eq!(
            detected,
            Detected {
                encoding: Encoding::Utf32Le,
                skip: 4
            }
        );
    }

    #[test]
    fn utf16_le_with_nonzero_first_char_is_not_utf32() {
        let detected = detect(&[0xFF, 0xFE, b'#', 0x00]);
        assert_eq!(detected.encoding, Encoding::Utf16Le);
        assert_eq!(detected.skip, 2);
    }

    #[test]
    fn table_lists_longer_signatures_before_their_prefixes() {
        for (i, longer) in BYTE_ORDER_MARKS.iter().enumerate() {
            for shorter in &BYTE_ORDER_MARKS[..i] {
                assert!(
                    !longer.signature.starts_with(shorter.signature),
                    "{:?} is shadowed by {:?}",
                    longer.signature,
                    shorter.signature
                );
            }
        }
    }

    #[test]
    fn missing_or_short_marker_defaults_to_utf8() {
        let plain = Detected {
            encoding: Encoding::Utf8,
            skip: 0,
        };
        assert_eq!(detect(b""), plain);
        assert_eq!(detect(&[0xFF]), plain);
        assert_eq!(detect(&[0xEF, 0xBB]), plain);
        assert_eq!(detect(b"#!/bin/sh\n"), plain);
    }
}
