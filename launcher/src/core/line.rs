//! First-line extraction from a decoded header.

use crate::core::bom::Encoding;

const CR: u32 = 0x0D;
const LF: u32 = 0x0A;

/// Decode `bytes` as `encoding` up to the first CR or LF.
///
/// Returns `None` when no terminator appears in `bytes`: the file is not
/// treated as a text script. A trailing partial code unit ends the scan.
/// Invalid sequences inside the line decode to U+FFFD.
pub fn extract_line(bytes: &[u8], encoding: Encoding) -> Option<String> {
    match encoding {
        Encoding::Utf8 => {
            let end = bytes.iter().position(|&b| b == b'\r' || b == b'\n')?;
            Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
        }
        Encoding::Utf16Le => utf16_line(bytes, u16::from_le_bytes),
        Encoding::Utf16Be => utf16_line(bytes, u16::from_be_bytes),
        Encoding::Utf32Le => utf32_line(bytes, u32::from_le_bytes),
        Encoding::Utf32Be => utf32_line(bytes, u32::from_be_bytes),
    }
}

fn utf16_line(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    let end = units
        .iter()
        .position(|&u| u32::from(u) == CR || u32::from(u) == LF)?;
    Some(
        char::decode_utf16(units[..end].iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
    )
}

fn utf32_line(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> Option<String> {
    let units: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|quad| unit([quad[0], quad[1], quad[2], quad[3]]))
        .collect();
    let end = units.iter().position(|&u| u == CR || u == LF)?;
    Some(
        units[..end]
            .iter()
            .map(|&u| char::from_u32(u).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn utf32be(text: &str) -> Vec<u8> {
        text.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect()
    }

    #[test]
    fn utf8_line_stops_at_lf() {
        let line = extract_line(b"#!/bin/sh -e\necho hi\n", Encoding::Utf8);
        assert_eq!(line.as_deref(), Some("#!/bin/sh -e"));
    }

    #[test]
    fn crlf_is_a_single_terminator() {
        let line = extract_line(b"#!python -u\r\nprint()\r\n", Encoding::Utf8);
        assert_eq!(line.as_deref(), Some("#!python -u"));
    }

    #[test]
    fn lone_cr_terminates() {
        let line = extract_line(b"#!python\rrest", Encoding::Utf8);
        assert_eq!(line.as_deref(), Some("#!python"));
    }

    #[test]
    fn no_terminator_means_not_a_script() {
        assert_eq!(extract_line(b"\x7fELF\x02\x01\x01", Encoding::Utf8), None);
        assert_eq!(extract_line(b"", Encoding::Utf8), None);
    }

    #[test]
    fn utf16_le_decodes_non_ascii_path() {
        let bytes = utf16le("#!C:\\Pythön\\python.exe\r\nx");
        let line = extract_line(&bytes, Encoding::Utf16Le);
        assert_eq!(line.as_deref(), Some("#!C:\\Pythön\\python.exe"));
    }

    #[test]
    fn utf16_be_decodes() {
        let bytes: Vec<u8> = "#!py\n"
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect();
        assert_eq!(
            extract_line(&bytes, Encoding::Utf16Be).as_deref(),
            Some("#!py")
        );
    }

    #[test]
    fn utf32_be_decodes() {
        let bytes = utf32be("#!python3 -O\nbody");
        assert_eq!(
            extract_line(&bytes, Encoding::Utf32Be).as_deref(),
            Some("#!python3 -O")
        );
    }

    #[test]
    fn truncated_unit_at_buffer_end_is_tolerated() {
        let mut bytes = utf16le("#!python");
        bytes.push(b'\n');
        assert_eq!(extract_line(&bytes, Encoding::Utf16Le), None);

        let mut bytes = utf32be("#!python\n");
        bytes.truncate(bytes.len() - 1);
        assert_eq!(extract_line(&bytes, Encoding::Utf32Be), None);
    }

    #[test]
    fn unpaired_surrogate_is_replaced() {
        let mut bytes = utf16le("#!a");
        bytes.extend_from_slice(&0xD800u16.to_le_bytes());
        bytes.extend_from_slice(&utf16le("b\n"));
        let line = extract_line(&bytes, Encoding::Utf16Le).expect("line");
        assert_eq!(line, "#!a\u{FFFD}b");
    }
}
