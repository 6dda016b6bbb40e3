//! ToUnicode CMap parsing.
//!
//! Only the parts needed to map character codes to text are read:
//! `codespacerange` (code byte lengths), `bfchar` and `bfrange`.

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Hex(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    Keyword(&'a [u8]),
}

fn is_delimiter(b: u8) -> bool {
    matches!(b, b'<' | b'>' | b'[' | b']' | b'(' | b')' | b'/' | b'%' | b'{' | b'}')
        || b.is_ascii_whitespace()
}

fn decode_hex(digits: &[u8]) -> Vec<u8> {
    let nibbles: Vec<u8> = digits
        .iter()
        .filter_map(|&b| char::from(b).to_digit(16).map(|d| d as u8))
        .collect();
    nibbles
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
        .collect()
}

fn tokenize(data: &[u8]) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        match b {
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b'<' if data.get(i + 1) == Some(&b'<') => i += 2,
            b'>' if data.get(i + 1) == Some(&b'>') => i += 2,
            b'<' => {
                let start = i + 1;
                let end = data[start..]
                    .iter()
                    .position(|&c| c == b'>')
                    .map_or(data.len(), |p| start + p);
                tokens.push(Token::Hex(decode_hex(&data[start..end])));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'(' => {
                // literal strings only occur in the CMap header
                let mut depth = 0usize;
                while i < data.len() {
                    match data[i] {
                        b'\\' => i += 1,
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                i += 1;
            }
            _ if b.is_ascii_whitespace() || is_delimiter(b) => i += 1,
            _ => {
                let start = i;
                while i < data.len() && !is_delimiter(data[i]) {
                    i += 1;
                }
                tokens.push(Token::Keyword(&data[start..i]));
            }
        }
    }
    tokens
}

/// Decodes a UTF-16BE destination string of a bf mapping.
fn utf16be_to_string(bytes: &[u8]) -> String {
    let units = bytes
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn code_value(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Adds `delta` to the last UTF-16 unit of a bfrange destination.
fn offset_destination(dst: &[u8], delta: u32) -> String {
    let mut bytes = dst.to_vec();
    if bytes.len() >= 2 {
        let n = bytes.len();
        let last = u32::from(u16::from_be_bytes([bytes[n - 2], bytes[n - 1]]));
        let [hi, lo] = ((last + delta) as u16).to_be_bytes();
        bytes[n - 2] = hi;
        bytes[n - 1] = lo;
    } else if let Some(last) = bytes.last_mut() {
        *last = last.wrapping_add(delta as u8);
    }
    utf16be_to_string(&bytes)
}

/// Parsed ToUnicode mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToUnicodeMap {
    map: FxHashMap<u32, String>,
    /// Code byte lengths declared by `codespacerange`, shortest first.
    code_lengths: Vec<usize>,
}

/// Ranges larger than this are treated as corrupt and skipped.
const MAX_RANGE: u32 = 0xFFFF;

impl ToUnicodeMap {
    pub fn parse(data: &[u8]) -> Self {
        let tokens = tokenize(data);
        let mut cmap = Self::default();
        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Keyword(b"begincodespacerange") => {
                    i += 1;
                    while let (Some(Token::Hex(lo)), Some(Token::Hex(_))) =
                        (tokens.get(i), tokens.get(i + 1))
                    {
                        if !cmap.code_lengths.contains(&lo.len()) {
                            cmap.code_lengths.push(lo.len());
                        }
                        i += 2;
                    }
                }
                Token::Keyword(b"beginbfchar") => {
                    i += 1;
                    while let (Some(Token::Hex(src)), Some(Token::Hex(dst))) =
                        (tokens.get(i), tokens.get(i + 1))
                    {
                        cmap.map.insert(code_value(src), utf16be_to_string(dst));
                        i += 2;
                    }
                }
                Token::Keyword(b"beginbfrange") => {
                    i += 1;
                    i = cmap.parse_bfranges(&tokens, i);
                }
                _ => i += 1,
            }
        }
        cmap.code_lengths.sort_unstable();
        cmap
    }

    fn parse_bfranges(&mut self, tokens: &[Token<'_>], mut i: usize) -> usize {
        while let (Some(Token::Hex(lo)), Some(Token::Hex(hi))) = (tokens.get(i), tokens.get(i + 1))
        {
            let (lo, hi) = (code_value(lo), code_value(hi));
            i += 2;
            match tokens.get(i) {
                Some(Token::Hex(dst)) => {
                    if hi >= lo && hi - lo <= MAX_RANGE {
                        for code in lo..=hi {
                            self.map.insert(code, offset_destination(dst, code - lo));
                        }
                    }
                    i += 1;
                }
                Some(Token::ArrayStart) => {
                    i += 1;
                    let mut code = lo;
                    while let Some(Token::Hex(dst)) = tokens.get(i) {
                        self.map.insert(code, utf16be_to_string(dst));
                        code = code.saturating_add(1);
                        i += 1;
                    }
                    if tokens.get(i) == Some(&Token::ArrayEnd) {
                        i += 1;
                    }
                }
                _ => break,
            }
        }
        i
    }

    pub fn get(&self, code: u32) -> Option<&str> {
        self.map.get(&code).map(String::as_str)
    }

    /// Byte lengths declared for codes; empty when the CMap has no codespace.
    pub fn code_lengths(&self) -> &[usize] {
        &self.code_lengths
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CMapName /Adobe-Identity-UCS def
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
2 beginbfchar
<0003> <0020>
<0011> <00660069>
endbfchar
2 beginbfrange
<0024> <0026> <0041>
<0030> <0031> [<0061> <D83DDE00>]
endbfrange
endcmap";

    #[test]
    fn test_bfchar_entries() {
        let cmap = ToUnicodeMap::parse(SAMPLE);
        assert_eq!(cmap.get(0x03), Some(" "));
        assert_eq!(cmap.get(0x11), Some("fi"));
    }

    #[test]
    fn test_bfrange_with_offset_and_array() {
        let cmap = ToUnicodeMap::parse(SAMPLE);
        assert_eq!(cmap.get(0x24), Some("A"));
        assert_eq!(cmap.get(0x26), Some("C"));
        assert_eq!(cmap.get(0x30), Some("a"));
        assert_eq!(cmap.get(0x31), Some("😀"));
        assert_eq!(cmap.len(), 7);
    }

    #[test]
    fn test_codespace_lengths() {
        let cmap = ToUnicodeMap::parse(SAMPLE);
        assert_eq!(cmap.code_lengths(), &[2]);
    }

    #[test]
    fn test_garbage_is_empty() {
        let cmap = ToUnicodeMap::parse(b"not a cmap at all <zz");
        assert!(cmap.is_empty());
    }
}
