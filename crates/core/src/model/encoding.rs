//! Simple-font encodings and glyph-name lookup.
//!
//! Covers the base encodings a simple font may name (`WinAnsiEncoding`,
//! `MacRomanEncoding`, `StandardEncoding`) and the Adobe glyph names that
//! appear in `/Differences` arrays for Latin text.

/// Glyph names for codes 0x20..=0x7E.
const ASCII_NAMES: [&str; 95] = [
    "space", "exclam", "quotedbl", "numbersign", "dollar", "percent", "ampersand",
    "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma", "hyphen", "period",
    "slash", "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
    "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B", "C", "D", "E",
    "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U", "V", "W", "X",
    "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum", "underscore", "grave",
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
    "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright", "asciitilde",
];

/// Glyph names for Latin-1 codes 0xA0..=0xFF.
const LATIN1_NAMES: [&str; 96] = [
    "nbspace", "exclamdown", "cent", "sterling", "currency", "yen", "brokenbar", "section",
    "dieresis", "copyright", "ordfeminine", "guillemotleft", "logicalnot", "sfthyphen",
    "registered", "macron", "degree", "plusminus", "twosuperior", "threesuperior", "acute", "mu",
    "paragraph", "periodcentered", "cedilla", "onesuperior", "ordmasculine", "guillemotright",
    "onequarter", "onehalf", "threequarters", "questiondown", "Agrave", "Aacute", "Acircumflex",
    "Atilde", "Adieresis", "Aring", "AE", "Ccedilla", "Egrave", "Eacute", "Ecircumflex",
    "Edieresis", "Igrave", "Iacute", "Icircumflex", "Idieresis", "Eth", "Ntilde", "Ograve",
    "Oacute", "Ocircumflex", "Otilde", "Odieresis", "multiply", "Oslash", "Ugrave", "Uacute",
    "Ucircumflex", "Udieresis", "Yacute", "Thorn", "germandbls", "agrave", "aacute",
    "acircumflex", "atilde", "adieresis", "aring", "ae", "ccedilla", "egrave", "eacute",
    "ecircumflex", "edieresis", "igrave", "iacute", "icircumflex", "idieresis", "eth", "ntilde",
    "ograve", "oacute", "ocircumflex", "otilde", "odieresis", "divide", "oslash", "ugrave",
    "uacute", "ucircumflex", "udieresis", "yacute", "thorn", "ydieresis",
];

/// WinAnsiEncoding codes 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_HIGH: [(u8, char, &str); 27] = [
    (0x80, '\u{20AC}', "Euro"),
    (0x82, '\u{201A}', "quotesinglbase"),
    (0x83, '\u{0192}', "florin"),
    (0x84, '\u{201E}', "quotedblbase"),
    (0x85, '\u{2026}', "ellipsis"),
    (0x86, '\u{2020}', "dagger"),
    (0x87, '\u{2021}', "daggerdbl"),
    (0x88, '\u{02C6}', "circumflex"),
    (0x89, '\u{2030}', "perthousand"),
    (0x8A, '\u{0160}', "Scaron"),
    (0x8B, '\u{2039}', "guilsinglleft"),
    (0x8C, '\u{0152}', "OE"),
    (0x8E, '\u{017D}', "Zcaron"),
    (0x91, '\u{2018}', "quoteleft"),
    (0x92, '\u{2019}', "quoteright"),
    (0x93, '\u{201C}', "quotedblleft"),
    (0x94, '\u{201D}', "quotedblright"),
    (0x95, '\u{2022}', "bullet"),
    (0x96, '\u{2013}', "endash"),
    (0x97, '\u{2014}', "emdash"),
    (0x98, '\u{02DC}', "tilde"),
    (0x99, '\u{2122}', "trademark"),
    (0x9A, '\u{0161}', "scaron"),
    (0x9B, '\u{203A}', "guilsinglright"),
    (0x9C, '\u{0153}', "oe"),
    (0x9E, '\u{017E}', "zcaron"),
    (0x9F, '\u{0178}', "Ydieresis"),
];

/// MacRomanEncoding codes 0x80..=0xFF, sixteen per row.
const MAC_ROMAN_HIGH: &str = concat!(
    "ÄÅÇÉÑÖÜáàâäãåçéè",
    "êëíìîïñóòôöõúùûü",
    "†°¢£§•¶ß®©™´¨≠ÆØ",
    "∞±≤≥¥µ∂∑∏π∫ªºΩæø",
    "¿¡¬√ƒ≈∆«»…\u{A0}ÀÃÕŒœ",
    "–—“”‘’÷◊ÿŸ⁄€‹›ﬁﬂ",
    "‡·‚„‰ÂÊÁËÈÍÎÏÌÓÔ",
    "\u{F8FF}ÒÚÛÙıˆ˜¯˘˙˚¸˝˛ˇ",
);

/// StandardEncoding codes that differ from ASCII/absent from it.
const STANDARD_DIFFS: [(u8, char); 56] = [
    (0x27, '\u{2019}'),
    (0x60, '\u{2018}'),
    (0xA1, '¡'),
    (0xA2, '¢'),
    (0xA3, '£'),
    (0xA4, '\u{2044}'),
    (0xA5, '¥'),
    (0xA6, '\u{0192}'),
    (0xA7, '§'),
    (0xA8, '¤'),
    (0xA9, '\''),
    (0xAA, '\u{201C}'),
    (0xAB, '«'),
    (0xAC, '\u{2039}'),
    (0xAD, '\u{203A}'),
    (0xAE, '\u{FB01}'),
    (0xAF, '\u{FB02}'),
    (0xB1, '\u{2013}'),
    (0xB2, '\u{2020}'),
    (0xB3, '\u{2021}'),
    (0xB4, '·'),
    (0xB6, '¶'),
    (0xB7, '\u{2022}'),
    (0xB8, '\u{201A}'),
    (0xB9, '\u{201E}'),
    (0xBA, '\u{201D}'),
    (0xBB, '»'),
    (0xBC, '\u{2026}'),
    (0xBD, '\u{2030}'),
    (0xBF, '¿'),
    (0xC1, '`'),
    (0xC2, '´'),
    (0xC3, '\u{02C6}'),
    (0xC4, '\u{02DC}'),
    (0xC5, '¯'),
    (0xC6, '\u{02D8}'),
    (0xC7, '\u{02D9}'),
    (0xC8, '¨'),
    (0xCA, '\u{02DA}'),
    (0xCB, '¸'),
    (0xCD, '\u{02DD}'),
    (0xCE, '\u{02DB}'),
    (0xCF, '\u{02C7}'),
    (0xD0, '\u{2014}'),
    (0xE1, 'Æ'),
    (0xE3, 'ª'),
    (0xE8, '\u{0141}'),
    (0xE9, 'Ø'),
    (0xEA, '\u{0152}'),
    (0xEB, 'º'),
    (0xF1, 'æ'),
    (0xF5, '\u{0131}'),
    (0xF8, '\u{0142}'),
    (0xF9, 'ø'),
    (0xFA, '\u{0153}'),
    (0xFB, 'ß'),
];

/// Glyph names outside the tables above.
const EXTRA_NAMES: [(&str, &str); 17] = [
    ("fi", "\u{FB01}"),
    ("fl", "\u{FB02}"),
    ("ff", "\u{FB00}"),
    ("ffi", "\u{FB03}"),
    ("ffl", "\u{FB04}"),
    ("minus", "\u{2212}"),
    ("fraction", "\u{2044}"),
    ("dotlessi", "\u{0131}"),
    ("Lslash", "\u{0141}"),
    ("lslash", "\u{0142}"),
    ("breve", "\u{02D8}"),
    ("dotaccent", "\u{02D9}"),
    ("ring", "\u{02DA}"),
    ("hungarumlaut", "\u{02DD}"),
    ("ogonek", "\u{02DB}"),
    ("caron", "\u{02C7}"),
    ("nonbreakingspace", "\u{A0}"),
];

/// A named base encoding of a simple font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    Standard,
    WinAnsi,
    MacRoman,
}

impl BaseEncoding {
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"StandardEncoding" => Some(Self::Standard),
            b"WinAnsiEncoding" => Some(Self::WinAnsi),
            b"MacRomanEncoding" => Some(Self::MacRoman),
            _ => None,
        }
    }

    /// Builds the 256-entry code table of this encoding.
    pub fn table(self) -> Vec<Option<String>> {
        (0..=255u8).map(|code| self.decode(code).map(String::from)).collect()
    }

    fn decode(self, code: u8) -> Option<char> {
        match self {
            BaseEncoding::WinAnsi => match code {
                0x20..=0x7E | 0xA0..=0xFF => Some(char::from(code)),
                0x80..=0x9F => WIN_ANSI_HIGH
                    .iter()
                    .find(|(c, _, _)| *c == code)
                    .map(|(_, ch, _)| *ch),
                _ => None,
            },
            BaseEncoding::MacRoman => match code {
                0x20..=0x7E => Some(char::from(code)),
                0x80..=0xFF => MAC_ROMAN_HIGH.chars().nth(usize::from(code - 0x80)),
                _ => None,
            },
            BaseEncoding::Standard => STANDARD_DIFFS
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, ch)| *ch)
                .or_else(|| (0x20..=0x7E).contains(&code).then_some(char::from(code))),
        }
    }
}

/// Maps an Adobe glyph name to its Unicode text.
///
/// Handles `uniXXXX` (possibly several code points), `uXXXX[XX]`, suffixed
/// variants such as `a.sc`, and `_`-joined ligature names.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    let base = name.split('.').next().unwrap_or(name);
    if base.is_empty() {
        return None;
    }
    if base.contains('_') {
        let parts: Option<Vec<String>> = base.split('_').map(glyph_name_to_unicode).collect();
        return parts.map(|parts| parts.concat());
    }
    if let Some(hex) = base.strip_prefix("uni")
        && hex.len() >= 4
        && hex.len() % 4 == 0
    {
        let decoded: Option<String> = hex
            .as_bytes()
            .chunks(4)
            .map(|chunk| {
                std::str::from_utf8(chunk)
                    .ok()
                    .and_then(|s| u32::from_str_radix(s, 16).ok())
                    .and_then(char::from_u32)
            })
            .collect();
        if decoded.is_some() {
            return decoded;
        }
    }
    if let Some(hex) = base.strip_prefix('u')
        && (4..=6).contains(&hex.len())
        && let Ok(cp) = u32::from_str_radix(hex, 16)
        && let Some(ch) = char::from_u32(cp)
    {
        return Some(ch.to_string());
    }
    if let Some(pos) = ASCII_NAMES.iter().position(|n| *n == base) {
        return Some(char::from(0x20 + pos as u8).to_string());
    }
    if let Some(pos) = LATIN1_NAMES.iter().position(|n| *n == base) {
        return Some(char::from(0xA0 + pos as u8).to_string());
    }
    if let Some((_, ch, _)) = WIN_ANSI_HIGH.iter().find(|(_, _, n)| *n == base) {
        return Some(ch.to_string());
    }
    EXTRA_NAMES
        .iter()
        .find(|(n, _)| *n == base)
        .map(|(_, text)| (*text).to_string())
}
