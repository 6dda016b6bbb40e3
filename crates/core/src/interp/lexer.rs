//! Content stream tokenizer.
//!
//! Numbers are read straight into `f64`, so operands keep the full precision
//! of their decimal text before any matrix is applied.

/// An operand of a content stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Bool(bool),
    Null,
    /// Literal name, with `#xx` escapes decoded
    Name(Vec<u8>),
    /// Literal or hex string
    String(Vec<u8>),
    Array(Vec<Operand>),
    /// Inline dictionary (marked-content properties); entries are dropped
    Dict,
}

impl Operand {
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&[u8]> {
        match self {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&[u8]> {
        match self {
            Operand::String(s) => Some(s),
            _ => None,
        }
    }
}

/// An operator with the operands that precede it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operator: String,
    pub operands: Vec<Operand>,
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Operand(Operand),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
    Keyword(&'a [u8]),
}

const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x00' | b'\x0c')
}

const fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Lexer over the bytes of a content stream.
struct ContentLexer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ContentLexer<'a> {
    const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'%' {
                // comment runs to the end of the line
                while self.pos < self.data.len() && !matches!(self.data[self.pos], b'\r' | b'\n') {
                    self.pos += 1;
                }
            } else if is_whitespace(b) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token_end(&self, start: usize) -> usize {
        self.data[start..]
            .iter()
            .position(|&b| is_whitespace(b) || is_delimiter(b))
            .map_or(self.data.len(), |offset| start + offset)
    }

    fn parse_name(&mut self) -> Token<'a> {
        let data = self.data;
        let start = self.pos + 1; // skip '/'
        let end = self.token_end(start);
        let raw = &data[start..end];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#'
                && let (Some(h1), Some(h2)) = (
                    raw.get(i + 1).copied().and_then(hex_value),
                    raw.get(i + 2).copied().and_then(hex_value),
                )
            {
                name.push((h1 << 4) | h2);
                i += 3;
                continue;
            }
            name.push(raw[i]);
            i += 1;
        }
        self.pos = end;
        Token::Operand(Operand::Name(name))
    }

    /// Reads `[+-]digits[.digits]`. Text that is not a number is returned as
    /// a keyword instead.
    fn parse_number(&mut self) -> Token<'a> {
        let data = self.data;
        let start = self.pos;
        let mut pos = start;
        if matches!(data.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let mut digits = 0;
        while data.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
            digits += 1;
        }
        if data.get(pos) == Some(&b'.') {
            pos += 1;
            while data.get(pos).is_some_and(u8::is_ascii_digit) {
                pos += 1;
                digits += 1;
            }
        }
        let value = std::str::from_utf8(&data[start..pos])
            .ok()
            .filter(|_| digits > 0)
            .and_then(|text| text.trim_start_matches('+').parse::<f64>().ok());
        match value {
            Some(value) => {
                self.pos = pos;
                Token::Operand(Operand::Number(value))
            }
            None => self.parse_keyword(),
        }
    }

    fn parse_string(&mut self) -> Token<'a> {
        let data = self.data;
        let mut pos = self.pos + 1; // skip '('
        let mut depth = 1;
        let mut result = Vec::with_capacity(32);
        while pos < data.len() {
            let c = data[pos];
            pos += 1;
            match c {
                b'(' => {
                    depth += 1;
                    result.push(c);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    result.push(c);
                }
                b'\\' => {
                    let Some(&esc) = data.get(pos) else {
                        break;
                    };
                    pos += 1;
                    match esc {
                        b'n' => result.push(b'\n'),
                        b'r' => result.push(b'\r'),
                        b't' => result.push(b'\t'),
                        b'b' => result.push(0x08),
                        b'f' => result.push(0x0c),
                        b'\r' => {
                            if data.get(pos) == Some(&b'\n') {
                                pos += 1;
                            }
                        }
                        b'\n' => {}
                        b'0'..=b'7' => {
                            let mut octal = u32::from(esc - b'0');
                            for _ in 0..2 {
                                match data.get(pos) {
                                    Some(&d @ b'0'..=b'7') => {
                                        octal = octal * 8 + u32::from(d - b'0');
                                        pos += 1;
                                    }
                                    _ => break,
                                }
                            }
                            result.push((octal & 0xff) as u8);
                        }
                        other => result.push(other),
                    }
                }
                _ => result.push(c),
            }
        }
        self.pos = pos;
        Token::Operand(Operand::String(result))
    }

    fn parse_hex_string(&mut self) -> Token<'a> {
        let data = self.data;
        let mut pos = self.pos + 1; // skip '<'
        let mut result = Vec::with_capacity(16);
        let mut pending: Option<u8> = None;
        while let Some(&c) = data.get(pos) {
            pos += 1;
            if c == b'>' {
                break;
            }
            let Some(nibble) = hex_value(c) else {
                continue;
            };
            match pending.take() {
                Some(high) => result.push((high << 4) | nibble),
                None => pending = Some(nibble),
            }
        }
        // odd digit count: the last nibble is followed by an implicit 0
        if let Some(high) = pending {
            result.push(high << 4);
        }
        self.pos = pos;
        Token::Operand(Operand::String(result))
    }

    fn parse_keyword(&mut self) -> Token<'a> {
        let data = self.data;
        let start = self.pos;
        // a stray delimiter stands on its own
        let end = self.token_end(start).max(start + 1);
        self.pos = end;
        match &data[start..end] {
            b"true" => Token::Operand(Operand::Bool(true)),
            b"false" => Token::Operand(Operand::Bool(false)),
            b"null" => Token::Operand(Operand::Null),
            word => Token::Keyword(word),
        }
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        self.skip_whitespace();
        let b = *self.data.get(self.pos)?;
        let next = self.data.get(self.pos + 1).copied();
        let token = match b {
            b'/' => self.parse_name(),
            b'(' => self.parse_string(),
            b'<' if next == Some(b'<') => {
                self.pos += 2;
                Token::DictStart
            }
            b'<' => self.parse_hex_string(),
            b'>' if next == Some(b'>') => {
                self.pos += 2;
                Token::DictEnd
            }
            b'[' => {
                self.pos += 1;
                Token::ArrayStart
            }
            b']' => {
                self.pos += 1;
                Token::ArrayEnd
            }
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.parse_number(),
            _ => self.parse_keyword(),
        };
        Some(token)
    }

    /// Skips an inline image from just after `BI` to just after its `EI`.
    fn skip_inline_image(&mut self) {
        while let Some(token) = self.next_token() {
            if token == Token::Keyword(b"ID") {
                break;
            }
        }
        // a single whitespace byte separates ID from the image data
        if self.data.get(self.pos).copied().is_some_and(is_whitespace) {
            self.pos += 1;
        }
        let data = self.data;
        let begin = self.pos;
        let mut i = begin;
        while i + 1 < data.len() {
            if &data[i..i + 2] == b"EI"
                && (i == begin || is_whitespace(data[i - 1]))
                && data
                    .get(i + 2)
                    .is_none_or(|&b| is_whitespace(b) || is_delimiter(b))
            {
                self.pos = i + 2;
                return;
            }
            i += 1;
        }
        self.pos = data.len();
    }
}

/// Operand containers still waiting for their closing bracket.
enum Open {
    Array(Vec<Operand>),
    Dict,
}

fn push_operand(open: &mut [Open], operands: &mut Vec<Operand>, operand: Operand) {
    match open.last_mut() {
        Some(Open::Array(items)) => items.push(operand),
        Some(Open::Dict) => {}
        None => operands.push(operand),
    }
}

/// Splits a content stream into operations. Malformed input never fails:
/// unbalanced brackets are dropped at the next operator and inline images
/// are skipped whole.
pub fn parse_operations(data: &[u8]) -> Vec<Operation> {
    let mut lexer = ContentLexer::new(data);
    let mut operations = Vec::new();
    let mut operands = Vec::new();
    let mut open: Vec<Open> = Vec::new();

    while let Some(token) = lexer.next_token() {
        match token {
            Token::Operand(operand) => push_operand(&mut open, &mut operands, operand),
            Token::ArrayStart => open.push(Open::Array(Vec::new())),
            Token::DictStart => open.push(Open::Dict),
            Token::ArrayEnd | Token::DictEnd => {
                let operand = match open.pop() {
                    Some(Open::Array(items)) => Operand::Array(items),
                    Some(Open::Dict) => Operand::Dict,
                    None => continue,
                };
                push_operand(&mut open, &mut operands, operand);
            }
            Token::Keyword(b"BI") => {
                lexer.skip_inline_image();
                open.clear();
                operands.clear();
            }
            Token::Keyword(word) => {
                open.clear();
                operations.push(Operation {
                    operator: String::from_utf8_lossy(word).into_owned(),
                    operands: std::mem::take(&mut operands),
                });
            }
        }
    }
    operations
}
