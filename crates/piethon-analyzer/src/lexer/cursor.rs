use piethon_common::{Position, Span};

/// Character reader over script text.
///
/// Tracks the current line, column and byte offset so the scanner can build
/// spans without re-walking the input.
pub struct Cursor<'src> {
    text: &'src str,
    source_name: String,
    chars: std::str::Chars<'src>,
    pos: Position,
}

impl<'src> Cursor<'src> {
    pub fn new(text: &'src str, source_name: impl Into<String>) -> Self {
        Self {
            text,
            source_name: source_name.into(),
            chars: text.chars(),
            pos: Position::new(1, 1, 0),
        }
    }

    /// Position of the next character to be consumed.
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// The character after [`Cursor::peek`].
    pub fn peek_second(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    pub fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.pos.offset += ch.len_utf8() as u32;
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else {
            self.pos.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character if it is `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.advance();
        }
    }

    pub fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    /// Text from byte offset `start` up to the current position.
    pub fn slice_from(&self, start: Position) -> &'src str {
        &self.text[start.offset as usize..self.pos.offset as usize]
    }

    /// Span from `start` up to the current position.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(self.source_name.clone(), start, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut cursor = Cursor::new("ab\ncd", "<test>");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(1, 3, 2));
        cursor.advance();
        assert_eq!(cursor.position(), Position::new(2, 1, 3));
    }

    #[test]
    fn slice_and_span_from_start() {
        let mut cursor = Cursor::new("moo()", "<test>");
        let start = cursor.position();
        cursor.eat_while(|c| c.is_ascii_alphabetic());
        assert_eq!(cursor.slice_from(start), "moo");
        let span = cursor.span_from(start);
        assert_eq!(span.end.column, 4);
        assert_eq!(cursor.peek(), Some('('));
        assert_eq!(cursor.peek_second(), Some(')'));
    }
}
