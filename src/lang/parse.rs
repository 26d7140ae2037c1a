use super::{token::*, Error, Lexer, LineNumber};

type Result<T> = std::result::Result<T, Error>;

/// ## Token cursor
///
/// Exactly one token is current. The compiler inspects it, then
/// consumes it with `next` or one of the `skip` forms.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(LineNumber, Token)>,
    token: Token,
    line: LineNumber,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Parser<'a> {
        let mut parser = Parser {
            lexer: Lexer::new(source),
            peeked: None,
            token: Token::Eof,
            line: 1,
        };
        parser.next();
        parser
    }

    fn pull(&mut self) -> (LineNumber, Token) {
        match self.lexer.next() {
            Some(t) => t,
            None => (self.lexer.line(), Token::Eof),
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Line of the current token.
    pub fn line(&self) -> LineNumber {
        self.line
    }

    /// Makes the following token current and returns the one consumed.
    pub fn next(&mut self) -> Token {
        let (line, token) = match self.peeked.take() {
            Some(t) => t,
            None => self.pull(),
        };
        self.line = line;
        std::mem::replace(&mut self.token, token)
    }

    /// The token after the current one.
    pub fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            self.peeked = Some(self.pull());
        }
        match &self.peeked {
            Some((_, t)) => t,
            None => &self.token,
        }
    }

    pub fn is(&self, token: &Token) -> bool {
        self.token == *token
    }

    pub fn is_word(&self, word: Word) -> bool {
        self.token == Token::Word(word)
    }

    /// Contextual keywords like `EXPLICIT` or `BF` lex as identifiers.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(&self.token, Token::Ident(s) if s == name)
    }

    pub fn skip(&mut self, expected: Token) -> Result<()> {
        if self.token == expected {
            self.next();
            Ok(())
        } else {
            Err(self.expected(&expected.to_string()))
        }
    }

    pub fn skip_word(&mut self, word: Word) -> Result<()> {
        self.skip(Token::Word(word))
    }

    pub fn skip_operator(&mut self, op: Operator) -> Result<()> {
        self.skip(Token::Operator(op))
    }

    /// Consumes the current token when it matches.
    pub fn accept(&mut self, token: &Token) -> bool {
        if self.token == *token {
            self.next();
            true
        } else {
            false
        }
    }

    pub fn accept_word(&mut self, word: Word) -> bool {
        self.accept(&Token::Word(word))
    }

    pub fn ident(&mut self) -> Result<String> {
        match &self.token {
            Token::Ident(_) => match self.next() {
                Token::Ident(s) => Ok(s),
                _ => Err(error!(InternalError; "TOKEN CURSOR")),
            },
            _ => Err(self.expected("IDENTIFIER")),
        }
    }

    pub fn expected(&self, what: &str) -> Error {
        error!(SyntaxError, self.line; format!("EXPECTED {} FOUND {}", what, self.token))
    }

    pub fn unexpected(&self) -> Error {
        error!(SyntaxError, self.line; format!("UNEXPECTED {}", self.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_tracks_lines() {
        let mut p = Parser::new("a = 1\n\nprint a");
        assert!(p.is_ident("a"));
        assert_eq!(p.line(), 1);
        p.next();
        assert_eq!(p.peek(), &Token::Literal(Literal::Number("1".to_string())));
        p.next();
        p.next();
        assert_eq!(p.token(), &Token::Eol);
        p.next();
        p.next();
        assert!(p.is_word(Word::Print));
        assert_eq!(p.line(), 3);
        p.next();
        p.next();
        assert_eq!(p.token(), &Token::Eof);
    }

    #[test]
    fn test_skip_reports_what_was_found() {
        let mut p = Parser::new("for 1");
        assert!(p.skip_word(Word::For).is_ok());
        let e = p.ident().unwrap_err();
        assert_eq!(e.to_string(), "SYNTAX ERROR; EXPECTED IDENTIFIER FOUND 1 at line 1");
    }
}
