use super::{token::*, LineNumber};

pub fn lex(s: &str) -> Vec<(LineNumber, Token)> {
    Lexer::new(s).collect()
}

/// Undo the escaping a markup document applies to program text.
pub fn unescape_markup(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn is_basic_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn is_basic_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_symbol_start(s: &str) -> bool {
    SYMBOLS.iter().any(|sym| s.starts_with(sym))
}

/// `_` followed by optional blanks and an optional comment, then a newline.
fn is_continuation(s: &str) -> bool {
    let mut chars = s.chars();
    if chars.next() != Some('_') {
        return false;
    }
    let mut chars = chars.skip_while(|c| is_basic_whitespace(*c)).peekable();
    if chars.peek() == Some(&'\'') {
        return chars.any(|c| c == '\n');
    }
    chars.next() == Some('\n')
}

fn is_hex_prefix(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('&') && matches!(chars.next(), Some('h') | Some('H'))
}

trait Tokenizers<'a> {
    fn rest(&mut self) -> &mut &'a str;
    fn newline(&mut self);

    fn advance(&mut self, len: usize) {
        let rest = self.rest();
        *rest = &rest[len..];
    }

    fn skip_line(&mut self) {
        let rest = self.rest();
        let end = rest.find('\n').unwrap_or_else(|| rest.len());
        *rest = &rest[end..];
    }

    fn continuation(&mut self) {
        let rest = self.rest();
        let end = rest.find('\n').map(|n| n + 1).unwrap_or_else(|| rest.len());
        *rest = &rest[end..];
        self.newline();
    }

    fn string(&mut self) -> Token {
        self.advance(1);
        let mut s = String::new();
        loop {
            let ch = match self.rest().chars().next() {
                Some(ch) => ch,
                None => break,
            };
            self.advance(ch.len_utf8());
            if ch == '"' {
                break;
            }
            if ch == '\n' {
                self.newline();
            }
            s.push(ch);
        }
        Token::Literal(Literal::String(s))
    }

    fn hex(&mut self) -> Token {
        self.advance(2);
        let rest = *self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or_else(|| rest.len());
        self.advance(len);
        Token::Literal(Literal::Hex(rest[..len].to_ascii_lowercase()))
    }

    fn symbol(&mut self) -> Option<Token> {
        let rest = *self.rest();
        let sym = SYMBOLS.iter().find(|sym| rest.starts_with(*sym))?;
        self.advance(sym.len());
        Token::from_symbol(sym)
    }

    /// Accumulates everything that is not whitespace, a quote, a comment
    /// or a symbol. The result is a number, a keyword or an identifier.
    fn run(&mut self) -> Token {
        let mut s = String::new();
        loop {
            let rest = *self.rest();
            let ch = match rest.chars().next() {
                Some(ch) => ch,
                None => break,
            };
            if is_basic_whitespace(ch) || ch == '"' || ch == '\'' || ch == '\n' {
                break;
            }
            if ch == '_' && is_continuation(rest) {
                break;
            }
            if ch == '&' && !s.is_empty() {
                s.push('&');
                self.advance(1);
                break;
            }
            if (ch == '+' || ch == '-') && is_exponent(&s) {
                s.push(ch);
                self.advance(1);
                continue;
            }
            if is_symbol_start(rest) {
                break;
            }
            s.push(ch.to_ascii_lowercase());
            self.advance(ch.len_utf8());
        }
        classify(s)
    }
}

fn is_exponent(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_basic_digit(c) || c == '.' => {}
        _ => return false,
    }
    match s.chars().last() {
        Some('e') | Some('d') => {}
        _ => return false,
    }
    s[..s.len() - 1]
        .chars()
        .all(|c| is_basic_digit(c) || c == '.')
}

fn classify(s: String) -> Token {
    let mut chars = s.chars();
    let numeric = match chars.next() {
        Some(c) if is_basic_digit(c) => true,
        Some('.') => matches!(chars.next(), Some(c) if is_basic_digit(c)),
        _ => false,
    };
    if numeric {
        return Token::Literal(Literal::Number(s));
    }
    match Token::from_string(&s) {
        Some(t) => t,
        None => Token::Ident(s),
    }
}

/// Converts source text to tokens, one per call to `next`.
/// Each token is paired with the line it starts on.
pub struct Lexer<'a> {
    rest: &'a str,
    line: LineNumber,
}

impl<'a> Tokenizers<'a> for Lexer<'a> {
    fn rest(&mut self) -> &mut &'a str {
        &mut self.rest
    }
    fn newline(&mut self) {
        self.line += 1;
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Lexer<'a> {
        Lexer {
            rest: source,
            line: 1,
        }
    }

    pub fn line(&self) -> LineNumber {
        self.line
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (LineNumber, Token);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pk = self.rest.chars().next()?;
            let line = self.line;
            if is_basic_whitespace(pk) {
                self.advance(pk.len_utf8());
                continue;
            }
            if pk == '_' && is_continuation(self.rest) {
                self.continuation();
                continue;
            }
            if pk == '\'' {
                self.skip_line();
                continue;
            }
            if pk == '"' {
                return Some((line, self.string()));
            }
            if is_hex_prefix(self.rest) {
                return Some((line, self.hex()));
            }
            if let Some(token) = self.symbol() {
                if token == Token::Eol {
                    self.newline();
                }
                return Some((line, token));
            }
            let token = self.run();
            if token == Token::Word(Word::Rem) {
                self.skip_line();
                continue;
            }
            return Some((line, token));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<Token> {
        lex(s).into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(
            tokens("PRINT Foo$"),
            [Token::Word(Word::Print), Token::Ident("foo$".to_string())]
        );
    }

    #[test]
    fn test_long_suffix() {
        assert_eq!(
            tokens("a&=5"),
            [
                Token::Ident("a&".to_string()),
                Token::Operator(Operator::Equal),
                Token::Literal(Literal::Number("5".to_string())),
            ]
        );
    }

    #[test]
    fn test_exponent_sign() {
        assert_eq!(
            tokens("1e-5-2"),
            [
                Token::Literal(Literal::Number("1e-5".to_string())),
                Token::Operator(Operator::Minus),
                Token::Literal(Literal::Number("2".to_string())),
            ]
        );
    }
}
