use std::collections::HashMap;

thread_local!(
    static STRING_TO_TOKEN: HashMap<String, Token> = Word::ALL
        .iter()
        .map(|w| Token::Word(*w))
        .chain(Operator::WORDS.iter().map(|o| Token::Operator(*o)))
        .map(|t| (t.to_string().to_ascii_lowercase(), t))
        .chain(std::iter::once(("?".to_string(), Token::Word(Word::Print))))
        .collect();
);

/// Punctuation and operators in match priority. Longer spellings come
/// before any shorter spelling they start with.
pub const SYMBOLS: [&str; 31] = [
    ":", ";", ",", "(", ")", "{", "}", "[", "]", "+=", "-=", "*=", "/=", "\\=", "^=", "&=", "+",
    "-", "*", "/", "\\", "^", "&", "<=", ">=", "<>", "=", "<", ">", "@", "\n",
];

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Literal(Literal),
    Word(Word),
    Operator(Operator),
    Ident(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    At,
    Eol,
    Eof,
}

impl Token {
    /// Keyword or word operator for an already lowercased run.
    pub fn from_string(s: &str) -> Option<Token> {
        STRING_TO_TOKEN.with(|stt| stt.get(s).cloned())
    }

    pub fn from_symbol(s: &str) -> Option<Token> {
        use Operator::*;
        let t = match s {
            ":" => Token::Colon,
            ";" => Token::Semicolon,
            "," => Token::Comma,
            "(" => Token::LParen,
            ")" => Token::RParen,
            "{" => Token::LBrace,
            "}" => Token::RBrace,
            "[" => Token::LBracket,
            "]" => Token::RBracket,
            "@" => Token::At,
            "\n" => Token::Eol,
            "+=" => Token::Operator(PlusEqual),
            "-=" => Token::Operator(MinusEqual),
            "*=" => Token::Operator(MultiplyEqual),
            "/=" => Token::Operator(DivideEqual),
            "\\=" => Token::Operator(DivideIntEqual),
            "^=" => Token::Operator(CaretEqual),
            "&=" => Token::Operator(AmpersandEqual),
            "+" => Token::Operator(Plus),
            "-" => Token::Operator(Minus),
            "*" => Token::Operator(Multiply),
            "/" => Token::Operator(Divide),
            "\\" => Token::Operator(DivideInt),
            "^" => Token::Operator(Caret),
            "&" => Token::Operator(Ampersand),
            "<=" => Token::Operator(LessEqual),
            ">=" => Token::Operator(GreaterEqual),
            "<>" => Token::Operator(NotEqual),
            "=" => Token::Operator(Equal),
            "<" => Token::Operator(Less),
            ">" => Token::Operator(Greater),
            _ => return None,
        };
        Some(t)
    }

    /// True where a statement ends: `:`, end of line or end of file.
    pub fn is_separator(&self) -> bool {
        matches!(self, Token::Colon | Token::Eol | Token::Eof)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Token::*;
        match self {
            Literal(s) => write!(f, "{}", s),
            Word(s) => write!(f, "{}", s),
            Operator(s) => write!(f, "{}", s),
            Ident(s) => write!(f, "{}", s),
            LParen => write!(f, "("),
            RParen => write!(f, ")"),
            LBrace => write!(f, "{{"),
            RBrace => write!(f, "}}"),
            LBracket => write!(f, "["),
            RBracket => write!(f, "]"),
            Comma => write!(f, ","),
            Colon => write!(f, ":"),
            Semicolon => write!(f, ";"),
            At => write!(f, "@"),
            Eol => write!(f, "END OF LINE"),
            Eof => write!(f, "END OF FILE"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    String(String),
    Number(String),
    Hex(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Literal::*;
        match self {
            String(s) => write!(f, "\"{}\"", s),
            Number(s) => write!(f, "{}", s),
            Hex(s) => write!(f, "&H{}", s.to_ascii_uppercase()),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Word {
    As,
    Case,
    Circle,
    Color,
    Const,
    Defdbl,
    Defint,
    Deflng,
    Defsng,
    Defstr,
    Dim,
    Do,
    Else,
    Elseif,
    End,
    For,
    Getmouse,
    Gosub,
    Goto,
    If,
    Let,
    Line,
    Locate,
    Loop,
    Next,
    Option,
    Print,
    Pset,
    Rem,
    Return,
    Screen,
    Select,
    Shared,
    Sleep,
    Step,
    Swap,
    Then,
    To,
    Until,
    Using,
    Wend,
    While,
}

impl Word {
    pub const ALL: [Word; 42] = [
        Word::As,
        Word::Case,
        Word::Circle,
        Word::Color,
        Word::Const,
        Word::Defdbl,
        Word::Defint,
        Word::Deflng,
        Word::Defsng,
        Word::Defstr,
        Word::Dim,
        Word::Do,
        Word::Else,
        Word::Elseif,
        Word::End,
        Word::For,
        Word::Getmouse,
        Word::Gosub,
        Word::Goto,
        Word::If,
        Word::Let,
        Word::Line,
        Word::Locate,
        Word::Loop,
        Word::Next,
        Word::Option,
        Word::Print,
        Word::Pset,
        Word::Rem,
        Word::Return,
        Word::Screen,
        Word::Select,
        Word::Shared,
        Word::Sleep,
        Word::Step,
        Word::Swap,
        Word::Then,
        Word::To,
        Word::Until,
        Word::Using,
        Word::Wend,
        Word::While,
    ];
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Word::*;
        match self {
            As => write!(f, "AS"),
            Case => write!(f, "CASE"),
            Circle => write!(f, "CIRCLE"),
            Color => write!(f, "COLOR"),
            Const => write!(f, "CONST"),
            Defdbl => write!(f, "DEFDBL"),
            Defint => write!(f, "DEFINT"),
            Deflng => write!(f, "DEFLNG"),
            Defsng => write!(f, "DEFSNG"),
            Defstr => write!(f, "DEFSTR"),
            Dim => write!(f, "DIM"),
            Do => write!(f, "DO"),
            Else => write!(f, "ELSE"),
            Elseif => write!(f, "ELSEIF"),
            End => write!(f, "END"),
            For => write!(f, "FOR"),
            Getmouse => write!(f, "GETMOUSE"),
            Gosub => write!(f, "GOSUB"),
            Goto => write!(f, "GOTO"),
            If => write!(f, "IF"),
            Let => write!(f, "LET"),
            Line => write!(f, "LINE"),
            Locate => write!(f, "LOCATE"),
            Loop => write!(f, "LOOP"),
            Next => write!(f, "NEXT"),
            Option => write!(f, "OPTION"),
            Print => write!(f, "PRINT"),
            Pset => write!(f, "PSET"),
            Rem => write!(f, "REM"),
            Return => write!(f, "RETURN"),
            Screen => write!(f, "SCREEN"),
            Select => write!(f, "SELECT"),
            Shared => write!(f, "SHARED"),
            Sleep => write!(f, "SLEEP"),
            Step => write!(f, "STEP"),
            Swap => write!(f, "SWAP"),
            Then => write!(f, "THEN"),
            To => write!(f, "TO"),
            Until => write!(f, "UNTIL"),
            Using => write!(f, "USING"),
            Wend => write!(f, "WEND"),
            While => write!(f, "WHILE"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Operator {
    Caret,
    Multiply,
    Divide,
    DivideInt,
    Modulo,
    Plus,
    Minus,
    Ampersand,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Not,
    And,
    Or,
    PlusEqual,
    MinusEqual,
    MultiplyEqual,
    DivideEqual,
    DivideIntEqual,
    CaretEqual,
    AmpersandEqual,
}

impl Operator {
    /// Operators spelled as words.
    pub const WORDS: [Operator; 4] = [
        Operator::Modulo,
        Operator::Not,
        Operator::And,
        Operator::Or,
    ];

    pub fn is_assignment(&self) -> bool {
        use Operator::*;
        matches!(
            self,
            Equal
                | PlusEqual
                | MinusEqual
                | MultiplyEqual
                | DivideEqual
                | DivideIntEqual
                | CaretEqual
                | AmpersandEqual
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Operator::*;
        match self {
            Caret => write!(f, "^"),
            Multiply => write!(f, "*"),
            Divide => write!(f, "/"),
            DivideInt => write!(f, "\\"),
            Modulo => write!(f, "MOD"),
            Plus => write!(f, "+"),
            Minus => write!(f, "-"),
            Ampersand => write!(f, "&"),
            Equal => write!(f, "="),
            NotEqual => write!(f, "<>"),
            Less => write!(f, "<"),
            LessEqual => write!(f, "<="),
            Greater => write!(f, ">"),
            GreaterEqual => write!(f, ">="),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),
            PlusEqual => write!(f, "+="),
            MinusEqual => write!(f, "-="),
            MultiplyEqual => write!(f, "*="),
            DivideEqual => write!(f, "/="),
            DivideIntEqual => write!(f, "\\="),
            CaretEqual => write!(f, "^="),
            AmpersandEqual => write!(f, "&="),
        }
    }
}
