use basic::lang::{lex, token::*, unescape_markup};

fn tokens(s: &str) -> Vec<Token> {
    lex(s).into_iter().map(|(_, t)| t).collect()
}

#[test]
fn test_relational_operators() {
    assert_eq!(
        tokens("1<=2<>3>=4"),
        [
            Token::Literal(Literal::Number("1".to_string())),
            Token::Operator(Operator::LessEqual),
            Token::Literal(Literal::Number("2".to_string())),
            Token::Operator(Operator::NotEqual),
            Token::Literal(Literal::Number("3".to_string())),
            Token::Operator(Operator::GreaterEqual),
            Token::Literal(Literal::Number("4".to_string())),
        ]
    );
}

#[test]
fn test_compound_assignment() {
    assert_eq!(
        tokens("n += 1"),
        [
            Token::Ident("n".to_string()),
            Token::Operator(Operator::PlusEqual),
            Token::Literal(Literal::Number("1".to_string())),
        ]
    );
}

#[test]
fn test_keywords_and_word_operators() {
    assert_eq!(
        tokens("IF a MOD 2 THEN ? X$"),
        [
            Token::Word(Word::If),
            Token::Ident("a".to_string()),
            Token::Operator(Operator::Modulo),
            Token::Literal(Literal::Number("2".to_string())),
            Token::Word(Word::Then),
            Token::Word(Word::Print),
            Token::Ident("x$".to_string()),
        ]
    );
}

#[test]
fn test_hex_and_strings() {
    assert_eq!(
        tokens("&HFF \"Hi There\""),
        [
            Token::Literal(Literal::Hex("ff".to_string())),
            Token::Literal(Literal::String("Hi There".to_string())),
        ]
    );
}

#[test]
fn test_comments_and_line_numbers() {
    let lexed = lex("a = 1 ' one\nREM two\nb = 2");
    let lines: Vec<_> = lexed
        .iter()
        .filter(|(_, t)| matches!(t, Token::Ident(_)))
        .map(|(line, t)| (*line, t.to_string()))
        .collect();
    assert_eq!(lines, [(1, "a".to_string()), (3, "b".to_string())]);
    assert!(!lexed.iter().any(|(_, t)| t.to_string() == "two"));
}

#[test]
fn test_markup() {
    assert_eq!(unescape_markup("if a &lt; b &amp;&amp; c &gt; d"), "if a < b && c > d");
}
