use super::compile::Compiler;
use super::val::wrap_i32;
use super::{ArrayRef, Binding, Function, Opcode, Slot, Val};
use crate::error;
use crate::lang::token::{Literal, Operator, Token};
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// What an expression leaves on the stack, as far as the compiler knows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    Number,
    String,
}

/// Something that can be assigned to. Element subscripts are kept as
/// code so they can be emitted for both a load and a store.
#[derive(Debug, Clone)]
pub enum Lvalue {
    Scalar(Slot),
    Element(ArrayRef, Vec<Opcode>),
}

impl Lvalue {
    pub fn kind(&self) -> Kind {
        let class = match self {
            Lvalue::Scalar(slot) => slot.class,
            Lvalue::Element(array, _) => array.class,
        };
        if class.is_string() {
            Kind::String
        } else {
            Kind::Number
        }
    }

    pub fn load(&self) -> Vec<Opcode> {
        match self {
            Lvalue::Scalar(slot) => vec![Opcode::Push(*slot)],
            Lvalue::Element(array, subscripts) => {
                let mut code = subscripts.clone();
                code.push(Opcode::PushArr(*array));
                code
            }
        }
    }

    pub fn store(&self, value: Vec<Opcode>) -> Vec<Opcode> {
        match self {
            Lvalue::Scalar(slot) => {
                let mut code = value;
                code.push(Opcode::Pop(*slot));
                code
            }
            Lvalue::Element(array, subscripts) => {
                let mut code = subscripts.clone();
                code.extend(value);
                code.push(Opcode::PopArr(*array));
                code
            }
        }
    }
}

fn number(s: &str) -> Result<Val> {
    let (digits, suffix) = match s.char_indices().last() {
        Some((i, c)) if "!#%&".contains(c) => (&s[..i], Some(c)),
        _ => (s, None),
    };
    let n: f64 = match digits.replace('d', "e").parse() {
        Ok(n) => n,
        Err(_) => return Err(error!(SyntaxError; format!("INVALID NUMBER {}", s))),
    };
    Ok(match suffix {
        Some('!') => Val::Single(n as f32),
        Some('#') => Val::Double(n),
        Some(_) => Val::Integer(wrap_i32(n)),
        None if digits.contains(|c| c == '.' || c == 'e' || c == 'd') => Val::Double(n),
        None => Val::from_f64(n),
    })
}

fn hex(s: &str) -> Result<Val> {
    match u64::from_str_radix(s, 16) {
        Ok(n) => Ok(Val::from_f64(n as f64)),
        Err(_) => Err(error!(SyntaxError; format!("INVALID HEX NUMBER &H{}", s))),
    }
}

/// ## Expression compiler
///
/// One function per precedence level, loosest first. Each consumes
/// tokens left to right and appends postfix code.
impl<'a> Compiler<'a> {
    pub fn expr(&mut self) -> Result<Vec<Opcode>> {
        let mut code = vec![];
        self.expression(&mut code)?;
        Ok(code)
    }

    pub fn expression(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.logical_and(code)?;
        while self.parser.accept(&Token::Operator(Operator::Or)) {
            self.logical_and(code)?;
            code.push(Opcode::Or);
            kind = Kind::Number;
        }
        Ok(kind)
    }

    fn logical_and(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.logical_not(code)?;
        while self.parser.accept(&Token::Operator(Operator::And)) {
            self.logical_not(code)?;
            code.push(Opcode::And);
            kind = Kind::Number;
        }
        Ok(kind)
    }

    fn logical_not(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut nots = 0;
        while self.parser.accept(&Token::Operator(Operator::Not)) {
            nots += 1;
        }
        let kind = self.relational(code)?;
        if nots == 0 {
            return Ok(kind);
        }
        code.extend(std::iter::repeat(Opcode::Not).take(nots));
        Ok(Kind::Number)
    }

    fn relational(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.additive(code)?;
        loop {
            let opcode = match self.parser.token() {
                Token::Operator(Operator::Equal) => Opcode::Eq,
                Token::Operator(Operator::NotEqual) => Opcode::NotEq,
                Token::Operator(Operator::Less) => Opcode::Lt,
                Token::Operator(Operator::LessEqual) => Opcode::LtEq,
                Token::Operator(Operator::Greater) => Opcode::Gt,
                Token::Operator(Operator::GreaterEqual) => Opcode::GtEq,
                _ => return Ok(kind),
            };
            self.parser.next();
            self.additive(code)?;
            code.push(opcode);
            kind = Kind::Number;
        }
    }

    fn additive(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.modulo(code)?;
        loop {
            let opcode = match self.parser.token() {
                Token::Operator(Operator::Plus) | Token::Operator(Operator::Ampersand) => {
                    Opcode::Add
                }
                Token::Operator(Operator::Minus) => Opcode::Sub,
                _ => return Ok(kind),
            };
            self.parser.next();
            let rhs = self.modulo(code)?;
            if opcode == Opcode::Sub || (kind == Kind::Number && rhs == Kind::Number) {
                kind = Kind::Number;
            } else {
                kind = Kind::String;
            }
            code.push(opcode);
        }
    }

    fn modulo(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.int_divide(code)?;
        while self.parser.accept(&Token::Operator(Operator::Modulo)) {
            self.int_divide(code)?;
            code.push(Opcode::Mod);
            kind = Kind::Number;
        }
        Ok(kind)
    }

    fn int_divide(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.multiplicative(code)?;
        while self.parser.accept(&Token::Operator(Operator::DivideInt)) {
            self.multiplicative(code)?;
            code.push(Opcode::DivInt);
            kind = Kind::Number;
        }
        Ok(kind)
    }

    fn multiplicative(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.unary(code)?;
        loop {
            let opcode = match self.parser.token() {
                Token::Operator(Operator::Multiply) => Opcode::Mul,
                Token::Operator(Operator::Divide) => Opcode::Div,
                _ => return Ok(kind),
            };
            self.parser.next();
            self.unary(code)?;
            code.push(opcode);
            kind = Kind::Number;
        }
    }

    /// Signs bind looser than `^`, so `-2^2` is -4.
    fn unary(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut negations = 0;
        let mut signed = false;
        loop {
            if self.parser.accept(&Token::Operator(Operator::Minus)) {
                negations += 1;
            } else if !self.parser.accept(&Token::Operator(Operator::Plus)) {
                break;
            }
            signed = true;
        }
        let kind = self.power(code)?;
        code.extend(std::iter::repeat(Opcode::Neg).take(negations));
        Ok(if signed { Kind::Number } else { kind })
    }

    /// Left associative: `2^3^2` is 64.
    fn power(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let mut kind = self.primary(code)?;
        while self.parser.accept(&Token::Operator(Operator::Caret)) {
            let negate = self.parser.accept(&Token::Operator(Operator::Minus));
            self.primary(code)?;
            if negate {
                code.push(Opcode::Neg);
            }
            code.push(Opcode::Pow);
            kind = Kind::Number;
        }
        Ok(kind)
    }

    fn primary(&mut self, code: &mut Vec<Opcode>) -> Result<Kind> {
        let line = self.parser.line();
        match self.parser.next() {
            Token::LParen => {
                let kind = self.expression(code)?;
                self.parser.skip(Token::RParen)?;
                Ok(kind)
            }
            Token::Literal(Literal::String(s)) => {
                code.push(Opcode::Literal(Val::String(s.into())));
                Ok(Kind::String)
            }
            Token::Literal(Literal::Number(s)) => {
                code.push(Opcode::Literal(number(&s)?));
                Ok(Kind::Number)
            }
            Token::Literal(Literal::Hex(s)) => {
                code.push(Opcode::Literal(hex(&s)?));
                Ok(Kind::Number)
            }
            Token::Ident(name) => self.identifier(code, &name),
            t => Err(error!(SyntaxError, line; format!("EXPECTED EXPRESSION FOUND {}", t))),
        }
    }

    fn identifier(&mut self, code: &mut Vec<Opcode>, name: &str) -> Result<Kind> {
        if let Some((opcode, arity)) = Function::opcode_and_arity(name) {
            return self.function(code, name, opcode, arity);
        }
        if self.parser.accept(&Token::LParen) {
            let (subscripts, count) = self.subscripts()?;
            let array = self.array(name, count)?;
            code.extend(subscripts);
            code.push(Opcode::PushArr(array));
            return Ok(Lvalue::Element(array, vec![]).kind());
        }
        let slot = self.scalar(name, false)?;
        code.push(Opcode::Push(slot));
        Ok(Lvalue::Scalar(slot).kind())
    }

    fn function(
        &mut self,
        code: &mut Vec<Opcode>,
        name: &str,
        opcode: Opcode,
        arity: std::ops::RangeInclusive<usize>,
    ) -> Result<Kind> {
        let mut args = vec![];
        let mut count = 0;
        if self.parser.accept(&Token::LParen) {
            if !self.parser.is(&Token::RParen) {
                loop {
                    self.expression(&mut args)?;
                    count += 1;
                    if !self.parser.accept(&Token::Comma) {
                        break;
                    }
                }
            }
            self.parser.skip(Token::RParen)?;
        }
        if !arity.contains(&count) {
            return Err(error!(SyntaxError;
                format!("WRONG NUMBER OF ARGUMENTS TO {}", name.to_ascii_uppercase())));
        }
        if !Function::ignores_arguments(&opcode) {
            code.extend(args);
        }
        code.push(opcode);
        Ok(if name.ends_with('$') {
            Kind::String
        } else {
            Kind::Number
        })
    }

    /// Parses `a, b, ...)` after an opening parenthesis.
    fn subscripts(&mut self) -> Result<(Vec<Opcode>, usize)> {
        let mut code = vec![];
        let mut count = 0;
        loop {
            self.expression(&mut code)?;
            count += 1;
            if !self.parser.accept(&Token::Comma) {
                break;
            }
        }
        self.parser.skip(Token::RParen)?;
        Ok((code, count))
    }

    fn implicit(&self, name: &str) -> Result<()> {
        if self.option_explicit {
            Err(error!(VariableNotDefined; name))
        } else {
            Ok(())
        }
    }

    /// Resolves a scalar, declaring it on first use.
    pub fn scalar(&mut self, name: &str, writable: bool) -> Result<Slot> {
        match self.vars.get(name) {
            Some(Binding::Scalar(slot)) => Ok(slot),
            Some(Binding::Const(slot)) => {
                if writable {
                    Err(error!(DuplicateDefinition; format!("{} IS CONSTANT", name)))
                } else {
                    Ok(slot)
                }
            }
            Some(Binding::Array(_)) => Err(error!(WrongNumberOfSubscripts; name)),
            None => {
                self.implicit(name)?;
                let class = self.vars.implicit_class(name);
                self.vars.declare_scalar(name, class)
            }
        }
    }

    /// Resolves an array, declaring it with default bounds on first use.
    pub fn array(&mut self, name: &str, dims: usize) -> Result<ArrayRef> {
        match self.vars.get(name) {
            Some(Binding::Array(array)) if array.dims == dims => Ok(array),
            Some(_) => Err(error!(WrongNumberOfSubscripts; name)),
            None => {
                self.implicit(name)?;
                let class = self.vars.implicit_class(name);
                let bounds = (self.option_base, 10);
                self.vars.declare_array(name, class, dims, Some(bounds))
            }
        }
    }

    pub fn lvalue(&mut self) -> Result<Lvalue> {
        let name = self.parser.ident()?;
        if Function::opcode_and_arity(&name).is_some() {
            return Err(error!(SyntaxError;
                format!("CANNOT ASSIGN TO {}", name.to_ascii_uppercase())));
        }
        if self.parser.accept(&Token::LParen) {
            let (subscripts, count) = self.subscripts()?;
            let array = self.array(&name, count)?;
            Ok(Lvalue::Element(array, subscripts))
        } else {
            Ok(Lvalue::Scalar(self.scalar(&name, true)?))
        }
    }
}
