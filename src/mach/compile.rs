use super::codegen::Kind;
use super::{Address, LabelId, MouseField, Opcode, Program, Shape, Slot, StorageClass, Temp, Val, Vars};
use crate::error;
use crate::lang::token::{Literal, Operator, Token, Word};
use crate::lang::{Error, ErrorCode, LineNumber, Parser};
use tracing::debug;

type Result<T> = std::result::Result<T, Error>;

/// ## Compiler
///
/// Single pass from source text to a linked `Program`. Statements
/// append code as they are read. Open blocks sit on the `flow` stack
/// with the addresses of branches still waiting for a target.
pub fn compile(source: &str) -> Result<Program> {
    Compiler::new(source).compile()
}

struct CaseRange {
    lo: Vec<Opcode>,
    hi: Option<Vec<Opcode>>,
    target: Address,
}

struct Select {
    temp: Temp,
    dispatch_site: Address,
    cases: Vec<CaseRange>,
    exits: Vec<Address>,
    default: Option<Address>,
}

enum Frame {
    If {
        /// Taken when the current branch condition is false.
        cond_site: Option<Address>,
        exits: Vec<Address>,
    },
    Do {
        start: Address,
        cond_site: Option<Address>,
    },
    While {
        start: Address,
        cond_site: Address,
    },
    For {
        name: String,
        var: Slot,
        temp: Temp,
        test_site: Address,
    },
    Select(Select),
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::If { .. } => "IF",
            Frame::Do { .. } => "DO",
            Frame::While { .. } => "WHILE",
            Frame::For { .. } => "FOR",
            Frame::Select(_) => "SELECT CASE",
        }
    }

    fn unclosed(&self) -> ErrorCode {
        match self {
            Frame::If { .. } => ErrorCode::IfWithoutEndIf,
            Frame::Do { .. } => ErrorCode::DoWithoutLoop,
            Frame::While { .. } => ErrorCode::WhileWithoutWend,
            Frame::For { .. } => ErrorCode::ForWithoutNext,
            Frame::Select(_) => ErrorCode::SelectWithoutEndSelect,
        }
    }
}

fn mismatch(code: ErrorCode, open: Option<(LineNumber, Frame)>) -> Error {
    match open {
        Some((line, frame)) => Error::new(code)
            .message(format!("{} FROM LINE {} IS STILL OPEN", frame.name(), line)),
        None => Error::new(code),
    }
}

pub struct Compiler<'a> {
    pub(super) parser: Parser<'a>,
    pub(super) program: Program,
    pub(super) vars: Vars,
    flow: Vec<(LineNumber, Frame)>,
    pub(super) option_base: i32,
    pub(super) option_explicit: bool,
}

impl<'a> Compiler<'a> {
    pub fn new(source: &'a str) -> Compiler<'a> {
        Compiler {
            parser: Parser::new(source),
            program: Program::new(),
            vars: Vars::new(),
            flow: vec![],
            option_base: 0,
            option_explicit: false,
        }
    }

    pub fn compile(mut self) -> Result<Program> {
        while !self.parser.is(&Token::Eof) {
            if let Err(e) = self.step() {
                return Err(e.in_line_number(self.parser.line()));
            }
        }
        if let Some((line, frame)) = self.flow.pop() {
            return Err(Error::new(frame.unclosed()).in_line_number(line));
        }
        self.emit(Opcode::End);
        let Compiler {
            mut program, vars, ..
        } = self;
        program.link()?;
        program.set_layout(vars.into_layout());
        debug!(
            ops = program.len(),
            labels = program.labels().len(),
            "compiled"
        );
        Ok(program)
    }

    fn step(&mut self) -> Result<()> {
        match self.parser.token() {
            Token::Eol | Token::Colon => {
                self.parser.next();
                Ok(())
            }
            _ => {
                if !self.label()? {
                    self.statement()?;
                    self.end_of_statement()?;
                }
                Ok(())
            }
        }
    }

    fn emit(&mut self, op: Opcode) -> Address {
        let line = self.parser.line();
        self.program.push(op, line)
    }

    fn emit_code(&mut self, code: Vec<Opcode>) {
        let line = self.parser.line();
        self.program.append(code, line)
    }

    fn here(&self) -> Address {
        self.program.len()
    }

    fn patch_here(&mut self, site: Address) -> Result<()> {
        let here = self.here();
        self.program.patch(site, here)
    }

    fn open(&mut self, frame: Frame) {
        let line = self.parser.line();
        self.flow.push((line, frame));
    }

    fn end_of_statement(&self) -> Result<()> {
        if self.parser.token().is_separator() {
            Ok(())
        } else {
            Err(self.parser.expected("END OF STATEMENT"))
        }
    }

    /// An argument left empty between commas.
    fn is_blank_arg(&self) -> bool {
        self.parser.is(&Token::Comma) || self.parser.token().is_separator()
    }

    /// `10 PRINT` and `top:` both label the next statement.
    fn label(&mut self) -> Result<bool> {
        let name = match self.parser.token().clone() {
            Token::Literal(Literal::Number(n)) => n,
            Token::Ident(s) if self.parser.peek() == &Token::Colon => {
                self.parser.next();
                s
            }
            _ => return Ok(false),
        };
        self.parser.next();
        self.program.define_label(&name)?;
        Ok(true)
    }

    fn statement(&mut self) -> Result<()> {
        let word = match self.parser.token() {
            Token::Word(word) => *word,
            Token::Ident(_) => return self.r#let(),
            _ => return Err(self.parser.unexpected()),
        };
        if matches!(
            word,
            Word::As
                | Word::Shared
                | Word::Step
                | Word::Then
                | Word::To
                | Word::Until
                | Word::Using
        ) {
            return Err(self.parser.unexpected());
        }
        self.parser.next();
        match word {
            Word::Case => self.r#case(),
            Word::Circle => self.r#circle(),
            Word::Color => self.r#color(),
            Word::Const => self.r#const(),
            Word::Defdbl => self.deftype(StorageClass::Double),
            Word::Defint => self.deftype(StorageClass::Int16),
            Word::Deflng => self.deftype(StorageClass::Int32),
            Word::Defsng => self.deftype(StorageClass::Single),
            Word::Defstr => self.deftype(StorageClass::String),
            Word::Dim => self.r#dim(),
            Word::Do => self.r#do(),
            Word::Else => self.r#else(),
            Word::Elseif => self.r#elseif(),
            Word::End => self.r#end(),
            Word::For => self.r#for(),
            Word::Getmouse => self.r#getmouse(),
            Word::Gosub => {
                let id = self.label_target()?;
                self.emit(Opcode::Gosub(id));
                Ok(())
            }
            Word::Goto => {
                let id = self.label_target()?;
                self.emit(Opcode::Goto(id));
                Ok(())
            }
            Word::If => self.r#if(),
            Word::Let => self.r#let(),
            Word::Line => self.r#line(),
            Word::Locate => self.r#locate(),
            Word::Loop => self.r#loop(),
            Word::Next => self.r#next(),
            Word::Option => self.r#option(),
            Word::Print => self.r#print(),
            Word::Pset => self.r#pset(),
            Word::Rem => Ok(()),
            Word::Return => {
                self.emit(Opcode::Return);
                Ok(())
            }
            Word::Screen => self.r#screen(),
            Word::Select => self.r#select(),
            Word::Sleep => self.r#sleep(),
            Word::Swap => self.r#swap(),
            Word::Wend => self.r#wend(),
            Word::While => self.r#while(),
            Word::As
            | Word::Shared
            | Word::Step
            | Word::Then
            | Word::To
            | Word::Until
            | Word::Using => Err(error!(InternalError; "STATEMENT DISPATCH")),
        }
    }

    fn label_target(&mut self) -> Result<LabelId> {
        let name = match self.parser.token() {
            Token::Ident(s) => s.clone(),
            Token::Literal(Literal::Number(n)) => n.clone(),
            _ => return Err(self.parser.expected("LABEL")),
        };
        self.parser.next();
        Ok(self.program.label_ref(&name, self.parser.line()))
    }

    fn r#if(&mut self) -> Result<()> {
        let cond = self.expr()?;
        self.parser.skip_word(Word::Then)?;
        self.emit_code(cond);
        let cond_site = self.emit(Opcode::IfNot(0));
        self.open(Frame::If {
            cond_site: Some(cond_site),
            exits: vec![],
        });
        if self.parser.token().is_separator() {
            return Ok(());
        }
        let depth = self.flow.len();
        self.single_line_branch(depth)?;
        if self.parser.accept_word(Word::Else) {
            self.else_branch()?;
            self.single_line_branch(depth)?;
        }
        self.end_if()
    }

    /// Statements up to the end of the line or a matching `ELSE`.
    /// A bare line number is a `GOTO`.
    fn single_line_branch(&mut self, depth: usize) -> Result<()> {
        if let Token::Literal(Literal::Number(_)) = self.parser.token() {
            let id = self.label_target()?;
            self.emit(Opcode::Goto(id));
            return Ok(());
        }
        loop {
            match self.parser.token() {
                Token::Eol | Token::Eof | Token::Word(Word::Else) => return Ok(()),
                Token::Colon => {
                    self.parser.next();
                    continue;
                }
                _ => {}
            }
            self.statement()?;
            if self.flow.len() != depth {
                return Err(error!(BlockInSingleLineIf));
            }
            if !self.parser.token().is_separator() && !self.parser.is_word(Word::Else) {
                return Err(self.parser.expected("END OF STATEMENT"));
            }
        }
    }

    fn r#else(&mut self) -> Result<()> {
        self.else_branch()?;
        if self.parser.token().is_separator() {
            Ok(())
        } else {
            self.statement()
        }
    }

    fn else_branch(&mut self) -> Result<()> {
        match self.flow.pop() {
            Some((line, Frame::If { cond_site, exits })) => {
                let site = match cond_site {
                    Some(site) => site,
                    None => return Err(error!(SyntaxError; "ELSE AFTER ELSE")),
                };
                let mut exits = exits;
                exits.push(self.emit(Opcode::Jump(0)));
                self.patch_here(site)?;
                self.flow.push((
                    line,
                    Frame::If {
                        cond_site: None,
                        exits,
                    },
                ));
                Ok(())
            }
            other => Err(mismatch(ErrorCode::ElseWithoutIf, other)),
        }
    }

    fn r#elseif(&mut self) -> Result<()> {
        match self.flow.pop() {
            Some((line, Frame::If { cond_site, exits })) => {
                let site = match cond_site {
                    Some(site) => site,
                    None => return Err(error!(SyntaxError; "ELSEIF AFTER ELSE")),
                };
                let mut exits = exits;
                exits.push(self.emit(Opcode::Jump(0)));
                self.patch_here(site)?;
                let cond = self.expr()?;
                self.parser.skip_word(Word::Then)?;
                self.emit_code(cond);
                let site = self.emit(Opcode::IfNot(0));
                self.flow.push((
                    line,
                    Frame::If {
                        cond_site: Some(site),
                        exits,
                    },
                ));
                Ok(())
            }
            other => Err(mismatch(ErrorCode::ElseWithoutIf, other)),
        }
    }

    fn end_if(&mut self) -> Result<()> {
        match self.flow.pop() {
            Some((_, Frame::If { cond_site, exits })) => {
                if let Some(site) = cond_site {
                    self.patch_here(site)?;
                }
                for site in exits {
                    self.patch_here(site)?;
                }
                Ok(())
            }
            other => Err(mismatch(ErrorCode::EndIfWithoutIf, other)),
        }
    }

    fn r#end(&mut self) -> Result<()> {
        if self.parser.accept_word(Word::If) {
            return self.end_if();
        }
        if self.parser.accept_word(Word::Select) {
            return self.end_select();
        }
        self.emit(Opcode::End);
        Ok(())
    }

    fn r#do(&mut self) -> Result<()> {
        let start = self.here();
        let cond_site = if self.parser.accept_word(Word::While) {
            let cond = self.expr()?;
            self.emit_code(cond);
            Some(self.emit(Opcode::IfNot(0)))
        } else if self.parser.accept_word(Word::Until) {
            let cond = self.expr()?;
            self.emit_code(cond);
            Some(self.emit(Opcode::If(0)))
        } else {
            None
        };
        self.open(Frame::Do { start, cond_site });
        Ok(())
    }

    fn r#loop(&mut self) -> Result<()> {
        let (start, cond_site) = match self.flow.pop() {
            Some((_, Frame::Do { start, cond_site })) => (start, cond_site),
            other => return Err(mismatch(ErrorCode::LoopWithoutDo, other)),
        };
        if self.parser.accept_word(Word::While) {
            let cond = self.expr()?;
            self.emit_code(cond);
            self.emit(Opcode::If(start));
        } else if self.parser.accept_word(Word::Until) {
            let cond = self.expr()?;
            self.emit_code(cond);
            self.emit(Opcode::IfNot(start));
        } else {
            self.emit(Opcode::Jump(start));
        }
        if let Some(site) = cond_site {
            self.patch_here(site)?;
        }
        Ok(())
    }

    fn r#while(&mut self) -> Result<()> {
        let start = self.here();
        let cond = self.expr()?;
        self.emit_code(cond);
        let cond_site = self.emit(Opcode::IfNot(0));
        self.open(Frame::While { start, cond_site });
        Ok(())
    }

    fn r#wend(&mut self) -> Result<()> {
        match self.flow.pop() {
            Some((_, Frame::While { start, cond_site })) => {
                self.emit(Opcode::Jump(start));
                self.patch_here(cond_site)
            }
            other => Err(mismatch(ErrorCode::WendWithoutWhile, other)),
        }
    }

    /// The limit and step are evaluated once, into two temporaries.
    fn r#for(&mut self) -> Result<()> {
        let name = self.parser.ident()?;
        let var = self.scalar(&name, true)?;
        self.parser.skip_operator(Operator::Equal)?;
        let start = self.expr()?;
        self.parser.skip_word(Word::To)?;
        let end = self.expr()?;
        let step = if self.parser.accept_word(Word::Step) {
            self.expr()?
        } else {
            vec![Opcode::Literal(Val::Integer(1))]
        };
        let temp = self.vars.temps(2);
        self.emit_code(start);
        self.emit(Opcode::Pop(var));
        self.emit_code(end);
        self.emit(Opcode::PopTemp(temp));
        self.emit_code(step);
        self.emit(Opcode::PopTemp(temp + 1));
        let test_site = self.emit(Opcode::For(var, temp, 0));
        self.open(Frame::For {
            name,
            var,
            temp,
            test_site,
        });
        Ok(())
    }

    fn r#next(&mut self) -> Result<()> {
        loop {
            let (var, temp, test_site) = match self.flow.pop() {
                Some((_, Frame::For {
                    name,
                    var,
                    temp,
                    test_site,
                })) => {
                    if let Token::Ident(next_name) = self.parser.token() {
                        if *next_name != name {
                            return Err(error!(NextWithoutFor;
                                format!("NEXT {} INSIDE FOR {}", next_name, name)));
                        }
                        self.parser.next();
                    }
                    (var, temp, test_site)
                }
                other => return Err(mismatch(ErrorCode::NextWithoutFor, other)),
            };
            self.emit(Opcode::Next(var, temp));
            self.emit(Opcode::Jump(test_site));
            self.patch_here(test_site)?;
            if !self.parser.accept(&Token::Comma) {
                return Ok(());
            }
        }
    }

    fn r#select(&mut self) -> Result<()> {
        self.parser.skip_word(Word::Case)?;
        if self.parser.accept_word(Word::As) {
            self.parser.skip_word(Word::Const)?;
        }
        let selector = self.expr()?;
        let temp = self.vars.temps(1);
        self.emit_code(selector);
        self.emit(Opcode::PopTemp(temp));
        let dispatch_site = self.emit(Opcode::Jump(0));
        self.open(Frame::Select(Select {
            temp,
            dispatch_site,
            cases: vec![],
            exits: vec![],
            default: None,
        }));
        Ok(())
    }

    /// Each case body starts by jumping out of the body above it.
    /// The comparisons themselves are emitted by `END SELECT`.
    fn r#case(&mut self) -> Result<()> {
        let (line, mut select) = match self.flow.pop() {
            Some((line, Frame::Select(select))) => (line, select),
            other => return Err(mismatch(ErrorCode::CaseWithoutSelect, other)),
        };
        select.exits.push(self.emit(Opcode::Jump(0)));
        if self.parser.accept_word(Word::Else) {
            select.default = Some(self.here());
        } else {
            let target = self.here();
            loop {
                let lo = self.expr()?;
                let hi = if self.parser.accept_word(Word::To) {
                    Some(self.expr()?)
                } else {
                    None
                };
                select.cases.push(CaseRange { lo, hi, target });
                if !self.parser.accept(&Token::Comma) {
                    break;
                }
            }
        }
        self.flow.push((line, Frame::Select(select)));
        Ok(())
    }

    fn end_select(&mut self) -> Result<()> {
        let select = match self.flow.pop() {
            Some((_, Frame::Select(select))) => select,
            other => return Err(mismatch(ErrorCode::EndSelectWithoutSelect, other)),
        };
        let temp = select.temp;
        let mut exits = select.exits;
        exits.push(self.emit(Opcode::Jump(0)));
        self.patch_here(select.dispatch_site)?;
        for case in select.cases {
            self.emit(Opcode::PushTemp(temp));
            self.emit_code(case.lo);
            match case.hi {
                None => {
                    self.emit(Opcode::Eq);
                }
                Some(hi) => {
                    self.emit(Opcode::GtEq);
                    self.emit(Opcode::PushTemp(temp));
                    self.emit_code(hi);
                    self.emit(Opcode::LtEq);
                    self.emit(Opcode::And);
                }
            }
            self.emit(Opcode::If(case.target));
        }
        match select.default {
            Some(target) => {
                self.emit(Opcode::Jump(target));
            }
            None => exits.push(self.emit(Opcode::Jump(0))),
        }
        for site in exits {
            self.patch_here(site)?;
        }
        Ok(())
    }

    fn r#let(&mut self) -> Result<()> {
        let target = self.lvalue()?;
        let op = match self.parser.token() {
            Token::Operator(op) if op.is_assignment() => *op,
            _ => return Err(self.parser.expected("=")),
        };
        self.parser.next();
        let value = self.expr()?;
        let code = match op {
            Operator::Equal => value,
            _ => {
                let mut code = target.load();
                code.extend(value);
                code.push(match op {
                    Operator::PlusEqual | Operator::AmpersandEqual => Opcode::Add,
                    Operator::MinusEqual => Opcode::Sub,
                    Operator::MultiplyEqual => Opcode::Mul,
                    Operator::DivideEqual => Opcode::Div,
                    Operator::DivideIntEqual => Opcode::DivInt,
                    Operator::CaretEqual => Opcode::Pow,
                    _ => return Err(self.parser.expected("=")),
                });
                code
            }
        };
        let code = target.store(code);
        self.emit_code(code);
        Ok(())
    }

    fn type_name(&mut self) -> Result<StorageClass> {
        let name = self.parser.ident()?;
        match StorageClass::from_type_name(&name) {
            Some(class) => Ok(class),
            None => Err(error!(UnknownType; name.to_ascii_uppercase())),
        }
    }

    fn r#dim(&mut self) -> Result<()> {
        self.parser.accept_word(Word::Shared);
        let class = if self.parser.accept_word(Word::As) {
            Some(self.type_name()?)
        } else {
            None
        };
        loop {
            self.dim_variable(class)?;
            if !self.parser.accept(&Token::Comma) {
                return Ok(());
            }
        }
    }

    fn dim_variable(&mut self, class: Option<StorageClass>) -> Result<()> {
        let name = self.parser.ident()?;
        let mut bounds = vec![];
        let mut dims = 0;
        if self.parser.accept(&Token::LParen) {
            loop {
                let first = self.expr()?;
                if self.parser.accept_word(Word::To) {
                    bounds.extend(first);
                    bounds.extend(self.expr()?);
                } else {
                    bounds.push(Opcode::Literal(Val::Integer(self.option_base)));
                    bounds.extend(first);
                }
                dims += 1;
                if !self.parser.accept(&Token::Comma) {
                    break;
                }
            }
            self.parser.skip(Token::RParen)?;
        }
        let mut inits = vec![];
        let mut init_count = 0;
        if self.parser.accept(&Token::Operator(Operator::Equal)) {
            if dims > 0 {
                self.parser.skip(Token::LBrace)?;
                loop {
                    inits.extend(self.expr()?);
                    init_count += 1;
                    if !self.parser.accept(&Token::Comma) {
                        break;
                    }
                }
                self.parser.skip(Token::RBrace)?;
            } else {
                inits = self.expr()?;
                init_count = 1;
            }
        }
        let class = if self.parser.accept_word(Word::As) {
            self.type_name()?
        } else {
            match class {
                Some(class) => class,
                None => self.vars.implicit_class(&name),
            }
        };
        if dims > 0 {
            let array = self.vars.declare_array(&name, class, dims, None)?;
            self.emit_code(bounds);
            self.emit_code(inits);
            self.emit(Opcode::DimArr(array, init_count));
        } else {
            let slot = self.vars.declare_scalar(&name, class)?;
            if init_count > 0 {
                self.emit_code(inits);
                self.emit(Opcode::Pop(slot));
            }
        }
        Ok(())
    }

    fn r#const(&mut self) -> Result<()> {
        loop {
            let name = self.parser.ident()?;
            self.parser.skip_operator(Operator::Equal)?;
            let mut code = vec![];
            let kind = self.expression(&mut code)?;
            let class = match StorageClass::from_suffix(&name) {
                Some(class) => class,
                None if kind == Kind::String => StorageClass::String,
                None => StorageClass::Double,
            };
            let slot = self.vars.declare_const(&name, class)?;
            self.emit_code(code);
            self.emit(Opcode::Pop(slot));
            if !self.parser.accept(&Token::Comma) {
                return Ok(());
            }
        }
    }

    fn r#option(&mut self) -> Result<()> {
        if self.parser.is_ident("explicit") {
            self.parser.next();
            self.option_explicit = true;
            return Ok(());
        }
        if !self.parser.is_ident("base") {
            return Err(self.parser.expected("EXPLICIT OR BASE"));
        }
        self.parser.next();
        let base = match self.parser.token() {
            Token::Literal(Literal::Number(n)) => match n.as_str() {
                "0" => 0,
                "1" => 1,
                _ => return Err(self.parser.expected("0 OR 1")),
            },
            _ => return Err(self.parser.expected("0 OR 1")),
        };
        self.parser.next();
        self.option_base = base;
        Ok(())
    }

    fn letter(&mut self) -> Result<u8> {
        let name = self.parser.ident()?;
        match name.as_bytes() {
            [b] if b.is_ascii_lowercase() => Ok(*b),
            _ => Err(error!(SyntaxError;
                format!("EXPECTED LETTER FOUND {}", name.to_ascii_uppercase()))),
        }
    }

    fn deftype(&mut self, class: StorageClass) -> Result<()> {
        loop {
            let from = self.letter()?;
            let to = if self.parser.accept(&Token::Operator(Operator::Minus)) {
                self.letter()?
            } else {
                from
            };
            self.vars.deftype(from, to, class);
            if !self.parser.accept(&Token::Comma) {
                return Ok(());
            }
        }
    }

    fn end_of_print(&self) -> bool {
        self.parser.token().is_separator() || self.parser.is_word(Word::Else)
    }

    /// A trailing `;` or `,` keeps the cursor on the line.
    fn r#print(&mut self) -> Result<()> {
        if self.parser.accept_word(Word::Using) {
            // The format string is checked and then ignored.
            self.expr()?;
            self.parser.skip(Token::Semicolon)?;
        }
        if self.end_of_print() {
            self.emit(Opcode::PrintNewline);
            return Ok(());
        }
        loop {
            let item = self.expr()?;
            self.emit_code(item);
            self.emit(Opcode::Print);
            if self.parser.accept(&Token::Comma) {
                self.emit(Opcode::PrintComma);
            } else if !self.parser.accept(&Token::Semicolon) {
                self.emit(Opcode::PrintNewline);
                return Ok(());
            }
            if self.end_of_print() {
                return Ok(());
            }
        }
    }

    fn r#sleep(&mut self) -> Result<()> {
        if self.parser.token().is_separator() {
            self.emit(Opcode::Literal(Val::Integer(0)));
        } else {
            let delay = self.expr()?;
            self.emit_code(delay);
        }
        self.emit(Opcode::Sleep);
        Ok(())
    }

    fn r#locate(&mut self) -> Result<()> {
        let row = self.expr()?;
        self.parser.skip(Token::Comma)?;
        let col = self.expr()?;
        self.emit_code(row);
        self.emit_code(col);
        self.emit(Opcode::Locate);
        Ok(())
    }

    fn r#color(&mut self) -> Result<()> {
        let color = self.expr()?;
        self.emit_code(color);
        self.emit(Opcode::Color);
        Ok(())
    }

    fn r#screen(&mut self) -> Result<()> {
        let mut present = vec![];
        loop {
            if self.is_blank_arg() {
                present.push(false);
            } else {
                let arg = self.expr()?;
                self.emit_code(arg);
                present.push(true);
            }
            if !self.parser.accept(&Token::Comma) {
                break;
            }
        }
        self.emit(Opcode::Screen(present));
        Ok(())
    }

    /// `(x, y)`
    fn point(&mut self) -> Result<()> {
        self.parser.skip(Token::LParen)?;
        let x = self.expr()?;
        self.parser.skip(Token::Comma)?;
        let y = self.expr()?;
        self.parser.skip(Token::RParen)?;
        self.emit_code(x);
        self.emit_code(y);
        Ok(())
    }

    /// Compiles an optional argument, returning whether one was given.
    fn optional_arg(&mut self) -> Result<bool> {
        if self.is_blank_arg() {
            return Ok(false);
        }
        let arg = self.expr()?;
        self.emit_code(arg);
        Ok(true)
    }

    fn r#pset(&mut self) -> Result<()> {
        self.point()?;
        let color = self.parser.accept(&Token::Comma) && self.optional_arg()?;
        self.emit(Opcode::Pset(color));
        Ok(())
    }

    fn r#line(&mut self) -> Result<()> {
        self.point()?;
        self.parser.skip_operator(Operator::Minus)?;
        self.point()?;
        let mut color = false;
        let mut shape = Shape::Line;
        if self.parser.accept(&Token::Comma) {
            color = self.optional_arg()?;
            if self.parser.accept(&Token::Comma) {
                shape = if self.parser.is_ident("b") {
                    Shape::Box
                } else if self.parser.is_ident("bf") {
                    Shape::Fill
                } else {
                    return Err(self.parser.expected("B OR BF"));
                };
                self.parser.next();
            }
        }
        self.emit(Opcode::Line(color, shape));
        Ok(())
    }

    /// `(x, y), r [, color [, start [, end [, aspect [, F]]]]]`
    fn r#circle(&mut self) -> Result<()> {
        self.point()?;
        self.parser.skip(Token::Comma)?;
        let radius = self.expr()?;
        self.emit_code(radius);
        let mut present = [false; 4];
        let mut more = true;
        for arg in present.iter_mut() {
            more = self.parser.accept(&Token::Comma);
            if !more {
                break;
            }
            *arg = self.optional_arg()?;
        }
        let mut filled = false;
        if more && self.parser.accept(&Token::Comma) {
            if !self.parser.is_ident("f") {
                return Err(self.parser.expected("F"));
            }
            self.parser.next();
            filled = true;
        }
        self.emit(Opcode::Circle(present, filled));
        Ok(())
    }

    /// Both values are copied out before either is stored.
    fn r#swap(&mut self) -> Result<()> {
        let a = self.lvalue()?;
        self.parser.skip(Token::Comma)?;
        let b = self.lvalue()?;
        if a.kind() != b.kind() {
            return Err(error!(TypeMismatch));
        }
        let temp = self.vars.temps(2);
        self.emit_code(a.load());
        self.emit(Opcode::PopTemp(temp));
        self.emit_code(b.load());
        self.emit(Opcode::PopTemp(temp + 1));
        self.emit_code(a.store(vec![Opcode::PushTemp(temp + 1)]));
        self.emit_code(b.store(vec![Opcode::PushTemp(temp)]));
        Ok(())
    }

    /// `GETMOUSE x, y [, wheel [, buttons [, clip]]]` after a yield
    /// lets the host deliver fresh mouse state.
    fn r#getmouse(&mut self) -> Result<()> {
        self.emit(Opcode::Yield);
        let fields = [
            MouseField::X,
            MouseField::Y,
            MouseField::Wheel,
            MouseField::Buttons,
            MouseField::Clip,
        ];
        for (i, field) in fields.iter().enumerate() {
            if i > 0 && !self.parser.accept(&Token::Comma) {
                if i < 2 {
                    return Err(self.parser.expected(","));
                }
                break;
            }
            if i >= 2 && self.is_blank_arg() {
                continue;
            }
            let target = self.lvalue()?;
            let code = target.store(vec![Opcode::Mouse(*field)]);
            self.emit_code(code);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(source: &str) -> Vec<String> {
        compile(source)
            .unwrap()
            .ops()
            .iter()
            .map(|op| op.to_string())
            .collect()
    }

    fn error(source: &str) -> String {
        compile(source).unwrap_err().to_string()
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            listing("a = 3 * b"),
            ["INTEGER(3)", "PUSH(s[1])", "MUL", "POP(s[0])", "END"]
        );
        assert_eq!(
            listing("n% += 1"),
            ["PUSH(i16[0])", "INTEGER(1)", "ADD", "POP(i16[0])", "END"]
        );
    }

    #[test]
    fn test_while_loop_is_patched() {
        assert_eq!(
            listing("while a\nwend"),
            ["PUSH(s[0])", "IFNOT(3)", "JUMP(0)", "END"]
        );
    }

    #[test]
    fn test_for_loop_is_patched() {
        assert_eq!(
            listing("for i = 1 to 3\nnext"),
            [
                "INTEGER(1)",
                "POP(s[0])",
                "INTEGER(3)",
                "POPTEMP(0)",
                "INTEGER(1)",
                "POPTEMP(1)",
                "FOR(s[0],0,9)",
                "NEXT(s[0],0)",
                "JUMP(6)",
                "END"
            ]
        );
    }

    #[test]
    fn test_single_line_if_else() {
        assert_eq!(
            listing("if a then b = 1 else b = 2"),
            [
                "PUSH(s[0])",
                "IFNOT(5)",
                "INTEGER(1)",
                "POP(s[1])",
                "JUMP(7)",
                "INTEGER(2)",
                "POP(s[1])",
                "END"
            ]
        );
    }

    #[test]
    fn test_block_mismatches() {
        assert_eq!(error("wend"), "WEND WITHOUT WHILE at line 1");
        assert_eq!(
            error("for i = 1 to 2\nloop"),
            "LOOP WITHOUT DO; FOR FROM LINE 1 IS STILL OPEN at line 2"
        );
        assert_eq!(error("\nif a then\nprint"), "IF WITHOUT END IF at line 2");
        assert_eq!(error("if a then do"), "BLOCK STATEMENT IN SINGLE-LINE IF at line 1");
        assert_eq!(
            error("for i = 1 to 2\nfor j = 1 to 2\nnext i"),
            "NEXT WITHOUT FOR; NEXT i INSIDE FOR j at line 3"
        );
    }

    #[test]
    fn test_labels() {
        let program = compile("10 goto 10\ntop: gosub top").unwrap();
        assert_eq!(program.label_addr(0), Some(0));
        assert_eq!(program.label_addr(1), Some(1));
        assert_eq!(error("goto nowhere"), "LABEL NOT DEFINED; nowhere at line 1");
        assert_eq!(error("a:\na:"), "DUPLICATE LABEL; a at line 2");
    }

    #[test]
    fn test_declarations() {
        assert_eq!(
            error("option explicit\nx = 1"),
            "VARIABLE NOT DEFINED; x at line 2"
        );
        assert_eq!(error("dim a as widget"), "UNKNOWN TYPE; WIDGET at line 1");
        assert_eq!(error("dim a\ndim a"), "DUPLICATE DEFINITION; a at line 2");
        assert_eq!(
            error("const k = 1\nk = 2"),
            "DUPLICATE DEFINITION; k IS CONSTANT at line 2"
        );
        assert_eq!(
            error("dim a(3)\nb = a"),
            "WRONG NUMBER OF SUBSCRIPTS; a at line 2"
        );
    }
}
