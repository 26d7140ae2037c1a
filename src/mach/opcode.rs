use super::{Address, ArrayRef, Slot, Val};

/// Index into the label table.
pub type LabelId = usize;
/// Index of a hidden temporary.
pub type Temp = usize;

/// ## Virtual machine instruction set
///
/// The BASIC virtual machine has no registers.
/// Every operation is performed on the stack.
///
/// For example: `LET A=3*B` compiles to `[Literal(3), Push(s[1]), Mul, Pop(s[0])]`
///
/// See <https://en.wikipedia.org/wiki/Reverse_Polish_notation>

#[derive(Clone, PartialEq)]
pub enum Opcode {
    // *** Stack manipulation
    /// Push literal value on to the stack.
    Literal(Val),
    /// Push the value of a scalar.
    Push(Slot),
    /// Pop stack value into a scalar, converting to its storage class.
    Pop(Slot),
    /// Pop subscripts and push the element.
    PushArr(ArrayRef),
    /// Pop a value then its subscripts and store the element.
    PopArr(ArrayRef),
    /// Pop initializers then lower/upper bound pairs. Allocates the
    /// array the first time it runs.
    DimArr(ArrayRef, usize),
    PushTemp(Temp),
    PopTemp(Temp),

    // *** Branch control
    /// Pop stack and branch to Address if true.
    If(Address),
    /// Pop stack and branch to Address if false.
    IfNot(Address),
    /// Unconditional branch to Address.
    Jump(Address),
    /// Branch to Address once the loop variable has passed the end
    /// held in the first temporary. The second holds the step.
    For(Slot, Temp, Address),
    /// Add the step to the loop variable.
    Next(Slot, Temp),
    /// Branch through the label table.
    Goto(LabelId),
    Gosub(LabelId),
    /// Expect a return address or else error: RETURN WITHOUT GOSUB.
    Return,

    // *** Statements
    End,
    /// Pop and print one item.
    Print,
    PrintComma,
    PrintNewline,
    /// Pop a delay in milliseconds and yield.
    Sleep,
    Yield,
    Mouse(MouseField),
    Locate,
    Color,
    /// Pops the arguments that were present.
    Screen(Vec<bool>),
    Pset(bool),
    Line(bool, Shape),
    /// Color, start, end and aspect presence, then fill.
    Circle([bool; 4], bool),

    // *** Expression operations
    Neg,
    Pow,
    Mul,
    Div,
    DivInt,
    Mod,
    Add,
    Sub,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Not,
    And,
    Or,

    // *** Built-in functions
    Abs,
    Asc,
    Atan2,
    Chr,
    Cos,
    Exp,
    Inkey,
    Int,
    Lcase,
    Log,
    Rnd,
    Sin,
    Sqr,
    Str,
    Tan,
    Timer,
    Ucase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseField {
    X,
    Y,
    Wheel,
    Buttons,
    Clip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line,
    Box,
    Fill,
}

impl Opcode {
    /// Replaces the branch target. Used when backpatching.
    pub fn set_target(&mut self, target: Address) -> bool {
        match self {
            Opcode::If(addr) | Opcode::IfNot(addr) | Opcode::Jump(addr) => *addr = target,
            Opcode::For(_, _, addr) => *addr = target,
            _ => return false,
        }
        true
    }
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

fn flags(v: &[bool]) -> String {
    v.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Opcode::*;
        match self {
            Literal(Val::String(s)) => write!(f, "STRING({:?})", s),
            Literal(v) => write!(f, "{}", format!("{:?}", v).to_ascii_uppercase()),
            Push(s) => write!(f, "PUSH({})", s),
            Pop(s) => write!(f, "POP({})", s),
            PushArr(a) => write!(f, "PUSHARR({})", a),
            PopArr(a) => write!(f, "POPARR({})", a),
            DimArr(a, n) => write!(f, "DIMARR({},{})", a, n),
            PushTemp(t) => write!(f, "PUSHTEMP({})", t),
            PopTemp(t) => write!(f, "POPTEMP({})", t),

            If(a) => write!(f, "IF({})", a),
            IfNot(a) => write!(f, "IFNOT({})", a),
            Jump(a) => write!(f, "JUMP({})", a),
            For(s, t, a) => write!(f, "FOR({},{},{})", s, t, a),
            Next(s, t) => write!(f, "NEXT({},{})", s, t),
            Goto(l) => write!(f, "GOTO({})", l),
            Gosub(l) => write!(f, "GOSUB({})", l),
            Return => write!(f, "RETURN"),

            End => write!(f, "END"),
            Print => write!(f, "PRINT"),
            PrintComma => write!(f, "PRINTCOMMA"),
            PrintNewline => write!(f, "PRINTNEWLINE"),
            Sleep => write!(f, "SLEEP"),
            Yield => write!(f, "YIELD"),
            Mouse(m) => write!(f, "MOUSE({:?})", m),
            Locate => write!(f, "LOCATE"),
            Color => write!(f, "COLOR"),
            Screen(v) => write!(f, "SCREEN({})", flags(v)),
            Pset(c) => write!(f, "PSET({})", flags(&[*c])),
            Line(c, s) => write!(f, "LINE({},{:?})", flags(&[*c]), s),
            Circle(v, fill) => write!(f, "CIRCLE({},{})", flags(v), flags(&[*fill])),

            Neg => write!(f, "NEG"),
            Pow => write!(f, "POW"),
            Mul => write!(f, "MUL"),
            Div => write!(f, "DIV"),
            DivInt => write!(f, "DIVINT"),
            Mod => write!(f, "MOD"),
            Add => write!(f, "ADD"),
            Sub => write!(f, "SUB"),
            Eq => write!(f, "EQ"),
            NotEq => write!(f, "NOTEQ"),
            Lt => write!(f, "LT"),
            LtEq => write!(f, "LTEQ"),
            Gt => write!(f, "GT"),
            GtEq => write!(f, "GTEQ"),
            Not => write!(f, "NOT"),
            And => write!(f, "AND"),
            Or => write!(f, "OR"),

            Abs => write!(f, "ABS"),
            Asc => write!(f, "ASC"),
            Atan2 => write!(f, "ATAN2"),
            Chr => write!(f, "CHR$"),
            Cos => write!(f, "COS"),
            Exp => write!(f, "EXP"),
            Inkey => write!(f, "INKEY$"),
            Int => write!(f, "INT"),
            Lcase => write!(f, "LCASE$"),
            Log => write!(f, "LOG"),
            Rnd => write!(f, "RND"),
            Sin => write!(f, "SIN"),
            Sqr => write!(f, "SQR"),
            Str => write!(f, "STR$"),
            Tan => write!(f, "TAN"),
            Timer => write!(f, "TIMER"),
            Ucase => write!(f, "UCASE$"),
        }
    }
}
