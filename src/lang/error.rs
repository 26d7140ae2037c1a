use super::LineNumber;

pub struct Error {
    code: u16,
    line_number: Option<LineNumber>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            message: String::new(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line_number(&self) -> Option<LineNumber> {
        self.line_number
    }

    /// Attach a line number unless one is already known.
    /// Errors raised deep inside expression evaluation learn their
    /// line only when they bubble up to the op that failed.
    pub fn in_line_number(mut self, line: LineNumber) -> Error {
        if self.line_number.is_none() {
            self.line_number = Some(line);
        }
        self
    }

    pub fn message<S: AsRef<str>>(mut self, message: S) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        self.message = message.as_ref().to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorCode {
    NextWithoutFor = 1,
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    IllegalFunctionCall = 5,
    Overflow = 6,
    OutOfMemory = 7,
    LabelNotDefined = 8,
    SubscriptOutOfRange = 9,
    DuplicateDefinition = 10,
    DivisionByZero = 11,
    TypeMismatch = 13,
    ForWithoutNext = 26,
    WhileWithoutWend = 29,
    WendWithoutWhile = 30,
    DuplicateLabel = 33,
    InternalError = 51,
    VariableNotDefined = 71,
    UnknownType = 72,
    WrongNumberOfSubscripts = 73,
    DoWithoutLoop = 74,
    LoopWithoutDo = 75,
    IfWithoutEndIf = 76,
    ElseWithoutIf = 77,
    EndIfWithoutIf = 78,
    SelectWithoutEndSelect = 79,
    CaseWithoutSelect = 80,
    EndSelectWithoutSelect = 81,
    BlockInSingleLineIf = 82,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "NEXT WITHOUT FOR",
            2 => "SYNTAX ERROR",
            3 => "RETURN WITHOUT GOSUB",
            5 => "ILLEGAL FUNCTION CALL",
            6 => "OVERFLOW",
            7 => "OUT OF MEMORY",
            8 => "LABEL NOT DEFINED",
            9 => "SUBSCRIPT OUT OF RANGE",
            10 => "DUPLICATE DEFINITION",
            11 => "DIVISION BY ZERO",
            13 => "TYPE MISMATCH",
            26 => "FOR WITHOUT NEXT",
            29 => "WHILE WITHOUT WEND",
            30 => "WEND WITHOUT WHILE",
            33 => "DUPLICATE LABEL",
            51 => "INTERNAL ERROR",
            71 => "VARIABLE NOT DEFINED",
            72 => "UNKNOWN TYPE",
            73 => "WRONG NUMBER OF SUBSCRIPTS",
            74 => "DO WITHOUT LOOP",
            75 => "LOOP WITHOUT DO",
            76 => "IF WITHOUT END IF",
            77 => "ELSE WITHOUT IF",
            78 => "END IF WITHOUT IF",
            79 => "SELECT WITHOUT END SELECT",
            80 => "CASE WITHOUT SELECT",
            81 => "END SELECT WITHOUT SELECT",
            82 => "BLOCK STATEMENT IN SINGLE-LINE IF",
            _ => "",
        };
        if code_str.is_empty() {
            write!(f, "PROGRAM ERROR {}", self.code)?;
        } else {
            write!(f, "{}", code_str)?;
        }
        if !self.message.is_empty() {
            write!(f, "; {}", self.message)?;
        }
        if let Some(line_number) = self.line_number {
            write!(f, " at line {}", line_number)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_line_and_message() {
        let e = error!(VariableNotDefined, 7; "foo");
        assert_eq!(e.to_string(), "VARIABLE NOT DEFINED; foo at line 7");
    }

    #[test]
    fn test_first_line_number_wins() {
        let e = error!(DivisionByZero).in_line_number(3).in_line_number(9);
        assert_eq!(e.line_number(), Some(3));
        assert_eq!(e.to_string(), "DIVISION BY ZERO at line 3");
    }
}
