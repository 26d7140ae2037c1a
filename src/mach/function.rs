use super::{Opcode, Val};
use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::ops::RangeInclusive;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Built-in functions
///
/// Names are reserved: they are recognized before any variable lookup.

pub struct Function {}

impl Function {
    pub fn opcode_and_arity(func_name: &str) -> Option<(Opcode, RangeInclusive<usize>)> {
        match func_name {
            "abs" => Some((Opcode::Abs, 1..=1)),
            "asc" => Some((Opcode::Asc, 1..=1)),
            "atan2" => Some((Opcode::Atan2, 2..=2)),
            "chr$" => Some((Opcode::Chr, 1..=1)),
            "cos" => Some((Opcode::Cos, 1..=1)),
            "exp" => Some((Opcode::Exp, 1..=1)),
            "inkey$" => Some((Opcode::Inkey, 0..=1)),
            "int" => Some((Opcode::Int, 1..=1)),
            "lcase$" => Some((Opcode::Lcase, 1..=1)),
            "log" => Some((Opcode::Log, 1..=1)),
            "rnd" => Some((Opcode::Rnd, 0..=1)),
            "sin" => Some((Opcode::Sin, 1..=1)),
            "sqr" => Some((Opcode::Sqr, 1..=1)),
            "str$" => Some((Opcode::Str, 1..=1)),
            "tan" => Some((Opcode::Tan, 1..=1)),
            "timer" => Some((Opcode::Timer, 0..=1)),
            "ucase$" => Some((Opcode::Ucase, 1..=1)),
            _ => None,
        }
    }

    /// These read machine state instead of their argument. An argument
    /// is still accepted and compiled, then dropped.
    pub fn ignores_arguments(opcode: &Opcode) -> bool {
        matches!(opcode, Opcode::Rnd | Opcode::Inkey | Opcode::Timer)
    }

    /// Applies a pure function to the arguments on top of the stack.
    pub fn call(opcode: &Opcode, mut args: Vec<Val>) -> Result<Val> {
        let val = match args.pop() {
            Some(val) => val,
            None => return Err(error!(InternalError; "NO ARGUMENT")),
        };
        match opcode {
            Opcode::Abs => Function::abs(val),
            Opcode::Asc => Function::asc(val),
            Opcode::Atan2 => match args.pop() {
                Some(y) => Function::atan2(y, val),
                None => Err(error!(InternalError; "NO ARGUMENT")),
            },
            Opcode::Chr => Function::chr(val),
            Opcode::Cos => float(val, f32::cos, f64::cos),
            Opcode::Exp => float(val, f32::exp, f64::exp),
            Opcode::Int => Function::int(val),
            Opcode::Lcase => Ok(Val::String(Rc::<str>::try_from(val)?.to_lowercase().into())),
            Opcode::Log => float(val, f32::ln, f64::ln),
            Opcode::Sin => float(val, f32::sin, f64::sin),
            Opcode::Sqr => float(val, f32::sqrt, f64::sqrt),
            Opcode::Str => Ok(Val::String(val.to_string().into())),
            Opcode::Tan => float(val, f32::tan, f64::tan),
            Opcode::Ucase => Ok(Val::String(Rc::<str>::try_from(val)?.to_uppercase().into())),
            _ => Err(error!(InternalError; "NOT A FUNCTION")),
        }
    }

    pub fn abs(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Integer(n) => Ok(match n.checked_abs() {
                Some(n) => Integer(n),
                None => Double((n as f64).abs()),
            }),
            Single(n) => Ok(Single(n.abs())),
            Double(n) => Ok(Double(n.abs())),
            String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn asc(val: Val) -> Result<Val> {
        match Rc::<str>::try_from(val)?.chars().next() {
            Some(ch) => Ok(Val::Integer(ch as i32)),
            None => Err(error!(IllegalFunctionCall; "EMPTY STRING")),
        }
    }

    pub fn atan2(y: Val, x: Val) -> Result<Val> {
        let double = matches!(y, Val::Double(_)) || matches!(x, Val::Double(_));
        let n = f64::try_from(y)?.atan2(f64::try_from(x)?);
        if double {
            Ok(Val::Double(n))
        } else {
            Ok(Val::Single(n as f32))
        }
    }

    pub fn chr(val: Val) -> Result<Val> {
        let code = val.to_int32()? as u32 & 0xFFFF;
        match std::char::from_u32(code) {
            Some(ch) => Ok(Val::String(ch.to_string().into())),
            None => Err(error!(IllegalFunctionCall; "INVALID CHARACTER CODE")),
        }
    }

    /// Rounds toward negative infinity.
    pub fn int(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Integer(_) => Ok(val),
            Single(n) => Ok(Single(n.floor())),
            Double(n) => Ok(Double(n.floor())),
            String(_) => Err(error!(TypeMismatch)),
        }
    }
}

fn float(val: Val, single: fn(f32) -> f32, double: fn(f64) -> f64) -> Result<Val> {
    use Val::*;
    match val {
        Integer(n) => Ok(Single(single(n as f32))),
        Single(n) => Ok(Single(single(n))),
        Double(n) => Ok(Double(double(n))),
        String(_) => Err(error!(TypeMismatch)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Function::opcode_and_arity("atan2"), Some((Opcode::Atan2, 2..=2)));
        assert!(Function::opcode_and_arity("foo").is_none());
        assert!(Function::ignores_arguments(&Opcode::Rnd));
    }

    #[test]
    fn test_string_functions() {
        let s = |s: &str| Val::String(s.into());
        assert_eq!(Function::call(&Opcode::Ucase, vec![s("aBc")]).unwrap(), s("ABC"));
        assert_eq!(Function::call(&Opcode::Chr, vec![Val::Integer(65)]).unwrap(), s("A"));
        assert_eq!(Function::call(&Opcode::Asc, vec![s("a")]).unwrap(), Val::Integer(97));
        assert_eq!(Function::call(&Opcode::Str, vec![Val::Double(2.5)]).unwrap(), s("2.5"));
    }

    #[test]
    fn test_numeric_functions() {
        assert_eq!(Function::int(Val::Double(-2.5)).unwrap(), Val::Double(-3.0));
        assert_eq!(Function::abs(Val::Integer(-4)).unwrap(), Val::Integer(4));
        assert_eq!(
            Function::call(&Opcode::Atan2, vec![Val::Double(0.0), Val::Double(1.0)]).unwrap(),
            Val::Double(0.0)
        );
        assert!(Function::call(&Opcode::Sqr, vec![Val::String("x".into())]).is_err());
    }
}
