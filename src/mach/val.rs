use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Runtime values
///
/// Byte, 16-bit and 32-bit storage all read back as `Integer`.

#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    String(Rc<str>),
    Integer(i32),
    Single(f32),
    Double(f64),
}

/// BASIC truth values.
pub const TRUE: i32 = -1;
pub const FALSE: i32 = 0;

impl Val {
    pub fn truth(b: bool) -> Val {
        Val::Integer(if b { TRUE } else { FALSE })
    }

    /// Whole numbers that fit stay integers.
    pub fn from_f64(n: f64) -> Val {
        if n.fract() == 0.0 && n >= i32::MIN as f64 && n <= i32::MAX as f64 {
            Val::Integer(n as i32)
        } else {
            Val::Double(n)
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Val::String(_))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Val::String(s) => !s.is_empty(),
            Val::Integer(n) => *n != 0,
            Val::Single(n) => *n != 0.0,
            Val::Double(n) => *n != 0.0,
        }
    }

    /// Wraps like a 32-bit register; fractions truncate toward zero.
    pub fn to_int32(&self) -> Result<i32> {
        Ok(wrap_i32(f64::try_from(self.clone())?))
    }
}

pub fn wrap_i32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u64 as u32 as i32
}

impl TryFrom<Val> for f64 {
    type Error = Error;
    fn try_from(val: Val) -> Result<f64> {
        match val {
            Val::Integer(n) => Ok(n as f64),
            Val::Single(n) => Ok(n as f64),
            Val::Double(n) => Ok(n),
            Val::String(_) => Err(error!(TypeMismatch)),
        }
    }
}

impl TryFrom<Val> for f32 {
    type Error = Error;
    fn try_from(val: Val) -> Result<f32> {
        Ok(f64::try_from(val)? as f32)
    }
}

impl TryFrom<Val> for i32 {
    type Error = Error;
    fn try_from(val: Val) -> Result<i32> {
        val.to_int32()
    }
}

impl TryFrom<Val> for i16 {
    type Error = Error;
    fn try_from(val: Val) -> Result<i16> {
        Ok(val.to_int32()? as i16)
    }
}

impl TryFrom<Val> for u8 {
    type Error = Error;
    fn try_from(val: Val) -> Result<u8> {
        Ok(val.to_int32()? as u8)
    }
}

impl TryFrom<Val> for Rc<str> {
    type Error = Error;
    fn try_from(val: Val) -> Result<Rc<str>> {
        match val {
            Val::String(s) => Ok(s),
            _ => Err(error!(TypeMismatch)),
        }
    }
}

fn fmt_float<T>(f: &mut std::fmt::Formatter, n: T) -> std::fmt::Result
where
    T: std::fmt::Display + Into<f64> + Copy,
{
    let wide: f64 = n.into();
    if wide.is_nan() {
        write!(f, "NaN")
    } else if wide.is_infinite() {
        write!(f, "{}Infinity", if wide < 0.0 { "-" } else { "" })
    } else if wide == 0.0 {
        write!(f, "0")
    } else {
        write!(f, "{}", n)
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::String(s) => write!(f, "{}", s),
            Val::Integer(n) => write!(f, "{}", n),
            Val::Single(n) => fmt_float(f, *n),
            Val::Double(n) => fmt_float(f, *n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Val::Single(0.1).to_string(), "0.1");
        assert_eq!(Val::Double(3.0).to_string(), "3");
        assert_eq!(Val::Double(-0.0).to_string(), "0");
        assert_eq!(Val::Double(1.0 / 0.0).to_string(), "Infinity");
        assert_eq!(Val::Integer(-7).to_string(), "-7");
    }

    #[test]
    fn test_wrapping_conversions() {
        assert_eq!(wrap_i32(4_294_967_295.0), -1);
        assert_eq!(wrap_i32(-2.7), -2);
        assert_eq!(i16::try_from(Val::Integer(40000)).unwrap(), -25536);
        assert_eq!(u8::try_from(Val::Integer(257)).unwrap(), 1);
        assert!(f64::try_from(Val::String("x".into())).is_err());
    }
}
