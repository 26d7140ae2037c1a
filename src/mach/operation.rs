use super::Val;
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Operands brought to a common type. Double beats Single beats Integer.
enum Pair {
    Integer(i32, i32),
    Single(f32, f32),
    Double(f64, f64),
    String(Rc<str>, Rc<str>),
}

fn promote(lhs: Val, rhs: Val) -> Result<Pair> {
    use Val::*;
    Ok(match (lhs, rhs) {
        (String(l), String(r)) => Pair::String(l, r),
        (String(_), _) | (_, String(_)) => return Err(error!(TypeMismatch)),
        (Integer(l), Integer(r)) => Pair::Integer(l, r),
        (Integer(l), Single(r)) => Pair::Single(l as f32, r),
        (Single(l), Integer(r)) => Pair::Single(l, r as f32),
        (Single(l), Single(r)) => Pair::Single(l, r),
        (Integer(l), Double(r)) => Pair::Double(l as f64, r),
        (Single(l), Double(r)) => Pair::Double(l as f64, r),
        (Double(l), Integer(r)) => Pair::Double(l, r as f64),
        (Double(l), Single(r)) => Pair::Double(l, r as f64),
        (Double(l), Double(r)) => Pair::Double(l, r),
    })
}

fn numeric(lhs: Val, rhs: Val) -> Result<Pair> {
    match promote(lhs, rhs)? {
        Pair::String(..) => Err(error!(TypeMismatch)),
        pair => Ok(pair),
    }
}

/// `None` when either side is NaN. Such pairs are unequal and unordered.
fn compare(lhs: Val, rhs: Val) -> Result<Option<Ordering>> {
    let ord = match promote(lhs, rhs)? {
        Pair::String(l, r) => Some(l.cmp(&r)),
        Pair::Integer(l, r) => Some(l.cmp(&r)),
        Pair::Single(l, r) => l.partial_cmp(&r),
        Pair::Double(l, r) => l.partial_cmp(&r),
    };
    Ok(ord)
}

fn is_zero(val: &Val) -> bool {
    match val {
        Val::Integer(n) => *n == 0,
        Val::Single(n) => *n == 0.0,
        Val::Double(n) => *n == 0.0,
        Val::String(_) => false,
    }
}

pub struct Operation {}

impl Operation {
    pub fn negate(val: Val) -> Result<Val> {
        use Val::*;
        match val {
            Integer(n) => Ok(match n.checked_neg() {
                Some(n) => Integer(n),
                None => Double(-(n as f64)),
            }),
            Single(n) => Ok(Single(-n)),
            Double(n) => Ok(Double(-n)),
            String(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn power(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(match numeric(lhs, rhs)? {
            Pair::Single(l, r) => Val::Single(l.powf(r)),
            Pair::Integer(l, r) => Val::Double((l as f64).powf(r as f64)),
            Pair::Double(l, r) => Val::Double(l.powf(r)),
            Pair::String(..) => return Err(error!(TypeMismatch)),
        })
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(match numeric(lhs, rhs)? {
            Pair::Integer(l, r) => match l.checked_mul(r) {
                Some(n) => Val::Integer(n),
                None => Val::Double(l as f64 * r as f64),
            },
            Pair::Single(l, r) => Val::Single(l * r),
            Pair::Double(l, r) => Val::Double(l * r),
            Pair::String(..) => return Err(error!(TypeMismatch)),
        })
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        if is_zero(&rhs) {
            return Err(error!(DivisionByZero));
        }
        Ok(match numeric(lhs, rhs)? {
            Pair::Integer(l, r) => Val::Double(l as f64 / r as f64),
            Pair::Single(l, r) => Val::Single(l / r),
            Pair::Double(l, r) => Val::Double(l / r),
            Pair::String(..) => return Err(error!(TypeMismatch)),
        })
    }

    /// Both operands truncate to integers before dividing.
    pub fn divide_int(lhs: Val, rhs: Val) -> Result<Val> {
        let l = lhs.to_int32()?;
        let r = rhs.to_int32()?;
        if r == 0 {
            return Err(error!(DivisionByZero));
        }
        Ok(match l.checked_div(r) {
            Some(n) => Val::Integer(n),
            None => Val::Double(l as f64 / r as f64),
        })
    }

    /// Remainder takes the sign of the dividend.
    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        if is_zero(&rhs) {
            return Err(error!(DivisionByZero));
        }
        Ok(match numeric(lhs, rhs)? {
            Pair::Integer(l, r) => Val::Integer(l.checked_rem(r).unwrap_or(0)),
            Pair::Single(l, r) => Val::Single(l % r),
            Pair::Double(l, r) => Val::Double(l % r),
            Pair::String(..) => return Err(error!(TypeMismatch)),
        })
    }

    pub fn sum(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(match promote(lhs, rhs)? {
            Pair::String(l, r) => Val::String((l.to_string() + &r).into()),
            Pair::Integer(l, r) => match l.checked_add(r) {
                Some(n) => Val::Integer(n),
                None => Val::Double(l as f64 + r as f64),
            },
            Pair::Single(l, r) => Val::Single(l + r),
            Pair::Double(l, r) => Val::Double(l + r),
        })
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(match numeric(lhs, rhs)? {
            Pair::Integer(l, r) => match l.checked_sub(r) {
                Some(n) => Val::Integer(n),
                None => Val::Double(l as f64 - r as f64),
            },
            Pair::Single(l, r) => Val::Single(l - r),
            Pair::Double(l, r) => Val::Double(l - r),
            Pair::String(..) => return Err(error!(TypeMismatch)),
        })
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::truth(compare(lhs, rhs)? == Some(Ordering::Equal)))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::truth(compare(lhs, rhs)? != Some(Ordering::Equal)))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::truth(compare(lhs, rhs)? == Some(Ordering::Less)))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::truth(matches!(
            compare(lhs, rhs)?,
            Some(Ordering::Less) | Some(Ordering::Equal)
        )))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::truth(compare(lhs, rhs)? == Some(Ordering::Greater)))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::truth(matches!(
            compare(lhs, rhs)?,
            Some(Ordering::Greater) | Some(Ordering::Equal)
        )))
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::Integer(!val.to_int32()?))
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(lhs.to_int32()? & rhs.to_int32()?))
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(lhs.to_int32()? | rhs.to_int32()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion() {
        assert_eq!(
            Operation::sum(Val::Integer(1), Val::Single(0.5)).unwrap(),
            Val::Single(1.5)
        );
        assert_eq!(
            Operation::multiply(Val::Single(2.0), Val::Double(0.25)).unwrap(),
            Val::Double(0.5)
        );
        assert_eq!(
            Operation::sum(Val::Integer(i32::MAX), Val::Integer(1)).unwrap(),
            Val::Double(2_147_483_648.0)
        );
    }

    #[test]
    fn test_relational_truth() {
        assert_eq!(
            Operation::less(Val::Integer(1), Val::Double(2.0)).unwrap(),
            Val::Integer(-1)
        );
        assert_eq!(
            Operation::equal(Val::String("a".into()), Val::String("b".into())).unwrap(),
            Val::Integer(0)
        );
        assert!(Operation::equal(Val::String("a".into()), Val::Integer(0)).is_err());
    }

    #[test]
    fn test_nan_is_unordered() {
        let nan = || Val::Double(f64::NAN);
        let one = || Val::Integer(1);
        assert_eq!(Operation::less(nan(), one()).unwrap(), Val::Integer(0));
        assert_eq!(Operation::less_equal(nan(), one()).unwrap(), Val::Integer(0));
        assert_eq!(Operation::greater(one(), nan()).unwrap(), Val::Integer(0));
        assert_eq!(Operation::greater_equal(nan(), nan()).unwrap(), Val::Integer(0));
        assert_eq!(Operation::equal(nan(), nan()).unwrap(), Val::Integer(0));
        assert_eq!(Operation::not_equal(nan(), one()).unwrap(), Val::Integer(-1));
        assert_eq!(
            Operation::less(Val::Single(f32::NAN), Val::Single(0.0)).unwrap(),
            Val::Integer(0)
        );
    }

    #[test]
    fn test_division() {
        assert_eq!(
            Operation::divide(Val::Integer(7), Val::Integer(2)).unwrap(),
            Val::Double(3.5)
        );
        assert_eq!(
            Operation::divide_int(Val::Double(7.9), Val::Integer(2)).unwrap(),
            Val::Integer(3)
        );
        assert_eq!(
            Operation::modulo(Val::Integer(-7), Val::Integer(3)).unwrap(),
            Val::Integer(-1)
        );
        assert_eq!(
            Operation::divide(Val::Integer(1), Val::Integer(0))
                .unwrap_err()
                .to_string(),
            "DIVISION BY ZERO"
        );
    }

    #[test]
    fn test_bitwise_logic() {
        assert_eq!(Operation::not(Val::Integer(0)).unwrap(), Val::Integer(-1));
        assert_eq!(
            Operation::and(Val::Integer(-1), Val::Integer(0)).unwrap(),
            Val::Integer(0)
        );
        assert_eq!(
            Operation::or(Val::Integer(4), Val::Single(1.0)).unwrap(),
            Val::Integer(5)
        );
    }
}
