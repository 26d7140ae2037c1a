use super::{
    Address, Device, Ellipse, Function, Input, LabelId, Memory, MouseField, Opcode, Operation,
    Program, Shape, Stack, Val,
};
use crate::error;
use crate::lang::Error;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::convert::TryFrom;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, trace, warn};

type Result<T> = std::result::Result<T, Error>;

/// ## Virtual machine
///
/// Runs a compiled `Program` in slices. The host calls `execute`
/// repeatedly and reacts to the returned `Event`. Nothing here blocks.

pub struct Runtime {
    program: Rc<Program>,
    memory: Memory,
    stack: Stack<Val>,
    rstack: Stack<Address>,
    temps: Vec<Val>,
    pc: Address,
    device: Box<dyn Device>,
    input: Box<dyn Input>,
    rng: StdRng,
    column: usize,
    halted: bool,
}

/// Why `execute` returned.
#[derive(Debug)]
pub enum Event {
    /// The slice ran out. Call again.
    Running,
    /// The program wants the host to deliver input before resuming.
    Yield,
    /// Resume after the delay.
    Sleep(Duration),
    Stopped,
    Error(Error),
}

enum Flow {
    Continue,
    Yield,
    Sleep(Duration),
    End,
}

fn io_error(e: std::io::Error) -> Error {
    error!(InternalError; e.to_string())
}

impl Runtime {
    pub fn new(program: Program, device: Box<dyn Device>, input: Box<dyn Input>) -> Runtime {
        let layout = program.layout();
        let memory = Memory::new(layout);
        let temps = vec![Val::Integer(0); layout.temps];
        Runtime {
            program: Rc::new(program),
            memory,
            stack: Stack::new("EXPRESSION TOO COMPLEX"),
            rstack: Stack::new("GOSUB NESTED TOO DEEPLY"),
            temps,
            pc: 0,
            device,
            input,
            rng: StdRng::from_entropy(),
            column: 0,
            halted: false,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Stops the program at the next opportunity. Safe to call at any time.
    pub fn interrupt(&mut self) {
        if !self.halted {
            debug!(pc = self.pc, "interrupted");
            self.halted = true;
            if let Err(e) = self.device.flush() {
                warn!(error = %e, "flush failed on interrupt");
            }
        }
    }

    /// Runs at most `cycles` ops.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if self.halted {
            return Event::Stopped;
        }
        let program = Rc::clone(&self.program);
        for _ in 0..cycles {
            let addr = self.pc;
            let op = match program.op(addr) {
                Some(op) => op,
                None => return self.halt(None),
            };
            self.pc += 1;
            match self.step(op) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Yield) => return self.pause(Event::Yield),
                Ok(Flow::Sleep(delay)) => return self.pause(Event::Sleep(delay)),
                Ok(Flow::End) => return self.halt(None),
                Err(e) => {
                    let e = match program.line(addr) {
                        Some(line) => e.in_line_number(line),
                        None => e,
                    };
                    return self.halt(Some(e));
                }
            }
        }
        self.pause(Event::Running)
    }

    fn pause(&mut self, event: Event) -> Event {
        match self.device.flush() {
            Ok(()) => event,
            Err(e) => self.halt(Some(io_error(e))),
        }
    }

    /// A partial line is finished before stopping.
    fn halt(&mut self, error: Option<Error>) -> Event {
        debug!(pc = self.pc, error = error.is_some(), "halted");
        self.halted = true;
        let mut result = Ok(());
        if self.column > 0 {
            result = self.print("\n");
        }
        if let Err(e) = self.device.flush() {
            result = result.and(Err(io_error(e)));
        }
        match (error, result) {
            (Some(e), _) => Event::Error(e),
            (None, Err(e)) => Event::Error(e),
            (None, Ok(())) => Event::Stopped,
        }
    }

    fn print(&mut self, s: &str) -> Result<()> {
        for ch in s.chars() {
            self.device.put_glyph(ch).map_err(io_error)?;
            if ch == '\n' {
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        Ok(())
    }

    fn temp(&self, temp: usize) -> Result<Val> {
        match self.temps.get(temp) {
            Some(val) => Ok(val.clone()),
            None => Err(error!(InternalError; "NO TEMPORARY")),
        }
    }

    fn set_temp(&mut self, temp: usize, val: Val) -> Result<()> {
        match self.temps.get_mut(temp) {
            Some(t) => {
                *t = val;
                Ok(())
            }
            None => Err(error!(InternalError; "NO TEMPORARY")),
        }
    }

    fn label(&self, id: LabelId) -> Result<Address> {
        match self.program.label_addr(id) {
            Some(addr) => Ok(addr),
            None => Err(error!(LabelNotDefined)),
        }
    }

    fn number(&mut self) -> Result<f64> {
        f64::try_from(self.stack.pop()?)
    }

    fn int(&mut self) -> Result<i32> {
        self.stack.pop()?.to_int32()
    }

    fn unary(&mut self, f: fn(Val) -> Result<Val>) -> Result<()> {
        let val = self.stack.pop()?;
        self.stack.push(f(val)?)
    }

    fn binary(&mut self, f: fn(Val, Val) -> Result<Val>) -> Result<()> {
        let (lhs, rhs) = self.stack.pop_2()?;
        self.stack.push(f(lhs, rhs)?)
    }

    fn step(&mut self, op: &Opcode) -> Result<Flow> {
        trace!(pc = self.pc - 1, %op);
        match op {
            Opcode::Literal(val) => self.stack.push(val.clone())?,
            Opcode::Push(slot) => {
                let val = self.memory.fetch(*slot)?;
                self.stack.push(val)?;
            }
            Opcode::Pop(slot) => {
                let val = self.stack.pop()?;
                self.memory.store(*slot, val)?;
            }
            Opcode::PushArr(array) => {
                let subscripts = self.stack.pop_n(array.dims)?;
                let val = self.memory.fetch_array(*array, &subscripts)?;
                self.stack.push(val)?;
            }
            Opcode::PopArr(array) => {
                let val = self.stack.pop()?;
                let subscripts = self.stack.pop_n(array.dims)?;
                self.memory.store_array(*array, &subscripts, val)?;
            }
            Opcode::DimArr(array, inits) => {
                let inits = self.stack.pop_n(*inits)?;
                let mut bounds = vec![];
                for pair in self.stack.pop_n(array.dims * 2)?.chunks(2) {
                    if let [lo, hi] = pair {
                        bounds.push((lo.to_int32()?, hi.to_int32()?));
                    }
                }
                self.memory.dimension(*array, bounds, inits)?;
            }
            Opcode::PushTemp(temp) => {
                let val = self.temp(*temp)?;
                self.stack.push(val)?;
            }
            Opcode::PopTemp(temp) => {
                let val = self.stack.pop()?;
                self.set_temp(*temp, val)?;
            }
            Opcode::If(addr) => {
                if self.stack.pop()?.is_truthy() {
                    self.pc = *addr;
                }
            }
            Opcode::IfNot(addr) => {
                if !self.stack.pop()?.is_truthy() {
                    self.pc = *addr;
                }
            }
            Opcode::Jump(addr) => self.pc = *addr,
            Opcode::For(slot, temp, addr) => {
                let var = f64::try_from(self.memory.fetch(*slot)?)?;
                let end = f64::try_from(self.temp(*temp)?)?;
                let step = f64::try_from(self.temp(*temp + 1)?)?;
                if (step > 0.0 && var > end) || (step < 0.0 && var < end) {
                    self.pc = *addr;
                }
            }
            Opcode::Next(slot, temp) => {
                let val = Operation::sum(self.memory.fetch(*slot)?, self.temp(*temp + 1)?)?;
                self.memory.store(*slot, val)?;
            }
            Opcode::Goto(id) => self.pc = self.label(*id)?,
            Opcode::Gosub(id) => {
                let target = self.label(*id)?;
                self.rstack.push(self.pc)?;
                self.pc = target;
            }
            Opcode::Return => match self.rstack.pop() {
                Ok(addr) => self.pc = addr,
                Err(_) => return Err(error!(ReturnWithoutGosub)),
            },
            Opcode::End => return Ok(Flow::End),
            Opcode::Print => {
                let val = self.stack.pop()?;
                self.print(&val.to_string())?;
            }
            Opcode::PrintComma => self.print("   ")?,
            Opcode::PrintNewline => self.print("\n")?,
            Opcode::Sleep => {
                let ms = self.number()?;
                let delay = if ms.is_finite() && ms > 0.0 {
                    Duration::from_millis(ms as u64)
                } else {
                    Duration::from_millis(0)
                };
                return Ok(Flow::Sleep(delay));
            }
            Opcode::Yield => return Ok(Flow::Yield),
            Opcode::Mouse(field) => {
                let mouse = self.input.mouse();
                let val = match field {
                    MouseField::X => Val::from_f64(mouse.x),
                    MouseField::Y => Val::from_f64(mouse.y),
                    MouseField::Wheel => Val::Integer(mouse.wheel),
                    MouseField::Buttons => Val::Integer(mouse.buttons),
                    MouseField::Clip => Val::Integer(mouse.clip),
                };
                self.stack.push(val)?;
            }
            Opcode::Locate => {
                let col = self.int()?;
                let row = self.int()?;
                self.device.set_cursor(row, col);
                self.column = col.max(1) as usize - 1;
            }
            Opcode::Color => {
                let color = self.int()?;
                self.device.set_color(color);
            }
            Opcode::Screen(present) => {
                let count = present.iter().filter(|p| **p).count();
                let mut vals = self.stack.pop_n(count)?.into_iter();
                let mut args = vec![];
                for p in present {
                    let val = if *p { vals.next() } else { None };
                    args.push(match val {
                        Some(val) => Some(f64::try_from(val)?),
                        None => None,
                    });
                }
                self.device.screen(&args);
            }
            Opcode::Pset(has_color) => {
                let color = if *has_color { Some(self.int()?) } else { None };
                let y = self.number()?;
                let x = self.number()?;
                self.device.pset(x, y, color);
            }
            Opcode::Line(has_color, shape) => {
                let color = if *has_color { Some(self.int()?) } else { None };
                let y2 = self.number()?;
                let x2 = self.number()?;
                let y1 = self.number()?;
                let x1 = self.number()?;
                match shape {
                    Shape::Line => self.device.line((x1, y1), (x2, y2), color),
                    Shape::Box => self.device.rect((x1, y1), (x2, y2), color, false),
                    Shape::Fill => self.device.rect((x1, y1), (x2, y2), color, true),
                }
            }
            Opcode::Circle(present, filled) => self.circle(present, *filled)?,
            Opcode::Neg => self.unary(Operation::negate)?,
            Opcode::Pow => self.binary(Operation::power)?,
            Opcode::Mul => self.binary(Operation::multiply)?,
            Opcode::Div => self.binary(Operation::divide)?,
            Opcode::DivInt => self.binary(Operation::divide_int)?,
            Opcode::Mod => self.binary(Operation::modulo)?,
            Opcode::Add => self.binary(Operation::sum)?,
            Opcode::Sub => self.binary(Operation::subtract)?,
            Opcode::Eq => self.binary(Operation::equal)?,
            Opcode::NotEq => self.binary(Operation::not_equal)?,
            Opcode::Lt => self.binary(Operation::less)?,
            Opcode::LtEq => self.binary(Operation::less_equal)?,
            Opcode::Gt => self.binary(Operation::greater)?,
            Opcode::GtEq => self.binary(Operation::greater_equal)?,
            Opcode::Not => self.unary(Operation::not)?,
            Opcode::And => self.binary(Operation::and)?,
            Opcode::Or => self.binary(Operation::or)?,
            Opcode::Atan2 => {
                let (y, x) = self.stack.pop_2()?;
                self.stack.push(Function::atan2(y, x)?)?;
            }
            Opcode::Rnd => {
                let n: f32 = self.rng.gen();
                self.stack.push(Val::Single(n))?;
            }
            Opcode::Inkey => {
                let key = self.input.next_key().unwrap_or_default();
                self.stack.push(Val::String(key.into()))?;
                return Ok(Flow::Yield);
            }
            Opcode::Timer => {
                let now = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
                self.stack.push(Val::Double(now))?;
            }
            Opcode::Abs
            | Opcode::Asc
            | Opcode::Chr
            | Opcode::Cos
            | Opcode::Exp
            | Opcode::Int
            | Opcode::Lcase
            | Opcode::Log
            | Opcode::Sin
            | Opcode::Sqr
            | Opcode::Str
            | Opcode::Tan
            | Opcode::Ucase => {
                let val = self.stack.pop()?;
                self.stack.push(Function::call(op, vec![val])?)?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Operands are x, y, radius, then whichever optional arguments were given.
    fn circle(&mut self, present: &[bool; 4], filled: bool) -> Result<()> {
        let count = present.iter().filter(|p| **p).count();
        let mut optional = self.stack.pop_n(count)?.into_iter();
        let mut next = |p: bool| if p { optional.next() } else { None };
        let color = match next(present[0]) {
            Some(val) => Some(val.to_int32()?),
            None => None,
        };
        let mut real = |p: bool, default: f64| -> Result<f64> {
            match next(p) {
                Some(val) => f64::try_from(val),
                None => Ok(default),
            }
        };
        let start = real(present[1], 0.0)?;
        let end = real(present[2], 2.0 * std::f64::consts::PI)?;
        let aspect = real(present[3], 1.0)?;
        let radius = self.number()?;
        let y = self.number()?;
        let x = self.number()?;
        self.device.circle(
            &Ellipse {
                x,
                y,
                radius,
                start,
                end,
                aspect,
                filled,
            },
            color,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mach::{compile, Console, InputQueue};

    fn runtime(source: &str) -> Runtime {
        let program = compile(source).unwrap();
        Runtime::new(
            program,
            Box::new(Console::new(std::io::sink())),
            Box::new(InputQueue::new()),
        )
    }

    #[test]
    fn test_slices() {
        let mut r = runtime("10 goto 10");
        assert!(matches!(r.execute(50), Event::Running));
        r.interrupt();
        assert!(r.is_halted());
        assert!(matches!(r.execute(50), Event::Stopped));
    }

    struct Broken;

    impl Device for Broken {
        fn put_glyph(&mut self, _ch: char) -> std::io::Result<()> {
            Ok(())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn set_color(&mut self, _color: i32) {}
        fn set_cursor(&mut self, _row: i32, _col: i32) {}
        fn screen(&mut self, _args: &[Option<f64>]) {}
        fn pset(&mut self, _x: f64, _y: f64, _color: Option<i32>) {}
        fn line(&mut self, _from: (f64, f64), _to: (f64, f64), _color: Option<i32>) {}
        fn rect(&mut self, _: (f64, f64), _: (f64, f64), _: Option<i32>, _: bool) {}
        fn circle(&mut self, _arc: &Ellipse, _color: Option<i32>) {}
    }

    #[test]
    fn test_interrupt_with_failing_flush() {
        let program = compile("10 goto 10").unwrap();
        let mut r = Runtime::new(program, Box::new(Broken), Box::new(InputQueue::new()));
        r.interrupt();
        assert!(r.is_halted());
        assert!(matches!(r.execute(20), Event::Stopped));
    }

    #[test]
    fn test_sleep_and_yield() {
        let mut r = runtime("sleep 20\nk$ = inkey$\nend");
        assert!(matches!(r.execute(10), Event::Sleep(d) if d == Duration::from_millis(20)));
        assert!(matches!(r.execute(10), Event::Yield));
        assert!(matches!(r.execute(10), Event::Stopped));
    }

    #[test]
    fn test_runtime_error_has_line() {
        let mut r = runtime("a = 1\nreturn");
        match r.execute(10) {
            Event::Error(e) => assert_eq!(e.to_string(), "RETURN WITHOUT GOSUB at line 2"),
            other => panic!("{:?}", other),
        }
    }
}
