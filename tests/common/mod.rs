#![allow(dead_code)]

use basic::mach::{compile, Device, Ellipse, Event, InputQueue, Runtime};
use std::cell::RefCell;
use std::rc::Rc;

/// Records text and drawing calls for inspection.
#[derive(Clone, Default)]
pub struct Capture {
    pub text: Rc<RefCell<String>>,
    pub draw: Rc<RefCell<Vec<String>>>,
}

impl Device for Capture {
    fn put_glyph(&mut self, ch: char) -> std::io::Result<()> {
        self.text.borrow_mut().push(ch);
        Ok(())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
    fn set_color(&mut self, color: i32) {
        self.draw.borrow_mut().push(format!("color {}", color));
    }
    fn set_cursor(&mut self, row: i32, col: i32) {
        self.draw.borrow_mut().push(format!("locate {} {}", row, col));
    }
    fn screen(&mut self, args: &[Option<f64>]) {
        self.draw.borrow_mut().push(format!("screen {:?}", args));
    }
    fn pset(&mut self, x: f64, y: f64, color: Option<i32>) {
        self.draw
            .borrow_mut()
            .push(format!("pset {} {} {:?}", x, y, color));
    }
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Option<i32>) {
        self.draw
            .borrow_mut()
            .push(format!("line {:?} {:?} {:?}", from, to, color));
    }
    fn rect(&mut self, from: (f64, f64), to: (f64, f64), color: Option<i32>, filled: bool) {
        self.draw
            .borrow_mut()
            .push(format!("rect {:?} {:?} {:?} {}", from, to, color, filled));
    }
    fn circle(&mut self, arc: &Ellipse, color: Option<i32>) {
        self.draw.borrow_mut().push(format!(
            "circle {} {} {} {} {:?}",
            arc.x, arc.y, arc.radius, arc.filled, color
        ));
    }
}

pub fn runtime(source: &str, input: InputQueue) -> (Runtime, Capture) {
    let program = compile(source).unwrap();
    let capture = Capture::default();
    let runtime = Runtime::new(program, Box::new(capture.clone()), Box::new(input));
    (runtime, capture)
}

/// Drives the machine like a host would, ignoring pauses.
pub fn exec(runtime: &mut Runtime, capture: &Capture) -> String {
    let mut slices = 0;
    loop {
        match runtime.execute(5000) {
            Event::Running | Event::Yield | Event::Sleep(_) => {}
            Event::Stopped => break,
            Event::Error(error) => {
                capture.text.borrow_mut().push_str(&format!("{}\n", error));
                break;
            }
        }
        slices += 1;
        if slices > 1000 {
            capture.text.borrow_mut().push_str("\nExecution cycles exceeded.\n");
            break;
        }
    }
    let text = capture.text.borrow().clone();
    text
}

/// Compiles and runs to completion, returning everything printed.
/// Compile errors are returned as text too.
pub fn run(source: &str) -> String {
    match compile(source) {
        Err(error) => format!("{}\n", error),
        Ok(_) => {
            let (mut runtime, capture) = runtime(source, InputQueue::new());
            exec(&mut runtime, &capture)
        }
    }
}
