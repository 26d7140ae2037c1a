use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Arguments of a `CIRCLE` statement after defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
    pub aspect: f64,
    pub filled: bool,
}

/// ## Output collaborator
///
/// The machine draws through this and never reads anything back.
/// Colors of `None` mean the current color.
pub trait Device {
    fn put_glyph(&mut self, ch: char) -> std::io::Result<()>;
    /// Push anything buffered to the display.
    fn flush(&mut self) -> std::io::Result<()>;
    fn set_color(&mut self, color: i32);
    /// One-based row and column.
    fn set_cursor(&mut self, row: i32, col: i32);
    fn screen(&mut self, args: &[Option<f64>]);
    fn pset(&mut self, x: f64, y: f64, color: Option<i32>);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Option<i32>);
    fn rect(&mut self, from: (f64, f64), to: (f64, f64), color: Option<i32>, filled: bool);
    fn circle(&mut self, arc: &Ellipse, color: Option<i32>);
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mouse {
    pub x: f64,
    pub y: f64,
    pub buttons: i32,
    pub wheel: i32,
    pub clip: i32,
}

/// ## Input collaborator
///
/// Polled by the machine. Keys are consumed, the mouse is a snapshot.
pub trait Input {
    fn next_key(&mut self) -> Option<String>;
    fn mouse(&self) -> Mouse;
}

/// Input fed from other threads. Clones share the same queue, so a
/// host keeps one clone to push events and hands another to the machine.
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    keys: Arc<Mutex<VecDeque<String>>>,
    mouse: Arc<Mutex<Mouse>>,
}

impl InputQueue {
    pub fn new() -> InputQueue {
        InputQueue::default()
    }

    pub fn push_key<S: Into<String>>(&self, key: S) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.push_back(key.into());
        }
    }

    pub fn set_mouse(&self, mouse: Mouse) {
        if let Ok(mut m) = self.mouse.lock() {
            *m = mouse;
        }
    }
}

impl Input for InputQueue {
    fn next_key(&mut self) -> Option<String> {
        match self.keys.lock() {
            Ok(mut keys) => keys.pop_front(),
            Err(_) => None,
        }
    }

    fn mouse(&self) -> Mouse {
        match self.mouse.lock() {
            Ok(m) => *m,
            Err(_) => Mouse::default(),
        }
    }
}

/// ## Text console
///
/// Writes glyphs to any `Write`. There is no pixel surface, so
/// graphics requests are only traced.
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Console<W> {
        Console { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Device for Console<W> {
    fn put_glyph(&mut self, ch: char) -> std::io::Result<()> {
        let mut buf = [0; 4];
        self.out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
        if ch == '\n' {
            self.out.flush()?;
        }
        Ok(())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
    fn set_color(&mut self, color: i32) {
        trace!(color, "console ignores COLOR");
    }
    fn set_cursor(&mut self, row: i32, col: i32) {
        trace!(row, col, "console ignores LOCATE");
    }
    fn screen(&mut self, args: &[Option<f64>]) {
        trace!(?args, "console ignores SCREEN");
    }
    fn pset(&mut self, x: f64, y: f64, color: Option<i32>) {
        trace!(x, y, ?color, "console ignores PSET");
    }
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Option<i32>) {
        trace!(?from, ?to, ?color, "console ignores LINE");
    }
    fn rect(&mut self, from: (f64, f64), to: (f64, f64), color: Option<i32>, filled: bool) {
        trace!(?from, ?to, ?color, filled, "console ignores LINE B");
    }
    fn circle(&mut self, arc: &Ellipse, color: Option<i32>) {
        trace!(?arc, ?color, "console ignores CIRCLE");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_shared_between_clones() {
        let host = InputQueue::new();
        let mut machine = host.clone();
        host.push_key("a");
        host.push_key("b");
        host.set_mouse(Mouse {
            x: 3.0,
            buttons: 1,
            ..Mouse::default()
        });
        assert_eq!(machine.next_key().as_deref(), Some("a"));
        assert_eq!(machine.next_key().as_deref(), Some("b"));
        assert_eq!(machine.next_key(), None);
        assert_eq!(machine.mouse().x, 3.0);
        assert_eq!(machine.mouse().buttons, 1);
    }

    #[test]
    fn test_console_writes_glyphs() {
        let mut console = Console::new(Vec::new());
        for ch in "hé\n".chars() {
            console.put_glyph(ch).unwrap();
        }
        console.set_color(4);
        assert_eq!(String::from_utf8(console.into_inner()).unwrap(), "hé\n");
    }
}
