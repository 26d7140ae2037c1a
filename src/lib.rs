//! # QBasic VM
//!
//! A compiler and cooperative virtual machine for a QBasic-style
//! dialect of BASIC.
//!
//! Source text compiles in one pass to a flat sequence of stack-machine
//! ops. The machine runs them in slices so a host can stay responsive:
//! ```
//! use basic::mach::{compile, Console, Event, InputQueue, Runtime};
//!
//! let program = compile("FOR i = 1 TO 3: PRINT i;: NEXT").unwrap();
//! let mut runtime = Runtime::new(
//!     program,
//!     Box::new(Console::new(std::io::sink())),
//!     Box::new(InputQueue::new()),
//! );
//! while let Event::Running = runtime.execute(1000) {}
//! ```
//!
//! The `qbasic` binary runs a program from a file or URL.

#[path = "doc/introduction.rs"]
#[allow(non_snake_case)]
pub mod _Introduction;

#[path = "doc/statements.rs"]
#[allow(non_snake_case)]
pub mod __Statements;

pub mod lang;
pub mod mach;
pub mod term;
