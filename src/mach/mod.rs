/*!
## Machine Module

Compiles BASIC source into a flat program of stack-machine ops and
runs it in slices against pluggable output and input.

*/

pub type Address = usize;

mod codegen;
mod compile;
mod device;
mod function;
mod listing;
mod opcode;
mod operation;
mod program;
mod runtime;
mod stack;
mod val;
mod var;

pub use compile::compile;
pub use device::{Console, Device, Ellipse, Input, InputQueue, Mouse};
pub use function::Function;
pub use opcode::{LabelId, MouseField, Opcode, Shape, Temp};
pub use operation::Operation;
pub use program::{Label, Program};
pub use runtime::{Event, Runtime};
pub use stack::Stack;
pub use val::Val;
pub use var::{ArrayDecl, ArrayRef, Binding, Cells, Layout, Memory, Slot, StorageClass, Vars};
