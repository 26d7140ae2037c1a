use super::Val;
use crate::error;
use crate::lang::Error;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Arrays larger than this many elements are refused.
const MAX_ARRAY_LEN: usize = 1 << 24;

/// ## Storage classes
///
/// Every variable lives in the store for exactly one class,
/// so differently typed variables never alias.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageClass {
    Byte,
    Int16,
    Int32,
    Single,
    Double,
    String,
}

impl StorageClass {
    pub const ALL: [StorageClass; 6] = [
        StorageClass::Byte,
        StorageClass::Int16,
        StorageClass::Int32,
        StorageClass::Single,
        StorageClass::Double,
        StorageClass::String,
    ];

    /// Class implied by the last character of a name, if it has a suffix.
    pub fn from_suffix(name: &str) -> Option<StorageClass> {
        match name.chars().last() {
            Some('$') => Some(StorageClass::String),
            Some('%') => Some(StorageClass::Int16),
            Some('&') => Some(StorageClass::Int32),
            Some('!') => Some(StorageClass::Single),
            Some('#') => Some(StorageClass::Double),
            _ => None,
        }
    }

    /// Names accepted after `AS`. INTEGER is 32 bits wide here.
    pub fn from_type_name(name: &str) -> Option<StorageClass> {
        match name {
            "byte" => Some(StorageClass::Byte),
            "integer" | "long" => Some(StorageClass::Int32),
            "single" => Some(StorageClass::Single),
            "double" => Some(StorageClass::Double),
            "string" => Some(StorageClass::String),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn is_string(self) -> bool {
        self == StorageClass::String
    }

    pub fn default_val(self) -> Val {
        match self {
            StorageClass::String => Val::String("".into()),
            StorageClass::Single => Val::Single(0.0),
            StorageClass::Double => Val::Double(0.0),
            _ => Val::Integer(0),
        }
    }
}

impl std::fmt::Display for StorageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use StorageClass::*;
        match self {
            Byte => write!(f, "b"),
            Int16 => write!(f, "i16"),
            Int32 => write!(f, "i"),
            Single => write!(f, "s"),
            Double => write!(f, "d"),
            String => write!(f, "str"),
        }
    }
}

/// A scalar's position in its class store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub class: StorageClass,
    pub index: usize,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}[{}]", self.class, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRef {
    pub class: StorageClass,
    pub id: usize,
    pub dims: usize,
}

impl std::fmt::Display for ArrayRef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "a{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    Scalar(Slot),
    Const(Slot),
    Array(ArrayRef),
}

#[derive(Debug, Clone)]
pub struct ArrayDecl {
    pub name: String,
    pub array: ArrayRef,
    /// Bounds used when an implicit array is first touched.
    pub implicit_bounds: Option<(i32, i32)>,
}

/// Everything the machine needs to size its stores.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub slots: [usize; 6],
    pub arrays: Vec<ArrayDecl>,
    pub temps: usize,
}

/// ## Name binding
///
/// Built during compilation. Slots are handed out in the order names
/// are first seen, so compiling the same text twice gives the same layout.

#[derive(Debug, Default)]
pub struct Vars {
    bindings: HashMap<String, Binding>,
    deftype: [Option<StorageClass>; 26],
    layout: Layout,
}

impl Vars {
    pub fn new() -> Vars {
        Vars::default()
    }

    pub fn get(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).copied()
    }

    /// Suffix first, then any DEF statement covering the first letter.
    pub fn implicit_class(&self, name: &str) -> StorageClass {
        if let Some(class) = StorageClass::from_suffix(name) {
            return class;
        }
        let letter = name.bytes().next().unwrap_or(b'a');
        if letter.is_ascii_lowercase() {
            if let Some(class) = self.deftype[(letter - b'a') as usize] {
                return class;
            }
        }
        StorageClass::Single
    }

    pub fn deftype(&mut self, from: u8, to: u8, class: StorageClass) {
        for letter in from..=to {
            if letter.is_ascii_lowercase() {
                self.deftype[(letter - b'a') as usize] = Some(class);
            }
        }
    }

    fn check_unbound(&self, name: &str) -> Result<()> {
        if self.bindings.contains_key(name) {
            Err(error!(DuplicateDefinition; name))
        } else {
            Ok(())
        }
    }

    fn new_slot(&mut self, class: StorageClass) -> Slot {
        let count = &mut self.layout.slots[class.index()];
        let slot = Slot {
            class,
            index: *count,
        };
        *count += 1;
        slot
    }

    pub fn declare_scalar(&mut self, name: &str, class: StorageClass) -> Result<Slot> {
        self.check_unbound(name)?;
        let slot = self.new_slot(class);
        self.bindings.insert(name.to_string(), Binding::Scalar(slot));
        Ok(slot)
    }

    pub fn declare_const(&mut self, name: &str, class: StorageClass) -> Result<Slot> {
        self.check_unbound(name)?;
        let slot = self.new_slot(class);
        self.bindings.insert(name.to_string(), Binding::Const(slot));
        Ok(slot)
    }

    pub fn declare_array(
        &mut self,
        name: &str,
        class: StorageClass,
        dims: usize,
        implicit_bounds: Option<(i32, i32)>,
    ) -> Result<ArrayRef> {
        self.check_unbound(name)?;
        let array = ArrayRef {
            class,
            id: self.layout.arrays.len(),
            dims,
        };
        self.layout.arrays.push(ArrayDecl {
            name: name.to_string(),
            array,
            implicit_bounds,
        });
        self.bindings.insert(name.to_string(), Binding::Array(array));
        Ok(array)
    }

    /// Hidden storage for loop limits, selectors and swaps.
    pub fn temps(&mut self, count: usize) -> usize {
        let first = self.layout.temps;
        self.layout.temps += count;
        first
    }

    pub fn into_layout(self) -> Layout {
        self.layout
    }
}

/// ## Typed cell storage

#[derive(Debug)]
pub enum Cells {
    Byte(Vec<u8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Single(Vec<f32>),
    Double(Vec<f64>),
    String(Vec<Rc<str>>),
}

impl Cells {
    pub fn new(class: StorageClass, len: usize) -> Cells {
        match class {
            StorageClass::Byte => Cells::Byte(vec![0; len]),
            StorageClass::Int16 => Cells::Int16(vec![0; len]),
            StorageClass::Int32 => Cells::Int32(vec![0; len]),
            StorageClass::Single => Cells::Single(vec![0.0; len]),
            StorageClass::Double => Cells::Double(vec![0.0; len]),
            StorageClass::String => Cells::String(vec![Rc::from(""); len]),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Cells::Byte(v) => v.len(),
            Cells::Int16(v) => v.len(),
            Cells::Int32(v) => v.len(),
            Cells::Single(v) => v.len(),
            Cells::Double(v) => v.len(),
            Cells::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fetch(&self, index: usize) -> Result<Val> {
        let val = match self {
            Cells::Byte(v) => v.get(index).map(|n| Val::Integer(*n as i32)),
            Cells::Int16(v) => v.get(index).map(|n| Val::Integer(*n as i32)),
            Cells::Int32(v) => v.get(index).map(|n| Val::Integer(*n)),
            Cells::Single(v) => v.get(index).map(|n| Val::Single(*n)),
            Cells::Double(v) => v.get(index).map(|n| Val::Double(*n)),
            Cells::String(v) => v.get(index).map(|s| Val::String(s.clone())),
        };
        val.ok_or_else(|| error!(InternalError; "STORAGE INDEX"))
    }

    /// Converts to the class of the store. Integers wrap, strings
    /// and numbers never mix.
    pub fn store(&mut self, index: usize, val: Val) -> Result<()> {
        fn put<T>(v: &mut Vec<T>, index: usize, x: T) -> Result<()> {
            match v.get_mut(index) {
                Some(cell) => {
                    *cell = x;
                    Ok(())
                }
                None => Err(error!(InternalError; "STORAGE INDEX")),
            }
        }
        match self {
            Cells::Byte(v) => put(v, index, u8::try_from(val)?),
            Cells::Int16(v) => put(v, index, i16::try_from(val)?),
            Cells::Int32(v) => put(v, index, i32::try_from(val)?),
            Cells::Single(v) => put(v, index, f32::try_from(val)?),
            Cells::Double(v) => put(v, index, f64::try_from(val)?),
            Cells::String(v) => put(v, index, Rc::<str>::try_from(val)?),
        }
    }
}

#[derive(Debug)]
struct Array {
    bounds: Vec<(i32, i32)>,
    cells: Cells,
}

impl Array {
    fn new(class: StorageClass, bounds: Vec<(i32, i32)>) -> Result<Array> {
        let mut len: usize = 1;
        for (lo, hi) in &bounds {
            if hi < lo {
                return Err(error!(SubscriptOutOfRange; "UPPER BOUND BELOW LOWER BOUND"));
            }
            len = len
                .checked_mul((*hi as i64 - *lo as i64 + 1) as usize)
                .filter(|len| *len <= MAX_ARRAY_LEN)
                .ok_or_else(|| error!(OutOfMemory; "ARRAY TOO LARGE"))?;
        }
        Ok(Array {
            bounds,
            cells: Cells::new(class, len),
        })
    }

    /// Dimension 0 varies fastest.
    fn offset(&self, subscripts: &[Val]) -> Result<usize> {
        if subscripts.len() != self.bounds.len() {
            return Err(error!(WrongNumberOfSubscripts));
        }
        let mut offset: i64 = 0;
        let mut multiplier: i64 = 1;
        for (sub, (lo, hi)) in subscripts.iter().zip(&self.bounds) {
            let i = sub.to_int32()?;
            if i < *lo || i > *hi {
                return Err(error!(SubscriptOutOfRange));
            }
            offset += (i as i64 - *lo as i64) * multiplier;
            multiplier *= *hi as i64 - *lo as i64 + 1;
        }
        Ok(offset as usize)
    }
}

/// ## Variable memory
///
/// One store per storage class for scalars. Arrays are allocated
/// on first use and keep their bounds for the rest of the run.

#[derive(Debug)]
pub struct Memory {
    scalars: Vec<Cells>,
    arrays: Vec<Option<Array>>,
    decls: Vec<ArrayDecl>,
}

impl Memory {
    pub fn new(layout: &Layout) -> Memory {
        Memory {
            scalars: StorageClass::ALL
                .iter()
                .map(|class| Cells::new(*class, layout.slots[class.index()]))
                .collect(),
            arrays: layout.arrays.iter().map(|_| None).collect(),
            decls: layout.arrays.clone(),
        }
    }

    fn scalar_store(&mut self, class: StorageClass) -> Result<&mut Cells> {
        self.scalars
            .get_mut(class.index())
            .ok_or_else(|| error!(InternalError; "NO STORE"))
    }

    pub fn fetch(&self, slot: Slot) -> Result<Val> {
        match self.scalars.get(slot.class.index()) {
            Some(cells) => cells.fetch(slot.index),
            None => Err(error!(InternalError; "NO STORE")),
        }
    }

    pub fn store(&mut self, slot: Slot, val: Val) -> Result<()> {
        self.scalar_store(slot.class)?.store(slot.index, val)
    }

    pub fn is_dimensioned(&self, array: ArrayRef) -> bool {
        matches!(self.arrays.get(array.id), Some(Some(_)))
    }

    /// Allocates once. Later calls leave the array untouched.
    pub fn dimension(
        &mut self,
        array: ArrayRef,
        bounds: Vec<(i32, i32)>,
        inits: Vec<Val>,
    ) -> Result<()> {
        if self.is_dimensioned(array) {
            return Ok(());
        }
        let mut arr = Array::new(array.class, bounds)?;
        if inits.len() > arr.cells.len() {
            return Err(error!(SubscriptOutOfRange; "TOO MANY INITIALIZERS"));
        }
        for (index, val) in inits.into_iter().enumerate() {
            arr.cells.store(index, val)?;
        }
        match self.arrays.get_mut(array.id) {
            Some(entry) => {
                *entry = Some(arr);
                Ok(())
            }
            None => Err(error!(InternalError; "NO ARRAY")),
        }
    }

    fn array(&mut self, array: ArrayRef) -> Result<&mut Array> {
        if !self.is_dimensioned(array) {
            let (implicit_bounds, name) = match self.decls.get(array.id) {
                Some(decl) => (decl.implicit_bounds, decl.name.clone()),
                None => return Err(error!(InternalError; "NO ARRAY")),
            };
            match implicit_bounds {
                Some(bounds) => self.dimension(array, vec![bounds; array.dims], vec![])?,
                None => {
                    return Err(error!(SubscriptOutOfRange; format!("{} NOT DIMENSIONED", name)))
                }
            }
        }
        match self.arrays.get_mut(array.id) {
            Some(Some(arr)) => Ok(arr),
            _ => Err(error!(InternalError; "NO ARRAY")),
        }
    }

    pub fn fetch_array(&mut self, array: ArrayRef, subscripts: &[Val]) -> Result<Val> {
        let arr = self.array(array)?;
        let offset = arr.offset(subscripts)?;
        arr.cells.fetch(offset)
    }

    pub fn store_array(&mut self, array: ArrayRef, subscripts: &[Val], val: Val) -> Result<()> {
        let arr = self.array(array)?;
        let offset = arr.offset(subscripts)?;
        arr.cells.store(offset, val)
    }

    /// Element count of an allocated array.
    pub fn array_len(&self, array: ArrayRef) -> Option<usize> {
        match self.arrays.get(array.id) {
            Some(Some(arr)) => Some(arr.cells.len()),
            _ => None,
        }
    }
}
