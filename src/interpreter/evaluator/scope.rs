use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::interpreter::value::{core::Value, function::Binding};

/// A stack of variable frames.
///
/// Frames are pushed and popped in strict LIFO order at block, loop and call
/// boundaries. Popped frames are cleared and kept for reuse, so entering a
/// scope in a hot loop does not allocate.
///
/// # Example
/// ```
/// use tensorpad::interpreter::{evaluator::scope::ScopeStack, value::core::Value};
///
/// let mut scopes = ScopeStack::new();
/// scopes.declare("x", Value::Number(1.0)).unwrap();
///
/// scopes.push_frame();
/// scopes.declare("x", Value::Number(2.0)).unwrap();
/// assert_eq!(scopes.get("x"), Some(Value::Number(2.0)));
/// scopes.pop_frame();
///
/// assert_eq!(scopes.get("x"), Some(Value::Number(1.0)));
/// ```
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<HashMap<String, Binding>>,
    depth:  usize,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Creates a stack holding only the global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: vec![HashMap::new()],
               depth:  0, }
    }

    /// Opens a new innermost frame, reusing a pooled one when available.
    pub fn push_frame(&mut self) {
        self.depth += 1;
        if self.depth == self.frames.len() {
            self.frames.push(HashMap::new());
        }
    }

    /// Discards the innermost frame. The global frame is never popped.
    pub fn pop_frame(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.frames[self.depth].clear();
        self.depth -= 1;
    }

    /// Number of frames above the global one.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Finds the cell bound to `name`, searching innermost first.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.frames[..=self.depth].iter()
                                  .rev()
                                  .find_map(|frame| frame.get(name))
    }

    /// Returns a copy of the current value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.lookup(name).map(|cell| cell.borrow().clone())
    }

    /// Binds `name` to a fresh cell in the innermost frame.
    ///
    /// # Errors
    /// Returns the value already bound to `name` when the innermost frame
    /// declares it. Bindings in outer frames may be shadowed freely.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), Value> {
        self.install(name, Rc::new(RefCell::new(value)))
    }

    /// Binds `name` to an existing cell in the innermost frame, sharing it
    /// with whoever else holds it.
    ///
    /// # Errors
    /// Same as [`ScopeStack::declare`].
    pub fn install(&mut self, name: &str, cell: Binding) -> Result<(), Value> {
        let frame = &mut self.frames[self.depth];
        if let Some(existing) = frame.get(name) {
            return Err(existing.borrow().clone());
        }
        frame.insert(name.to_string(), cell);
        Ok(())
    }

    /// Overwrites the value in the nearest cell bound to `name`.
    ///
    /// Returns `false` when no frame binds `name`.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.lookup(name) {
            Some(cell) => {
                *cell.borrow_mut() = value;
                true
            },
            None => false,
        }
    }
}
