use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::Node,
    interpreter::value::core::{Value, Visiting},
};

/// Mutable storage for one variable.
///
/// The scope that declares a variable and every closure that captures it hold
/// the same cell, so a write through either is seen by both.
pub type Binding = Rc<RefCell<Value>>;

/// A user-defined function.
///
/// Created by `name(params) := body`. Calling it opens a new frame on top of
/// the caller's scopes, binds the parameters, reinstalls the captured cells
/// and evaluates the body there.
#[derive(Debug)]
pub struct Function {
    /// The name the function was defined under.
    pub name:     String,
    /// Parameter names, in order.
    pub params:   Vec<String>,
    /// Free variables of the body, bound to the defining scope's cells.
    pub captures: Vec<(String, Binding)>,
    /// The body, always a block.
    pub body:     Rc<Node>,
    /// Source text of the definition, used for display.
    pub text:     String,
    /// The whole program the function was defined in. Spans inside `body`
    /// point into it.
    pub source:   Rc<str>,
}

impl Function {
    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Function {
    /// Writes the definition and the current value of every capture. A
    /// capture whose cell is already being written shows as `name=...`.
    pub(crate) fn write(&self, f: &mut fmt::Formatter<'_>, visiting: &mut Visiting) -> fmt::Result {
        write!(f, "{}", self.text)?;

        for (i, (name, cell)) in self.captures.iter().enumerate() {
            let separator = if i == 0 { " where " } else { ", " };
            write!(f, "{separator}{name}=")?;

            let address = Rc::as_ptr(cell).cast::<()>();
            if visiting.contains(&address) {
                write!(f, "...")?;
                continue;
            }
            visiting.push(address);
            let result = cell.borrow().write(f, visiting);
            visiting.pop();
            result?;
        }

        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, &mut Vec::new())
    }
}
