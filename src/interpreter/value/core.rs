use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::value::{function::Function, tensor::Tensor},
    util::num::format_number,
};

/// Represents a runtime value in the interpreter.
///
/// This enum models every value a program can produce. Tensors, functions
/// and errors are reference counted so copying a value is cheap; lists are
/// additionally mutable, and every variable holding the same list sees
/// appends made through any of them.
#[derive(Clone)]
pub enum Value {
    /// A double precision number.
    Number(f64),
    /// An N-dimensional tensor. Indexed writes copy the tensor first if it is
    /// shared, so tensors behave as plain values.
    Tensor(Rc<Tensor>),
    /// A string.
    String(Rc<str>),
    /// A user-defined function with its captured cells.
    Function(Rc<Function>),
    /// A shared, mutable list of values.
    List(Rc<RefCell<Vec<Self>>>),
    /// The result of statements that produce nothing, such as `print`.
    Null,
    /// An evaluation error, carried as a value.
    Error(Rc<RuntimeError>),
}

/// The type tags of [`Value`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// [`Value::Number`]
    Number,
    /// [`Value::Tensor`]
    Tensor,
    /// [`Value::String`]
    String,
    /// [`Value::Function`]
    Function,
    /// [`Value::List`]
    List,
    /// [`Value::Null`]
    Null,
    /// [`Value::Error`]
    Error,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "NUMBER",
            Self::Tensor => "TENSOR",
            Self::String => "STRING",
            Self::Function => "FUNCTION",
            Self::List => "LIST",
            Self::Null => "NULL",
            Self::Error => "ERROR",
        };
        write!(f, "{name}")
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Self::Tensor(Rc::new(t))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(Rc::from(s))
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Self::Function(Rc::new(f))
    }
}

impl From<RuntimeError> for Value {
    fn from(e: RuntimeError) -> Self {
        Self::Error(Rc::new(e))
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }
}

impl Value {
    /// Returns the type tag of the value.
    ///
    /// # Example
    /// ```
    /// use tensorpad::interpreter::value::core::{Value, ValueType};
    ///
    /// assert_eq!(Value::Number(1.0).value_type(), ValueType::Number);
    /// assert_eq!(Value::Null.value_type().to_string(), "NULL");
    /// ```
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Number(_) => ValueType::Number,
            Self::Tensor(_) => ValueType::Tensor,
            Self::String(_) => ValueType::String,
            Self::Function(_) => ValueType::Function,
            Self::List(_) => ValueType::List,
            Self::Null => ValueType::Null,
            Self::Error(_) => ValueType::Error,
        }
    }

    /// Returns the number if the value is a [`Value::Number`].
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the tensor if the value is a [`Value::Tensor`].
    #[must_use]
    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Self::Tensor(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the error if the value is a [`Value::Error`].
    #[must_use]
    pub fn as_error(&self) -> Option<&RuntimeError> {
        match self {
            Self::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the value is a [`Value::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Renders the value prefixed with its type, as in `[NUMBER] 3`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("[{}] {self}", self.value_type())
    }
}

/// Addresses of the lists and cells currently being displayed.
pub(crate) type Visiting = Vec<*const ()>;

impl PartialEq for Value {
    /// Structural equality for data, identity for functions.
    ///
    /// Lists that contain themselves compare equal when their structure
    /// matches.
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

impl Value {
    /// `==` with the pairs of lists already being compared further up.
    fn equals(&self, other: &Self, comparing: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Tensor(a), Self::Tensor(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => {
                let pair = (Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>());
                if Rc::ptr_eq(a, b) || comparing.contains(&pair) {
                    return true;
                }

                comparing.push(pair);
                let (a, b) = (a.borrow(), b.borrow());
                let equal = a.len() == b.len()
                            && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y, comparing));
                comparing.pop();
                equal
            },
            (Self::Null, Self::Null) => true,
            (Self::Error(a), Self::Error(b)) => a == b,
            _ => false,
        }
    }

    /// Writes the value, printing a list or captured cell that is already
    /// being written as `...`.
    pub(crate) fn write(&self, f: &mut fmt::Formatter<'_>, visiting: &mut Visiting) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Tensor(t) => write!(f, "{t}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Function(func) => func.write(f, visiting),
            Self::List(items) => {
                let address = Rc::as_ptr(items).cast::<()>();
                if visiting.contains(&address) {
                    return write!(f, "<...>");
                }

                visiting.push(address);
                let result = write_list(&items.borrow(), f, visiting);
                visiting.pop();
                result
            },
            Self::Null => write!(f, "{{}}"),
            Self::Error(e) => write!(f, "{e}"),
        }
    }
}

fn write_list(items: &[Value], f: &mut fmt::Formatter<'_>, visiting: &mut Visiting) -> fmt::Result {
    write!(f, "<")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            writeln!(f, ",")?;
        }
        item.write(f, visiting)?;
    }
    write!(f, ">")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Tensor(t) => f.debug_tuple("Tensor").field(t).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Function(func) => f.debug_tuple("Function").field(&func.name).finish(),
            Self::List(_) => f.debug_tuple("List").field(&format_args!("{self}")).finish(),
            Self::Null => f.write_str("Null"),
            Self::Error(e) => f.debug_tuple("Error").field(e).finish(),
        }
    }
}
