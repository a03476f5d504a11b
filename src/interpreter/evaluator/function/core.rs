use std::{fmt, rc::Rc};

use tracing::{trace, warn};

use crate::{
    ast::{Node, NodeKind, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{builtin, output, tensor},
        },
        value::{core::Value, function::Function},
    },
};

/// Handler of a builtin function.
///
/// Most builtins only look at their evaluated arguments. The output builtins
/// also need the context, to append their record, and the argument
/// expressions, so `print` can title a value with the variable it came from.
#[derive(Clone, Copy)]
pub enum BuiltinFn {
    /// `fn(args, span)`
    Pure(fn(&[Value], Span) -> EvalResult<Value>),
    /// `fn(context, args, arg_nodes, span)`
    Output(fn(&mut Context, &[Value], &[Node], Span) -> EvalResult<Value>),
}

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin is variadic with at least `n` arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a handler implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every builtin function. None of them can be assigned to.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "abs"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::abs) },
    "acos"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::acos) },
    "acosh" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::acosh) },
    "asin"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::asin) },
    "asinh" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::asinh) },
    "atan"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::atan) },
    "atanh" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::atanh) },
    "atan2" => { arity: Arity::Exact(2), func: BuiltinFn::Pure(builtin::atan2) },
    "ceil"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::ceil) },
    "cos"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::cos) },
    "cosh"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::cosh) },
    "exp"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::exp) },
    "floor" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::floor) },
    "hypot" => { arity: Arity::AtLeast(1), func: BuiltinFn::Pure(builtin::hypot) },
    "imul"  => { arity: Arity::Exact(2), func: BuiltinFn::Pure(builtin::imul) },
    "log"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::log) },
    "log1p" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::log1p) },
    "log10" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::log10) },
    "log2"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::log2) },
    "max"   => { arity: Arity::AtLeast(1), func: BuiltinFn::Pure(builtin::max) },
    "min"   => { arity: Arity::AtLeast(1), func: BuiltinFn::Pure(builtin::min) },
    "pow"   => { arity: Arity::Exact(2), func: BuiltinFn::Pure(builtin::pow) },
    "random" => { arity: Arity::AtLeast(0), func: BuiltinFn::Pure(builtin::random) },
    "round" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::round) },
    "sign"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::sign) },
    "sin"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::sin) },
    "sinh"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::sinh) },
    "sqrt"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::sqrt) },
    "tan"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::tan) },
    "tanh"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::tanh) },
    "trunc" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::trunc) },
    "lerp"  => { arity: Arity::Exact(3), func: BuiltinFn::Pure(builtin::lerp) },
    "toHm"  => { arity: Arity::Exact(1), func: BuiltinFn::Pure(builtin::to_hm) },
    "T"     => { arity: Arity::AtLeast(1), func: BuiltinFn::Pure(tensor::zeros) },
    "I"     => { arity: Arity::Exact(1), func: BuiltinFn::Pure(tensor::identity) },
    "toVec" => { arity: Arity::Exact(1), func: BuiltinFn::Pure(tensor::to_vec) },
    "len"   => { arity: Arity::Exact(1), func: BuiltinFn::Pure(tensor::len) },
    "dot"   => { arity: Arity::Exact(2), func: BuiltinFn::Pure(tensor::dot) },
    "print" => { arity: Arity::OneOf(&[1, 2]), func: BuiltinFn::Output(output::print) },
    "graph" => { arity: Arity::AtLeast(1), func: BuiltinFn::Output(output::graph) },
    "plot"  => { arity: Arity::AtLeast(1), func: BuiltinFn::Output(output::plot) },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::OneOf(counts) => {
                let counts = counts.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "{}", counts.join(" or "))
            },
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Whether `name` is a builtin function.
///
/// # Example
/// ```
/// use tensorpad::interpreter::evaluator::function::core::is_builtin;
///
/// assert!(is_builtin("sin"));
/// assert!(is_builtin("toVec"));
/// assert!(!is_builtin("fib"));
/// ```
#[must_use]
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&name)
}

impl Context {
    /// Evaluates a function call.
    ///
    /// Builtins take precedence: a builtin name is never looked up in the
    /// scopes. Otherwise the name must be bound to a user function taking
    /// exactly as many parameters as there are arguments.
    ///
    /// Arguments are evaluated left to right before the call; the first
    /// failing argument becomes the result.
    pub(crate) fn eval_function_call(&mut self,
                                     name: &str,
                                     args: &[Node],
                                     span: Span)
                                     -> EvalResult<Value> {
        if let Some(builtin) = BUILTIN_TABLE.iter().find(|b| b.name == name) {
            let values = self.eval_all(args)?;
            if !builtin.arity.check(values.len()) {
                return Err(RuntimeError::ArityMismatch { details: format!("function {name} takes {} arguments, {} were provided",
                                                                          builtin.arity,
                                                                          values.len()),
                                                         span });
            }
            trace!(function = name, args = values.len(), "calling builtin");

            return match builtin.func {
                BuiltinFn::Pure(func) => func(&values, span),
                BuiltinFn::Output(func) => func(self, &values, args, span),
            };
        }

        let function = match self.scopes.get(name) {
            Some(Value::Function(function)) => function,
            Some(_) => return Err(RuntimeError::NotCallable { name: name.to_string(),
                                                              span }),
            None => return Err(RuntimeError::UnknownFunction { name: name.to_string(),
                                                               span }),
        };

        if args.len() != function.arity() {
            return Err(RuntimeError::ArityMismatch { details: format!("user defined function {name} wants {} arguments, only {} were provided",
                                                                      function.arity(),
                                                                      args.len()),
                                                     span });
        }

        let values = self.eval_all(args)?;
        self.invoke(&function, values, span)
    }

    /// Calls a user function with already evaluated arguments.
    ///
    /// The call runs in a new frame holding the parameters and the captured
    /// cells. The body's statements run directly in that frame, and the
    /// value of the last one is the result.
    ///
    /// # Errors
    /// [`RuntimeError::RecursionLimitExceeded`] when the call would nest
    /// deeper than
    /// [`EvalOptions::max_call_depth`](crate::interpreter::evaluator::core::EvalOptions),
    /// and any error raised by the body.
    pub fn invoke(&mut self, function: &Rc<Function>, args: Vec<Value>, span: Span) -> EvalResult<Value> {
        let limit = self.options.max_call_depth;
        if self.depth >= limit {
            warn!(function = %function.name, limit, "call depth limit exceeded");
            return Err(RuntimeError::RecursionLimitExceeded { limit, span });
        }

        trace!(function = %function.name, depth = self.depth, "calling user function");

        self.depth += 1;
        let result = self.scoped(|ctx| {
                             let redeclared = |name: &str, existing: Value| {
                                 RuntimeError::RedeclaredVariable { name: name.to_string(),
                                                                    existing: existing.to_string(),
                                                                    span }
                             };

                             for (param, value) in function.params.iter().zip(args) {
                                 ctx.scopes
                                    .declare(param, value)
                                    .map_err(|existing| redeclared(param, existing))?;
                             }
                             for (name, cell) in &function.captures {
                                 ctx.scopes
                                    .install(name, Rc::clone(cell))
                                    .map_err(|existing| redeclared(name, existing))?;
                             }

                             match &function.body.kind {
                                 NodeKind::Block { statements } => ctx.eval_statements(statements),
                                 _ => ctx.eval(&function.body),
                             }
                         });
        self.depth -= 1;

        result
    }
}
