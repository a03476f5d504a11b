use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::{AssignOperator, Node, NodeKind, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            capture::free_variables,
            core::{Context, EvalResult},
            function::core::is_builtin,
            index::{read_index, write_index},
        },
        value::{core::Value, function::Function},
    },
};

const BUILTIN_NAME_MESSAGE: &str = "a builtin function already exists with this name";

impl Context {
    /// Evaluates `target op value`.
    ///
    /// The target decides what is assigned:
    /// - an identifier binds or updates a variable;
    /// - an indexed identifier writes into the tensor or list it holds;
    /// - a call expression `name(params)` defines a function.
    ///
    /// The result is the value that was stored.
    pub(crate) fn eval_assignment(&mut self,
                                  node: &Node,
                                  target: &Node,
                                  op: AssignOperator,
                                  value: &Node)
                                  -> EvalResult<Value> {
        match &target.kind {
            NodeKind::Identifier(name) => self.assign_variable(node, name, op, value),
            NodeKind::Indexation { target: indexed,
                                   indexes, } => self.assign_index(node, indexed, indexes, op, value),
            NodeKind::FunctionCall { name, args, .. } => {
                self.define_function(node, name, args, op, value)
            },
            NodeKind::BuiltinConstant(constant) => {
                Err(RuntimeError::invalid_lvalue(format!("{constant} is a builtin constant and can't be assigned to"),
                                                 target.span))
            },
            _ => Err(RuntimeError::invalid_lvalue(format!("can't assign to lhs type {}",
                                                          target.kind_name()),
                                                  target.span)),
        }
    }

    /// Stores a value under `name` according to `op`.
    fn store(&mut self, node: &Node, name: &str, op: AssignOperator, value: Value) -> EvalResult<Value> {
        let value = match op.binary() {
            Some(binary) => {
                let current = self.eval_identifier(name, node.span)?;
                Self::eval_binary(binary, &current, &value, node.span)?
            },
            None => value,
        };

        if op == AssignOperator::Declare {
            self.scopes
                .declare(name, value.clone())
                .map_err(|existing| RuntimeError::RedeclaredVariable { name:     name.to_string(),
                                                                      existing: existing.to_string(),
                                                                      span:     node.span, })?;
        } else if !self.scopes.set(name, value.clone()) {
            return Err(RuntimeError::UndeclaredVariable { name: name.to_string(),
                                                          span: node.span, });
        }

        Ok(value)
    }

    fn assign_variable(&mut self,
                       node: &Node,
                       name: &str,
                       op: AssignOperator,
                       value: &Node)
                       -> EvalResult<Value> {
        if is_builtin(name) {
            return Err(RuntimeError::invalid_lvalue(BUILTIN_NAME_MESSAGE, node.span));
        }

        let rhs = self.eval(value)?;
        self.store(node, name, op, rhs)
    }

    /// Writes into part of an existing tensor or list, as in `x[0][1] = 2`.
    fn assign_index(&mut self,
                    node: &Node,
                    indexed: &Node,
                    indexes: &[Node],
                    op: AssignOperator,
                    value: &Node)
                    -> EvalResult<Value> {
        if op == AssignOperator::Declare {
            return Err(RuntimeError::invalid_lvalue(format!("{} - can't declare a new variable inside a thing, doesn't make sense conceptually (hint: just use '=')",
                                                            self.text(node.span)),
                                                    node.span));
        }
        let Some(name) = indexed.as_identifier() else {
            return Err(RuntimeError::invalid_lvalue(format!("can't assign to lhs type {}",
                                                            indexed.kind_name()),
                                                    indexed.span));
        };
        if is_builtin(name) {
            return Err(RuntimeError::invalid_lvalue(BUILTIN_NAME_MESSAGE, node.span));
        }

        let rhs = self.eval(value)?;
        let selectors = self.eval_all(indexes)?;
        let cell = self.scopes
                       .lookup(name)
                       .cloned()
                       .ok_or_else(|| RuntimeError::UndeclaredVariable { name: name.to_string(),
                                                                         span: indexed.span, })?;
        let text = self.text(node.span).to_string();

        let mut current = cell.borrow_mut();
        let stored = match op.binary() {
            Some(binary) => {
                let existing = read_index(&current, &selectors, &text, node.span)?;
                Self::eval_binary(binary, &existing, &rhs, node.span)?
            },
            None => rhs,
        };
        write_index(&mut current, &selectors, &stored, &text, node.span)?;

        Ok(stored)
    }

    /// Defines a user function from `name(params) := body`.
    ///
    /// The free variables of the body are bound to the cells currently
    /// visible under their names, so the function and its defining scope
    /// share them. Free variables nothing declares yet are left out and
    /// resolved when the function runs.
    fn define_function(&mut self,
                       node: &Node,
                       name: &str,
                       args: &[Node],
                       op: AssignOperator,
                       value: &Node)
                       -> EvalResult<Value> {
        let params = args.iter()
                         .map(|arg| {
                             arg.as_identifier().map(str::to_string).ok_or_else(|| {
                                 RuntimeError::invalid_lvalue(format!("declaration of function {name} accepts an invalid variable: '{}' (hint: variable names have no spaces or punctuation, and don't start with numbers)",
                                                                      self.text(arg.span)),
                                                              arg.span)
                             })
                         })
                         .collect::<EvalResult<Vec<_>>>()?;

        if is_builtin(name) {
            return Err(RuntimeError::invalid_lvalue(BUILTIN_NAME_MESSAGE, node.span));
        }
        if op.binary().is_some() {
            return Err(RuntimeError::invalid_lvalue(format!("functions can only be defined with := or =, not {op}"),
                                                    node.span));
        }

        let body = match &value.kind {
            NodeKind::Block { .. } => value.clone(),
            _ => {
                let line = self.source
                               .get(..value.span.start)
                               .map_or(0, |before| before.matches('\n').count());
                let statement = Statement { node: value.clone(),
                                            show: true,
                                            line };
                Node::new(NodeKind::Block { statements: vec![statement] }, value.span)
            },
        };

        let captures = free_variables(&params, value).into_iter()
                                                     .filter_map(|free| {
                                                         let cell = self.scopes.lookup(&free)?;
                                                         Some((free, Rc::clone(cell)))
                                                     })
                                                     .collect::<Vec<_>>();

        debug!(function = name,
               params = ?params,
               captures = ?captures.iter().map(|(name, _)| name).collect::<Vec<_>>(),
               "defined function");

        let function = Function { name: name.to_string(),
                                  params,
                                  captures,
                                  body: Rc::new(body),
                                  text: self.text(node.span).to_string(),
                                  source: Rc::clone(&self.source) };

        self.store(node, name, op, Value::from(function))
    }
}
