use crate::{
    ast::{BinaryOperator, Node, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::scalar::apply_scalar,
            core::{Context, EvalResult},
        },
        value::core::{Value, ValueType},
    },
};

impl Context {
    /// Evaluates an operator chain such as `a + b - c` left to right.
    ///
    /// The first operand or operation that fails ends the chain with that
    /// error. Operation errors are attributed to the span from the first
    /// operand to the operand that failed.
    pub(crate) fn eval_chain(&mut self,
                             first: &Node,
                             rest: &[(BinaryOperator, Node)])
                             -> EvalResult<Value> {
        let mut accumulated = self.eval(first)?;

        for (op, operand) in rest {
            let right = self.eval(operand)?;
            accumulated = Self::eval_binary(*op, &accumulated, &right, first.span.to(operand.span))?;
        }

        Ok(accumulated)
    }

    /// Evaluates a binary operation between two values.
    ///
    /// The operation is chosen by the pair of operand types:
    /// - Number and Number: arithmetic and comparisons, see
    ///   [`apply_scalar`].
    /// - Tensor and Tensor: `**` multiplies matrices, every other operator is
    ///   applied elementwise with broadcasting.
    /// - String and String: `+` concatenates.
    /// - List and anything: `+` appends the right operand to the list in place
    ///   and returns the same list.
    ///
    /// Any other pair is a type mismatch naming both types and the operator.
    ///
    /// # Example
    /// ```
    /// use tensorpad::{
    ///     ast::{BinaryOperator, Span},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let sum = Context::eval_binary(BinaryOperator::Add,
    ///                                &Value::Number(3.0),
    ///                                &Value::Number(4.0),
    ///                                Span::default());
    /// assert_eq!(sum.unwrap(), Value::Number(7.0));
    ///
    /// let err = Context::eval_binary(BinaryOperator::Add,
    ///                                &Value::Number(1.0),
    ///                                &Value::from("a"),
    ///                                Span::default());
    /// assert_eq!(err.unwrap_err().to_string(),
    ///            "the operation NUMBER + STRING doesn't exist yet");
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       span: Span)
                       -> EvalResult<Value> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => {
                apply_scalar(op, *a, *b).map(Value::Number)
                                        .ok_or_else(|| unsupported(op, left, right, span))
            },
            (Value::Tensor(a), Value::Tensor(b)) => match op {
                BinaryOperator::MatMul => Self::eval_matmul(a, b, span),
                _ => Self::eval_elementwise(op, a, b, span).map(Value::from),
            },
            (Value::String(a), Value::String(b)) if op == BinaryOperator::Add => {
                Ok(Value::from(format!("{a}{b}")))
            },
            (Value::List(items), _) if op == BinaryOperator::Add => {
                items.borrow_mut().push(right.clone());
                Ok(left.clone())
            },
            _ => Err(unsupported(op, left, right, span)),
        }
    }
}

/// Builds the error for an operator that has no meaning for a pair of types.
fn unsupported(op: BinaryOperator, left: &Value, right: &Value, span: Span) -> RuntimeError {
    let (l, r) = (left.value_type(), right.value_type());
    let hint = match (l, r) {
        (ValueType::Tensor, ValueType::Number) | (ValueType::Number, ValueType::Tensor) => {
            " (hint: for now you have to put [] around the number)"
        },
        _ => "",
    };

    RuntimeError::type_mismatch(format!("the operation {l} {op} {r} doesn't exist yet{hint}"), span)
}
