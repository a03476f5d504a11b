use crate::{
    ast::Span,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::Value,
            tensor::{MAX_ELEMENTS, Tensor},
        },
    },
};

impl Context {
    /// Evaluates the `**` operator on two tensors.
    ///
    /// # Shape rules
    /// - `[n] ** [n]` is the dot product, a number.
    /// - `[n] ** [n, m]` treats the left vector as a row and yields `[m]`.
    /// - `[n, m] ** [m]` treats the right vector as a column and yields `[n]`.
    /// - `[n, m] ** [m, k]` yields `[n, k]`.
    ///
    /// # Errors
    /// - [`RuntimeError::ShapeMismatch`] for tensors of rank 3 or more, and
    ///   when the inner dimensions differ.
    /// - [`RuntimeError::InvalidArgument`] when the product would have more
    ///   than [`MAX_ELEMENTS`] elements.
    ///
    /// # Example
    /// ```
    /// use tensorpad::{
    ///     ast::Span,
    ///     interpreter::{
    ///         evaluator::core::Context,
    ///         value::{core::Value, tensor::Tensor},
    ///     },
    /// };
    ///
    /// let a = Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// let v = Tensor::vector(vec![1.0, 1.0]).unwrap();
    ///
    /// let product = Context::eval_matmul(&a, &v, Span::default()).unwrap();
    /// assert_eq!(product, Value::from(Tensor::vector(vec![3.0, 7.0]).unwrap()));
    /// ```
    pub fn eval_matmul(left: &Tensor, right: &Tensor, span: Span) -> EvalResult<Value> {
        if let ([n], [m]) = (left.shape(), right.shape()) {
            if n != m {
                return Err(inner_mismatch(*n, *m, span));
            }
            let dot = left.data()
                          .iter()
                          .zip(right.data())
                          .map(|(a, b)| a * b)
                          .sum();
            return Ok(Value::Number(dot));
        }

        let (Some((a_h, a_w)), Some((b_h, b_w))) = (as_matrix(left, false), as_matrix(right, true))
        else {
            return Err(RuntimeError::shape_mismatch("matrix multiplication only works with matrices/vectors for now",
                                                    span));
        };

        if a_w != b_h {
            return Err(inner_mismatch(a_w, b_h, span));
        }

        let len = a_h.checked_mul(b_w)
                     .filter(|&len| len <= MAX_ELEMENTS)
                     .ok_or_else(|| RuntimeError::invalid_argument("that tensor is too large", span))?;

        let (a, b) = (left.data(), right.data());
        let mut data = vec![0.0; len];
        for row in 0..a_h {
            for col in 0..b_w {
                data[row * b_w + col] = (0..a_w).map(|k| a[row * a_w + k] * b[k * b_w + col])
                                                .sum();
            }
        }

        let shape = match (left.rank(), right.rank()) {
            (1, _) => vec![b_w],
            (_, 1) => vec![a_h],
            _ => vec![a_h, b_w],
        };

        Tensor::new(shape, data).map(Value::from)
                                .ok_or_else(|| inner_mismatch(a_w, b_h, span))
    }
}

/// Views a tensor as a matrix. A vector becomes a column when `column` is
/// set and a row otherwise.
fn as_matrix(tensor: &Tensor, column: bool) -> Option<(usize, usize)> {
    match tensor.shape() {
        [n] if column => Some((*n, 1)),
        [n] => Some((1, *n)),
        [h, w] => Some((*h, *w)),
        _ => None,
    }
}

fn inner_mismatch(columns: usize, rows: usize, span: Span) -> RuntimeError {
    RuntimeError::shape_mismatch(format!("second matrix row count ({rows}) must equal first matrix column count {columns}"),
                                 span)
}
