use crate::{
    ast::Span,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            utils::{expect_number, expect_tensor, positive_count},
        },
        value::{core::Value, tensor::Tensor},
    },
    util::num::usize_to_f64,
};

/// `T(d1, d2, ...)`: a tensor of zeros with the given dimensions.
///
/// # Example
/// ```
/// use tensorpad::{
///     ast::Span,
///     interpreter::{evaluator::function::tensor::zeros, value::core::Value},
/// };
///
/// let t = zeros(&[Value::Number(2.0), Value::Number(3.0)], Span::default()).unwrap();
/// assert_eq!(t.to_string(), "shape: 2x3, data: [[0, 0, 0],\n [0, 0, 0]]");
///
/// assert!(zeros(&[Value::Number(0.0)], Span::default()).is_err());
/// ```
pub fn zeros(args: &[Value], span: Span) -> EvalResult<Value> {
    let shape = (0..args.len()).map(|i| {
                                   let dim = expect_number(args, i, "T", span)?;
                                   positive_count(dim, "a tensor dimension", span)
                               })
                               .collect::<EvalResult<Vec<_>>>()?;

    Tensor::zeros(shape).map(Value::from).ok_or_else(|| {
                                              RuntimeError::invalid_argument("that tensor is too large",
                                                                             span)
                                          })
}

/// `I(n)`: the `n`×`n` identity matrix.
pub fn identity(args: &[Value], span: Span) -> EvalResult<Value> {
    let n = positive_count(expect_number(args, 0, "I", span)?, "the size of a matrix", span)?;

    Tensor::identity(n).map(Value::from).ok_or_else(|| {
                                             RuntimeError::invalid_argument("that matrix is too large",
                                                                            span)
                                         })
}

/// `toVec(list)`: turns a list into a tensor.
///
/// A list of numbers becomes a vector. A list of tensors that all have the
/// same shape becomes a tensor with one more dimension, stacking them in
/// order.
///
/// # Example
/// ```
/// use tensorpad::{
///     ast::Span,
///     interpreter::{
///         evaluator::function::tensor::to_vec,
///         value::{core::Value, tensor::Tensor},
///     },
/// };
///
/// let list = Value::from(vec![Value::Number(1.0), Value::Number(2.0)]);
/// let v = to_vec(&[list], Span::default()).unwrap();
/// assert_eq!(v, Value::from(Tensor::vector(vec![1.0, 2.0]).unwrap()));
/// ```
pub fn to_vec(args: &[Value], span: Span) -> EvalResult<Value> {
    let Some(Value::List(items)) = args.first() else {
        let found = args.first().map_or_else(|| "NULL".to_string(), |v| v.value_type().to_string());
        return Err(RuntimeError::type_mismatch(format!("Argument 0 to function toVec was of type {found}, but it wants LIST"),
                                               span));
    };
    let items = items.borrow();

    let mut element_shape: Option<&[usize]> = None;
    let mut data = Vec::new();
    for item in items.iter() {
        let (shape, values): (&[usize], &[f64]) = match item {
            Value::Number(n) => (&[], std::slice::from_ref(n)),
            Value::Tensor(t) => (t.shape(), t.data()),
            other => {
                return Err(RuntimeError::type_mismatch(format!("all items in the list must be of type NUMBER or TENSOR, found {}",
                                                               other.value_type()),
                                                       span));
            },
        };

        match element_shape {
            Some(expected) if expected != shape => {
                return Err(RuntimeError::shape_mismatch("all items in the list must have the same shape",
                                                        span));
            },
            Some(_) => {},
            None => element_shape = Some(shape),
        }
        data.extend_from_slice(values);
    }

    let mut shape = vec![items.len()];
    shape.extend_from_slice(element_shape.unwrap_or_default());

    Tensor::new(shape, data).map(Value::from)
                            .ok_or_else(|| RuntimeError::invalid_argument("can't have a zero-length vector", span))
}

/// `len(x)`: the number of items of a list, the first dimension of a
/// tensor, or the number of characters of a string.
pub fn len(args: &[Value], span: Span) -> EvalResult<Value> {
    let len = match args.first() {
        Some(Value::List(items)) => items.borrow().len(),
        Some(Value::Tensor(t)) => t.shape()[0],
        Some(Value::String(s)) => s.chars().count(),
        other => {
            let found = other.map_or_else(|| "NULL".to_string(), |v| v.value_type().to_string());
            return Err(RuntimeError::type_mismatch(format!("can't take the length of type {found}"),
                                                   span));
        },
    };

    Ok(Value::Number(usize_to_f64(len)))
}

/// `dot(a, b)`: the sum of the elementwise products of two tensors of the
/// same shape.
pub fn dot(args: &[Value], span: Span) -> EvalResult<Value> {
    let a = expect_tensor(args, 0, "dot", span)?;
    let b = expect_tensor(args, 1, "dot", span)?;

    if a.shape() != b.shape() {
        return Err(RuntimeError::shape_mismatch("two tensors must have the same shape for a dot product",
                                                span));
    }

    Ok(Value::Number(a.data().iter().zip(b.data()).map(|(x, y)| x * y).sum()))
}
