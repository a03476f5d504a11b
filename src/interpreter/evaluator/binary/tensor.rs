use crate::{
    ast::{BinaryOperator, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::scalar::apply_scalar,
            core::{Context, EvalResult},
        },
        value::tensor::Tensor,
    },
};

impl Context {
    /// Applies `op` elementwise to two tensors.
    ///
    /// The right operand is broadcast over the left one: it is applied once
    /// per block of the left tensor's trailing dimensions that match its
    /// shape. A single-element vector on the right is applied to every
    /// element of a vector on the left. The result always has the left
    /// operand's shape.
    ///
    /// # Errors
    /// [`RuntimeError::ShapeMismatch`] listing both shapes when neither rule
    /// applies.
    pub fn eval_elementwise(op: BinaryOperator,
                            left: &Tensor,
                            right: &Tensor,
                            span: Span)
                            -> EvalResult<Tensor> {
        let stride = broadcast_stride(left.shape(), right.shape()).ok_or_else(|| {
                         RuntimeError::shape_mismatch(format!("wrong sizes: [{}], [{}]",
                                                              join(left.shape()),
                                                              join(right.shape())),
                                                      span)
                     })?;

        let mut result = left.clone();
        let data = result.data_mut();

        for block in data.chunks_mut(stride) {
            for (cell, &b) in block.iter_mut().zip(right.data()) {
                *cell = apply_scalar(op, *cell, b).ok_or_else(|| {
                            RuntimeError::type_mismatch(format!("the operation TENSOR {op} TENSOR doesn't exist yet"),
                                                        span)
                        })?;
            }
        }

        Ok(result)
    }
}

/// How far apart consecutive applications of the right operand are.
///
/// # Returns
/// `None` when the shapes cannot be broadcast together.
///
/// # Example
/// ```
/// use tensorpad::interpreter::evaluator::binary::tensor::broadcast_stride;
///
/// assert_eq!(broadcast_stride(&[2, 3], &[3]), Some(3));
/// assert_eq!(broadcast_stride(&[4], &[1]), Some(1));
/// assert_eq!(broadcast_stride(&[2, 3], &[2]), None);
/// ```
#[must_use]
pub fn broadcast_stride(left: &[usize], right: &[usize]) -> Option<usize> {
    if let ([_], [1]) = (left, right) {
        return Some(1);
    }

    let offset = left.len().checked_sub(right.len())?;
    (left[offset..] == *right).then(|| right.iter().product())
}

fn join(shape: &[usize]) -> String {
    shape.iter()
         .map(ToString::to_string)
         .collect::<Vec<_>>()
         .join(",")
}
