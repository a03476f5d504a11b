use std::rc::Rc;

use crate::{
    ast::{Node, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::Value,
            tensor::{Tensor, shape_string, strides_of},
        },
    },
    util::num::{f64_to_index, format_number},
};

const SELECTOR_MESSAGE: &str = "only numbers, lists of numbers, or lists of vectors can be used as indices. Note that this doesn't include vectors, as they can be misconstrued as a list of numbers. You will need to wrap your vector in a list";

/// The cells picked out of a tensor by a sequence of selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Flat offset of the first cell of every selected block, in selector
    /// order.
    pub offsets:   Vec<usize>,
    /// The dimensions no selector consumed. Each offset starts a block of
    /// this shape; an empty shape means single cells.
    pub remaining: Vec<usize>,
}

impl Selection {
    /// Number of cells in each selected block.
    #[must_use]
    pub fn block_len(&self) -> usize {
        self.remaining.iter().product()
    }
}

/// Resolves index selectors against a tensor shape.
///
/// Selectors consume dimensions left to right:
/// - a number picks one position along the next dimension;
/// - a vector of numbers picks several positions along the next dimension;
/// - a matrix picks one point per row, each row giving coordinates along as
///   many dimensions as it is long.
///
/// Every selector after the first repeats the offsets found so far once per
/// position it picks, so the number of offsets is the product of the number
/// of positions each selector picks.
///
/// `text` is the source of the indexing expression, used in messages.
///
/// # Errors
/// - [`RuntimeError::IndexOutOfBounds`] for negative, fractional or too large
///   indices.
/// - [`RuntimeError::ShapeMismatch`] when the selectors need more dimensions
///   than the tensor has.
/// - [`RuntimeError::TypeMismatch`] for selectors that are not numbers,
///   vectors or matrices.
///
/// # Example
/// ```
/// use tensorpad::{
///     ast::Span,
///     interpreter::{evaluator::index::select, value::{core::Value, tensor::Tensor}},
/// };
///
/// let points = Tensor::new(vec![2, 2], vec![0.0, 0.0, 1.0, 1.0]).unwrap();
/// let selection = select(&[2, 2], &[Value::from(points)], "x[..]", Span::default()).unwrap();
///
/// assert_eq!(selection.offsets, vec![0, 3]);
/// assert!(selection.remaining.is_empty());
/// ```
pub fn select(shape: &[usize],
              selectors: &[Value],
              text: &str,
              span: Span)
              -> EvalResult<Selection> {
    let strides = strides_of(shape);
    let mut offsets = vec![0_usize];
    let mut dim = 0;

    let too_many = || {
        RuntimeError::shape_mismatch(format!("the indexing part of {text} has too many dimensions"),
                                     span)
    };
    let position = |value: f64, dim: usize| {
        f64_to_index(value).filter(|&i| i < shape[dim]).ok_or_else(|| {
                                                            RuntimeError::out_of_bounds(format!("index {} in {text} was out of bounds",
                                                                                                format_number(value)),
                                                                                        span)
                                                        })
    };

    for selector in selectors {
        match selector {
            Value::Number(n) => {
                if dim >= shape.len() {
                    return Err(too_many());
                }
                let step = strides[dim] * position(*n, dim)?;
                for offset in &mut offsets {
                    *offset += step;
                }
                dim += 1;
            },
            Value::Tensor(t) if t.rank() == 1 => {
                if dim >= shape.len() {
                    return Err(too_many());
                }
                let mut expanded = Vec::with_capacity(offsets.len() * t.len());
                for &value in t.data() {
                    let step = strides[dim] * position(value, dim)?;
                    expanded.extend(offsets.iter().map(|offset| offset + step));
                }
                offsets = expanded;
                dim += 1;
            },
            Value::Tensor(t) if t.rank() == 2 => {
                let width = t.shape()[1];
                if dim + width > shape.len() {
                    return Err(too_many());
                }
                let mut expanded = Vec::with_capacity(offsets.len() * t.shape()[0]);
                for point in t.data().chunks(width) {
                    let mut step = 0;
                    for (k, &coordinate) in point.iter().enumerate() {
                        step += strides[dim + k] * position(coordinate, dim + k)?;
                    }
                    expanded.extend(offsets.iter().map(|offset| offset + step));
                }
                offsets = expanded;
                dim += width;
            },
            Value::Tensor(_) => return Err(RuntimeError::type_mismatch(SELECTOR_MESSAGE, span)),
            other => {
                return Err(RuntimeError::type_mismatch(format!("the type {} cannot be used as an index",
                                                               other.value_type()),
                                                       span));
            },
        }
    }

    Ok(Selection { offsets,
                   remaining: shape[dim..].to_vec() })
}

/// Reads the selected part of a tensor or list.
///
/// For tensors, selecting single cells yields a number when exactly one cell
/// was picked and a vector otherwise. Selecting blocks yields the block when
/// one was picked, or a tensor of shape `[count, ...block]` stacking them in
/// selector order.
///
/// Lists accept a single number index.
///
/// # Errors
/// Everything [`select`] reports, plus type errors for values that cannot be
/// indexed and nested list indexing.
pub fn read_index(value: &Value, selectors: &[Value], text: &str, span: Span) -> EvalResult<Value> {
    match value {
        Value::Tensor(tensor) => {
            let selection = select(tensor.shape(), selectors, text, span)?;
            let block = selection.block_len();
            let data = tensor.data();

            let mut values = Vec::with_capacity(selection.offsets.len() * block);
            for &offset in &selection.offsets {
                values.extend_from_slice(&data[offset..offset + block]);
            }

            let shape = match (selection.offsets.len(), selection.remaining.is_empty()) {
                (1, true) => return Ok(Value::Number(values[0])),
                (count, true) => vec![count],
                (1, false) => selection.remaining,
                (count, false) => std::iter::once(count).chain(selection.remaining).collect(),
            };

            Tensor::new(shape, values).map(Value::from)
                                      .ok_or_else(|| RuntimeError::type_mismatch(SELECTOR_MESSAGE, span))
        },
        Value::List(items) => {
            let items = items.borrow();
            let index = list_position(selectors, items.len(), text, span)?;
            Ok(items[index].clone())
        },
        other => Err(not_indexable(other, span)),
    }
}

/// Writes `rhs` into the selected part of a tensor or list.
///
/// A shared tensor is copied before the write, so other variables holding
/// the same tensor keep their values. Lists are written in place.
///
/// For tensors, a number is written to every selected cell. A tensor on the
/// right must either have one element per selected cell, when the selectors
/// consume every dimension, or have the shape of the remaining dimensions,
/// in which case it is written to every selected block.
///
/// # Errors
/// Everything [`select`] reports, plus mismatches between `rhs` and the
/// selection.
pub fn write_index(target: &mut Value,
                   selectors: &[Value],
                   rhs: &Value,
                   text: &str,
                   span: Span)
                   -> EvalResult<()> {
    match target {
        Value::Tensor(tensor) => {
            let selection = select(tensor.shape(), selectors, text, span)?;
            let block = selection.block_len();
            let data = Rc::make_mut(tensor).data_mut();

            match rhs {
                Value::Number(n) => {
                    for &offset in &selection.offsets {
                        data[offset..offset + block].fill(*n);
                    }
                },
                Value::Tensor(values) if selection.remaining.is_empty() => {
                    if values.len() != selection.offsets.len() {
                        return Err(RuntimeError::shape_mismatch(format!("rhs of {text} needs the same number of elements as indices ({}), instead {} were provided",
                                                                        selection.offsets.len(),
                                                                        values.len()),
                                                                span));
                    }
                    for (&offset, &value) in selection.offsets.iter().zip(values.data()) {
                        data[offset] = value;
                    }
                },
                Value::Tensor(values) => {
                    if values.shape() != selection.remaining.as_slice() {
                        return Err(RuntimeError::shape_mismatch(format!("rhs must be a tensor with shape {}",
                                                                        shape_string(&selection.remaining)),
                                                                span));
                    }
                    for &offset in &selection.offsets {
                        data[offset..offset + block].copy_from_slice(values.data());
                    }
                },
                _ => return Err(RuntimeError::type_mismatch("rhs must be a number or tensor", span)),
            }
            Ok(())
        },
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let index = list_position(selectors, items.len(), text, span)?;
            items[index] = rhs.clone();
            Ok(())
        },
        other => Err(not_indexable(other, span)),
    }
}

/// Resolves the single number index a list accepts.
fn list_position(selectors: &[Value], len: usize, text: &str, span: Span) -> EvalResult<usize> {
    match selectors {
        [Value::Number(n)] => f64_to_index(*n).filter(|&i| i < len).ok_or_else(|| {
                                                   RuntimeError::out_of_bounds(format!("index {} in {text} was out of bounds",
                                                                                       format_number(*n)),
                                                                               span)
                                               }),
        [other] => Err(RuntimeError::type_mismatch(format!("lists can only be indexed by a NUMBER, not {}",
                                                           other.value_type()),
                                                   span)),
        _ => Err(RuntimeError::type_mismatch("can't index thing inside a thing yet", span)),
    }
}

fn not_indexable(value: &Value, span: Span) -> RuntimeError {
    RuntimeError::type_mismatch(format!("the type {} cannot be indexed yet", value.value_type()),
                                span)
}

impl Context {
    /// Evaluates `target[i][j]...`.
    ///
    /// The target is evaluated first and must be a tensor or a list; the
    /// selectors are evaluated afterwards, left to right.
    pub(crate) fn eval_indexation(&mut self,
                                  node: &Node,
                                  target: &Node,
                                  indexes: &[Node])
                                  -> EvalResult<Value> {
        let value = self.eval(target)?;
        if !matches!(value, Value::Tensor(_) | Value::List(_)) {
            return Err(not_indexable(&value, node.span));
        }

        let selectors = self.eval_all(indexes)?;
        read_index(&value, &selectors, self.text(node.span), node.span)
    }
}
