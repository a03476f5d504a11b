use std::fmt;

use crate::util::num::format_number;

/// Most elements a tensor built from a requested shape may have, 1 GiB of
/// data.
pub const MAX_ELEMENTS: usize = 1 << 27;

/// An N-dimensional array of numbers.
///
/// Data is stored flat in row-major order. The fields are private so that
/// `data.len() == shape.iter().product()` and "every dimension is positive"
/// hold for every tensor that exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data:  Vec<f64>,
}

impl Tensor {
    /// Builds a tensor, checking the shape against the data.
    ///
    /// # Returns
    /// `None` if the shape is empty, has a zero dimension, or does not match
    /// the data length.
    ///
    /// # Example
    /// ```
    /// use tensorpad::interpreter::value::tensor::Tensor;
    ///
    /// assert!(Tensor::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).is_some());
    /// assert!(Tensor::new(vec![2, 2], vec![1.0]).is_none());
    /// assert!(Tensor::new(vec![0], vec![]).is_none());
    /// ```
    #[must_use]
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Option<Self> {
        let valid = !shape.is_empty()
                    && shape.iter().all(|&dim| dim > 0)
                    && shape.iter().product::<usize>() == data.len();

        valid.then_some(Self { shape, data })
    }

    /// A rank-1 tensor holding `data`. `None` when `data` is empty.
    #[must_use]
    pub fn vector(data: Vec<f64>) -> Option<Self> {
        Self::new(vec![data.len()], data)
    }

    /// A tensor of the given shape filled with zeros.
    ///
    /// `None` for shapes [`Tensor::new`] rejects and for shapes with more
    /// than [`MAX_ELEMENTS`] elements.
    ///
    /// # Example
    /// ```
    /// use tensorpad::interpreter::value::tensor::Tensor;
    ///
    /// assert_eq!(Tensor::zeros(vec![2, 3]).unwrap().len(), 6);
    /// assert!(Tensor::zeros(vec![3_000_000_000, 3_000_000_000]).is_none());
    /// ```
    #[must_use]
    pub fn zeros(shape: Vec<usize>) -> Option<Self> {
        let len = shape.iter()
                       .try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
                       .filter(|&len| len <= MAX_ELEMENTS)?;
        Self::new(shape, vec![0.0; len])
    }

    /// The `n`×`n` identity matrix.
    ///
    /// # Example
    /// ```
    /// use tensorpad::interpreter::value::tensor::Tensor;
    ///
    /// let id = Tensor::identity(2).unwrap();
    /// assert_eq!(id.shape(), &[2, 2]);
    /// assert_eq!(id.data(), &[1.0, 0.0, 0.0, 1.0]);
    /// ```
    #[must_use]
    pub fn identity(n: usize) -> Option<Self> {
        let mut tensor = Self::zeros(vec![n, n])?;
        for i in 0..n {
            tensor.data[i * n + i] = 1.0;
        }
        Some(tensor)
    }

    /// The dimensions, outermost first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The flat row-major data.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the data. The shape cannot change through this.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Number of dimensions.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`; tensors cannot be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major strides: the innermost stride is 1 and each outer stride is
    /// the product of the dimensions inside it.
    ///
    /// # Example
    /// ```
    /// use tensorpad::interpreter::value::tensor::Tensor;
    ///
    /// let t = Tensor::zeros(vec![2, 3, 4]).unwrap();
    /// assert_eq!(t.strides(), vec![12, 4, 1]);
    /// ```
    #[must_use]
    pub fn strides(&self) -> Vec<usize> {
        strides_of(&self.shape)
    }

    /// Applies `f` to every element.
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self { shape: self.shape.clone(),
               data:  self.data.iter().copied().map(f).collect(), }
    }

    /// The shape written as `AxBxC`.
    #[must_use]
    pub fn shape_string(&self) -> String {
        shape_string(&self.shape)
    }
}

/// Row-major strides of `shape`.
#[must_use]
pub fn strides_of(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Writes a shape as `AxBxC`.
#[must_use]
pub fn shape_string(shape: &[usize]) -> String {
    shape.iter()
         .map(ToString::to_string)
         .collect::<Vec<_>>()
         .join("x")
}

/// Writes `data` nested according to `shape`.
fn write_nested(f: &mut fmt::Formatter<'_>, shape: &[usize], data: &[f64]) -> fmt::Result {
    let Some((&outer, inner)) = shape.split_first() else {
        return write!(f, "{}", data.first().copied().map_or_else(String::new, format_number));
    };

    let chunk = inner.iter().product::<usize>().max(1);
    let separator = if inner.is_empty() { ", " } else { ",\n " };

    write!(f, "[")?;
    for (i, part) in data.chunks(chunk).take(outer).enumerate() {
        if i > 0 {
            write!(f, "{separator}")?;
        }
        write_nested(f, inner, part)?;
    }
    write!(f, "]")
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape: {}, data: ", self.shape_string())?;
        write_nested(f, &self.shape, &self.data)
    }
}
