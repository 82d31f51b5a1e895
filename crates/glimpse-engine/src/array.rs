//! Owned N-d numeric buffers handed to textures.
//!
//! Layout is row-major. Only two element types reach the GPU: `u8` and `f32`.
//! Everything else is converted to `f32` on construction.

use crate::error::{InvalidInput, Result};

/// Element type of an [`Array`] as seen by the upload path.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ElementType {
    /// Unsigned bytes, uploaded verbatim as normalized texels.
    Byte,
    /// 32-bit floats, subject to the pixel transfer on upload.
    Float,
}

/// Typed element storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Elements {
    Byte(Vec<u8>),
    Float(Vec<f32>),
}

impl Elements {
    pub fn element_type(&self) -> ElementType {
        match self {
            Elements::Byte(_) => ElementType::Byte,
            Elements::Float(_) => ElementType::Float,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Elements::Byte(v) => v.len(),
            Elements::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scalar types accepted by [`Array::new`].
pub trait ArrayElement: Copy {
    fn into_elements(data: Vec<Self>) -> Elements;
}

impl ArrayElement for u8 {
    fn into_elements(data: Vec<Self>) -> Elements {
        Elements::Byte(data)
    }
}

impl ArrayElement for f32 {
    fn into_elements(data: Vec<Self>) -> Elements {
        Elements::Float(data)
    }
}

macro_rules! widen_to_f32 {
    ($($t:ty),*) => {$(
        impl ArrayElement for $t {
            fn into_elements(data: Vec<Self>) -> Elements {
                Elements::Float(data.into_iter().map(|v| v as f32).collect())
            }
        }
    )*};
}

widen_to_f32!(f64, u16, i16, u32, i32);

/// A shaped numeric buffer with 1 to 3 dimensions.
///
/// The last dimension may be a channel axis (length 1 to 4); whether it is one
/// is decided by the texture format resolver, not by the array.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    shape: Vec<usize>,
    elements: Elements,
}

impl Array {
    /// Creates an array, validating rank, dimension lengths and element count.
    pub fn new<T: ArrayElement>(shape: impl Into<Vec<usize>>, data: Vec<T>) -> Result<Self> {
        let shape = shape.into();
        let elements = T::into_elements(data);
        validate_shape(&shape, elements.len())?;
        Ok(Self { shape, elements })
    }

    /// Builds a `rows x cols` float array from a function of `(row, col)`.
    pub fn from_fn_2d(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Result<Self> {
        let shape = vec![rows, cols];
        let Some(len) = element_count(&shape) else {
            return Err(InvalidInput::ShapeOverflow { shape });
        };
        let mut data = Vec::with_capacity(len);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self::new(shape, data)
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.elements.element_type()
    }

    /// Same shape with every element as `f32`. Bytes keep their numeric
    /// value (`255u8` becomes `255.0`), they are not normalized.
    pub fn into_float(self) -> Array {
        let elements = match self.elements {
            Elements::Byte(v) => Elements::Float(v.into_iter().map(f32::from).collect()),
            float => float,
        };
        Array { shape: self.shape, elements }
    }

    /// Smallest non-NaN value, `+inf` if there is none.
    pub fn min(&self) -> f32 {
        self.values().fold(f32::INFINITY, f32::min)
    }

    /// Largest non-NaN value, `-inf` if there is none.
    pub fn max(&self) -> f32 {
        self.values().fold(f32::NEG_INFINITY, f32::max)
    }

    fn values(&self) -> Box<dyn Iterator<Item = f32> + '_> {
        match &self.elements {
            Elements::Byte(v) => Box::new(v.iter().map(|&b| b as f32)),
            Elements::Float(v) => Box::new(v.iter().copied()),
        }
    }
}

fn validate_shape(shape: &[usize], len: usize) -> Result<()> {
    if shape.is_empty() || shape.len() > 3 {
        return Err(InvalidInput::Rank { rank: shape.len() });
    }
    if shape.contains(&0) {
        return Err(InvalidInput::EmptyDimension { shape: shape.to_vec() });
    }
    let Some(expected) = element_count(shape) else {
        return Err(InvalidInput::ShapeOverflow { shape: shape.to_vec() });
    };
    if expected != len {
        return Err(InvalidInput::ElementCount {
            shape: shape.to_vec(),
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Product of the dimensions, `None` on overflow.
fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_shape_is_rejected() {
        let e = Array::new(vec![usize::MAX, 2], Vec::<f32>::new()).unwrap_err();
        assert_eq!(e, InvalidInput::ShapeOverflow { shape: vec![usize::MAX, 2] });

        let half = 1usize << (usize::BITS - 1);
        assert!(Array::new(vec![half, 2], Vec::<u8>::new()).is_err());
        assert!(Array::from_fn_2d(usize::MAX, 3, |_, _| 0.0).is_err());
    }

    #[test]
    fn into_float_keeps_byte_values() {
        let a = Array::new(vec![1, 3], vec![0u8, 128, 255]).unwrap().into_float();
        assert_eq!(a.element_type(), ElementType::Float);
        assert_eq!(a.shape(), &[1, 3]);
        assert_eq!(a.elements(), &Elements::Float(vec![0.0, 128.0, 255.0]));

        let f = Array::new(vec![2], vec![0.25f32, -1.0]).unwrap();
        assert_eq!(f.clone().into_float(), f);
    }

    #[test]
    fn f32_and_u8_are_kept_as_is() {
        let a = Array::new(vec![2, 2], vec![0u8, 1, 2, 3]).unwrap();
        assert_eq!(a.element_type(), ElementType::Byte);

        let a = Array::new(vec![4], vec![0.5f32; 4]).unwrap();
        assert_eq!(a.element_type(), ElementType::Float);
    }

    #[test]
    fn other_types_widen_to_float() {
        let a = Array::new(vec![3], vec![1.5f64, -2.0, 4.0]).unwrap();
        assert_eq!(a.elements(), &Elements::Float(vec![1.5, -2.0, 4.0]));

        let a = Array::new(vec![2], vec![-7i32, 9]).unwrap();
        assert_eq!(a.element_type(), ElementType::Float);
    }

    #[test]
    fn rejects_bad_rank() {
        let e = Array::new(vec![1, 1, 1, 1], vec![0.0f32]).unwrap_err();
        assert_eq!(e, InvalidInput::Rank { rank: 4 });

        let e = Array::new(Vec::<usize>::new(), vec![0.0f32]).unwrap_err();
        assert_eq!(e, InvalidInput::Rank { rank: 0 });
    }

    #[test]
    fn rejects_empty_dimension() {
        let e = Array::new(vec![4, 0], Vec::<f32>::new()).unwrap_err();
        assert!(matches!(e, InvalidInput::EmptyDimension { .. }));
    }

    #[test]
    fn rejects_element_count_mismatch() {
        let e = Array::new(vec![2, 3], vec![0.0f32; 5]).unwrap_err();
        assert_eq!(
            e,
            InvalidInput::ElementCount { shape: vec![2, 3], expected: 6, actual: 5 }
        );
    }

    #[test]
    fn min_max_skip_nan() {
        let a = Array::new(vec![4], vec![3.0f32, f32::NAN, -1.0, 2.0]).unwrap();
        assert_eq!(a.min(), -1.0);
        assert_eq!(a.max(), 3.0);
    }

    #[test]
    fn min_max_of_bytes() {
        let a = Array::new(vec![3], vec![10u8, 200, 7]).unwrap();
        assert_eq!(a.min(), 7.0);
        assert_eq!(a.max(), 200.0);
    }

    #[test]
    fn from_fn_2d_is_row_major() {
        let a = Array::from_fn_2d(2, 3, |r, c| (r * 10 + c) as f32).unwrap();
        assert_eq!(a.shape(), &[2, 3]);
        assert_eq!(
            a.elements(),
            &Elements::Float(vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0])
        );
    }
}
