//! Dense 2-D raster buffer.
//!
//! Pixels are stored row-major and addressed as `(x, y)`, with `x` the column
//! and `y` the row. Besides plain indexing the buffer knows how to grow and
//! shrink by a uniform border, which is what neighborhood algorithms need to
//! avoid edge special-casing.

use std::ops::{Index, IndexMut};
use std::slice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Buffer2<T> {
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.pixels[self.index_of(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index_of(x, y);
        &mut self.pixels[idx]
    }

    /// Signed access; `None` outside the buffer.
    #[inline]
    pub fn get_checked(&self, x: isize, y: isize) -> Option<&T> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(&self.pixels[y * self.width + x])
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.pixels
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Buffer2<U> {
        Buffer2 {
            pixels: self.pixels.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Returns a copy grown by `border` pixels on every side.
    ///
    /// Interior pixels are cloned; `fill(x, y)` receives coordinates in the
    /// padded buffer and supplies every border pixel.
    pub fn padded(&self, border: usize, mut fill: impl FnMut(usize, usize) -> T) -> Self
    where
        T: Clone,
    {
        let width = self.width + 2 * border;
        let height = self.height + 2 * border;
        Self::from_fn(width, height, |x, y| {
            let inside_x = x >= border && x < border + self.width;
            let inside_y = y >= border && y < border + self.height;
            if inside_x && inside_y {
                self.get(x - border, y - border).clone()
            } else {
                fill(x, y)
            }
        })
    }

    /// Returns a copy with `border` pixels stripped from every side.
    pub fn cropped(&self, border: usize) -> Self
    where
        T: Clone,
    {
        assert!(
            2 * border <= self.width && 2 * border <= self.height,
            "border {} too large for {}x{} buffer",
            border,
            self.width,
            self.height
        );
        Self::from_fn(self.width - 2 * border, self.height - 2 * border, |x, y| {
            self.get(x + border, y + border).clone()
        })
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height],
            width,
            height,
        }
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self.pixels[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        &mut self.pixels[y * self.width + x]
    }
}

impl<'a, T> IntoIterator for &'a Buffer2<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}
