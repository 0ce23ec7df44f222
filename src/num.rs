//! Scalar and complex number primitives shared by every transform kernel.
//!
//! Trigonometry goes through `libm` in `f64` and is narrowed to the sample
//! type afterwards, so twiddle and chirp tables are bit-identical across
//! platforms.

use core::fmt::Debug;

// Minimal float trait for the generic kernels.
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Debug
    + Send
    + Sync
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(x: f64) -> Self;
    fn to_f64(self) -> f64;
    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn atan2(self, other: Self) -> Self;
    /// Machine epsilon of the type.
    fn epsilon() -> Self;
}

impl Float for f32 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn sqrt(self) -> Self {
        libm::sqrtf(self)
    }
    fn abs(self) -> Self {
        libm::fabsf(self)
    }
    fn atan2(self, other: Self) -> Self {
        libm::atan2f(self, other)
    }
    fn epsilon() -> Self {
        f32::EPSILON
    }
}

impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn sqrt(self) -> Self {
        libm::sqrt(self)
    }
    fn abs(self) -> Self {
        libm::fabs(self)
    }
    fn atan2(self, other: Self) -> Self {
        libm::atan2(self, other)
    }
    fn epsilon() -> Self {
        f64::EPSILON
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    pub fn one() -> Self {
        Self {
            re: T::one(),
            im: T::zero(),
        }
    }
    /// `e^{iθ}` with the angle given in `f64` radians.
    #[inline]
    pub fn expi(theta: f64) -> Self {
        Self {
            re: T::from_f64(libm::cos(theta)),
            im: T::from_f64(libm::sin(theta)),
        }
    }
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
    #[allow(clippy::should_implement_trait)]
    #[inline(always)]
    pub fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }
    #[inline(always)]
    pub fn scale(self, factor: T) -> Self {
        Self {
            re: self.re * factor,
            im: self.im * factor,
        }
    }
    /// Multiply by `-j`, a quarter turn clockwise.
    #[inline(always)]
    pub fn mul_neg_j(self) -> Self {
        Self {
            re: self.im,
            im: -self.re,
        }
    }
    /// Multiply by `j`, a quarter turn counter-clockwise.
    #[inline(always)]
    pub fn mul_j(self) -> Self {
        Self {
            re: -self.im,
            im: self.re,
        }
    }
    #[inline(always)]
    pub fn norm_sqr(self) -> T {
        self.re * self.re + self.im * self.im
    }
    #[inline(always)]
    pub fn norm(self) -> T {
        self.norm_sqr().sqrt()
    }
    #[inline(always)]
    pub fn arg(self) -> T {
        self.im.atan2(self.re)
    }
}

impl<T: Float> core::ops::Neg for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Complex::<T>::add(self, other)
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Complex::<T>::sub(self, other)
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Complex::<T>::mul(self, other)
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;

/// Interleave split real/imaginary slices into a complex buffer.
pub(crate) fn interleave<T: Float>(re: &[T], im: &[T]) -> Vec<Complex<T>> {
    re.iter()
        .zip(im.iter())
        .map(|(&r, &i)| Complex::new(r, i))
        .collect()
}

/// Split a complex buffer back into owned real and imaginary vectors.
pub(crate) fn deinterleave<T: Float>(buf: &[Complex<T>]) -> (Vec<T>, Vec<T>) {
    buf.iter().map(|c| (c.re, c.im)).unzip()
}
