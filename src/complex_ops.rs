//! Elementwise arithmetic over split (real, imaginary) buffers.
//!
//! Every function writes only into the caller-supplied output slices and
//! checks that all slices share one length.

use crate::error::FftError;
use crate::num::Float;

fn check_all<T>(expected: usize, slices: &[&[T]]) -> Result<(), FftError> {
    for s in slices {
        FftError::check_len(expected, s.len())?;
    }
    Ok(())
}

/// `out = a + b`.
pub fn add<T: Float>(
    a: (&[T], &[T]),
    b: (&[T], &[T]),
    out_re: &mut [T],
    out_im: &mut [T],
) -> Result<(), FftError> {
    let n = a.0.len();
    check_all(n, &[a.1, b.0, b.1, out_re, out_im])?;
    for i in 0..n {
        out_re[i] = a.0[i] + b.0[i];
        out_im[i] = a.1[i] + b.1[i];
    }
    Ok(())
}

/// `out = a - b`.
pub fn subtract<T: Float>(
    a: (&[T], &[T]),
    b: (&[T], &[T]),
    out_re: &mut [T],
    out_im: &mut [T],
) -> Result<(), FftError> {
    let n = a.0.len();
    check_all(n, &[a.1, b.0, b.1, out_re, out_im])?;
    for i in 0..n {
        out_re[i] = a.0[i] - b.0[i];
        out_im[i] = a.1[i] - b.1[i];
    }
    Ok(())
}

/// Pointwise complex product `out = a · b`.
pub fn multiply<T: Float>(
    a: (&[T], &[T]),
    b: (&[T], &[T]),
    out_re: &mut [T],
    out_im: &mut [T],
) -> Result<(), FftError> {
    let n = a.0.len();
    check_all(n, &[a.1, b.0, b.1, out_re, out_im])?;
    for i in 0..n {
        let (ar, ai, br, bi) = (a.0[i], a.1[i], b.0[i], b.1[i]);
        out_re[i] = ar * br - ai * bi;
        out_im[i] = ar * bi + ai * br;
    }
    Ok(())
}

/// Multiply both components by a real factor in place.
pub fn scale<T: Float>(re: &mut [T], im: &mut [T], factor: T) -> Result<(), FftError> {
    FftError::check_len(re.len(), im.len())?;
    for (r, i) in re.iter_mut().zip(im.iter_mut()) {
        *r = *r * factor;
        *i = *i * factor;
    }
    Ok(())
}

/// Negate the imaginary component in place.
pub fn conjugate<T: Float>(im: &mut [T]) {
    for x in im.iter_mut() {
        *x = -*x;
    }
}

/// `out[i] = sqrt(re² + im²)`.
pub fn magnitude<T: Float>(re: &[T], im: &[T], out: &mut [T]) -> Result<(), FftError> {
    check_all(re.len(), &[im, out])?;
    for i in 0..re.len() {
        out[i] = (re[i] * re[i] + im[i] * im[i]).sqrt();
    }
    Ok(())
}

/// `out[i] = atan2(im, re)`.
pub fn phase<T: Float>(re: &[T], im: &[T], out: &mut [T]) -> Result<(), FftError> {
    check_all(re.len(), &[im, out])?;
    for i in 0..re.len() {
        out[i] = im[i].atan2(re[i]);
    }
    Ok(())
}

/// `out[i] = re² + im²`.
pub fn power<T: Float>(re: &[T], im: &[T], out: &mut [T]) -> Result<(), FftError> {
    check_all(re.len(), &[im, out])?;
    for i in 0..re.len() {
        out[i] = re[i] * re[i] + im[i] * im[i];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiply_matches_complex_product() {
        let a = ([1.0f64, 0.0], [2.0f64, 1.0]);
        let b = ([3.0f64, 0.0], [-1.0f64, 1.0]);
        let mut re = [0.0; 2];
        let mut im = [0.0; 2];
        multiply((&a.0, &a.1), (&b.0, &b.1), &mut re, &mut im).unwrap();
        // (1+2j)(3-j) = 5+5j ; j*j = -1
        assert_eq!((re[0], im[0]), (5.0, 5.0));
        assert_eq!((re[1], im[1]), (-1.0, 0.0));
    }

    #[test]
    fn add_and_subtract_are_inverse() {
        let a = ([1.5f32, -2.0], [0.5f32, 4.0]);
        let b = ([0.25f32, 1.0], [-3.0f32, 2.0]);
        let (mut sr, mut si) = ([0.0; 2], [0.0; 2]);
        add((&a.0, &a.1), (&b.0, &b.1), &mut sr, &mut si).unwrap();
        let (mut dr, mut di) = ([0.0; 2], [0.0; 2]);
        subtract((&sr, &si), (&b.0, &b.1), &mut dr, &mut di).unwrap();
        assert_eq!(dr, a.0);
        assert_eq!(di, a.1);
    }

    #[test]
    fn spectral_quantities() {
        let re = [3.0f64, 0.0, -1.0];
        let im = [4.0f64, 2.0, 0.0];
        let mut mag = [0.0; 3];
        let mut pow = [0.0; 3];
        let mut ph = [0.0; 3];
        magnitude(&re, &im, &mut mag).unwrap();
        power(&re, &im, &mut pow).unwrap();
        phase(&re, &im, &mut ph).unwrap();
        assert_eq!(mag, [5.0, 2.0, 1.0]);
        assert_eq!(pow, [25.0, 4.0, 1.0]);
        assert!((ph[1] - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((ph[2] - core::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn scale_and_conjugate_in_place() {
        let mut re = [2.0f32, -4.0];
        let mut im = [1.0f32, 0.5];
        scale(&mut re, &mut im, 0.5).unwrap();
        conjugate(&mut im);
        assert_eq!(re, [1.0, -2.0]);
        assert_eq!(im, [-0.5, -0.25]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut out = [0.0f32; 2];
        assert_eq!(
            magnitude(&[1.0, 2.0], &[1.0], &mut out),
            Err(FftError::InputShape {
                expected: 2,
                actual: 1
            })
        );
        let mut re = [1.0f32; 3];
        let mut im = [1.0f32; 2];
        assert!(scale(&mut re, &mut im, 2.0).is_err());
    }
}
