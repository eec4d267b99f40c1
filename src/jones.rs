use num_complex::Complex;

/// A 2x2 Jones matrix acting on (horizontal, vertical) field components.
///
/// Row-major: `[[m00, m01], [m10, m11]]` maps `(h, v)` to
/// `(m00 h + m01 v, m10 h + m11 v)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JonesMatrix(pub [[Complex<f64>; 2]; 2]);

impl JonesMatrix {
    pub fn identity() -> JonesMatrix {
        JonesMatrix([
            [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
            [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
        ])
    }

    /// Ideal half-wave plate with its fast axis at `angle_deg` from
    /// horizontal:
    ///
    /// ```text
    /// [ cos(2t)   sin(2t) ]
    /// [ sin(2t)  -cos(2t) ]
    /// ```
    ///
    /// Real-valued up to a global phase. At 0 degrees it flips the sign of V,
    /// at 45 degrees it swaps H and V.
    pub fn half_wave_plate(angle_deg: f64) -> JonesMatrix {
        let (s, c) = (2.0 * angle_deg.to_radians()).sin_cos();
        JonesMatrix([
            [Complex::new(c, 0.0), Complex::new(s, 0.0)],
            [Complex::new(s, 0.0), Complex::new(-c, 0.0)],
        ])
    }

    /// Applies the matrix to one (h, v) sample.
    #[inline]
    pub fn apply(&self, h: Complex<f64>, v: Complex<f64>) -> (Complex<f64>, Complex<f64>) {
        let m = &self.0;
        (m[0][0] * h + m[0][1] * v, m[1][0] * h + m[1][1] * v)
    }

    /// Matrix product `self * rhs`; `rhs` acts on the field first.
    pub fn compose(&self, rhs: &JonesMatrix) -> JonesMatrix {
        let a = &self.0;
        let b = &rhs.0;
        JonesMatrix([
            [
                a[0][0] * b[0][0] + a[0][1] * b[1][0],
                a[0][0] * b[0][1] + a[0][1] * b[1][1],
            ],
            [
                a[1][0] * b[0][0] + a[1][1] * b[1][0],
                a[1][0] * b[0][1] + a[1][1] * b[1][1],
            ],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::JonesMatrix;
    use num_complex::Complex;

    fn assert_close(a: Complex<f64>, b: Complex<f64>) {
        assert!((a - b).norm() < 1e-12, "{} != {}", a, b);
    }

    #[test]
    fn plate_at_zero_flips_vertical_sign() {
        let m = JonesMatrix::half_wave_plate(0.0);
        let (h, v) = m.apply(Complex::new(0.7, 0.0), Complex::new(0.3, 0.1));
        assert_close(h, Complex::new(0.7, 0.0));
        assert_close(v, Complex::new(-0.3, -0.1));
    }

    #[test]
    fn plate_at_45_swaps_components() {
        let m = JonesMatrix::half_wave_plate(45.0);
        let (h, v) = m.apply(Complex::new(1.0, 0.0), Complex::new(0.0, 0.0));
        assert_close(h, Complex::new(0.0, 0.0));
        assert_close(v, Complex::new(1.0, 0.0));
    }

    #[test]
    fn plate_at_22_5_rotates_horizontal_to_diagonal() {
        let m = JonesMatrix::half_wave_plate(22.5);
        let (h, v) = m.apply(Complex::new(1.0, 0.0), Complex::new(0.0, 0.0));
        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert_close(h, Complex::new(expected, 0.0));
        assert_close(v, Complex::new(expected, 0.0));
    }

    #[test]
    fn rows_are_orthonormal() {
        for &angle in &[0.0, 10.0, 22.5, 45.0, 67.5, 90.0, 123.4] {
            let m = JonesMatrix::half_wave_plate(angle).0;
            let r0 = m[0][0] * m[0][0].conj() + m[0][1] * m[0][1].conj();
            let r1 = m[1][0] * m[1][0].conj() + m[1][1] * m[1][1].conj();
            let cross = m[0][0] * m[1][0].conj() + m[0][1] * m[1][1].conj();
            assert_close(r0, Complex::new(1.0, 0.0));
            assert_close(r1, Complex::new(1.0, 0.0));
            assert_close(cross, Complex::new(0.0, 0.0));
        }
    }

    #[test]
    fn two_plates_compose_to_a_rotation() {
        // plates at 22.5 then 67.5 degrees rotate the polarization by
        // 2 * (67.5 - 22.5) = 90 degrees
        let m = JonesMatrix::half_wave_plate(67.5).compose(&JonesMatrix::half_wave_plate(22.5));
        assert_close(m.0[0][0], Complex::new(0.0, 0.0));
        assert_close(m.0[0][1], Complex::new(-1.0, 0.0));
        assert_close(m.0[1][0], Complex::new(1.0, 0.0));
        assert_close(m.0[1][1], Complex::new(0.0, 0.0));

        let (h, v) = m.apply(Complex::new(1.0, 0.0), Complex::new(0.0, 0.0));
        assert_close(h, Complex::new(0.0, 0.0));
        assert_close(v, Complex::new(1.0, 0.0));
    }

    #[test]
    fn identity_composes_neutrally() {
        let m = JonesMatrix::half_wave_plate(33.0);
        assert_eq!(m.compose(&JonesMatrix::identity()), m);
        assert_eq!(JonesMatrix::identity().compose(&m), m);
    }
}
