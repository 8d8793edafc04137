//! `num_traits` implementations for [`Var<F>`].
//!
//! Transcendentals record their precomputed partial onto the active tape.

use std::num::FpCategory;

use num_traits::{
    Float as NumFloat, FloatConst, FromPrimitive, Num, NumCast, One, ToPrimitive, Zero,
};

use crate::float::Float;
use crate::tape::TapeLocal;
use crate::var::{record_binary, record_unary, Var};

impl<F: Float + TapeLocal> Zero for Var<F> {
    #[inline]
    fn zero() -> Self {
        Var::constant(F::zero())
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl<F: Float + TapeLocal> One for Var<F> {
    #[inline]
    fn one() -> Self {
        Var::constant(F::one())
    }
}

impl<F: Float + TapeLocal> Num for Var<F> {
    type FromStrRadixErr = F::FromStrRadixErr;
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        F::from_str_radix(str, radix).map(Var::constant)
    }
}

impl<F: Float> FromPrimitive for Var<F> {
    #[inline]
    fn from_i64(n: i64) -> Option<Self> {
        F::from_i64(n).map(Var::constant)
    }
    #[inline]
    fn from_u64(n: u64) -> Option<Self> {
        F::from_u64(n).map(Var::constant)
    }
    #[inline]
    fn from_f64(n: f64) -> Option<Self> {
        F::from_f64(n).map(Var::constant)
    }
}

impl<F: Float> ToPrimitive for Var<F> {
    #[inline]
    fn to_i64(&self) -> Option<i64> {
        self.value.to_i64()
    }
    #[inline]
    fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }
    #[inline]
    fn to_f64(&self) -> Option<f64> {
        self.value.to_f64()
    }
}

impl<F: Float + TapeLocal> NumCast for Var<F> {
    #[inline]
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        F::from(n).map(Var::constant)
    }
}

impl<F: Float + TapeLocal> FloatConst for Var<F> {
    fn E() -> Self { Var::constant(F::E()) }
    fn FRAC_1_PI() -> Self { Var::constant(F::FRAC_1_PI()) }
    fn FRAC_1_SQRT_2() -> Self { Var::constant(F::FRAC_1_SQRT_2()) }
    fn FRAC_2_PI() -> Self { Var::constant(F::FRAC_2_PI()) }
    fn FRAC_2_SQRT_PI() -> Self { Var::constant(F::FRAC_2_SQRT_PI()) }
    fn FRAC_PI_2() -> Self { Var::constant(F::FRAC_PI_2()) }
    fn FRAC_PI_3() -> Self { Var::constant(F::FRAC_PI_3()) }
    fn FRAC_PI_4() -> Self { Var::constant(F::FRAC_PI_4()) }
    fn FRAC_PI_6() -> Self { Var::constant(F::FRAC_PI_6()) }
    fn FRAC_PI_8() -> Self { Var::constant(F::FRAC_PI_8()) }
    fn LN_10() -> Self { Var::constant(F::LN_10()) }
    fn LN_2() -> Self { Var::constant(F::LN_2()) }
    fn LOG10_E() -> Self { Var::constant(F::LOG10_E()) }
    fn LOG2_E() -> Self { Var::constant(F::LOG2_E()) }
    fn PI() -> Self { Var::constant(F::PI()) }
    fn SQRT_2() -> Self { Var::constant(F::SQRT_2()) }
}

impl<F: Float + TapeLocal> NumFloat for Var<F> {
    fn nan() -> Self { Var::constant(F::nan()) }
    fn infinity() -> Self { Var::constant(F::infinity()) }
    fn neg_infinity() -> Self { Var::constant(F::neg_infinity()) }
    fn neg_zero() -> Self { Var::constant(F::neg_zero()) }

    fn min_value() -> Self { Var::constant(F::min_value()) }
    fn min_positive_value() -> Self { Var::constant(F::min_positive_value()) }
    fn max_value() -> Self { Var::constant(F::max_value()) }
    fn epsilon() -> Self { Var::constant(F::epsilon()) }

    fn is_nan(self) -> bool { self.value.is_nan() }
    fn is_infinite(self) -> bool { self.value.is_infinite() }
    fn is_finite(self) -> bool { self.value.is_finite() }
    fn is_normal(self) -> bool { self.value.is_normal() }
    fn is_sign_positive(self) -> bool { self.value.is_sign_positive() }
    fn is_sign_negative(self) -> bool { self.value.is_sign_negative() }
    fn classify(self) -> FpCategory { self.value.classify() }

    fn floor(self) -> Self { Var::constant(self.value.floor()) }
    fn ceil(self) -> Self { Var::constant(self.value.ceil()) }
    fn round(self) -> Self { Var::constant(self.value.round()) }
    fn trunc(self) -> Self { Var::constant(self.value.trunc()) }

    fn fract(self) -> Self {
        record_unary(self, self.value.fract(), F::one())
    }

    fn abs(self) -> Self {
        record_unary(self, self.value.abs(), self.value.signum())
    }

    fn signum(self) -> Self {
        Var::constant(self.value.signum())
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        self * a + b
    }

    fn recip(self) -> Self {
        let inv = F::one() / self.value;
        record_unary(self, inv, -inv * inv)
    }

    fn powi(self, n: i32) -> Self {
        let df = F::from(n).unwrap() * self.value.powi(n - 1);
        record_unary(self, self.value.powi(n), df)
    }

    fn powf(self, n: Self) -> Self {
        let val = self.value.powf(n.value);
        let dx = n.value * self.value.powf(n.value - F::one());
        let dn = val * self.value.ln();
        record_binary(self, n, val, dx, dn)
    }

    fn sqrt(self) -> Self {
        let s = self.value.sqrt();
        let two = F::one() + F::one();
        record_unary(self, s, F::one() / (two * s))
    }

    fn cbrt(self) -> Self {
        let c = self.value.cbrt();
        let three = F::from(3.0).unwrap();
        record_unary(self, c, F::one() / (three * c * c))
    }

    fn exp(self) -> Self {
        let e = self.value.exp();
        record_unary(self, e, e)
    }

    fn exp2(self) -> Self {
        let e = self.value.exp2();
        record_unary(self, e, e * F::LN_2())
    }

    fn exp_m1(self) -> Self {
        record_unary(self, self.value.exp_m1(), self.value.exp())
    }

    fn ln(self) -> Self {
        record_unary(self, self.value.ln(), F::one() / self.value)
    }

    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    fn log2(self) -> Self {
        record_unary(self, self.value.log2(), F::one() / (self.value * F::LN_2()))
    }

    fn log10(self) -> Self {
        record_unary(
            self,
            self.value.log10(),
            F::one() / (self.value * F::LN_10()),
        )
    }

    fn ln_1p(self) -> Self {
        record_unary(self, self.value.ln_1p(), F::one() / (F::one() + self.value))
    }

    fn sin(self) -> Self {
        record_unary(self, self.value.sin(), self.value.cos())
    }

    fn cos(self) -> Self {
        record_unary(self, self.value.cos(), -self.value.sin())
    }

    fn tan(self) -> Self {
        let c = self.value.cos();
        record_unary(self, self.value.tan(), F::one() / (c * c))
    }

    fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.value.sin_cos();
        (record_unary(self, s, c), record_unary(self, c, -s))
    }

    fn asin(self) -> Self {
        record_unary(
            self,
            self.value.asin(),
            F::one() / (F::one() - self.value * self.value).sqrt(),
        )
    }

    fn acos(self) -> Self {
        record_unary(
            self,
            self.value.acos(),
            -F::one() / (F::one() - self.value * self.value).sqrt(),
        )
    }

    fn atan(self) -> Self {
        record_unary(
            self,
            self.value.atan(),
            F::one() / (F::one() + self.value * self.value),
        )
    }

    fn atan2(self, other: Self) -> Self {
        let denom = self.value * self.value + other.value * other.value;
        record_binary(
            self,
            other,
            self.value.atan2(other.value),
            other.value / denom,
            -self.value / denom,
        )
    }

    fn sinh(self) -> Self {
        record_unary(self, self.value.sinh(), self.value.cosh())
    }

    fn cosh(self) -> Self {
        record_unary(self, self.value.cosh(), self.value.sinh())
    }

    fn tanh(self) -> Self {
        let c = self.value.cosh();
        record_unary(self, self.value.tanh(), F::one() / (c * c))
    }

    fn asinh(self) -> Self {
        record_unary(
            self,
            self.value.asinh(),
            F::one() / (self.value * self.value + F::one()).sqrt(),
        )
    }

    fn acosh(self) -> Self {
        record_unary(
            self,
            self.value.acosh(),
            F::one() / (self.value * self.value - F::one()).sqrt(),
        )
    }

    fn atanh(self) -> Self {
        record_unary(
            self,
            self.value.atanh(),
            F::one() / (F::one() - self.value * self.value),
        )
    }

    fn hypot(self, other: Self) -> Self {
        let h = self.value.hypot(other.value);
        record_binary(self, other, h, self.value / h, other.value / h)
    }

    fn max(self, other: Self) -> Self {
        if self.value >= other.value {
            record_unary(self, self.value, F::one())
        } else {
            record_unary(other, other.value, F::one())
        }
    }

    fn min(self, other: Self) -> Self {
        if self.value <= other.value {
            record_unary(self, self.value, F::one())
        } else {
            record_unary(other, other.value, F::one())
        }
    }

    fn abs_sub(self, other: Self) -> Self {
        if self.value > other.value {
            self - other
        } else {
            Self::zero()
        }
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        self.value.integer_decode()
    }

    fn to_degrees(self) -> Self {
        let factor = F::from(180.0).unwrap() / F::PI();
        record_unary(self, self.value.to_degrees(), factor)
    }

    fn to_radians(self) -> Self {
        let factor = F::PI() / F::from(180.0).unwrap();
        record_unary(self, self.value.to_radians(), factor)
    }
}
