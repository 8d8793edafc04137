//! `num_traits` implementations for [`Dual<F>`].
//!
//! Each transcendental applies the chain rule to the tangent component.

use std::num::FpCategory;

use num_traits::{
    Float as NumFloat, FloatConst, FromPrimitive, Num, NumCast, One, ToPrimitive, Zero,
};

use crate::dual::Dual;
use crate::float::Float;

impl<F: Float> Zero for Dual<F> {
    #[inline]
    fn zero() -> Self {
        Dual::constant(F::zero())
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self.val.is_zero()
    }
}

impl<F: Float> One for Dual<F> {
    #[inline]
    fn one() -> Self {
        Dual::constant(F::one())
    }
}

impl<F: Float> Num for Dual<F> {
    type FromStrRadixErr = F::FromStrRadixErr;
    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        F::from_str_radix(str, radix).map(Dual::constant)
    }
}

impl<F: Float> FromPrimitive for Dual<F> {
    #[inline]
    fn from_i64(n: i64) -> Option<Self> {
        F::from_i64(n).map(Dual::constant)
    }
    #[inline]
    fn from_u64(n: u64) -> Option<Self> {
        F::from_u64(n).map(Dual::constant)
    }
    #[inline]
    fn from_f64(n: f64) -> Option<Self> {
        F::from_f64(n).map(Dual::constant)
    }
}

impl<F: Float> ToPrimitive for Dual<F> {
    #[inline]
    fn to_i64(&self) -> Option<i64> {
        self.val.to_i64()
    }
    #[inline]
    fn to_u64(&self) -> Option<u64> {
        self.val.to_u64()
    }
    #[inline]
    fn to_f64(&self) -> Option<f64> {
        self.val.to_f64()
    }
}

impl<F: Float> NumCast for Dual<F> {
    #[inline]
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        F::from(n).map(Dual::constant)
    }
}

impl<F: Float> FloatConst for Dual<F> {
    fn E() -> Self { Dual::constant(F::E()) }
    fn FRAC_1_PI() -> Self { Dual::constant(F::FRAC_1_PI()) }
    fn FRAC_1_SQRT_2() -> Self { Dual::constant(F::FRAC_1_SQRT_2()) }
    fn FRAC_2_PI() -> Self { Dual::constant(F::FRAC_2_PI()) }
    fn FRAC_2_SQRT_PI() -> Self { Dual::constant(F::FRAC_2_SQRT_PI()) }
    fn FRAC_PI_2() -> Self { Dual::constant(F::FRAC_PI_2()) }
    fn FRAC_PI_3() -> Self { Dual::constant(F::FRAC_PI_3()) }
    fn FRAC_PI_4() -> Self { Dual::constant(F::FRAC_PI_4()) }
    fn FRAC_PI_6() -> Self { Dual::constant(F::FRAC_PI_6()) }
    fn FRAC_PI_8() -> Self { Dual::constant(F::FRAC_PI_8()) }
    fn LN_10() -> Self { Dual::constant(F::LN_10()) }
    fn LN_2() -> Self { Dual::constant(F::LN_2()) }
    fn LOG10_E() -> Self { Dual::constant(F::LOG10_E()) }
    fn LOG2_E() -> Self { Dual::constant(F::LOG2_E()) }
    fn PI() -> Self { Dual::constant(F::PI()) }
    fn SQRT_2() -> Self { Dual::constant(F::SQRT_2()) }
}

impl<F: Float> NumFloat for Dual<F> {
    fn nan() -> Self { Dual::constant(F::nan()) }
    fn infinity() -> Self { Dual::constant(F::infinity()) }
    fn neg_infinity() -> Self { Dual::constant(F::neg_infinity()) }
    fn neg_zero() -> Self { Dual::constant(F::neg_zero()) }

    fn min_value() -> Self { Dual::constant(F::min_value()) }
    fn min_positive_value() -> Self { Dual::constant(F::min_positive_value()) }
    fn max_value() -> Self { Dual::constant(F::max_value()) }
    fn epsilon() -> Self { Dual::constant(F::epsilon()) }

    fn is_nan(self) -> bool { self.val.is_nan() }
    fn is_infinite(self) -> bool { self.val.is_infinite() }
    fn is_finite(self) -> bool { self.val.is_finite() }
    fn is_normal(self) -> bool { self.val.is_normal() }
    fn is_sign_positive(self) -> bool { self.val.is_sign_positive() }
    fn is_sign_negative(self) -> bool { self.val.is_sign_negative() }
    fn classify(self) -> FpCategory { self.val.classify() }

    fn floor(self) -> Self { Dual::constant(self.val.floor()) }
    fn ceil(self) -> Self { Dual::constant(self.val.ceil()) }
    fn round(self) -> Self { Dual::constant(self.val.round()) }
    fn trunc(self) -> Self { Dual::constant(self.val.trunc()) }

    fn fract(self) -> Self {
        Dual {
            val: self.val.fract(),
            dot: self.dot,
        }
    }

    fn abs(self) -> Self {
        self.chain(self.val.abs(), self.val.signum())
    }

    fn signum(self) -> Self {
        Dual::constant(self.val.signum())
    }

    fn mul_add(self, a: Self, b: Self) -> Self {
        Dual {
            val: self.val.mul_add(a.val, b.val),
            dot: self.dot * a.val + self.val * a.dot + b.dot,
        }
    }

    fn recip(self) -> Self {
        let inv = F::one() / self.val;
        self.chain(inv, -inv * inv)
    }

    fn powi(self, n: i32) -> Self {
        let df = F::from(n).unwrap() * self.val.powi(n - 1);
        self.chain(self.val.powi(n), df)
    }

    fn powf(self, n: Self) -> Self {
        let val = self.val.powf(n.val);
        Dual {
            val,
            dot: val * (n.val * self.dot / self.val + n.dot * self.val.ln()),
        }
    }

    fn sqrt(self) -> Self {
        let s = self.val.sqrt();
        let two = F::one() + F::one();
        self.chain(s, F::one() / (two * s))
    }

    fn cbrt(self) -> Self {
        let c = self.val.cbrt();
        let three = F::from(3.0).unwrap();
        self.chain(c, F::one() / (three * c * c))
    }

    fn exp(self) -> Self {
        let e = self.val.exp();
        self.chain(e, e)
    }

    fn exp2(self) -> Self {
        let e = self.val.exp2();
        self.chain(e, e * F::LN_2())
    }

    fn exp_m1(self) -> Self {
        self.chain(self.val.exp_m1(), self.val.exp())
    }

    fn ln(self) -> Self {
        self.chain(self.val.ln(), F::one() / self.val)
    }

    fn log(self, base: Self) -> Self {
        self.ln() / base.ln()
    }

    fn log2(self) -> Self {
        self.chain(self.val.log2(), F::one() / (self.val * F::LN_2()))
    }

    fn log10(self) -> Self {
        self.chain(self.val.log10(), F::one() / (self.val * F::LN_10()))
    }

    fn ln_1p(self) -> Self {
        self.chain(self.val.ln_1p(), F::one() / (F::one() + self.val))
    }

    fn sin(self) -> Self {
        self.chain(self.val.sin(), self.val.cos())
    }

    fn cos(self) -> Self {
        self.chain(self.val.cos(), -self.val.sin())
    }

    fn tan(self) -> Self {
        let c = self.val.cos();
        self.chain(self.val.tan(), F::one() / (c * c))
    }

    fn sin_cos(self) -> (Self, Self) {
        let (s, c) = self.val.sin_cos();
        (self.chain(s, c), self.chain(c, -s))
    }

    fn asin(self) -> Self {
        self.chain(
            self.val.asin(),
            F::one() / (F::one() - self.val * self.val).sqrt(),
        )
    }

    fn acos(self) -> Self {
        self.chain(
            self.val.acos(),
            -F::one() / (F::one() - self.val * self.val).sqrt(),
        )
    }

    fn atan(self) -> Self {
        self.chain(self.val.atan(), F::one() / (F::one() + self.val * self.val))
    }

    fn atan2(self, other: Self) -> Self {
        let denom = self.val * self.val + other.val * other.val;
        Dual {
            val: self.val.atan2(other.val),
            dot: (other.val * self.dot - self.val * other.dot) / denom,
        }
    }

    fn sinh(self) -> Self {
        self.chain(self.val.sinh(), self.val.cosh())
    }

    fn cosh(self) -> Self {
        self.chain(self.val.cosh(), self.val.sinh())
    }

    fn tanh(self) -> Self {
        let c = self.val.cosh();
        self.chain(self.val.tanh(), F::one() / (c * c))
    }

    fn asinh(self) -> Self {
        self.chain(
            self.val.asinh(),
            F::one() / (self.val * self.val + F::one()).sqrt(),
        )
    }

    fn acosh(self) -> Self {
        self.chain(
            self.val.acosh(),
            F::one() / (self.val * self.val - F::one()).sqrt(),
        )
    }

    fn atanh(self) -> Self {
        self.chain(
            self.val.atanh(),
            F::one() / (F::one() - self.val * self.val),
        )
    }

    fn hypot(self, other: Self) -> Self {
        let h = self.val.hypot(other.val);
        Dual {
            val: h,
            dot: (self.val * self.dot + other.val * other.dot) / h,
        }
    }

    fn max(self, other: Self) -> Self {
        if self.val >= other.val {
            self
        } else {
            other
        }
    }

    fn min(self, other: Self) -> Self {
        if self.val <= other.val {
            self
        } else {
            other
        }
    }

    fn abs_sub(self, other: Self) -> Self {
        if self.val > other.val {
            self - other
        } else {
            Self::zero()
        }
    }

    fn integer_decode(self) -> (u64, i16, i8) {
        self.val.integer_decode()
    }

    fn to_degrees(self) -> Self {
        let factor = F::from(180.0).unwrap() / F::PI();
        Dual {
            val: self.val.to_degrees(),
            dot: self.dot * factor,
        }
    }

    fn to_radians(self) -> Self {
        let factor = F::PI() / F::from(180.0).unwrap();
        Dual {
            val: self.val.to_radians(),
            dot: self.dot * factor,
        }
    }
}
