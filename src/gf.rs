// GF(2^m) arithmetic for 2 <= m <= 16.
// Elements are stored as `Symbol` (u16). Addition is XOR; multiplication and
// division go through log/antilog tables built once per field and never
// mutated afterwards. The default field is GF(256) with primitive polynomial
// x^8 + x^4 + x^3 + x^2 + 1 (0x11d), the one used by most RS implementations.

use std::sync::{Arc, OnceLock};

/// A single code symbol / field element.
pub type Symbol = u16;

pub const MIN_EXPONENT: u8 = 2;
pub const MAX_EXPONENT: u8 = 16;
pub const DEFAULT_EXPONENT: u8 = 8;

/// Default primitive polynomial for each exponent, indexed by m.
const PRIMITIVE_POLYS: [u32; 17] = [
    0, 0, 0x7, 0xb, 0x13, 0x25, 0x43, 0x89, 0x11d, 0x211, 0x409, 0x805, 0x1053, 0x201b, 0x4443,
    0x8003, 0x1100b,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("division by zero in GF(2^m)")]
    DivisionByZero,
    #[error("unsupported field exponent {0} (expected 2..=16)")]
    UnsupportedExponent(u8),
    #[error("polynomial {poly:#x} is not primitive for GF(2^{m})")]
    NotPrimitive { m: u8, poly: u32 },
    #[error("symbol {symbol} does not fit in the field (max {max})")]
    SymbolOutOfRange { symbol: Symbol, max: Symbol },
}

/// Precomputed tables for GF(2^m) arithmetic.
#[derive(Debug)]
pub struct GaloisField {
    m: u8,
    poly: u32,
    order: usize,
    exp: Box<[Symbol]>, // exp[i] = alpha^i, doubled for mod-free lookup
    log: Box<[Symbol]>, // log[x] = i where alpha^i = x (log[0] unused)
}

impl GaloisField {
    /// Builds the field for `m` using its default primitive polynomial.
    pub fn new(m: u8) -> Result<Self, FieldError> {
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&m) {
            return Err(FieldError::UnsupportedExponent(m));
        }
        Self::with_polynomial(m, PRIMITIVE_POLYS[m as usize])
    }

    /// Builds the field for `m` reduced by `poly`, which must be primitive
    /// (i.e. alpha = 2 must generate all 2^m - 1 nonzero elements).
    pub fn with_polynomial(m: u8, poly: u32) -> Result<Self, FieldError> {
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&m) {
            return Err(FieldError::UnsupportedExponent(m));
        }
        let size = 1usize << m;
        let order = size - 1;
        if poly >> m != 1 {
            return Err(FieldError::NotPrimitive { m, poly });
        }

        let mut exp = vec![0 as Symbol; 2 * order].into_boxed_slice();
        let mut log = vec![0 as Symbol; size].into_boxed_slice();

        let mut x: u32 = 1;
        for i in 0..order {
            // Revisiting 1 before the full cycle means alpha has smaller order.
            if i > 0 && x == 1 {
                return Err(FieldError::NotPrimitive { m, poly });
            }
            exp[i] = x as Symbol;
            exp[i + order] = x as Symbol;
            log[x as usize] = i as Symbol;
            x <<= 1;
            if x & (1 << m) != 0 {
                x ^= poly;
            }
        }
        if x != 1 {
            return Err(FieldError::NotPrimitive { m, poly });
        }

        Ok(Self { m, poly, order, exp, log })
    }

    /// Process-wide shared tables for `m` with the default polynomial.
    /// Built on first use and immutable afterwards.
    pub fn shared(m: u8) -> Result<Arc<Self>, FieldError> {
        static FIELDS: [OnceLock<Arc<GaloisField>>; 17] = [const { OnceLock::new() }; 17];

        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&m) {
            return Err(FieldError::UnsupportedExponent(m));
        }
        let cell = &FIELDS[m as usize];
        if let Some(field) = cell.get() {
            return Ok(Arc::clone(field));
        }
        let field = Arc::new(Self::new(m)?);
        Ok(Arc::clone(cell.get_or_init(|| field)))
    }

    pub fn exponent(&self) -> u8 {
        self.m
    }

    pub fn polynomial(&self) -> u32 {
        self.poly
    }

    /// Number of nonzero elements, 2^m - 1. Also the longest codeword.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Largest symbol value, 2^m - 1.
    pub fn max_symbol(&self) -> Symbol {
        self.order as Symbol
    }

    pub fn contains(&self, a: Symbol) -> bool {
        (a as usize) <= self.order
    }

    pub fn check(&self, a: Symbol) -> Result<Symbol, FieldError> {
        if self.contains(a) {
            Ok(a)
        } else {
            Err(FieldError::SymbolOutOfRange { symbol: a, max: self.max_symbol() })
        }
    }

    #[inline]
    pub fn add(&self, a: Symbol, b: Symbol) -> Symbol {
        a ^ b
    }

    #[inline]
    pub fn sub(&self, a: Symbol, b: Symbol) -> Symbol {
        a ^ b
    }

    /// Both operands must be field elements; out-of-range values panic on
    /// the table lookup.
    #[inline]
    pub fn mul(&self, a: Symbol, b: Symbol) -> Symbol {
        debug_assert!(self.contains(a) && self.contains(b));
        if a == 0 || b == 0 {
            0
        } else {
            self.exp[self.log[a as usize] as usize + self.log[b as usize] as usize]
        }
    }

    #[inline]
    pub fn div(&self, a: Symbol, b: Symbol) -> Result<Symbol, FieldError> {
        if b == 0 {
            return Err(FieldError::DivisionByZero);
        }
        let log_b = self.log[self.check(b)? as usize] as usize;
        if self.check(a)? == 0 {
            return Ok(0);
        }
        let log_a = self.log[a as usize] as usize;
        Ok(self.exp[log_a + self.order - log_b])
    }

    #[inline]
    pub fn inv(&self, a: Symbol) -> Result<Symbol, FieldError> {
        self.div(1, a)
    }

    /// `a` must be a field element, as for `mul`.
    pub fn pow(&self, a: Symbol, e: u64) -> Symbol {
        if e == 0 {
            return 1;
        }
        if a == 0 {
            return 0;
        }
        let log_a = self.log[a as usize] as u64;
        self.exp[((log_a * (e % self.order as u64)) % self.order as u64) as usize]
    }

    /// alpha^i for any non-negative i.
    #[inline]
    pub fn alpha_pow(&self, i: usize) -> Symbol {
        self.exp[i % self.order]
    }

    /// alpha^-i for any non-negative i.
    #[inline]
    pub fn alpha_pow_inv(&self, i: usize) -> Symbol {
        self.exp[self.order - i % self.order]
    }

    pub fn log(&self, a: Symbol) -> Result<usize, FieldError> {
        if a == 0 {
            return Err(FieldError::DivisionByZero);
        }
        Ok(self.log[self.check(a)? as usize] as usize)
    }
}
