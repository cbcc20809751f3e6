// Polynomials over GF(2^m).
// Convention: coeff[0] is the constant term (x^0), coeff[i] is the x^i coefficient.
// The empty slice and [0] both denote the zero polynomial.

use crate::gf::{FieldError, GaloisField, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolyError {
    #[error("division by the zero polynomial")]
    DivisionByZeroPolynomial,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Degree of `p`, or `None` for the zero polynomial.
pub fn degree(p: &[Symbol]) -> Option<usize> {
    p.iter().rposition(|&c| c != 0)
}

/// Drops high-order zero coefficients, keeping at least one coefficient.
pub fn trim(mut p: Vec<Symbol>) -> Vec<Symbol> {
    while p.len() > 1 && p.last() == Some(&0) {
        p.pop();
    }
    if p.is_empty() {
        p.push(0);
    }
    p
}

/// Evaluate `poly` at `x` with Horner's method.
pub fn eval(gf: &GaloisField, poly: &[Symbol], x: Symbol) -> Symbol {
    poly.iter().rev().fold(0, |acc, &coef| gf.mul(acc, x) ^ coef)
}

pub fn add(p: &[Symbol], q: &[Symbol]) -> Vec<Symbol> {
    let mut result = vec![0; p.len().max(q.len())];
    for (i, &c) in p.iter().enumerate() {
        result[i] = c;
    }
    for (i, &c) in q.iter().enumerate() {
        result[i] ^= c;
    }
    result
}

pub fn scale(gf: &GaloisField, p: &[Symbol], c: Symbol) -> Vec<Symbol> {
    p.iter().map(|&pi| gf.mul(pi, c)).collect()
}

/// Result degree = deg(p) + deg(q)
pub fn mul(gf: &GaloisField, p: &[Symbol], q: &[Symbol]) -> Vec<Symbol> {
    if p.is_empty() || q.is_empty() {
        return vec![];
    }
    let mut result = vec![0; p.len() + q.len() - 1];
    for (i, &pi) in p.iter().enumerate() {
        if pi == 0 {
            continue;
        }
        for (j, &qj) in q.iter().enumerate() {
            result[i + j] ^= gf.mul(pi, qj);
        }
    }
    result
}

/// Long division: returns `(quotient, remainder)` with deg(remainder) < deg(q).
/// Both results are trimmed.
pub fn div_rem(
    gf: &GaloisField,
    p: &[Symbol],
    q: &[Symbol],
) -> Result<(Vec<Symbol>, Vec<Symbol>), PolyError> {
    let dq = degree(q).ok_or(PolyError::DivisionByZeroPolynomial)?;
    let lead_inv = gf.inv(q[dq])?;

    let mut rem = p.to_vec();
    let Some(dp) = degree(p).filter(|&dp| dp >= dq) else {
        return Ok((vec![0], trim(rem)));
    };

    let mut quot = vec![0; dp - dq + 1];
    for i in (dq..=dp).rev() {
        let coef = rem[i];
        if coef == 0 {
            continue;
        }
        let factor = gf.mul(coef, lead_inv);
        quot[i - dq] = factor;
        for (j, &qj) in q[..=dq].iter().enumerate() {
            rem[i - dq + j] ^= gf.mul(factor, qj);
        }
    }
    rem.truncate(dq.max(1));
    Ok((trim(quot), trim(rem)))
}

/// Formal derivative. In characteristic 2, i * c_i vanishes for even i,
/// so only the odd-indexed coefficients survive.
pub fn derivative(p: &[Symbol]) -> Vec<Symbol> {
    if p.len() <= 1 {
        return vec![0];
    }
    p.iter()
        .enumerate()
        .skip(1)
        .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn gf256() -> Arc<GaloisField> {
        GaloisField::shared(8).unwrap()
    }

    #[test]
    fn test_eval_horner() {
        let gf = gf256();
        // p(x) = 3x^2 + 2x + 1
        let p = [1, 2, 3];
        assert_eq!(eval(&gf, &p, 0), 1);
        assert_eq!(eval(&gf, &p, 1), 1 ^ 2 ^ 3);
        let x = 6;
        let expected = gf.mul(3, gf.mul(x, x)) ^ gf.mul(2, x) ^ 1;
        assert_eq!(eval(&gf, &p, x), expected);
        assert_eq!(eval(&gf, &[], 9), 0);
    }

    #[test]
    fn test_mul_roots() {
        let gf = gf256();
        // (x + a)(x + b) vanishes at a and b
        let (a, b) = (gf.alpha_pow(3), gf.alpha_pow(10));
        let p = mul(&gf, &[a, 1], &[b, 1]);
        assert_eq!(p.len(), 3);
        assert_eq!(p[2], 1);
        assert_eq!(eval(&gf, &p, a), 0);
        assert_eq!(eval(&gf, &p, b), 0);
        assert!(mul(&gf, &[], &p).is_empty());
    }

    #[test]
    fn test_div_rem_reconstructs() {
        let gf = gf256();
        let p = [7, 0, 19, 200, 1, 45];
        let q = [3, 9, 81];
        let (quot, rem) = div_rem(&gf, &p, &q).unwrap();
        assert!(degree(&rem).unwrap_or(0) < 2);
        let back = add(&mul(&gf, &quot, &q), &rem);
        assert_eq!(trim(back), trim(p.to_vec()));
    }

    #[test]
    fn test_div_rem_exact_and_short() {
        let gf = gf256();
        let q = [5, 1];
        let p = mul(&gf, &[11, 22, 33], &q);
        let (quot, rem) = div_rem(&gf, &p, &q).unwrap();
        assert_eq!(quot, vec![11, 22, 33]);
        assert_eq!(rem, vec![0]);

        // deg(p) < deg(q): quotient zero, remainder p
        let (quot, rem) = div_rem(&gf, &[4, 2], &[1, 1, 1]).unwrap();
        assert_eq!(quot, vec![0]);
        assert_eq!(rem, vec![4, 2]);
    }

    #[test]
    fn test_div_by_zero_polynomial() {
        let gf = gf256();
        assert_eq!(div_rem(&gf, &[1, 2], &[0, 0]), Err(PolyError::DivisionByZeroPolynomial));
        assert_eq!(div_rem(&gf, &[1, 2], &[]), Err(PolyError::DivisionByZeroPolynomial));
    }

    #[test]
    fn test_derivative() {
        // d/dx (c0 + c1 x + c2 x^2 + c3 x^3) = c1 + c3 x^2 in char 2
        assert_eq!(derivative(&[9, 8, 7, 6]), vec![8, 0, 6]);
        assert_eq!(derivative(&[9]), vec![0]);
        assert_eq!(degree(&[0, 0]), None);
        assert_eq!(degree(&[1, 0, 4, 0]), Some(2));
    }
}
