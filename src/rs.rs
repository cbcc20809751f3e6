// Reed-Solomon encoder/decoder over GF(2^m)
// Systematic encoding: codeword = [data | parity]
// Polynomial convention: coeff[0] is constant term (x^0), coeff[i] is x^i coefficient
// Codeword position mapping: position 0 = highest power of x (first symbol = x^(n-1) coefficient)

use std::sync::Arc;

use tracing::debug;

use crate::gf::{FieldError, GaloisField, Symbol};
use crate::poly;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("message of {k} symbols plus {r} check symbols exceeds the maximum codeword length {max}")]
    InvalidLength { k: usize, r: usize, max: usize },
    #[error("message symbol {symbol} at index {index} does not fit in the field (max {max})")]
    SymbolOutOfRange { index: usize, symbol: Symbol, max: Symbol },
}

/// Reasons a received word could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    #[error("received word has {actual} symbols, expected {expected} (max codeword length {max})")]
    InvalidLength { expected: usize, actual: usize, max: usize },
    #[error("received symbol {symbol} at index {index} does not fit in the field (max {max})")]
    SymbolOutOfRange { index: usize, symbol: Symbol, max: Symbol },
    #[error("error locator has degree {located}, more than the {bound} correctable errors")]
    TooManyErrors { located: usize, bound: usize },
    #[error("error locator has degree {expected} but {found} roots in the codeword")]
    ErrorLocatorRootCountMismatch { expected: usize, found: usize },
    #[error("corrected word still has nonzero syndromes")]
    CorrectionVerificationFailed,
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A successfully decoded word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The first k symbols of the corrected codeword.
    pub message: Vec<Symbol>,
    /// Codeword positions that were corrected, in ascending order.
    pub positions: Vec<usize>,
}

impl Decoded {
    pub fn corrections(&self) -> usize {
        self.positions.len()
    }
}

/// Build generator polynomial for nsym parity symbols
/// g(x) = (x - alpha^0)(x - alpha^1)...(x - alpha^(nsym-1))
pub fn build_generator(gf: &GaloisField, nsym: usize) -> Vec<Symbol> {
    let mut g = vec![1];
    for i in 0..nsym {
        // Multiply by (x + alpha^i): in GF(2^m), subtraction = addition
        g = poly::mul(gf, &g, &[gf.alpha_pow(i), 1]);
    }
    g
}

/// Codeword symbols in transmission order, read as a polynomial with
/// coeff[0] = constant term.
fn as_poly(word: &[Symbol]) -> Vec<Symbol> {
    word.iter().rev().copied().collect()
}

/// An RS(n, n - nsym) code over a fixed field. The generator polynomial is
/// built once and reused for every encode.
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    gf: Arc<GaloisField>,
    nsym: usize,
    generator: Vec<Symbol>,
}

impl ReedSolomon {
    pub fn new(gf: Arc<GaloisField>, nsym: usize) -> Result<Self, EncodeError> {
        if nsym >= gf.order() {
            return Err(EncodeError::InvalidLength { k: 0, r: nsym, max: gf.order() });
        }
        let generator = build_generator(&gf, nsym);
        Ok(Self { gf, nsym, generator })
    }

    pub fn field(&self) -> &Arc<GaloisField> {
        &self.gf
    }

    pub fn nsym(&self) -> usize {
        self.nsym
    }

    /// Largest message length this code accepts.
    pub fn max_message_len(&self) -> usize {
        self.gf.order() - self.nsym
    }

    /// Number of symbol errors guaranteed correctable.
    pub fn correction_bound(&self) -> usize {
        self.nsym / 2
    }

    pub fn generator(&self) -> &[Symbol] {
        &self.generator
    }

    fn check_message(&self, message: &[Symbol]) -> Result<(), EncodeError> {
        let k = message.len();
        if k + self.nsym > self.gf.order() {
            return Err(EncodeError::InvalidLength { k, r: self.nsym, max: self.gf.order() });
        }
        if let Some((index, &symbol)) = message.iter().enumerate().find(|&(_, &s)| !self.gf.contains(s)) {
            return Err(EncodeError::SymbolOutOfRange { index, symbol, max: self.gf.max_symbol() });
        }
        Ok(())
    }

    /// The nsym check symbols for `message`: the remainder of
    /// message(x) * x^nsym divided by g(x), highest power first.
    pub fn check_symbols(&self, message: &[Symbol]) -> Result<Vec<Symbol>, EncodeError> {
        self.check_message(message)?;
        if self.nsym == 0 {
            return Ok(vec![]);
        }

        // Synthetic division by the monic g(x); after the loop the last
        // nsym entries hold the remainder.
        let k = message.len();
        let mut work = vec![0; k + self.nsym];
        work[..k].copy_from_slice(message);
        for i in 0..k {
            let coef = work[i];
            if coef != 0 {
                for j in 1..=self.nsym {
                    work[i + j] ^= self.gf.mul(self.generator[self.nsym - j], coef);
                }
            }
        }
        let parity = work.split_off(k);
        Ok(parity)
    }

    /// Systematic RS encode: given k-symbol message, produce (k + nsym)-symbol codeword
    /// codeword = [message | parity]
    pub fn encode(&self, message: &[Symbol]) -> Result<Vec<Symbol>, EncodeError> {
        let parity = self.check_symbols(message)?;
        let mut codeword = Vec::with_capacity(message.len() + parity.len());
        codeword.extend_from_slice(message);
        codeword.extend(parity);
        Ok(codeword)
    }

    /// True iff `word` is divisible by the generator polynomial.
    pub fn is_codeword(&self, word: &[Symbol]) -> bool {
        if word.len() < self.nsym || word.len() > self.gf.order() || !word.iter().all(|&s| self.gf.contains(s)) {
            return false;
        }
        matches!(
            poly::div_rem(&self.gf, &as_poly(word), &self.generator),
            Ok((_, rem)) if poly::degree(&rem).is_none()
        )
    }

    /// Compute syndromes S_j = r(alpha^j) for j = 0..nsym-1
    /// where r(x) is received codeword as polynomial
    pub fn syndromes(&self, word: &[Symbol]) -> Vec<Symbol> {
        let r = as_poly(word);
        (0..self.nsym)
            .map(|j| poly::eval(&self.gf, &r, self.gf.alpha_pow(j)))
            .collect()
    }

    /// Berlekamp-Massey algorithm to find error locator polynomial sigma(x)
    /// sigma(x) = prod_{j} (1 - X_j * x) where X_j = alpha^(position_j)
    pub fn berlekamp_massey(&self, syndromes: &[Symbol]) -> Result<Vec<Symbol>, FieldError> {
        let gf = &self.gf;
        let mut c = vec![1]; // Current error locator
        let mut b = vec![1]; // Previous error locator
        let mut l = 0usize; // Number of errors
        let mut m = 1usize; // Shift counter
        let mut delta_prev = 1;

        for r in 0..syndromes.len() {
            // Compute discrepancy
            let mut delta = syndromes[r];
            for i in 1..=l.min(c.len() - 1) {
                delta ^= gf.mul(c[i], syndromes[r - i]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            // c(x) = c(x) - delta/delta_prev * x^m * b(x)
            let scale = gf.div(delta, delta_prev)?;
            let t = c.clone();
            if c.len() < b.len() + m {
                c.resize(b.len() + m, 0);
            }
            for (i, &bi) in b.iter().enumerate() {
                c[i + m] ^= gf.mul(scale, bi);
            }

            if 2 * l <= r {
                // Length change
                l = r + 1 - l;
                b = t;
                delta_prev = delta;
                m = 1;
            } else {
                m += 1;
            }
        }

        Ok(poly::trim(c))
    }

    /// Chien search: find roots of error locator polynomial
    /// sigma(X_j^-1) = 0 means error at position where X_j = alpha^(n-1-pos)
    ///
    /// Every nonzero field element is tried. Roots whose position falls outside
    /// the (shortened) codeword are not reported, so the caller sees fewer
    /// positions than the locator degree.
    pub fn chien_search(&self, sigma: &[Symbol], n: usize) -> Vec<usize> {
        let mut positions: Vec<usize> = (0..self.gf.order())
            .filter(|&power| poly::eval(&self.gf, sigma, self.gf.alpha_pow_inv(power)) == 0)
            .filter(|&power| power < n)
            .map(|power| n - 1 - power)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Forney algorithm: compute error magnitudes
    /// Every position must be below `n`, as returned by `chien_search`.
    pub fn forney(
        &self,
        syndromes: &[Symbol],
        sigma: &[Symbol],
        positions: &[usize],
        n: usize,
    ) -> Result<Vec<Symbol>, FieldError> {
        let gf = &self.gf;

        // Omega(x) = S(x) * sigma(x) mod x^nsym
        let mut omega = poly::mul(gf, syndromes, sigma);
        omega.truncate(self.nsym);

        let sigma_prime = poly::derivative(sigma);

        let mut magnitudes = Vec::with_capacity(positions.len());
        for &pos in positions {
            let power = n - 1 - pos;
            let x_j = gf.alpha_pow(power);
            let x_j_inv = gf.alpha_pow_inv(power);

            let omega_val = poly::eval(gf, &omega, x_j_inv);
            let sigma_prime_val = poly::eval(gf, &sigma_prime, x_j_inv);

            if sigma_prime_val == 0 {
                // Repeated root; leave it to the syndrome re-check to reject
                magnitudes.push(0);
            } else {
                // e_j = X_j * Omega(X_j^-1) / sigma'(X_j^-1)
                magnitudes.push(gf.mul(x_j, gf.div(omega_val, sigma_prime_val)?));
            }
        }
        Ok(magnitudes)
    }

    /// Decode a received word of k + nsym symbols.
    pub fn decode(&self, received: &[Symbol], k: usize) -> Result<Decoded, DecodeFailure> {
        let n = received.len();
        if n != k + self.nsym || n > self.gf.order() {
            return Err(DecodeFailure::InvalidLength {
                expected: k + self.nsym,
                actual: n,
                max: self.gf.order(),
            });
        }
        if let Some((index, &symbol)) = received.iter().enumerate().find(|&(_, &s)| !self.gf.contains(s)) {
            return Err(DecodeFailure::SymbolOutOfRange { index, symbol, max: self.gf.max_symbol() });
        }

        let syndromes = self.syndromes(received);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(Decoded { message: received[..k].to_vec(), positions: vec![] });
        }

        let sigma = self.berlekamp_massey(&syndromes)?;
        let num_errors = sigma.len() - 1;
        debug!(n, k, nsym = self.nsym, num_errors, "nonzero syndromes");

        let bound = self.correction_bound();
        if num_errors > bound {
            return Err(DecodeFailure::TooManyErrors { located: num_errors, bound });
        }

        let positions = self.chien_search(&sigma, n);
        if positions.len() != num_errors {
            debug!(expected = num_errors, found = positions.len(), "chien search failed");
            return Err(DecodeFailure::ErrorLocatorRootCountMismatch {
                expected: num_errors,
                found: positions.len(),
            });
        }

        let magnitudes = self.forney(&syndromes, &sigma, &positions, n)?;

        let mut corrected = received.to_vec();
        for (&pos, &mag) in positions.iter().zip(magnitudes.iter()) {
            corrected[pos] ^= mag;
        }

        // Verify
        if self.syndromes(&corrected).iter().any(|&s| s != 0) {
            return Err(DecodeFailure::CorrectionVerificationFailed);
        }

        debug!(?positions, "corrected");
        corrected.truncate(k);
        Ok(Decoded { message: corrected, positions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(nsym: usize) -> ReedSolomon {
        ReedSolomon::new(GaloisField::shared(8).unwrap(), nsym).unwrap()
    }

    fn hello() -> Vec<Symbol> {
        b"Hello".iter().map(|&b| b as Symbol).collect()
    }

    #[test]
    fn test_generator_roots() {
        let rs = codec(4);
        let gf = rs.field();
        assert_eq!(rs.generator(), &[64, 120, 54, 15, 1]);
        for i in 0..4 {
            assert_eq!(poly::eval(gf, rs.generator(), gf.alpha_pow(i)), 0);
        }
    }

    #[test]
    fn test_known_check_symbols() {
        let rs = codec(4);
        assert_eq!(rs.check_symbols(&hello()).unwrap(), vec![146, 152, 203, 131]);
        assert_eq!(
            rs.check_symbols(&[3, 17, 255, 0, 9, 9, 9, 1, 1, 1]).unwrap(),
            vec![50, 242, 157, 184]
        );
    }

    #[test]
    fn test_syndrome_zero_for_valid_codeword() {
        let rs = codec(4);
        let codeword = rs.encode(&hello()).unwrap();
        let syndromes = rs.syndromes(&codeword);
        assert!(syndromes.iter().all(|&s| s == 0), "syndromes should be zero for valid codeword: {:?}", syndromes);
        assert!(rs.is_codeword(&codeword));

        let mut bad = codeword.clone();
        bad[0] ^= 1;
        assert!(!rs.is_codeword(&bad));
    }

    #[test]
    fn test_encode_decode_no_errors() {
        let rs = codec(4);
        let codeword = rs.encode(&hello()).unwrap();

        let decoded = rs.decode(&codeword, 5).unwrap();
        assert_eq!(decoded.message, hello());
        assert!(decoded.positions.is_empty());
    }

    #[test]
    fn test_encode_decode_single_error() {
        let rs = codec(4);
        let mut codeword = rs.encode(&hello()).unwrap();

        codeword[2] ^= 0x55;

        let decoded = rs.decode(&codeword, 5).unwrap();
        assert_eq!(decoded.message, hello());
        assert_eq!(decoded.positions, vec![2]);
    }

    #[test]
    fn test_encode_decode_two_errors() {
        let rs = codec(4);
        let mut codeword = rs.encode(&hello()).unwrap();

        codeword[1] ^= 0x12;
        codeword[4] ^= 0x34;

        let decoded = rs.decode(&codeword, 5).unwrap();
        assert_eq!(decoded.message, hello());
        assert_eq!(decoded.positions, vec![1, 4]);
    }

    #[test]
    fn test_error_in_check_symbols() {
        let rs = codec(4);
        let mut codeword = rs.encode(&hello()).unwrap();
        codeword[8] ^= 0xff;

        let decoded = rs.decode(&codeword, 5).unwrap();
        assert_eq!(decoded.message, hello());
        assert_eq!(decoded.positions, vec![8]);
    }

    #[test]
    fn test_too_many_errors() {
        let rs = codec(4);
        let mut codeword = rs.encode(&hello()).unwrap();

        codeword[0] ^= 0x11;
        codeword[2] ^= 0x22;
        codeword[4] ^= 0x33;

        let result = rs.decode(&codeword, 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_correction_is_rejected() {
        // Locator degree and root count agree, but applying the Forney
        // magnitudes leaves nonzero syndromes: no codeword lies within 2.
        let rs = ReedSolomon::new(GaloisField::shared(4).unwrap(), 4).unwrap();
        assert_eq!(
            rs.decode(&[11, 10, 14, 5, 13, 10], 2),
            Err(DecodeFailure::CorrectionVerificationFailed)
        );
    }

    #[test]
    fn test_berlekamp_massey_single_error() {
        let rs = codec(4);
        let mut codeword = rs.encode(&hello()).unwrap();
        codeword[3] ^= 7;
        let sigma = rs.berlekamp_massey(&rs.syndromes(&codeword)).unwrap();
        // sigma(x) = 1 + X x with X = alpha^(n-1-3)
        assert_eq!(sigma, vec![1, rs.field().alpha_pow(9 - 1 - 3)]);
        assert_eq!(rs.chien_search(&sigma, 9), vec![3]);
    }

    #[test]
    fn test_length_checks() {
        let rs = codec(4);
        let long = vec![0; 252];
        assert_eq!(
            rs.encode(&long).unwrap_err(),
            EncodeError::InvalidLength { k: 252, r: 4, max: 255 }
        );
        assert!(rs.encode(&vec![0; 251]).is_ok());
        assert_eq!(
            rs.decode(&[1, 2, 3], 5).unwrap_err(),
            DecodeFailure::InvalidLength { expected: 9, actual: 3, max: 255 }
        );
        assert_eq!(
            rs.encode(&[1, 256]).unwrap_err(),
            EncodeError::SymbolOutOfRange { index: 1, symbol: 256, max: 255 }
        );
        assert!(ReedSolomon::new(GaloisField::shared(4).unwrap(), 15).is_err());
    }

    #[test]
    fn test_zero_check_symbols() {
        let rs = codec(0);
        assert_eq!(rs.encode(&hello()).unwrap(), hello());
        // Nothing to check against, so anything decodes
        let decoded = rs.decode(&[9, 9, 9], 3).unwrap();
        assert_eq!(decoded.message, vec![9, 9, 9]);
    }

    #[test]
    fn test_wide_field() {
        let rs = ReedSolomon::new(GaloisField::shared(14).unwrap(), 10).unwrap();
        let message: Vec<Symbol> = (0..500).map(|i| (i * 37 % 16384) as Symbol).collect();
        let mut codeword = rs.encode(&message).unwrap();
        for (i, pos) in [0usize, 99, 250, 499, 505].into_iter().enumerate() {
            codeword[pos] ^= 1000 + i as Symbol;
        }
        let decoded = rs.decode(&codeword, 500).unwrap();
        assert_eq!(decoded.message, message);
        assert_eq!(decoded.positions, vec![0, 99, 250, 499, 505]);
    }
}
