// Arithmetic in the secp256k1 base field
//
// Elements are kept fully reduced: 0 <= value < p.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::fmt;

use super::params::curve;

/// Field element (mod p = 2^256 - 2^32 - 977)
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldElement(BigUint);

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement(BigUint::zero())
    }

    pub fn one() -> Self {
        FieldElement(BigUint::one())
    }

    /// Reduce an arbitrary integer into the field
    pub fn new(value: BigUint) -> Self {
        let p = &curve().p;
        if &value >= p {
            FieldElement(value % p)
        } else {
            FieldElement(value)
        }
    }

    /// Accept only canonical values (already below p)
    pub fn from_canonical(value: BigUint) -> Option<Self> {
        if value < curve().p {
            Some(FieldElement(value))
        } else {
            None
        }
    }

    pub fn from_u64(value: u64) -> Self {
        Self::new(BigUint::from(value))
    }

    /// Big-endian bytes, reduced mod p
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self::new(BigUint::from_bytes_be(bytes))
    }

    /// Big-endian encoding left-padded to 32 bytes
    pub fn to_bytes_be(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    pub fn value(&self) -> &BigUint {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_odd(&self) -> bool {
        self.0.to_bytes_le()[0] & 1 == 1
    }

    pub fn add(&self, other: &Self) -> Self {
        let sum = &self.0 + &other.0;
        let p = &curve().p;
        if &sum >= p {
            FieldElement(sum - p)
        } else {
            FieldElement(sum)
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        if self.0 >= other.0 {
            FieldElement(&self.0 - &other.0)
        } else {
            FieldElement(&curve().p - &other.0 + &self.0)
        }
    }

    pub fn neg(&self) -> Self {
        if self.is_zero() {
            self.clone()
        } else {
            FieldElement(&curve().p - &self.0)
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        FieldElement((&self.0 * &other.0) % &curve().p)
    }

    pub fn square(&self) -> Self {
        self.mul(self)
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Multiply by small constant
    pub fn mul_small(&self, k: u32) -> Self {
        FieldElement((&self.0 * k) % &curve().p)
    }

    pub fn pow(&self, exp: &BigUint) -> Self {
        FieldElement(self.0.modpow(exp, &curve().p))
    }

    /// Multiplicative inverse via Fermat: a^(p-2). Zero maps to zero.
    pub fn invert(&self) -> Self {
        self.pow(&curve().inv_exp)
    }

    /// Square root, if the element is a quadratic residue.
    /// For p ≡ 3 (mod 4), sqrt(a) = a^((p+1)/4)
    pub fn sqrt(&self) -> Option<Self> {
        let root = self.pow(&curve().sqrt_exp);
        if root.square() == *self {
            Some(root)
        } else {
            None
        }
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FieldElement({})", hex::encode(self.to_bytes_be()))
    }
}

impl fmt::LowerHex for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes_be()))
    }
}
