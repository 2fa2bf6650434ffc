// Affine points on secp256k1
//
// `CurvePoint` is either a finite point satisfying y² = x³ + 7 (mod p) or the
// identity. Scalar multiplication runs in Jacobian coordinates (X, Y, Z),
// where x = X/Z², y = Y/Z³, and converts back with a single inversion.

use num_bigint::BigUint;
use num_traits::Zero;

use super::error::{KeyError, Result};
use super::field::FieldElement;
use super::params::curve;

/// A point on secp256k1 or the point at infinity
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CurvePoint {
    Infinity,
    Finite { x: FieldElement, y: FieldElement },
}

impl CurvePoint {
    /// Generator point G
    pub fn generator() -> Self {
        let c = curve();
        CurvePoint::Finite {
            x: FieldElement::new(c.gx.clone()),
            y: FieldElement::new(c.gy.clone()),
        }
    }

    /// Check y² = x³ + 7 (mod p)
    pub fn is_on_curve(x: &FieldElement, y: &FieldElement) -> bool {
        y.square() == Self::curve_rhs(x)
    }

    fn curve_rhs(x: &FieldElement) -> FieldElement {
        x.square().mul(x).add(&FieldElement::new(curve().b.clone()))
    }

    /// Build a finite point from integer coordinates.
    ///
    /// A zero coordinate or one outside [0, p) fails with
    /// `InvalidPointCoordinates` (no curve point has x = 0 or y = 0); a pair
    /// off the curve fails with `InvalidYForCurve`.
    pub fn from_coordinates(x: BigUint, y: BigUint) -> Result<Self> {
        if x.is_zero() || y.is_zero() {
            return Err(KeyError::InvalidPointCoordinates);
        }
        let x = FieldElement::from_canonical(x).ok_or(KeyError::InvalidPointCoordinates)?;
        let y = FieldElement::from_canonical(y).ok_or(KeyError::InvalidPointCoordinates)?;
        if !Self::is_on_curve(&x, &y) {
            return Err(KeyError::InvalidYForCurve);
        }
        Ok(CurvePoint::Finite { x, y })
    }

    /// Recover the point with the given x and y parity (decompression)
    pub fn from_x(x: BigUint, odd: bool) -> Result<Self> {
        let x = FieldElement::from_canonical(x).ok_or(KeyError::InvalidPointCoordinates)?;
        let y = Self::curve_rhs(&x).sqrt().ok_or(KeyError::InvalidYForCurve)?;
        let y = if y.is_odd() == odd { y } else { y.neg() };
        Ok(CurvePoint::Finite { x, y })
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }

    pub fn x(&self) -> Option<&FieldElement> {
        match self {
            CurvePoint::Finite { x, .. } => Some(x),
            CurvePoint::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<&FieldElement> {
        match self {
            CurvePoint::Finite { y, .. } => Some(y),
            CurvePoint::Infinity => None,
        }
    }

    /// Point negation: -(x, y) = (x, -y)
    pub fn negate(&self) -> Self {
        match self {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Finite { x, y } => CurvePoint::Finite {
                x: x.clone(),
                y: y.neg(),
            },
        }
    }

    /// Affine addition; infinity is the identity
    pub fn add(&self, other: &Self) -> Self {
        let (x1, y1, x2, y2) = match (self, other) {
            (CurvePoint::Infinity, q) => return q.clone(),
            (p, CurvePoint::Infinity) => return p.clone(),
            (CurvePoint::Finite { x: x1, y: y1 }, CurvePoint::Finite { x: x2, y: y2 }) => {
                (x1, y1, x2, y2)
            }
        };

        if x1 == x2 {
            return if y1 == y2 {
                self.double()
            } else {
                CurvePoint::Infinity
            };
        }

        // λ = (y2 - y1) / (x2 - x1)
        let lambda = y2.sub(y1).mul(&x2.sub(x1).invert());
        let x3 = lambda.square().sub(x1).sub(x2);
        let y3 = lambda.mul(&x1.sub(&x3)).sub(y1);
        CurvePoint::Finite { x: x3, y: y3 }
    }

    /// Affine doubling
    pub fn double(&self) -> Self {
        let (x, y) = match self {
            CurvePoint::Finite { x, y } if !y.is_zero() => (x, y),
            _ => return CurvePoint::Infinity,
        };

        // λ = 3x² / 2y (a = 0)
        let lambda = x.square().mul_small(3).mul(&y.double().invert());
        let x3 = lambda.square().sub(&x.double());
        let y3 = lambda.mul(&x.sub(&x3)).sub(y);
        CurvePoint::Finite { x: x3, y: y3 }
    }

    /// Scalar multiplication k·P with k reduced mod n
    pub fn mul(&self, scalar: &BigUint) -> Self {
        let k = scalar % &curve().n;
        if k.is_zero() || self.is_infinity() {
            return CurvePoint::Infinity;
        }

        let base = Jacobian::from_affine(self);
        let mut acc = Jacobian::infinity();

        // Double-and-add, most significant bit first
        for byte in k.to_bytes_be() {
            for bit in (0..8).rev() {
                acc = acc.double();
                if (byte >> bit) & 1 == 1 {
                    acc = acc.add(&base);
                }
            }
        }

        acc.to_affine()
    }
}

/// Jacobian point (X, Y, Z); Z = 0 encodes infinity
#[derive(Clone, Debug)]
struct Jacobian {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
}

impl Jacobian {
    fn infinity() -> Self {
        Jacobian {
            x: FieldElement::one(),
            y: FieldElement::one(),
            z: FieldElement::zero(),
        }
    }

    fn from_affine(point: &CurvePoint) -> Self {
        match point {
            CurvePoint::Infinity => Self::infinity(),
            CurvePoint::Finite { x, y } => Jacobian {
                x: x.clone(),
                y: y.clone(),
                z: FieldElement::one(),
            },
        }
    }

    fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    fn to_affine(&self) -> CurvePoint {
        if self.is_infinity() {
            return CurvePoint::Infinity;
        }
        let z_inv = self.z.invert();
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2.mul(&z_inv);
        CurvePoint::Finite {
            x: self.x.mul(&z_inv2),
            y: self.y.mul(&z_inv3),
        }
    }

    /// A = Y², B = 4·X·A, C = 8·A², D = 3·X²
    /// X3 = D² - 2·B, Y3 = D·(B - X3) - C, Z3 = 2·Y·Z
    fn double(&self) -> Self {
        if self.is_infinity() || self.y.is_zero() {
            return Self::infinity();
        }

        let a = self.y.square();
        let b = self.x.mul(&a).mul_small(4);
        let c = a.square().mul_small(8);
        let d = self.x.square().mul_small(3);

        let x3 = d.square().sub(&b.double());
        let y3 = d.mul(&b.sub(&x3)).sub(&c);
        let z3 = self.y.mul(&self.z).double();

        Jacobian { x: x3, y: y3, z: z3 }
    }

    fn add(&self, other: &Self) -> Self {
        if self.is_infinity() {
            return other.clone();
        }
        if other.is_infinity() {
            return self.clone();
        }

        let z1_2 = self.z.square();
        let z1_3 = z1_2.mul(&self.z);
        let z2_2 = other.z.square();
        let z2_3 = z2_2.mul(&other.z);

        let u1 = self.x.mul(&z2_2);
        let u2 = other.x.mul(&z1_2);
        let s1 = self.y.mul(&z2_3);
        let s2 = other.y.mul(&z1_3);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        if h.is_zero() {
            return if r.is_zero() {
                self.double()
            } else {
                Self::infinity()
            };
        }

        let h2 = h.square();
        let h3 = h2.mul(&h);
        let u1h2 = u1.mul(&h2);

        let x3 = r.square().sub(&h3).sub(&u1h2.double());
        let y3 = r.mul(&u1h2.sub(&x3)).sub(&s1.mul(&h3));
        let z3 = self.z.mul(&other.z).mul(&h);

        Jacobian { x: x3, y: y3, z: z3 }
    }
}
