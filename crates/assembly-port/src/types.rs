// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core value types shared between the codec and engine adapters.

use core::fmt;

/// Number of elements in a 4×4 transform.
pub const MATRIX_LEN: usize = 16;

/// Engine-assigned node handle.
///
/// Valid only within the engine session that produced it. Documents keep
/// historical ids as plain integers so they cannot be used as live keys by
/// accident.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub i64);

impl NodeId {
    /// Raw integer value of the handle.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 4×4 affine transform, stored verbatim in engine element order.
///
/// Row- or column-major is the engine's business; the codec only preserves
/// the sixteen values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeMatrix(pub [f64; MATRIX_LEN]);

impl NodeMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Build a matrix from a slice. Returns `None` unless it has exactly 16 values.
    pub fn try_from_slice(values: &[f64]) -> Option<Self> {
        <[f64; MATRIX_LEN]>::try_from(values).ok().map(Self)
    }

    /// Translation-only transform; offsets land in elements 12..15.
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.0[12] = x;
        m.0[13] = y;
        m.0[14] = z;
        m
    }

    /// Borrow the raw values.
    pub fn values(&self) -> &[f64; MATRIX_LEN] {
        &self.0
    }
}

impl Default for NodeMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_slice_requires_sixteen_values() {
        assert!(NodeMatrix::try_from_slice(&[0.0; 15]).is_none());
        assert!(NodeMatrix::try_from_slice(&[0.0; 17]).is_none());
        let m = NodeMatrix::try_from_slice(NodeMatrix::IDENTITY.values()).unwrap();
        assert_eq!(m, NodeMatrix::IDENTITY);
    }

    #[test]
    fn translation_writes_last_column() {
        let m = NodeMatrix::translation(1.0, 2.0, 3.0);
        assert_eq!(&m.0[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(m.0[15], 1.0);
    }

    #[test]
    fn node_id_displays_raw_value() {
        assert_eq!(NodeId(-7).to_string(), "-7");
        assert_eq!(NodeId(42).get(), 42);
    }
}
