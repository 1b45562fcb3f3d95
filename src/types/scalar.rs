// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Wrapper for raw i32 representing Q16.16.Scalar type.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct FxpScalar(pub i32);

impl FxpScalar {
    pub const ONE: FxpScalar = FxpScalar(crate::fxp::qformat::SCALE);

    /// Absolute value, exact for `i32::MIN`.
    pub fn magnitude(self) -> u32 {
        self.0.unsigned_abs()
    }

    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}
