//! The six cubemap faces and their on-disk names.

/// One of the six faces of a cubemap.
///
/// The `repr(u8)` discriminant is the face's stable index; it also fixes the
/// order in which face files are written by every output stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +X face.
    PosX = 0,
    /// −X face.
    NegX = 1,
    /// +Y face.
    PosY = 2,
    /// −Y face.
    NegY = 3,
    /// +Z face.
    PosZ = 4,
    /// −Z face.
    NegZ = 5,
}

impl Face {
    /// All six faces in index order.
    pub const ALL: [Face; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Stable index of this face (0–5).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Face for a stable index, or `None` if out of range.
    pub fn from_index(index: usize) -> Option<Face> {
        Self::ALL.get(index).copied()
    }

    /// The short name used in face file names (`px`, `nx`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::PosX => "px",
            Self::NegX => "nx",
            Self::PosY => "py",
            Self::NegY => "ny",
            Self::PosZ => "pz",
            Self::NegZ => "nz",
        }
    }
}
