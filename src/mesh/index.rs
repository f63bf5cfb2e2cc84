//! Index types for mesh elements.
//!
//! This module provides type-safe index wrappers for points, triangles and
//! merged faces. The indices are generic over the underlying integer type to
//! support meshes of different sizes (u16 for small meshes, u32 for typical
//! meshes, u64 for massive meshes).

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for types that can be used as mesh indices.
///
/// This trait is implemented for `u16`, `u32`, and `u64`, allowing users to choose
/// the appropriate index size for their mesh.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The maximum valid index value.
    const MAX: Self;

    /// Convert from usize to this index type.
    ///
    /// # Panics
    /// Panics in debug builds if the value is too large for this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check whether `count` elements can all be addressed by this index type.
    fn fits(count: usize) -> bool {
        count == 0 || count - 1 <= Self::MAX.to_usize()
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v as u64 <= Self::MAX as u64,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// A type-safe point (vertex) index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PointId<I: MeshIndex = u32>(I);

/// A type-safe input triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId<I: MeshIndex = u32>(I);

/// A type-safe merged face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Get the raw value of the underlying type.
            #[inline]
            pub fn raw(self) -> I {
                self.0
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.index())
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(PointId, "P");
impl_index_type!(TriangleId, "T");
impl_index_type!(FaceId, "F");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id() {
        let p: PointId = PointId::new(42);
        assert_eq!(p.index(), 42);
        assert_eq!(PointId::<u32>::from(42), p);
    }

    #[test]
    fn test_type_safety() {
        // Distinct types sharing the same raw value
        let p: PointId = PointId::new(0);
        let t: TriangleId = TriangleId::new(0);
        let f: FaceId = FaceId::new(0);

        assert_eq!(p.index(), t.index());
        assert_eq!(t.index(), f.index());
    }

    #[test]
    fn test_small_indices() {
        let p: PointId<u16> = PointId::new(1000);
        assert_eq!(p.index(), 1000);
        assert_eq!(p.raw(), 1000u16);
    }

    #[test]
    fn test_debug_format() {
        let f: FaceId = FaceId::new(7);
        assert_eq!(format!("{:?}", f), "F(7)");
    }

    #[test]
    fn test_capacity() {
        assert!(u16::fits(0));
        assert!(u16::fits(65_536));
        assert!(!u16::fits(65_537));
        assert!(u32::fits(70_000));
        assert!(u64::fits(usize::MAX));
    }
}
