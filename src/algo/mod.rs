//! Mesh processing algorithms.
//!
//! - **Unfolding**: coplanar face merging, spanning forests over the face
//!   adjacency graph, rigid flattening and fragment arrangement
//!   ([`unfold`]).
//! - **Progress**: callbacks for reporting the stages of long operations
//!   ([`Progress`]).

pub mod progress;
pub mod unfold;

pub use progress::Progress;
