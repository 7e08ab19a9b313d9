//! Haircard generation algorithms.
//!
//! The pipeline runs these modules in order:
//!
//! - **Strands**: walk the hair edge mesh into ordered strands
//! - **Classify**: bucket strands by length and thin large buckets
//! - **Simplify**: Ramer–Douglas–Peucker reduction, grouped by point count
//! - **Cards**: build flat and volume quad ribbons per group
//! - **UV zones**: map every ribbon onto a texture atlas rectangle
//! - **Haircap**: fit the scalp cap and paint density colors
//!
//! [`HairCollection`](crate::collection::HairCollection) drives the full
//! pipeline; the modules can also be used on their own.

pub mod cards;
pub mod classify;
pub mod haircap;
pub mod progress;
pub mod simplify;
pub mod strands;
pub mod uv_zones;
