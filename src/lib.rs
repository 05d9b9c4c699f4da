//! Procedural meshes from drawn 2D curves.
//!
//! Two generators live under [`geom`]:
//!
//! - **Lathe**: a profile curve `(x, radius)` is revolved around the X axis,
//!   optionally bent by offset graphs and shaped by a custom cross-section
//!   ([`geom::revolve`], [`geom::LatheModel`]).
//! - **Cross-sectional trace**: a spine is walked inside a silhouette, probing
//!   left and right for the silhouette's width, and the resulting slices are
//!   inflated into a tube ([`geom::trace`], [`geom::CrossSectionalModel`]).
//!
//! Generation is pure and never fails: degenerate input yields an empty mesh.
//! Configs can be checked up front with `validate`.
//!
//! ```
//! use lathe_engine::geom::{Point2, RevolveConfig, revolve};
//!
//! let profile = [Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)];
//! let config = RevolveConfig::default().with_count_per_ring(4);
//! let mesh = revolve(&profile, &config);
//! assert_eq!(mesh.vertex_count(), 8);
//! assert_eq!(mesh.indices.len(), 24);
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

pub mod geom;
