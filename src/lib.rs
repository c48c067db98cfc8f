//! Geographic point clustering for incident hotspot maps
//!
//! Every strategy takes a flat slice of [`Point`]s and returns freshly built
//! [`Cluster`]s whose members borrow from that slice. Calls share no state and
//! run synchronously on the calling thread.
//!
//! ```
//! use geo_hotspot::{Point, dbscan};
//!
//! let points = vec![
//!     Point::at(59.955982, 30.244759),
//!     Point::at(59.955975, 30.244720),
//!     Point::at(59.956100, 30.244900),
//!     Point::at(60.029499, 30.434124),
//! ];
//! let clusters = dbscan(&points, 100.0, 3).unwrap();
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].count, 3);
//! ```

pub mod cluster;

pub use cluster::*;
