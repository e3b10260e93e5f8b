//! Construction of median-joining networks (MJN) from aligned haplotypes.
//!
//! A median-joining network is a graph whose vertices are the observed haplotypes plus inferred
//! _median vectors_ (unsampled ancestral sequences), and whose edges join sequences at minimal
//! mutational distance (Bandelt, Forster & Röhl 1999).
//!
//! ## Overview
//!
//! - [`distance`] : Hamming distance and the full [`DistanceMatrix`].
//! - [`msn`] : Minimum spanning network with feasible-link classification.
//! - [`quasi_median`] : Candidate ancestral sequences of a connected triplet.
//! - [`median_joining`] : The iterative [`MedianJoining`] builder.
//! - [`network`] : The resulting [`Network`] of [`Node`]s and [`Edge`]s.
//!
//! ## Examples
//!
//! ```rust
//! use haplonet_network::{BuildArgs, Haplotype, MedianJoining};
//!
//! let haplotypes = vec![
//!     Haplotype::new("H1", "TAAA", 1),
//!     Haplotype::new("H2", "ATAA", 1),
//!     Haplotype::new("H3", "AATA", 1),
//! ];
//! let network = MedianJoining::new(&haplotypes, BuildArgs::default())?.run()?;
//!
//! // one median vector (AAAA) joins the three haplotypes
//! assert_eq!(network.median_count(), 1);
//! assert_eq!(network.edges.len(), 3);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

pub mod distance;
pub mod median_joining;
pub mod msn;
pub mod network;
pub mod quasi_median;

#[doc(inline)]
pub use distance::DistanceMatrix;
#[doc(inline)]
pub use median_joining::{BuildArgs, MedianJoining, Sampling, State};
#[doc(inline)]
pub use msn::{Link, Partition, SpanningNetwork};
#[doc(inline)]
pub use network::{Edge, Haplotype, Network, Node, Position};
