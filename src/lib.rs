//! `haplonet` builds **median-joining networks** from aligned haplotype sequences.
//!
//! ## Why haplonet?
//!
//! 1. `haplonet` _reconstructs_ unsampled ancestors.
//!
//!    Observed haplotypes are joined by a minimum spanning network, and _median vectors_
//!    (inferred ancestral sequences) are added wherever they explain the distances between
//!    haplotypes more parsimoniously (Bandelt, Forster & Röhl 1999).
//!
//! 1. `haplonet` _lays out_ the network.
//!
//!    A deterministic force-directed layout assigns 2D coordinates, ready for a renderer.
//!
//! ## Overview
//!
//! - [`sequence`] : Read a FASTA alignment and collapse it into haplotypes.
//! - [`haplonet_network`] : Build the network (re-exported as [`network`]).
//! - [`layout`] : Force-directed layout.
//! - [`run`](run::run) : Ingest, build, lay out and write the outputs.

#[cfg(feature = "cli")]
pub mod cli;
pub mod layout;
pub mod run;
pub mod sequence;
pub mod utils;

pub use haplonet_network as network;

#[cfg(feature = "cli")]
#[doc(inline)]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::layout::{Canvas, ForceLayout, LayoutArgs};
#[doc(inline)]
pub use crate::run::RunArgs;
#[doc(inline)]
pub use utils::verbosity::Verbosity;
