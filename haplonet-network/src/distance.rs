//! Pairwise Hamming distances between node sequences.

use crate::Node;
use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use std::ops::Index;

/// Returns the number of mismatched positions between two equal-length sequences.
///
/// Sequences of different lengths are a precondition violation (unaligned input) and return an
/// `Invalid input` error.
///
/// ## Examples
///
/// ```rust
/// use haplonet_network::distance::hamming;
/// assert_eq!(hamming("ACGT", "ACGA")?, 1);
/// assert_eq!(hamming("ACGT", "ACGT")?, 0);
/// assert!(hamming("ACGT", "ACG").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn hamming(a: &str, b: &str) -> Result<usize, Report> {
    if a.len() != b.len() {
        return Err(eyre!(
            "Invalid input: sequences are different lengths ({} vs {}).",
            a.len(),
            b.len()
        )
        .suggestion("Are you sure the sequences are aligned?"));
    }
    let distance = a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count();
    Ok(distance)
}

// ----------------------------------------------------------------------------
// Distance Matrix
// ----------------------------------------------------------------------------

/// A symmetric matrix of pairwise Hamming distances between [`Node`]s.
///
/// Rows and columns follow the order of the nodes the matrix was built from, the diagonal is zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DistanceMatrix {
    /// Node ids, in row order.
    pub ids: Vec<String>,
    /// Square matrix of distances.
    pub distances: Vec<Vec<usize>>,
}

impl DistanceMatrix {
    /// Returns the full distance matrix over the current node sequences.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use haplonet_network::{DistanceMatrix, Haplotype, Node};
    /// let nodes = [("H1", "AAAA"), ("H2", "AAAT"), ("H3", "TTAT")]
    ///     .map(|(id, seq)| Node::from(&Haplotype::new(id, seq, 1)));
    /// let matrix = DistanceMatrix::from_nodes(&nodes)?;
    /// assert_eq!(matrix.distances, vec![vec![0, 1, 3], vec![1, 0, 2], vec![3, 2, 0]]);
    /// assert_eq!(matrix[(2, 1)], 2);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn from_nodes(nodes: &[Node]) -> Result<Self, Report> {
        let n = nodes.len();
        let mut distances = vec![vec![0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let distance = hamming(&nodes[i].sequence, &nodes[j].sequence)?;
                distances[i][j] = distance;
                distances[j][i] = distance;
            }
        }

        let ids = nodes.iter().map(|node| node.id.clone()).collect();
        Ok(DistanceMatrix { ids, distances })
    }

    /// The number of nodes (rows) in the matrix.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = usize;

    fn index(&self, (i, j): (usize, usize)) -> &usize {
        &self.distances[i][j]
    }
}
