use crate::msn::{minimum_spanning_network, Link, Partition};
use crate::{DistanceMatrix, Haplotype, Node};
use color_eyre::eyre::{Report, Result};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn matrix(sequences: &[String]) -> Result<DistanceMatrix, Report> {
    let nodes = sequences
        .iter()
        .enumerate()
        .map(|(i, s)| Node::from(&Haplotype::new(format!("H{}", i + 1), s.as_str(), 1)))
        .collect_vec();
    DistanceMatrix::from_nodes(&nodes)
}

fn random_sequences(rng: &mut StdRng, n: usize, length: usize) -> Vec<String> {
    let alphabet = ['A', 'C', 'G', 'T'];
    (0..n)
        .map(|_| (0..length).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect())
        .unique()
        .collect()
}

// ----------------------------------------------------------------------------
// Compacting partition
//
// Components are labelled 0..k. Merging two components keeps the smaller label and decrements
// every label above the removed one, so labels stay compact.

struct CompactingPartition {
    labels: Vec<usize>,
}

impl CompactingPartition {
    fn new(n: usize) -> Self {
        CompactingPartition { labels: (0..n).collect() }
    }

    fn merge(&mut self, a: usize, b: usize) -> bool {
        let (la, lb) = (self.labels[a], self.labels[b]);
        if la == lb {
            return false;
        }
        let (old, new) = (la.max(lb), la.min(lb));
        self.labels.iter_mut().for_each(|label| {
            if *label == old {
                *label = new;
            } else if *label > old {
                *label -= 1;
            }
        });
        true
    }

    fn components(&self) -> usize {
        self.labels.iter().unique().count()
    }
}

fn reference_msn(matrix: &DistanceMatrix, epsilon: usize) -> Vec<Link> {
    let n = matrix.len();
    let pairs = (0..n)
        .tuple_combinations()
        .map(|(i, j)| (i, j, matrix[(i, j)]))
        .sorted_by_key(|(_, _, d)| *d)
        .collect_vec();

    let mut msn = CompactingPartition::new(n);
    let mut threshold = CompactingPartition::new(n);
    let mut max_value = usize::MAX;
    let mut links = Vec::new();

    for (i, j, d) in pairs {
        if d > max_value {
            break;
        }
        // full pass over every pair, as the published definition states it
        for (u, v) in (0..n).tuple_combinations() {
            if (matrix[(u, v)] as isize) < d as isize - epsilon as isize {
                threshold.merge(u, v);
            }
        }
        let feasible = threshold.labels[i] != threshold.labels[j];
        links.push(Link { source: i, target: j, distance: d, feasible });
        msn.merge(i, j);
        if msn.components() == 1 && max_value == usize::MAX {
            max_value = d + epsilon;
        }
    }

    links
}

// ----------------------------------------------------------------------------
// Tests

#[test]
fn partition_matches_compacting() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let n = rng.gen_range(1..30);
        let mut partition = Partition::new(n);
        let mut reference = CompactingPartition::new(n);
        for _ in 0..rng.gen_range(0..n * 2) {
            let (a, b) = (rng.gen_range(0..n), rng.gen_range(0..n));
            assert_eq!(partition.union(a, b), reference.merge(a, b));
        }
        assert_eq!(partition.components(), reference.components());
        let labels = partition.labels();
        for (a, b) in (0..n).tuple_combinations() {
            let expected = reference.labels[a] == reference.labels[b];
            assert_eq!(labels[a] == labels[b], expected);
            assert_eq!(partition.same(a, b), expected);
        }
    }
}

#[test]
fn msn_matches_compacting() -> Result<(), Report> {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let n = rng.gen_range(2..25);
        let length = rng.gen_range(3..9);
        let epsilon = rng.gen_range(0..3);
        let sequences = random_sequences(&mut rng, n, length);
        let matrix = matrix(&sequences)?;

        let observed = minimum_spanning_network(&matrix, epsilon).links;
        let expected = reference_msn(&matrix, epsilon);
        assert_eq!(observed, expected, "sequences: {sequences:?}, epsilon: {epsilon}");
    }
    Ok(())
}

#[test]
fn msn_tree_without_ties() -> Result<(), Report> {
    // pairwise distances 1, 2, 3 are all distinct
    let sequences = ["AAAAAA", "AAAAAT", "AAATTT"].map(String::from);
    let network = minimum_spanning_network(&matrix(&sequences)?, 0);
    assert_eq!(network.links.len(), sequences.len() - 1);
    assert!(network.links.iter().all(|link| link.feasible));
    Ok(())
}

#[test]
fn msn_keeps_infeasible_links() -> Result<(), Report> {
    // H1-H3 (3) is visited before the network connects at H3-H4 (3)
    let sequences = ["AAAAAA", "AAAAAT", "AAAGGT", "CCCGGT"].map(String::from);
    let network = minimum_spanning_network(&matrix(&sequences)?, 0);
    assert_eq!(network.links.len(), 4);
    let feasible = network.feasible().map(|link| (link.source, link.target)).collect_vec();
    assert_eq!(feasible, vec![(0, 1), (1, 2), (2, 3)]);
    Ok(())
}

#[test]
fn msn_ties_superimpose() -> Result<(), Report> {
    // square: every side 1, both diagonals 2, all four sides are minimal
    let sequences = ["AA", "AT", "TT", "TA"].map(String::from);
    let network = minimum_spanning_network(&matrix(&sequences)?, 0);
    assert_eq!(network.links.len(), 4);
    assert_eq!(network.feasible().count(), 4);
    assert_eq!(network.degrees(4), vec![2, 2, 2, 2]);
    Ok(())
}

#[test]
fn msn_epsilon_adds_links() -> Result<(), Report> {
    let sequences = ["AAAA", "AAAT", "AATA", "ATAA"].map(String::from);
    let strict = minimum_spanning_network(&matrix(&sequences)?, 0);
    let relaxed = minimum_spanning_network(&matrix(&sequences)?, 1);
    assert_eq!(strict.links.len(), 3);
    // the 2-mutation pairs now fall within distance 1 + epsilon
    assert_eq!(relaxed.links.len(), 6);
    // and no link shorter than 2 - epsilon joins them, so all are feasible
    assert_eq!(relaxed.feasible().count(), 6);
    Ok(())
}

#[test]
fn msn_no_feasible_shortcut() -> Result<(), Report> {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let sequences = random_sequences(&mut rng, 12, 6);
        let matrix = matrix(&sequences)?;
        let network = minimum_spanning_network(&matrix, 0);

        // a feasible link is never bridged by a path of strictly shorter links
        for link in network.feasible() {
            let mut shorter = Partition::new(matrix.len());
            for (u, v) in (0..matrix.len()).tuple_combinations() {
                if matrix[(u, v)] < link.distance {
                    shorter.union(u, v);
                }
            }
            assert!(!shorter.same(link.source, link.target));
        }
    }
    Ok(())
}

#[test]
fn msn_small_inputs() -> Result<(), Report> {
    assert!(minimum_spanning_network(&matrix(&[])?, 0).links.is_empty());
    assert!(minimum_spanning_network(&matrix(&["ACGT".to_string()])?, 0).links.is_empty());
    Ok(())
}

#[test]
fn adjacency_in_link_order() -> Result<(), Report> {
    let sequences = ["AAAA", "AAAT", "AATA", "ATAA"].map(String::from);
    let network = minimum_spanning_network(&matrix(&sequences)?, 0);
    let adjacency = network.adjacency(4);
    assert_eq!(adjacency[0], vec![1, 2, 3]);
    assert_eq!(adjacency[3], vec![0]);
    Ok(())
}
