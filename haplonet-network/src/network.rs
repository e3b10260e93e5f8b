//! The [`Network`] model: haplotypes, median vectors and the edges between them.

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use itertools::Itertools;
use petgraph::algo::connected_components;
use petgraph::dot::Dot;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// ----------------------------------------------------------------------------
// Haplotype
// ----------------------------------------------------------------------------

/// A distinct observed sequence variant, with its sample count and names.
///
/// The `sequence` is restricted to positions free of ambiguity codes across all samples.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Haplotype {
    pub id: String,
    pub sequence: String,
    pub count: usize,
    pub samples: Vec<String>,
}

impl Haplotype {
    /// Returns a new [`Haplotype`] with no sample names.
    ///
    /// ```rust
    /// use haplonet_network::Haplotype;
    /// let haplotype = Haplotype::new("H1", "ACGT", 2);
    /// assert_eq!(haplotype.sequence, "ACGT");
    /// assert!(haplotype.samples.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, sequence: impl Into<String>, count: usize) -> Self {
        Haplotype { id: id.into(), sequence: sequence.into(), count, samples: Vec::new() }
    }
}

// ----------------------------------------------------------------------------
// Node
// ----------------------------------------------------------------------------

/// A vertex of the [`Network`], either an observed haplotype or an inferred median vector.
///
/// Median vectors always have a `count` of 0 and no samples.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub sequence: String,
    pub is_median: bool,
    pub count: usize,
    pub samples: Vec<String>,
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    pub vx: f64,
    #[serde(skip)]
    pub vy: f64,
}

impl Node {
    /// Returns a new median vector [`Node`].
    pub fn median(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Node { id: id.into(), sequence: sequence.into(), is_median: true, ..Default::default() }
    }
}

impl From<&Haplotype> for Node {
    /// Returns an owned [`Node`] copied from a [`Haplotype`].
    fn from(haplotype: &Haplotype) -> Self {
        Node {
            id: haplotype.id.clone(),
            sequence: haplotype.sequence.clone(),
            is_median: false,
            count: haplotype.count,
            samples: haplotype.samples.clone(),
            ..Default::default()
        }
    }
}

// ----------------------------------------------------------------------------
// Edge
// ----------------------------------------------------------------------------

/// An undirected edge between two [`Node`] ids, weighted by their Hamming distance.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub distance: usize,
}

/// A saved node coordinate.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Position {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

// ----------------------------------------------------------------------------
// Network
// ----------------------------------------------------------------------------

/// A median-joining network of [`Node`]s and [`Edge`]s.
///
/// After construction the topology and sequences are fixed, only node coordinates change.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Network {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Coordinates saved by [`Network::save_layout`].
    #[serde(skip)]
    pub original_layout: Option<Vec<Position>>,
}

impl Network {
    pub fn new() -> Self {
        Network { nodes: Vec::new(), edges: Vec::new(), original_layout: None }
    }

    /// An empty network has nothing to display, this is not a fault.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of median vectors.
    pub fn median_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_median).count()
    }

    /// Returns the index of the node with this id.
    pub fn get_node_index(&self, id: &str) -> Result<usize, Report> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| eyre!("Node {id:?} is not in the network."))
    }

    /// Returns the node with this id.
    pub fn get_node(&self, id: &str) -> Result<&Node, Report> {
        let i = self.get_node_index(id)?;
        Ok(&self.nodes[i])
    }

    /// Returns the number of edges incident to the node with this id.
    pub fn degree(&self, id: &str) -> Result<usize, Report> {
        self.get_node_index(id)?;
        let degree = self.edges.iter().filter(|e| e.source == id || e.target == id).count();
        Ok(degree)
    }

    /// Returns the (source, target, distance) node indices of every edge.
    ///
    /// Errors if an edge refers to a node id that is not in the network.
    pub fn edge_indices(&self) -> Result<Vec<(usize, usize, usize)>, Report> {
        let index: HashMap<&str, usize> =
            self.nodes.iter().enumerate().map(|(i, node)| (node.id.as_str(), i)).collect();

        self.edges
            .iter()
            .map(|edge| {
                let source = index
                    .get(edge.source.as_str())
                    .ok_or_else(|| eyre!("Edge source {:?} is not in the network.", edge.source))?;
                let target = index
                    .get(edge.target.as_str())
                    .ok_or_else(|| eyre!("Edge target {:?} is not in the network.", edge.target))?;
                Ok((*source, *target, edge.distance))
            })
            .collect()
    }

    /// Returns the network as an undirected petgraph [`UnGraph`].
    ///
    /// Node weights are ids, edge weights are distances. Node indices follow [`Network::nodes`].
    pub fn to_graph(&self) -> Result<UnGraph<String, usize>, Report> {
        let mut graph = UnGraph::with_capacity(self.nodes.len(), self.edges.len());
        let node_indices = self.nodes.iter().map(|node| graph.add_node(node.id.clone())).collect_vec();
        self.edge_indices()?.into_iter().for_each(|(source, target, distance)| {
            graph.add_edge(node_indices[source], node_indices[target], distance);
        });
        Ok(graph)
    }

    /// Returns the number of connected components.
    ///
    /// A network with more than one component is valid, it signals disconnected haplotypes.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use haplonet_network::{Edge, Haplotype, Network, Node};
    /// let mut network = Network::new();
    /// network.nodes = [("H1", "AA"), ("H2", "AT"), ("H3", "GG")]
    ///     .iter()
    ///     .map(|(id, seq)| Node::from(&Haplotype::new(*id, *seq, 1)))
    ///     .collect();
    /// network.edges.push(Edge { source: "H1".into(), target: "H2".into(), distance: 1 });
    /// assert_eq!(network.component_count()?, 2);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn component_count(&self) -> Result<usize, Report> {
        let graph = self.to_graph()?;
        Ok(connected_components(&graph))
    }

    /// Saves the current node coordinates, to be restored by [`Network::reset_layout`].
    pub fn save_layout(&mut self) {
        let positions = self
            .nodes
            .iter()
            .map(|node| Position { id: node.id.clone(), x: node.x, y: node.y })
            .collect();
        self.original_layout = Some(positions);
    }

    /// Restores the coordinates saved by [`Network::save_layout`] and clears node velocities.
    ///
    /// Neither the physics nor the topology are recomputed.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use haplonet_network::{Haplotype, Network, Node};
    /// let mut network = Network::new();
    /// network.nodes.push(Node::from(&Haplotype::new("H1", "A", 1)));
    /// network.nodes[0].x = 10.0;
    /// network.save_layout();
    /// network.nodes[0].x = 99.0;
    /// network.reset_layout()?;
    /// assert_eq!(network.nodes[0].x, 10.0);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn reset_layout(&mut self) -> Result<(), Report> {
        let positions = self
            .original_layout
            .as_ref()
            .ok_or_else(|| eyre!("No layout to restore."))
            .suggestion("Run the layout before resetting it.")?;
        let positions: HashMap<&str, &Position> =
            positions.iter().map(|p| (p.id.as_str(), p)).collect();

        self.nodes.iter_mut().for_each(|node| {
            if let Some(position) = positions.get(node.id.as_str()) {
                node.x = position.x;
                node.y = position.y;
                node.vx = 0.0;
                node.vy = 0.0;
            }
        });

        Ok(())
    }

    /// Returns the network in the [DOT](https://graphviz.org/doc/info/lang.html) format.
    ///
    /// Nodes are labelled by id and edges by their number of mutations.
    pub fn to_dot(&self) -> Result<String, Report> {
        let graph = self.to_graph()?;
        let output = format!("{}", Dot::new(&graph));
        // set graph id (for cytoscape)
        Ok(output.replacen("graph {", "graph G {", 1))
    }

    /// Write network to file.
    ///
    /// The format is chosen by extension: `.json` or `.dot`.
    pub fn write(&self, path: &Path) -> Result<(), Report> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| eyre!("Failed to get file extension: {path:?}"))?;

        let output = match ext {
            // JSON for downstream renderers
            "json" => serde_json::to_string_pretty(&self)
                .wrap_err_with(|| format!("Failed to serialize network for: {path:?}"))?,
            // DOT file for graphviz
            "dot" => self.to_dot()?,
            _ => {
                return Err(eyre!("Network write for extension .{ext} is not supported.")
                    .suggestion("Please try .json or .dot instead."))
            }
        };

        let mut file =
            File::create(path).wrap_err_with(|| format!("Failed to create file: {path:?}"))?;
        file.write_all(output.as_bytes())
            .wrap_err_with(|| format!("Failed to write file: {path:?}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
