use crate::{Edge, Haplotype, Network, Node};
use color_eyre::eyre::{Report, Result};
use std::fs;

fn network(nodes: &[(&str, &str)], edges: &[(&str, &str, usize)]) -> Network {
    let mut network = Network::new();
    network.nodes = nodes.iter().map(|(id, seq)| Node::from(&Haplotype::new(*id, *seq, 1))).collect();
    network.edges = edges
        .iter()
        .map(|(source, target, distance)| Edge {
            source: source.to_string(),
            target: target.to_string(),
            distance: *distance,
        })
        .collect();
    network
}

#[test]
fn degree_and_components() -> Result<(), Report> {
    let network = network(
        &[("H1", "AAA"), ("H2", "AAT"), ("H3", "ATT"), ("H4", "GGG")],
        &[("H1", "H2", 1), ("H2", "H3", 1)],
    );
    assert_eq!(network.degree("H2")?, 2);
    assert_eq!(network.degree("H4")?, 0);
    assert!(network.degree("H5").is_err());
    assert_eq!(network.component_count()?, 2);
    assert_eq!(network.get_node_index("H3")?, 2);
    Ok(())
}

#[test]
fn empty_network() -> Result<(), Report> {
    let network = Network::new();
    assert!(network.is_empty());
    assert_eq!(network.median_count(), 0);
    assert_eq!(network.component_count()?, 0);
    Ok(())
}

#[test]
fn edge_to_unknown_node() {
    let network = network(&[("H1", "AA")], &[("H1", "MV1", 1)]);
    assert!(network.edge_indices().is_err());
    assert!(network.to_graph().is_err());
}

#[test]
fn reset_layout() -> Result<(), Report> {
    let mut network = network(&[("H1", "AA"), ("H2", "AT")], &[("H1", "H2", 1)]);

    // nothing saved yet
    assert!(network.reset_layout().is_err());

    network.nodes[0].x = 1.0;
    network.nodes[1].y = 2.0;
    network.save_layout();

    network.nodes.iter_mut().for_each(|node| {
        node.x += 50.0;
        node.y -= 50.0;
        node.vx = 3.0;
        node.vy = -3.0;
    });
    network.reset_layout()?;

    let coordinates = network.nodes.iter().map(|n| (n.x, n.y, n.vx, n.vy)).collect::<Vec<_>>();
    assert_eq!(coordinates, vec![(1.0, 0.0, 0.0, 0.0), (0.0, 2.0, 0.0, 0.0)]);

    // the snapshot is kept for later resets
    network.nodes[0].x = 7.0;
    network.reset_layout()?;
    assert_eq!(network.nodes[0].x, 1.0);
    Ok(())
}

#[test]
fn write_json() -> Result<(), Report> {
    let mut network = network(&[("H1", "AA"), ("H2", "AT")], &[("H1", "H2", 1)]);
    network.nodes.push(Node::median("MV1", "TT"));
    network.nodes[0].vx = 4.0;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("network.json");
    network.write(&path)?;

    let observed: Network = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(observed.nodes.len(), 3);
    assert_eq!(observed.edges, network.edges);
    assert!(observed.nodes[2].is_median);
    // velocities are not part of the output
    assert_eq!(observed.nodes[0].vx, 0.0);
    Ok(())
}

#[test]
fn write_dot() -> Result<(), Report> {
    let network = network(&[("H1", "AA"), ("H2", "AT")], &[("H1", "H2", 1)]);
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("network.dot");
    network.write(&path)?;

    let observed = fs::read_to_string(&path)?;
    assert!(observed.starts_with("graph G {"));
    assert!(observed.contains("\"H1\""));
    assert!(observed.contains("0 -- 1"));
    Ok(())
}

#[test]
fn write_unsupported_extension() -> Result<(), Report> {
    let network = network(&[("H1", "AA")], &[]);
    let dir = tempfile::tempdir()?;
    assert!(network.write(&dir.path().join("network.png")).is_err());
    assert!(network.write(&dir.path().join("network")).is_err());
    Ok(())
}
