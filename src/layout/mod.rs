//! Force-directed layout of a [`Network`] on a rectangular canvas.
//!
//! Nodes start evenly spaced on a circle and are relaxed by a physics simulation:
//!
//! - every pair of nodes repels with magnitude `repulsion / distance²`.
//! - every edge is a linear spring toward `edge_length × edge.distance`, so edges with more
//!   mutations settle longer.
//! - velocities are damped and clamped to `max_speed` before moving the nodes.
//!
//! The simulation has no randomness: the same nodes, in the same order, with the same edges
//! always produce the same coordinates.

use color_eyre::eyre::{eyre, Report, Result};
use color_eyre::Help;
use haplonet_network::Network;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// ----------------------------------------------------------------------------
// Canvas
// ----------------------------------------------------------------------------

/// The extents of the rendering surface.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas { width: 1200.0, height: 800.0 }
    }
}

impl Canvas {
    /// Returns the center of the canvas.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Check that both extents are finite and positive.
    ///
    /// ```rust
    /// use haplonet::layout::Canvas;
    /// assert!(Canvas { width: 1200.0, height: 800.0 }.validate().is_ok());
    /// assert!(Canvas { width: 0.0, height: 800.0 }.validate().is_err());
    /// assert!(Canvas { width: f64::NAN, height: 800.0 }.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), Report> {
        let valid = |extent: f64| extent.is_finite() && extent > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(eyre!(
                "Invalid input: canvas extents must be positive ({} x {}).",
                self.width,
                self.height
            )
            .suggestion("Wait until the rendering surface has stable, non-zero dimensions."));
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Layout Arguments
// ----------------------------------------------------------------------------

/// Parameters of the force simulation.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct LayoutArgs {
    /// Ideal length of an edge of distance 1.
    pub edge_length: f64,
    /// Repulsion constant between every pair of nodes.
    pub repulsion: f64,
    /// Spring constant of edges.
    pub attraction: f64,
    /// Velocity damping per step.
    pub damping: f64,
    /// Maximum number of relaxation steps.
    pub max_iterations: usize,
    /// The layout has converged when no node moves more than this in one step.
    pub threshold: f64,
    /// Maximum speed of a node per step.
    pub max_speed: f64,
    /// Distances are floored at this value.
    pub min_distance: f64,
    /// Radius of the initial circle, as a fraction of half the smaller canvas extent.
    pub radius: f64,
}

impl Default for LayoutArgs {
    fn default() -> Self {
        LayoutArgs {
            edge_length: 80.0,
            repulsion: 8000.0,
            attraction: 0.05,
            damping: 0.85,
            max_iterations: 150,
            threshold: 0.5,
            max_speed: 15.0,
            min_distance: 0.1,
            radius: 0.6,
        }
    }
}

// ----------------------------------------------------------------------------
// Force Layout
// ----------------------------------------------------------------------------

/// Force-directed layout engine.
///
/// ## Examples
///
/// ```rust
/// use haplonet::layout::{Canvas, ForceLayout};
/// use haplonet_network::{median_joining, Haplotype};
///
/// let haplotypes = [("H1", "AAAA"), ("H2", "AAAT"), ("H3", "AATA"), ("H4", "ATAA")]
///     .map(|(id, seq)| Haplotype::new(id, seq, 1));
/// let mut network = median_joining::build(&haplotypes, 0)?;
///
/// let mut layout = ForceLayout::new(Canvas { width: 1200.0, height: 800.0 })?;
/// layout.run(&mut network)?;
///
/// // the layout can be restored after the nodes are dragged around
/// network.nodes[0].x += 100.0;
/// network.reset_layout()?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug)]
pub struct ForceLayout {
    canvas: Canvas,
    args: LayoutArgs,
    iteration: usize,
}

impl ForceLayout {
    /// Create a new layout engine with default [`LayoutArgs`].
    ///
    /// Errors if the canvas has non-positive or non-finite extents.
    pub fn new(canvas: Canvas) -> Result<Self, Report> {
        canvas.validate()?;
        Ok(ForceLayout { canvas, args: LayoutArgs::default(), iteration: 0 })
    }

    /// Set the simulation parameters.
    pub fn set_args(&mut self, args: LayoutArgs) -> &mut Self {
        self.args = args;
        self
    }

    /// Set the maximum number of relaxation steps.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> &mut Self {
        self.args.max_iterations = max_iterations;
        self
    }

    /// The number of relaxation steps run since [`ForceLayout::initialize`].
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Place nodes evenly on a circle around the canvas center and clear their velocities.
    pub fn initialize(&mut self, network: &mut Network) {
        let (cx, cy) = self.canvas.center();
        let radius = cx.min(cy) * self.args.radius;
        let n = network.nodes.len() as f64;

        network.nodes.iter_mut().enumerate().for_each(|(i, node)| {
            let angle = (i as f64 / n) * 2.0 * PI;
            node.x = cx + radius * angle.cos();
            node.y = cy + radius * angle.sin();
            node.vx = 0.0;
            node.vy = 0.0;
        });

        self.iteration = 0;
        debug!("Initialized layout on a circle of radius {radius:.1} around ({cx}, {cy}).");
    }

    /// Run one relaxation step, returns the largest displacement of any node along either axis.
    pub fn step(&mut self, network: &mut Network) -> Result<f64, Report> {
        let edges = network.edge_indices()?;
        let args = &self.args;
        let n = network.nodes.len();
        let mut forces = vec![(0.0, 0.0); n];

        // repulsion between every pair
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (a, b) = (&network.nodes[i], &network.nodes[j]);
                let (dx, dy) = (b.x - a.x, b.y - a.y);
                let dist = dx.hypot(dy).max(args.min_distance);
                let force = args.repulsion / (dist * dist);
                forces[i].0 -= dx / dist * force;
                forces[i].1 -= dy / dist * force;
            }
        }

        // attraction along edges
        for (source, target, distance) in edges {
            let (a, b) = (&network.nodes[source], &network.nodes[target]);
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            let dist = dx.hypot(dy).max(args.min_distance);
            let ideal = args.edge_length * distance as f64;
            let force = args.attraction * (dist - ideal);
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            forces[source].0 += fx;
            forces[source].1 += fy;
            forces[target].0 -= fx;
            forces[target].1 -= fy;
        }

        // integrate
        let mut max_displacement: f64 = 0.0;
        network.nodes.iter_mut().zip(forces).for_each(|(node, (fx, fy))| {
            node.vx = (node.vx + fx) * args.damping;
            node.vy = (node.vy + fy) * args.damping;

            let speed = node.vx.hypot(node.vy);
            if speed > args.max_speed {
                node.vx = node.vx / speed * args.max_speed;
                node.vy = node.vy / speed * args.max_speed;
            }

            node.x += node.vx;
            node.y += node.vy;
            max_displacement = max_displacement.max(node.vx.abs()).max(node.vy.abs());
        });

        self.iteration += 1;
        Ok(max_displacement)
    }

    /// Translate all nodes so their bounding box is centered on the canvas.
    pub fn center(&self, network: &mut Network) {
        if network.is_empty() {
            return;
        }
        let (min_x, max_x, min_y, max_y) = network.nodes.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_x, max_x, min_y, max_y), node| {
                (min_x.min(node.x), max_x.max(node.x), min_y.min(node.y), max_y.max(node.y))
            },
        );
        let (cx, cy) = self.canvas.center();
        let (offset_x, offset_y) = (cx - (min_x + max_x) / 2.0, cy - (min_y + max_y) / 2.0);
        network.nodes.iter_mut().for_each(|node| {
            node.x += offset_x;
            node.y += offset_y;
        });
    }

    /// Lay out the network: initialize, relax until convergence or `max_iterations`, center, and
    /// save the coordinates for [`Network::reset_layout`].
    ///
    /// Returns the number of relaxation steps.
    pub fn run(&mut self, network: &mut Network) -> Result<usize, Report> {
        self.initialize(network);

        let mut converged = false;
        while !converged && self.iteration < self.args.max_iterations {
            converged = self.step(network)? < self.args.threshold;
        }
        match converged {
            true => info!("Layout converged at iteration {}.", self.iteration),
            false => debug!("Layout stopped after {} iterations.", self.iteration),
        }

        self.center(network);
        network.save_layout();

        Ok(self.iteration)
    }
}
