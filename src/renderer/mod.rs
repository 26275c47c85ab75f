//! Incremental renderer (component F): applies operations to a persistent
//! graph, places new nodes near anchors, relaxes them locally, and emits a
//! `RenderFrame` carrying per-frame stability metrics.

mod layout;
pub(crate) mod metrics;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::operations::Operation;
use crate::stats::StatPack;

const MIN_DISTANCE: f64 = 80.0;
const LOCAL_RELAX_ITERS: usize = 6;
const MENTAL_MAP_SCALE: f64 = 32.0;

/// Persistent per-node layout state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeState {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub created_frame: u64,
}

/// Output of applying one update's operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub frame_id: u64,
    pub update_id: u64,
    pub node_count: usize,
    pub edge_count: usize,
    pub touched_nodes: Vec<String>,
    pub added_nodes: Vec<String>,
    pub added_edges: usize,
    pub flicker_index: f64,
    pub mean_displacement: f64,
    pub p95_displacement: f64,
    pub unchanged_max_drift: f64,
    pub mental_map_score: f64,
}

/// A directed edge in the exported graph snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRef {
    pub from: String,
    pub to: String,
}

/// Exportable snapshot of the persistent graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererState {
    pub nodes: Vec<NodeState>,
    pub edges: Vec<EdgeRef>,
    pub frame_count: u64,
}

/// Aggregate stability summary across every frame rendered so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererStability {
    pub frame_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub flicker_index: StatPack,
    pub mental_map_score: StatPack,
    pub unchanged_max_drift: StatPack,
}

/// Owns the persistent graph for one session and renders updates onto it.
pub struct IncrementalRenderer {
    nodes: HashMap<String, NodeState>,
    edges: HashSet<(String, String)>,
    frame_id: u64,
    frames: Vec<RenderFrame>,
}

impl IncrementalRenderer {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashSet::new(),
            frame_id: 0,
            frames: Vec::new(),
        }
    }

    /// Aggregate flicker/mental-map/unchanged-drift stats across all frames.
    pub fn summary(&self) -> RendererStability {
        let flicker: Vec<f64> = self.frames.iter().map(|f| f.flicker_index).collect();
        let mental: Vec<f64> = self.frames.iter().map(|f| f.mental_map_score).collect();
        let unchanged: Vec<f64> = self.frames.iter().map(|f| f.unchanged_max_drift).collect();
        RendererStability {
            frame_count: self.frames.len(),
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            flicker_index: StatPack::from_values(&flicker),
            mental_map_score: StatPack::from_values(&mental),
            unchanged_max_drift: StatPack::from_values(&unchanged),
        }
    }

    /// Export the persistent graph (nodes + sorted edges) for a pipeline
    /// payload's `renderer_state` field.
    pub fn export_state(&self) -> RendererState {
        let mut nodes: Vec<NodeState> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let mut edges: Vec<EdgeRef> = self
            .edges
            .iter()
            .map(|(from, to)| EdgeRef {
                from: from.clone(),
                to: to.clone(),
            })
            .collect();
        edges.sort_by(|a, b| (a.from.as_str(), a.to.as_str()).cmp(&(b.from.as_str(), b.to.as_str())));
        RendererState {
            nodes,
            edges,
            frame_count: self.frame_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeState> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &(String, String)> {
        self.edges.iter()
    }

    /// Apply one update's operations and return the resulting frame.
    pub fn apply_update(&mut self, update_id: u64, operations: &[Operation], intent: &str) -> RenderFrame {
        self.frame_id += 1;
        let prev_pos: HashMap<String, (f64, f64)> =
            self.nodes.iter().map(|(id, n)| (id.clone(), (n.x, n.y))).collect();

        let mut touched: HashSet<String> = HashSet::new();
        let mut added_nodes = Vec::new();
        let mut added_edges = 0usize;

        // Resolve anchors: first edge whose destination is a given new node wins.
        let mut anchor_for_new: HashMap<&str, &str> = HashMap::new();
        for op in operations {
            if let Operation::AddEdge { from, to } = op {
                if !from.is_empty() && !to.is_empty() {
                    anchor_for_new.entry(to.as_str()).or_insert(from.as_str());
                }
            }
        }

        for op in operations {
            match op {
                Operation::AddNode { id, label, .. } => {
                    if id.is_empty() {
                        continue;
                    }
                    if let Some(existing) = self.nodes.get_mut(id) {
                        existing.label = label.clone();
                        touched.insert(id.clone());
                        continue;
                    }
                    let anchor_pos = anchor_for_new
                        .get(id.as_str())
                        .and_then(|a| self.nodes.get(*a))
                        .map(|n| (n.x, n.y));
                    let (x, y) = layout::initial_position(self.nodes.len(), anchor_pos, intent);
                    self.nodes.insert(
                        id.clone(),
                        NodeState {
                            id: id.clone(),
                            label: label.clone(),
                            x,
                            y,
                            created_frame: self.frame_id,
                        },
                    );
                    touched.insert(id.clone());
                    added_nodes.push(id.clone());
                }
                Operation::AddEdge { from, to } => {
                    if from.is_empty() || to.is_empty() {
                        continue;
                    }
                    if !self.nodes.contains_key(from) {
                        let (x, y) = layout::initial_position(self.nodes.len(), None, intent);
                        self.nodes.insert(
                            from.clone(),
                            NodeState {
                                id: from.clone(),
                                label: from.clone(),
                                x,
                                y,
                                created_frame: self.frame_id,
                            },
                        );
                        touched.insert(from.clone());
                        added_nodes.push(from.clone());
                    }
                    if !self.nodes.contains_key(to) {
                        let anchor_pos = self.nodes.get(from).map(|n| (n.x, n.y));
                        let (x, y) = layout::initial_position(self.nodes.len(), anchor_pos, intent);
                        self.nodes.insert(
                            to.clone(),
                            NodeState {
                                id: to.clone(),
                                label: to.clone(),
                                x,
                                y,
                                created_frame: self.frame_id,
                            },
                        );
                        touched.insert(to.clone());
                        added_nodes.push(to.clone());
                    }
                    let edge = (from.clone(), to.clone());
                    if self.edges.insert(edge) {
                        added_edges += 1;
                    }
                }
            }
        }

        layout::relax_new_nodes(&mut self.nodes, &added_nodes, MIN_DISTANCE, LOCAL_RELAX_ITERS);

        let frame = self.build_frame(update_id, &prev_pos, &touched, added_nodes, added_edges);
        self.frames.push(frame.clone());
        frame
    }

    fn build_frame(
        &self,
        update_id: u64,
        prev_pos: &HashMap<String, (f64, f64)>,
        touched: &HashSet<String>,
        added_nodes: Vec<String>,
        added_edges: usize,
    ) -> RenderFrame {
        let mut disps = Vec::new();
        let mut unchanged_disps = Vec::new();

        for (id, &(ox, oy)) in prev_pos {
            if let Some(n) = self.nodes.get(id) {
                let d = ((n.x - ox).powi(2) + (n.y - oy).powi(2)).sqrt();
                disps.push(d);
                if !touched.contains(id) {
                    unchanged_disps.push(d);
                }
            }
        }

        let common = disps.len();
        let mean_displacement = if common > 0 {
            disps.iter().sum::<f64>() / common as f64
        } else {
            0.0
        };
        let p95_displacement = metrics::percentile(&disps, 95.0);
        let unchanged_max_drift = unchanged_disps.iter().cloned().fold(0.0_f64, f64::max);
        let flicker_index = if common > 0 {
            disps.iter().sum::<f64>() / common as f64
        } else {
            0.0
        };
        let mental_map_score = (1.0 - mean_displacement / MENTAL_MAP_SCALE).max(0.0);

        let mut touched_sorted: Vec<String> = touched.iter().cloned().collect();
        touched_sorted.sort();

        RenderFrame {
            frame_id: self.frame_id,
            update_id,
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            touched_nodes: touched_sorted,
            added_nodes,
            added_edges,
            flicker_index,
            mean_displacement,
            p95_displacement,
            unchanged_max_drift,
            mental_map_score,
        }
    }
}

impl Default for IncrementalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_node(uid: u64, i: usize, label: &str, intent: &str) -> Operation {
        Operation::AddNode {
            id: format!("u{uid}_n{i}"),
            label: label.to_string(),
            intent: intent.to_string(),
        }
    }

    #[test]
    fn first_frame_has_no_unchanged_nodes() {
        let mut r = IncrementalRenderer::new();
        let ops = vec![add_node(1, 1, "a", "classification")];
        let frame = r.apply_update(1, &ops, "classification");
        assert_eq!(frame.node_count, 1);
        assert_eq!(frame.unchanged_max_drift, 0.0);
    }

    #[test]
    fn existing_nodes_never_move_between_frames() {
        let mut r = IncrementalRenderer::new();
        let ops1 = vec![
            add_node(1, 1, "a", "sequential"),
            add_node(1, 2, "b", "sequential"),
            Operation::AddEdge {
                from: "u1_n1".to_string(),
                to: "u1_n2".to_string(),
            },
        ];
        r.apply_update(1, &ops1, "sequential");

        let ops2 = vec![add_node(2, 1, "c", "sequential")];
        let frame2 = r.apply_update(2, &ops2, "sequential");
        // a and b were untouched in frame 2, so their drift must be zero.
        assert_eq!(frame2.unchanged_max_drift, 0.0);
    }

    #[test]
    fn add_edge_auto_creates_missing_endpoints() {
        let mut r = IncrementalRenderer::new();
        let ops = vec![Operation::AddEdge {
            from: "x".to_string(),
            to: "y".to_string(),
        }];
        let frame = r.apply_update(1, &ops, "structural");
        assert_eq!(frame.node_count, 2);
        assert_eq!(frame.added_edges, 1);
    }

    #[test]
    fn duplicate_edge_not_recounted() {
        let mut r = IncrementalRenderer::new();
        let ops = vec![
            add_node(1, 1, "a", "structural"),
            add_node(1, 2, "b", "structural"),
            Operation::AddEdge {
                from: "u1_n1".to_string(),
                to: "u1_n2".to_string(),
            },
        ];
        r.apply_update(1, &ops, "structural");
        let ops2 = vec![Operation::AddEdge {
            from: "u1_n1".to_string(),
            to: "u1_n2".to_string(),
        }];
        let frame2 = r.apply_update(2, &ops2, "structural");
        assert_eq!(frame2.added_edges, 0);
        assert_eq!(r.edge_count(), 1);
    }

    #[test]
    fn re_adding_existing_node_updates_label_only_and_marks_touched() {
        let mut r = IncrementalRenderer::new();
        r.apply_update(1, &[add_node(1, 1, "old", "classification")], "classification");
        let relabel = Operation::AddNode {
            id: "u1_n1".to_string(),
            label: "renamed".to_string(),
            intent: "classification".to_string(),
        };
        let frame = r.apply_update(2, &[relabel], "classification");
        assert!(frame.touched_nodes.contains(&"u1_n1".to_string()));
        assert_eq!(frame.node_count, 1);
        assert_eq!(r.nodes.get("u1_n1").unwrap().label, "renamed");
    }

    #[test]
    fn mental_map_score_is_one_when_nothing_moved() {
        let mut r = IncrementalRenderer::new();
        let frame = r.apply_update(1, &[add_node(1, 1, "solo", "classification")], "classification");
        assert_eq!(frame.mental_map_score, 1.0);
    }

    #[test]
    fn flicker_index_equals_mean_displacement() {
        let mut r = IncrementalRenderer::new();
        r.apply_update(
            1,
            &[add_node(1, 1, "a", "structural"), add_node(1, 2, "b", "structural")],
            "structural",
        );
        let frame = r.apply_update(2, &[add_node(2, 1, "c", "structural")], "structural");
        assert_eq!(frame.flicker_index, frame.mean_displacement);
    }
}
