//! Initial node placement and bounded local relaxation.

use std::collections::HashMap;

use super::NodeState;

const RELAX_FORCE_SCALE: f64 = 18.0;
const RELAX_CLAMP: f64 = 24.0;

/// Placement for a brand-new node, given the current node count (`idx`,
/// the count *before* insertion) and, if one was found, an anchor already
/// present in the graph.
pub fn initial_position(
    idx: usize,
    anchor: Option<(f64, f64)>,
    intent: &str,
) -> (f64, f64) {
    if let Some((ax, ay)) = anchor {
        let deg = ((idx * 47) % 360) as f64;
        let radius = 90.0 + 10.0 * (idx % 3) as f64;
        let rad = deg.to_radians();
        return (ax + radius * rad.cos(), ay + radius * rad.sin());
    }

    match intent {
        "sequential" | "contrastive" => (idx as f64 * 160.0, (idx % 3) as f64 * 80.0),
        "structural" | "relational" => {
            let angle = (((idx * 37) % 360) as f64).to_radians();
            let radius = 120.0 + 16.0 * (idx / 8) as f64;
            (radius * angle.cos(), radius * angle.sin())
        }
        _ => ((idx % 8) as f64 * 140.0, (idx / 8) as f64 * 90.0),
    }
}

/// Repulsion-only relaxation: only nodes in `new_ids` move, existing nodes
/// are immovable anchors for the repulsion field.
pub fn relax_new_nodes(nodes: &mut HashMap<String, NodeState>, new_ids: &[String], min_distance: f64, iters: usize) {
    if new_ids.is_empty() {
        return;
    }

    for _ in 0..iters {
        for nid in new_ids {
            let (nx, ny) = match nodes.get(nid) {
                Some(n) => (n.x, n.y),
                None => continue,
            };

            let mut fx = 0.0;
            let mut fy = 0.0;
            for (oid, other) in nodes.iter() {
                if oid == nid {
                    continue;
                }
                let dx = nx - other.x;
                let dy = ny - other.y;
                let dist = (dx * dx + dy * dy).sqrt() + 1e-6;
                if dist < min_distance {
                    let push = (min_distance - dist) / min_distance;
                    fx += (dx / dist) * push;
                    fy += (dy / dist) * push;
                }
            }

            let dx = (fx * RELAX_FORCE_SCALE).clamp(-RELAX_CLAMP, RELAX_CLAMP);
            let dy = (fy * RELAX_FORCE_SCALE).clamp(-RELAX_CLAMP, RELAX_CLAMP);
            if let Some(n) = nodes.get_mut(nid) {
                n.x += dx;
                n.y += dy;
            }
        }
    }
}
