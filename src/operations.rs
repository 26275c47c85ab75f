//! Operation synthesizer (component E): turns a keyword list and intent
//! into a list of graph-edit operations for the renderer.

use serde::{Deserialize, Serialize};

use crate::intent::IntentClass;

/// A graph-edit instruction emitted by one update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    AddNode {
        id: String,
        label: String,
        intent: String,
    },
    AddEdge {
        from: String,
        to: String,
    },
}

/// Emit up to 6 nodes from `keywords`, named `u{update_id}_n{i}` (1-indexed),
/// then wire them according to `intent`:
/// - sequential/contrastive: a chain n1->n2->...->nK.
/// - structural/relational: hub-and-spoke from n1 to every other node.
/// - classification/generic: nodes only, no edges.
pub fn synthesize(update_id: u64, keywords: &[String], intent: IntentClass) -> Vec<Operation> {
    let mut ops = Vec::new();
    let mut node_ids = Vec::new();

    for (i, kw) in keywords.iter().take(6).enumerate() {
        let id = format!("u{update_id}_n{}", i + 1);
        ops.push(Operation::AddNode {
            id: id.clone(),
            label: kw.clone(),
            intent: intent.as_str().to_string(),
        });
        node_ids.push(id);
    }

    if node_ids.len() >= 2 {
        match intent {
            IntentClass::Sequential | IntentClass::Contrastive => {
                for pair in node_ids.windows(2) {
                    ops.push(Operation::AddEdge {
                        from: pair[0].clone(),
                        to: pair[1].clone(),
                    });
                }
            }
            IntentClass::Structural | IntentClass::Relational => {
                let hub = node_ids[0].clone();
                for n in &node_ids[1..] {
                    ops.push(Operation::AddEdge {
                        from: hub.clone(),
                        to: n.clone(),
                    });
                }
            }
            IntentClass::Classification | IntentClass::Generic => {}
        }
    }

    ops
}
