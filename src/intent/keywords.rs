//! The five non-generic intent classes and their keyword index.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// One of the five non-generic intents, plus the catch-all `Generic`.
/// Declaration order here is also the tie-break order: when two classes
/// score equally, the one declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentClass {
    Sequential,
    Structural,
    Classification,
    Relational,
    Contrastive,
    Generic,
}

impl IntentClass {
    /// All non-generic classes, in declaration/tie-break order.
    pub const ORDERED: [IntentClass; 5] = [
        IntentClass::Sequential,
        IntentClass::Structural,
        IntentClass::Classification,
        IntentClass::Relational,
        IntentClass::Contrastive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IntentClass::Sequential => "sequential",
            IntentClass::Structural => "structural",
            IntentClass::Classification => "classification",
            IntentClass::Relational => "relational",
            IntentClass::Contrastive => "contrastive",
            IntentClass::Generic => "generic",
        }
    }
}

impl std::fmt::Display for IntentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn keyword_table() -> &'static [(IntentClass, &'static [&'static str])] {
    const SEQUENTIAL: &[&str] = &[
        "first", "then", "next", "after", "before", "finally", "step", "loop", "if", "else",
        "while", "start", "end", "flow", "流程", "步骤", "然后", "之后",
    ];
    const STRUCTURAL: &[&str] = &[
        "component", "module", "service", "gateway", "layer", "architecture", "system",
        "dependency", "interface", "模块", "架构", "服务", "依赖", "接口",
    ];
    const CLASSIFICATION: &[&str] = &[
        "category", "group", "type", "branch", "cluster", "tree", "tag", "分类", "分组", "层级",
        "分支",
    ];
    const RELATIONAL: &[&str] = &[
        "entity", "table", "schema", "relationship", "join", "foreign", "primary", "关联", "关系",
        "实体", "表", "主键", "外键",
    ];
    const CONTRASTIVE: &[&str] = &[
        "compare", "versus", "vs", "difference", "ratio", "percentage", "contrast", "对比", "差异",
        "占比", "趋势",
    ];

    static TABLE: OnceLock<[(IntentClass, &'static [&'static str]); 5]> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            (IntentClass::Sequential, SEQUENTIAL),
            (IntentClass::Structural, STRUCTURAL),
            (IntentClass::Classification, CLASSIFICATION),
            (IntentClass::Relational, RELATIONAL),
            (IntentClass::Contrastive, CONTRASTIVE),
        ]
    })
}

/// Lower-case keyword -> owning class, for exact token matches.
pub fn keyword_index() -> &'static HashMap<&'static str, IntentClass> {
    static INDEX: OnceLock<HashMap<&'static str, IntentClass>> = OnceLock::new();
    INDEX.get_or_init(|| {
        let mut map = HashMap::new();
        for (class, words) in keyword_table() {
            for w in *words {
                map.insert(*w, *class);
            }
        }
        map
    })
}

/// CJK keywords only, for raw-text substring matching (unsegmented phrases
/// may carry a keyword without it surfacing as its own token).
pub fn cjk_keywords() -> &'static [(&'static str, IntentClass)] {
    static CJK: OnceLock<Vec<(&'static str, IntentClass)>> = OnceLock::new();
    CJK.get_or_init(|| {
        let mut out = Vec::new();
        for (class, words) in keyword_table() {
            for w in *words {
                if w.chars().next().map(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)).unwrap_or(false) {
                    out.push((*w, *class));
                }
            }
        }
        out
    })
    .as_slice()
}
