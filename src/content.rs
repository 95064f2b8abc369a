//! 内容模型 (ContentModel)
//!
//! 启动时从内容定义构建的不可变架构描述：
//! 节点层级、叶子节点的描述信息、数据流步骤序列

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

/// 节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Leaf,
}

/// 架构分层标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerTag {
    Config,
    Domain,
    Ports,
    Application,
    Adapters,
    Infrastructure,
    Entry,
}

impl LayerTag {
    pub const ALL: [LayerTag; 7] = [
        LayerTag::Config,
        LayerTag::Domain,
        LayerTag::Ports,
        LayerTag::Application,
        LayerTag::Adapters,
        LayerTag::Infrastructure,
        LayerTag::Entry,
    ];

    /// 标签在内容定义里使用的名字
    pub fn name(self) -> &'static str {
        match self {
            LayerTag::Config => "config",
            LayerTag::Domain => "domain",
            LayerTag::Ports => "ports",
            LayerTag::Application => "application",
            LayerTag::Adapters => "adapters",
            LayerTag::Infrastructure => "infrastructure",
            LayerTag::Entry => "entry",
        }
    }
}

/// 层级节点
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub parent_id: String, // 空字符串表示根节点
    pub name: String,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty()
    }
}

/// 叶子节点的描述信息
#[derive(Debug, Clone)]
pub struct LeafMetadata {
    pub purpose: String,
    pub summary: String,
    pub layer: LayerTag,
    pub excerpt: Option<String>,
}

/// 数据流步骤，index 按定义顺序从 0 连续编号
#[derive(Debug, Clone)]
pub struct FlowStep {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub node_id: String,
    pub annotation: String,
}

// ---------------------------------------------------------------- 文档结构

/// 内容定义的元信息
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// 启动时预先展开的文件夹 id
    #[serde(default)]
    pub expanded: Vec<String>,
}

/// 内容定义中的一个节点条目，叶子的描述字段内联在条目上
#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    #[serde(default)]
    pub parent_id: String,
    pub name: String,
    pub kind: NodeKind,
    pub purpose: Option<String>,
    pub summary: Option<String>,
    pub layer: Option<LayerTag>,
    pub excerpt: Option<String>,
}

/// 数据流步骤条目
#[derive(Debug, Clone, Deserialize)]
pub struct FlowEntry {
    pub title: String,
    pub description: String,
    pub node_id: String,
    pub annotation: String,
}

/// 内容定义文档 (TOML)
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDocument {
    #[serde(default)]
    pub meta: ContentMeta,
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub flow: Vec<FlowEntry>,
}

/// 内容定义不满足完整性约束
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    #[error("节点 id 重复: {0}")]
    DuplicateId(String),
    #[error("缺少根节点")]
    MissingRoot,
    #[error("存在多个根节点: {0}")]
    ExtraRoot(String),
    #[error("节点 {id} 的父节点 {parent_id} 不存在")]
    UnknownParent { id: String, parent_id: String },
    #[error("节点 {id} 的父节点 {parent_id} 不是文件夹")]
    ParentNotFolder { id: String, parent_id: String },
    #[error("节点 {0} 无法从根节点到达")]
    Unreachable(String),
    #[error("叶子节点 {0} 缺少描述信息")]
    MissingMetadata(String),
    #[error("文件夹节点 {0} 不应携带描述信息")]
    MetadataOnFolder(String),
    #[error("数据流第 {index} 步引用的节点 {node_id} 不存在")]
    FlowTargetMissing { index: usize, node_id: String },
    #[error("数据流第 {index} 步引用的节点 {node_id} 不是叶子")]
    FlowTargetNotLeaf { index: usize, node_id: String },
    #[error("初始展开项 {0} 不是文件夹")]
    ExpandedNotFolder(String),
}

// ---------------------------------------------------------------- 运行时模型

/// 校验过的运行时内容模型，构建之后只读
#[derive(Debug, Clone)]
pub struct ContentModel {
    meta: ContentMeta,
    nodes: HashMap<String, Node>,
    root_id: String,
    children: HashMap<String, Vec<String>>, // folder_id -> 按定义顺序的子节点 id
    metadata: HashMap<String, LeafMetadata>,
    flow: Vec<FlowStep>,
}

impl ContentModel {
    /// 从内容定义构建模型，所有完整性校验都在这里一次性完成
    pub fn from_document(doc: ContentDocument) -> Result<Self, ContentError> {
        let mut nodes: HashMap<String, Node> = HashMap::new();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut metadata: HashMap<String, LeafMetadata> = HashMap::new();
        let mut root_id: Option<String> = None;

        for entry in &doc.nodes {
            if nodes.contains_key(&entry.id) {
                return Err(ContentError::DuplicateId(entry.id.clone()));
            }

            match entry.kind {
                NodeKind::Leaf => {
                    let meta = match (&entry.purpose, &entry.summary, entry.layer) {
                        (Some(purpose), Some(summary), Some(layer)) => LeafMetadata {
                            purpose: purpose.clone(),
                            summary: summary.clone(),
                            layer,
                            excerpt: entry.excerpt.clone(),
                        },
                        _ => return Err(ContentError::MissingMetadata(entry.id.clone())),
                    };
                    metadata.insert(entry.id.clone(), meta);
                }
                NodeKind::Folder => {
                    if entry.purpose.is_some()
                        || entry.summary.is_some()
                        || entry.layer.is_some()
                        || entry.excerpt.is_some()
                    {
                        return Err(ContentError::MetadataOnFolder(entry.id.clone()));
                    }
                    children.insert(entry.id.clone(), Vec::new());
                }
            }

            if entry.parent_id.is_empty() {
                if root_id.is_some() {
                    return Err(ContentError::ExtraRoot(entry.id.clone()));
                }
                root_id = Some(entry.id.clone());
            }

            nodes.insert(
                entry.id.clone(),
                Node {
                    id: entry.id.clone(),
                    parent_id: entry.parent_id.clone(),
                    name: entry.name.clone(),
                    kind: entry.kind,
                },
            );
        }

        let root_id = root_id.ok_or(ContentError::MissingRoot)?;

        // 第二遍按定义顺序挂接子节点，父节点必须存在且是文件夹
        for entry in &doc.nodes {
            if entry.parent_id.is_empty() {
                continue;
            }
            match nodes.get(&entry.parent_id) {
                None => {
                    return Err(ContentError::UnknownParent {
                        id: entry.id.clone(),
                        parent_id: entry.parent_id.clone(),
                    });
                }
                Some(parent) if parent.kind != NodeKind::Folder => {
                    return Err(ContentError::ParentNotFolder {
                        id: entry.id.clone(),
                        parent_id: entry.parent_id.clone(),
                    });
                }
                Some(_) => {
                    children
                        .entry(entry.parent_id.clone())
                        .or_default()
                        .push(entry.id.clone());
                }
            }
        }

        // 可达性检查：拒绝游离环和孤儿节点
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![&root_id];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(child_ids) = children.get(id) {
                for child in child_ids {
                    stack.push(child);
                }
            }
        }
        if visited.len() != nodes.len() {
            for entry in &doc.nodes {
                if !visited.contains(entry.id.as_str()) {
                    return Err(ContentError::Unreachable(entry.id.clone()));
                }
            }
        }

        let mut flow = Vec::with_capacity(doc.flow.len());
        for (index, entry) in doc.flow.iter().enumerate() {
            match nodes.get(&entry.node_id) {
                None => {
                    return Err(ContentError::FlowTargetMissing {
                        index,
                        node_id: entry.node_id.clone(),
                    });
                }
                Some(node) if node.kind != NodeKind::Leaf => {
                    return Err(ContentError::FlowTargetNotLeaf {
                        index,
                        node_id: entry.node_id.clone(),
                    });
                }
                Some(_) => flow.push(FlowStep {
                    index,
                    title: entry.title.clone(),
                    description: entry.description.clone(),
                    node_id: entry.node_id.clone(),
                    annotation: entry.annotation.clone(),
                }),
            }
        }

        for id in &doc.meta.expanded {
            match nodes.get(id) {
                Some(node) if node.kind == NodeKind::Folder => {}
                _ => return Err(ContentError::ExpandedNotFolder(id.clone())),
            }
        }

        Ok(Self {
            meta: doc.meta,
            nodes,
            root_id,
            children,
            metadata,
            flow,
        })
    }

    pub fn meta(&self) -> &ContentMeta {
        &self.meta
    }

    /// 根节点
    pub fn root(&self) -> &Node {
        &self.nodes[&self.root_id]
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// 文件夹的直接子节点，按定义顺序；id 不是文件夹时返回 None
    pub fn children(&self, id: &str) -> Option<Vec<&Node>> {
        let ids = self.children.get(id)?;
        Some(ids.iter().filter_map(|c| self.nodes.get(c)).collect())
    }

    pub fn metadata(&self, id: &str) -> Option<&LeafMetadata> {
        self.metadata.get(id)
    }

    /// 数据流步骤序列，每次调用返回同一序列
    pub fn flow_steps(&self) -> &[FlowStep] {
        &self.flow
    }

    pub fn flow_step(&self, index: usize) -> Option<&FlowStep> {
        self.flow.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, parent: &str) -> NodeEntry {
        NodeEntry {
            id: id.to_string(),
            parent_id: parent.to_string(),
            name: id.to_string(),
            kind: NodeKind::Folder,
            purpose: None,
            summary: None,
            layer: None,
            excerpt: None,
        }
    }

    fn leaf(id: &str, parent: &str) -> NodeEntry {
        NodeEntry {
            id: id.to_string(),
            parent_id: parent.to_string(),
            name: id.to_string(),
            kind: NodeKind::Leaf,
            purpose: Some("purpose".to_string()),
            summary: Some("summary".to_string()),
            layer: Some(LayerTag::Domain),
            excerpt: None,
        }
    }

    fn step(node_id: &str) -> FlowEntry {
        FlowEntry {
            title: "STEP".to_string(),
            description: "desc".to_string(),
            node_id: node_id.to_string(),
            annotation: "a → b".to_string(),
        }
    }

    fn doc(nodes: Vec<NodeEntry>, flow: Vec<FlowEntry>) -> ContentDocument {
        ContentDocument {
            meta: ContentMeta::default(),
            nodes,
            flow,
        }
    }

    #[test]
    fn test_queries_on_valid_tree() {
        let model = ContentModel::from_document(doc(
            vec![
                folder("root", ""),
                folder("a", "root"),
                leaf("f1", "root"),
                leaf("f2", "a"),
                folder("empty", "root"),
            ],
            vec![step("f1"), step("f2")],
        ))
        .unwrap();

        assert_eq!(model.root().id, "root");
        assert_eq!(model.node("f1").unwrap().kind, NodeKind::Leaf);
        assert!(model.node("missing").is_none());

        // 子节点保持定义顺序
        let root_children: Vec<&str> = model
            .children("root")
            .unwrap()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(root_children, vec!["a", "f1", "empty"]);

        // 空文件夹返回空序列，叶子节点返回 None
        assert!(model.children("empty").unwrap().is_empty());
        assert!(model.children("f1").is_none());
        assert!(model.children("missing").is_none());

        // 描述信息只挂在叶子上
        assert_eq!(model.metadata("f2").unwrap().layer, LayerTag::Domain);
        assert!(model.metadata("a").is_none());

        // 数据流 index 连续
        assert_eq!(model.flow_steps().len(), 2);
        assert_eq!(model.flow_step(1).unwrap().index, 1);
        assert!(model.flow_step(2).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = ContentModel::from_document(doc(
            vec![folder("root", ""), leaf("x", "root"), leaf("x", "root")],
            vec![],
        ))
        .unwrap_err();
        assert_eq!(err, ContentError::DuplicateId("x".to_string()));
    }

    #[test]
    fn test_root_constraints() {
        let err = ContentModel::from_document(doc(vec![], vec![])).unwrap_err();
        assert_eq!(err, ContentError::MissingRoot);

        let err = ContentModel::from_document(doc(
            vec![folder("root", ""), folder("other", "")],
            vec![],
        ))
        .unwrap_err();
        assert_eq!(err, ContentError::ExtraRoot("other".to_string()));
    }

    #[test]
    fn test_parent_constraints() {
        let err = ContentModel::from_document(doc(
            vec![folder("root", ""), leaf("f1", "ghost")],
            vec![],
        ))
        .unwrap_err();
        assert!(matches!(err, ContentError::UnknownParent { .. }));

        let err = ContentModel::from_document(doc(
            vec![folder("root", ""), leaf("f1", "root"), leaf("f2", "f1")],
            vec![],
        ))
        .unwrap_err();
        assert!(matches!(err, ContentError::ParentNotFolder { .. }));
    }

    #[test]
    fn test_detached_cycle_rejected() {
        // a 和 b 互为父子，彼此可解析但从根不可达
        let err = ContentModel::from_document(doc(
            vec![folder("root", ""), folder("a", "b"), folder("b", "a")],
            vec![],
        ))
        .unwrap_err();
        assert_eq!(err, ContentError::Unreachable("a".to_string()));
    }

    #[test]
    fn test_leaf_metadata_required() {
        let mut bare = leaf("f1", "root");
        bare.layer = None;
        let err =
            ContentModel::from_document(doc(vec![folder("root", ""), bare], vec![])).unwrap_err();
        assert_eq!(err, ContentError::MissingMetadata("f1".to_string()));
    }

    #[test]
    fn test_folder_metadata_rejected() {
        let mut decorated = folder("a", "root");
        decorated.purpose = Some("should not be here".to_string());
        let err = ContentModel::from_document(doc(vec![folder("root", ""), decorated], vec![]))
            .unwrap_err();
        assert_eq!(err, ContentError::MetadataOnFolder("a".to_string()));
    }

    #[test]
    fn test_flow_target_must_be_existing_leaf() {
        let err = ContentModel::from_document(doc(
            vec![folder("root", ""), leaf("f1", "root")],
            vec![step("ghost")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::FlowTargetMissing {
                index: 0,
                node_id: "ghost".to_string()
            }
        );

        let err = ContentModel::from_document(doc(
            vec![folder("root", ""), folder("a", "root")],
            vec![step("a")],
        ))
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::FlowTargetNotLeaf {
                index: 0,
                node_id: "a".to_string()
            }
        );
    }

    #[test]
    fn test_expanded_must_name_folders() {
        let mut document = doc(vec![folder("root", ""), leaf("f1", "root")], vec![]);
        document.meta.expanded = vec!["f1".to_string()];
        let err = ContentModel::from_document(document).unwrap_err();
        assert_eq!(err, ContentError::ExpandedNotFolder("f1".to_string()));
    }

    #[test]
    fn test_excerpt_is_optional() {
        let mut with_code = leaf("f1", "root");
        with_code.excerpt = Some("fn main() {}".to_string());
        let model = ContentModel::from_document(doc(
            vec![folder("root", ""), with_code, leaf("f2", "root")],
            vec![],
        ))
        .unwrap();
        assert!(model.metadata("f1").unwrap().excerpt.is_some());
        assert!(model.metadata("f2").unwrap().excerpt.is_none());
    }
}
