//! 内容定义加载
//!
//! 解析 TOML 内容定义并构建校验过的 ContentModel；
//! 仓库自带一份默认内容，用户可以用自己的文件覆盖

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::content::{ContentDocument, ContentError, ContentModel};

/// 内置默认内容：Kyzlo Quant Platform 架构参考
const DEFAULT_CONTENT: &str = include_str!("../content/kyzlo.toml");

/// 内容定义加载失败
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("读取内容文件失败: {0}")]
    Io(#[from] io::Error),
    #[error("内容文件解析失败: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// 从 TOML 文本构建内容模型
pub fn load_str(text: &str) -> Result<ContentModel, LoadError> {
    let doc: ContentDocument = toml::from_str(text)?;
    Ok(ContentModel::from_document(doc)?)
}

/// 从文件加载内容模型
pub fn load_file(path: &Path) -> Result<ContentModel, LoadError> {
    let text = fs::read_to_string(path)?;
    load_str(&text)
}

/// 用户覆盖文件路径 (~/.local/share/archview/content.toml)
pub fn override_path() -> Option<PathBuf> {
    Some(dirs::data_dir()?.join("archview").join("content.toml"))
}

/// 加载默认内容：优先用户覆盖文件，否则使用内置内容
pub fn load_default() -> Result<ContentModel, LoadError> {
    if let Some(path) = override_path() {
        if path.exists() {
            return load_file(&path);
        }
    }
    load_str(DEFAULT_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{LayerTag, NodeKind};

    #[test]
    fn test_load_small_document() {
        let text = r#"
            [meta]
            title = "DEMO"
            expanded = ["root"]

            [[nodes]]
            id = "root"
            name = "root"
            kind = "folder"

            [[nodes]]
            id = "main.py"
            parent_id = "root"
            name = "main.py"
            kind = "leaf"
            layer = "entry"
            purpose = "entry point"
            summary = "wires everything"

            [[flow]]
            title = "START"
            node_id = "main.py"
            description = "boot"
            annotation = "config → components"
        "#;

        let model = load_str(text).unwrap();
        assert_eq!(model.meta().title, "DEMO");
        assert_eq!(model.root().kind, NodeKind::Folder);
        assert_eq!(model.metadata("main.py").unwrap().layer, LayerTag::Entry);
        assert_eq!(model.flow_steps().len(), 1);
        assert_eq!(model.flow_step(0).unwrap().node_id, "main.py");
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        let text = r#"
            [[nodes]]
            id = "root"
            name = "root"
            kind = "folder"

            [[flow]]
            title = "START"
            node_id = "ghost"
            description = "boot"
            annotation = "x"
        "#;
        assert!(matches!(load_str(text), Err(LoadError::Content(_))));
    }

    #[test]
    fn test_embedded_content_is_valid() {
        let model = load_str(DEFAULT_CONTENT).unwrap();
        assert_eq!(model.root().id, "kyzlo_quant");
        assert_eq!(model.flow_steps().len(), 9);

        // 每个数据流步骤都指向一个带描述的叶子
        for step in model.flow_steps() {
            let node = model.node(&step.node_id).unwrap();
            assert_eq!(node.kind, NodeKind::Leaf);
            assert!(model.metadata(&step.node_id).is_some());
        }

        // 初始展开的文件夹来自 meta
        assert_eq!(model.meta().expanded, vec!["kyzlo_quant", "src"]);
    }
}
