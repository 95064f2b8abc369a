//! 浏览器状态定义 (Model)
//!
//! 树状态、数据流状态、视图开关，以及组合它们的 Explorer 和外层 App

use std::collections::HashMap;

use crate::content::{ContentModel, FlowStep, NodeKind};

/// 当前激活的视图
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Structure,
    Flow,
}

/// 树视图状态：文件夹展开表 + 单一选中项
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    pub(super) expanded: HashMap<String, bool>, // 缺省折叠
    pub(super) selected: Option<String>,
}

impl TreeState {
    /// 文件夹是否展开，缺省折叠
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// 当前选中的叶子节点
    pub fn selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

/// 数据流状态：当前步骤位置，序列非空时始终落在合法区间内
#[derive(Debug, Clone, Default)]
pub struct FlowState {
    pub(super) position: usize,
}

impl FlowState {
    /// 当前步骤；序列为空时为 None
    pub fn current<'a>(&self, content: &'a ContentModel) -> Option<&'a FlowStep> {
        content.flow_step(self.position)
    }
}

/// 浏览器状态快照：一次调用读取全部可变状态，返回后不再变化
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub view: ActiveView,
    pub expanded: HashMap<String, bool>,
    pub selected: Option<String>,
    pub flow_position: usize,
}

/// 组合树状态、数据流状态和视图开关，是全部可变状态的唯一写入口
#[derive(Debug)]
pub struct Explorer {
    pub(super) content: ContentModel,
    pub(super) tree: TreeState,
    pub(super) flow: FlowState,
    pub(super) view: ActiveView,
}

impl Explorer {
    /// 创建浏览器状态，初始展开的文件夹来自内容定义的 meta
    pub fn new(content: ContentModel, view: ActiveView) -> Self {
        let mut tree = TreeState::default();
        for id in &content.meta().expanded {
            tree.expanded.insert(id.clone(), true);
        }
        Self {
            content,
            tree,
            flow: FlowState::default(),
            view,
        }
    }

    pub fn content(&self) -> &ContentModel {
        &self.content
    }

    pub fn view(&self) -> ActiveView {
        self.view
    }

    pub fn tree(&self) -> &TreeState {
        &self.tree
    }

    pub fn flow(&self) -> &FlowState {
        &self.flow
    }

    /// 一次性读取全部可变状态
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            view: self.view,
            expanded: self.tree.expanded.clone(),
            selected: self.tree.selected.clone(),
            flow_position: self.flow.position,
        }
    }
}

/// 应用状态
pub struct App {
    pub explorer: Explorer,
    pub display_list: Vec<(usize, String)>, // (depth, node_id)
    pub cursor: usize,
    pub message: Option<String>,
}

impl App {
    /// 创建新的应用实例
    pub fn new(content: ContentModel) -> Self {
        let mut app = Self {
            explorer: Explorer::new(content, ActiveView::Structure),
            display_list: Vec::new(),
            cursor: 0,
            message: None,
        };
        app.refresh_display_list();
        app
    }

    /// 按展开状态刷新可见节点列表
    pub fn refresh_display_list(&mut self) {
        fn traverse(
            content: &ContentModel,
            tree: &TreeState,
            id: &str,
            depth: usize,
            out: &mut Vec<(usize, String)>,
        ) {
            out.push((depth, id.to_string()));
            let is_folder = content.node(id).map(|n| n.kind) == Some(NodeKind::Folder);
            if is_folder && tree.is_expanded(id) {
                if let Some(children) = content.children(id) {
                    for child in children {
                        traverse(content, tree, &child.id, depth + 1, out);
                    }
                }
            }
        }

        let mut list = Vec::new();
        let content = self.explorer.content();
        let root_id = content.root().id.clone();
        traverse(content, self.explorer.tree(), &root_id, 0, &mut list);
        self.display_list = list;

        // 确保光标有效
        if self.display_list.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.display_list.len() {
            self.cursor = self.display_list.len() - 1;
        }
    }

    /// 光标所在节点 ID
    pub fn cursor_node_id(&self) -> Option<String> {
        self.display_list.get(self.cursor).map(|(_, id)| id.clone())
    }
}
