//! 业务逻辑处理 (Update/Dispatch)
//!
//! 所有状态变更都从这里经过；前置条件检查先于任何写入，
//! 因此失败的意图不会留下部分变更

use super::actions::{Action, IntentError};
use super::state::{ActiveView, App, Explorer, FlowState, TreeState};
use crate::content::{ContentModel, NodeKind};

impl TreeState {
    /// 切换文件夹展开状态，缺省视为折叠；不影响选中项
    pub fn toggle_folder(&mut self, content: &ContentModel, id: &str) -> Result<(), IntentError> {
        match content.node(id) {
            Some(node) if node.kind == NodeKind::Folder => {
                let state = self.expanded.entry(id.to_string()).or_insert(false);
                *state = !*state;
                Ok(())
            }
            _ => Err(IntentError::NotAFolder(id.to_string())),
        }
    }

    /// 选中叶子节点，无条件替换之前的选中项；不自动展开祖先文件夹
    pub fn select_leaf(&mut self, content: &ContentModel, id: &str) -> Result<(), IntentError> {
        match content.node(id) {
            Some(node) if node.kind == NodeKind::Leaf => {
                self.selected = Some(id.to_string());
                Ok(())
            }
            _ => Err(IntentError::NotALeaf(id.to_string())),
        }
    }

    /// 取消选中，幂等
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

impl FlowState {
    /// 跳到任意步骤，超界时取最近的合法位置
    pub fn go_to(&mut self, content: &ContentModel, index: isize) -> Result<(), IntentError> {
        let len = content.flow_steps().len();
        if len == 0 {
            return Err(IntentError::EmptySequence);
        }
        self.position = index.clamp(0, (len - 1) as isize) as usize;
        Ok(())
    }

    /// 下一步，末尾处不动
    pub fn next(&mut self, content: &ContentModel) -> Result<(), IntentError> {
        let len = content.flow_steps().len();
        if len == 0 {
            return Err(IntentError::EmptySequence);
        }
        if self.position + 1 < len {
            self.position += 1;
        }
        Ok(())
    }

    /// 上一步，开头处不动
    pub fn previous(&mut self, content: &ContentModel) -> Result<(), IntentError> {
        if content.flow_steps().is_empty() {
            return Err(IntentError::EmptySequence);
        }
        if self.position > 0 {
            self.position -= 1;
        }
        Ok(())
    }
}

impl Explorer {
    /// 切换视图；树状态和数据流状态都不受影响
    pub fn switch_view(&mut self, view: ActiveView) {
        self.view = view;
    }

    /// 核心意图分发
    pub fn dispatch(&mut self, action: Action) -> Result<(), IntentError> {
        match action {
            Action::SwitchView(view) => {
                self.switch_view(view);
                Ok(())
            }

            Action::ToggleFolder(id) => self.tree.toggle_folder(&self.content, &id),
            Action::SelectLeaf(id) => self.tree.select_leaf(&self.content, &id),
            Action::ClearSelection => {
                self.tree.clear_selection();
                Ok(())
            }

            Action::NextStep => self.flow.next(&self.content),
            Action::PreviousStep => self.flow.previous(&self.content),
            Action::GoToStep(index) => self.flow.go_to(&self.content, index),

            // 壳层动作由外层 App 处理
            Action::Quit | Action::MoveCursorUp | Action::MoveCursorDown | Action::Activate => {
                Ok(())
            }
        }
    }
}

impl App {
    /// 顶层分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::MoveCursorUp => self.move_up(),
            Action::MoveCursorDown => self.move_down(),
            Action::Activate => {
                if let Some(resolved) = self.resolve_activate() {
                    return self.dispatch(resolved);
                }
            }
            other => {
                self.message = match self.explorer.dispatch(other) {
                    Ok(()) => None,
                    Err(err) => Some(err.to_string()),
                };
                self.refresh_display_list();
            }
        }
        false
    }

    // ============ 光标导航 ============

    /// 向上移动光标
    fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// 向下移动光标
    fn move_down(&mut self) {
        if self.cursor + 1 < self.display_list.len() {
            self.cursor += 1;
        }
    }

    /// 光标所在行对应的核心意图
    fn resolve_activate(&self) -> Option<Action> {
        let id = self.cursor_node_id()?;
        match self.explorer.content().node(&id)?.kind {
            NodeKind::Folder => Some(Action::ToggleFolder(id)),
            NodeKind::Leaf => Some(Action::SelectLeaf(id)),
        }
    }
}
