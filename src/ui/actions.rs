//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

use thiserror::Error;

use super::state::ActiveView;

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveCursorUp,
    MoveCursorDown,
    /// 激活光标所在行：文件夹切换展开，叶子改为选中
    Activate,

    // 核心意图
    SwitchView(ActiveView),
    ToggleFolder(String),
    SelectLeaf(String),
    ClearSelection,
    NextStep,
    PreviousStep,
    GoToStep(isize), // 任意整数，超界时取最近的合法步骤
}

/// 意图未满足前置条件；失败时状态不发生任何变化
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntentError {
    #[error("{0} 不是文件夹")]
    NotAFolder(String),
    #[error("{0} 不是叶子节点")]
    NotALeaf(String),
    #[error("数据流序列为空")]
    EmptySequence,
}
