//! 键盘事件映射 (Input -> Action)
//!
//! 将按键事件转换为 Action

use std::io;

use crossterm::event::KeyCode;

use super::actions::Action;
use super::state::{ActiveView, App};

/// 根据当前视图和按键获取对应的 Action
pub fn get_action(view: ActiveView, key: KeyCode) -> Option<Action> {
    match view {
        ActiveView::Structure => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveCursorDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveCursorUp),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Activate),
            KeyCode::Esc => Some(Action::ClearSelection),
            KeyCode::Tab => Some(Action::SwitchView(ActiveView::Flow)),
            _ => None,
        },
        ActiveView::Flow => match key {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextStep),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PreviousStep),
            KeyCode::Char('g') => Some(Action::GoToStep(0)),
            KeyCode::Char('G') => Some(Action::GoToStep(isize::MAX)),
            // 数字键直接跳到对应步骤，超出序列长度时落在最后一步
            KeyCode::Char(c @ '1'..='9') => Some(Action::GoToStep((c as u8 - b'1') as isize)),
            KeyCode::Tab => Some(Action::SwitchView(ActiveView::Structure)),
            _ => None,
        },
    }
}

/// 处理按键事件
pub fn handle_key_event(app: &mut App, key: KeyCode) -> io::Result<bool> {
    if let Some(action) = get_action(app.explorer.view(), key) {
        Ok(app.dispatch(action))
    } else {
        Ok(false)
    }
}
