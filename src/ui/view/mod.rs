//! 视图层模块
//!
//! 纯渲染：每帧先取一份状态快照，再结合内容模型得到界面，不回写任何状态

pub mod components;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{ActiveView, App, Snapshot};
use crate::content::{ContentModel, NodeKind};
use components::{layer_color, render_legend};

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let snapshot = app.explorer.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // 标题
            Constraint::Min(10),   // 主体
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match snapshot.view {
        ActiveView::Structure => render_structure(frame, app, &snapshot, chunks[1]),
        ActiveView::Flow => render_flow(frame, app, &snapshot, chunks[1]),
    }
    render_help(frame, app, snapshot.view, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let meta = app.explorer.content().meta();
    let lines = vec![
        Line::from(Span::styled(
            format!("🏛 {}", meta.title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            meta.subtitle.clone(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

// ============ 目录结构视图 ============

fn render_structure(frame: &mut Frame, app: &mut App, snapshot: &Snapshot, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_tree(frame, app, snapshot, panels[0]);
    render_details(frame, app, panels[1]);
    render_legend(frame, rows[1]);
}

fn render_tree(frame: &mut Frame, app: &mut App, snapshot: &Snapshot, area: Rect) {
    let content = app.explorer.content();
    let items: Vec<ListItem> = app
        .display_list
        .iter()
        .enumerate()
        .map(|(i, (depth, id))| {
            let node = content.node(id).unwrap();
            let indent = "  ".repeat(*depth);

            let (icon, name) = match node.kind {
                NodeKind::Folder => {
                    let expanded = snapshot.expanded.get(id).copied().unwrap_or(false);
                    let icon = if expanded { "▾ " } else { "▸ " };
                    (icon, format!("{}/", node.name))
                }
                NodeKind::Leaf => ("  ", node.name.clone()),
            };

            let base_color = match node.kind {
                NodeKind::Folder => Color::Cyan,
                NodeKind::Leaf => content
                    .metadata(id)
                    .map(|m| layer_color(m.layer))
                    .unwrap_or(Color::White),
            };

            let is_selected = snapshot.selected.as_deref() == Some(id.as_str());
            let marker = if is_selected { " ●" } else { "" };
            let text = format!("{indent}{icon}{name}{marker}");

            let style = if i == app.cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else if is_selected {
                Style::default().fg(base_color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(base_color)
            };

            ListItem::new(Line::from(vec![Span::styled(text, style)]))
        })
        .collect();

    let tree_widget = List::new(items)
        .block(Block::default().title("目录结构").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.cursor));

    frame.render_stateful_widget(tree_widget, area, &mut state);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let content = app.explorer.content();

    let Some(id) = app.explorer.tree().selection() else {
        let hint = Paragraph::new("按 Enter 选中文件查看用途和代码摘录")
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().title("文件详情").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    if let (Some(node), Some(meta)) = (content.node(id), content.metadata(id)) {
        let color = layer_color(meta.layer);
        lines.push(Line::from(vec![
            Span::styled(
                node.name.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{}]", meta.layer.name()), Style::default().fg(color)),
        ]));
        lines.push(Line::from(format!("用途: {}", meta.purpose)));
        lines.push(Line::from(format!("包含: {}", meta.summary)));

        if let Some(excerpt) = &meta.excerpt {
            lines.push(Line::from(""));
            for code_line in excerpt.lines() {
                lines.push(Line::from(Span::styled(
                    code_line.to_string(),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }

    let details = Paragraph::new(lines)
        .block(Block::default().title("文件详情").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(details, area);
}

// ============ 数据流视图 ============

fn render_flow(frame: &mut Frame, app: &mut App, snapshot: &Snapshot, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(6)])
        .split(area);

    let content = app.explorer.content();
    let position = snapshot.flow_position;

    let items: Vec<ListItem> = content
        .flow_steps()
        .iter()
        .map(|step| {
            // 步骤颜色来自它指向的叶子所在的分层
            let color = content
                .metadata(&step.node_id)
                .map(|m| layer_color(m.layer))
                .unwrap_or(Color::White);
            let active = step.index == position;

            let number_style = if active {
                Style::default()
                    .fg(color)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(color)
            };
            let title_style = if active {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", step.index + 1), number_style),
                Span::raw(" "),
                Span::styled(step.title.clone(), title_style),
                Span::raw("  "),
                Span::styled(
                    node_path(content, &step.node_id),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().title("数据流").borders(Borders::ALL));

    let mut state = ListState::default();
    state.select(Some(position));
    frame.render_stateful_widget(list, rows[0], &mut state);

    render_flow_detail(frame, app, rows[1]);
}

fn render_flow_detail(frame: &mut Frame, app: &App, area: Rect) {
    let content = app.explorer.content();
    let text = match app.explorer.flow().current(content) {
        Some(step) => format!(
            "{} / {}  {}\n{}\n⚡ {}",
            step.index + 1,
            content.flow_steps().len(),
            step.title,
            step.description,
            step.annotation,
        ),
        None => "数据流序列为空".to_string(),
    };

    let detail = Paragraph::new(text)
        .block(Block::default().title("当前步骤").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(detail, area);
}

/// 从叶子节点回溯到根得到位置路径，不含根目录名
fn node_path(content: &ContentModel, id: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let mut current = content.node(id);
    while let Some(node) = current {
        if node.is_root() {
            break;
        }
        parts.push(&node.name);
        current = content.node(&node.parent_id);
    }
    parts.reverse();
    parts.join("/")
}

fn render_help(frame: &mut Frame, app: &App, view: ActiveView, area: Rect) {
    let help_text = match view {
        ActiveView::Structure => {
            "[j/k] 导航  [Enter] 展开/选中  [Esc] 取消选中  [Tab] 数据流视图  [q] 退出"
        }
        ActiveView::Flow => "[j/k] 下/上一步  [1-9] 跳转  [g/G] 首/末步  [Tab] 目录视图  [q] 退出",
    };

    let message = app.message.as_deref().unwrap_or("");
    let text = if message.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, message)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}
