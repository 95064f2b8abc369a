//! 通用 UI 组件
//!
//! 分层配色与图例等与状态核心无关的展示映射

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::content::LayerTag;

/// 分层配色，全量映射
pub fn layer_color(layer: LayerTag) -> Color {
    match layer {
        LayerTag::Config => Color::Yellow,
        LayerTag::Domain => Color::Green,
        LayerTag::Ports => Color::LightBlue,
        LayerTag::Application => Color::Magenta,
        LayerTag::Adapters => Color::Blue,
        LayerTag::Infrastructure => Color::Gray,
        LayerTag::Entry => Color::LightYellow,
    }
}

/// [组件] 分层图例
pub fn render_legend(frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for layer in LayerTag::ALL {
        spans.push(Span::styled(
            format!("■ {}  ", layer.name()),
            Style::default().fg(layer_color(layer)),
        ));
    }

    let legend = Paragraph::new(Line::from(spans))
        .block(Block::default().title("分层").borders(Borders::ALL));
    frame.render_widget(legend, area);
}
