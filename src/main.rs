mod content;
mod storage;
mod ui;

use std::env;
use std::io;
use std::path::PathBuf;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::ui::{App, render};

fn main() -> io::Result<()> {
    // 内容定义：命令行参数优先，其次用户覆盖文件，最后内置默认内容
    let result = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => storage::load_file(&path),
        None => storage::load_default(),
    };
    // 内容不合法时在进入终端界面之前直接报错退出
    let model = match result {
        Ok(model) => model,
        Err(err) => {
            eprintln!("内容定义加载失败: {err}");
            std::process::exit(1);
        }
    };

    // 创建应用状态
    let mut app = App::new(model);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
            if key.kind == crossterm::event::KeyEventKind::Press {
                if ui::handle_key_event(app, key.code)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
