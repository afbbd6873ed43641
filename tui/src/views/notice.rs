use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::layout::Constraint;
use ratatui::layout::Flex;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use raksha_core::session::Notice;
use raksha_core::session::NoticeLevel;

use crate::key_hint;

const MAX_WIDTH: u16 = 60;

/// Blocking message box drawn over whatever screen is active.
pub(super) fn render(frame: &mut Frame, area: Rect, notice: &Notice) {
    let width = MAX_WIDTH.min(area.width.saturating_sub(4)).max(20);
    let text_width = usize::from(width.saturating_sub(4)).max(1);
    let wrapped = textwrap::wrap(&notice.message, text_width);
    let height = u16::try_from(wrapped.len()).unwrap_or(u16::MAX).saturating_add(4);

    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);

    let (title, color) = match notice.level {
        NoticeLevel::Info => (" Notice ", Color::Green),
        NoticeLevel::Error => (" Error ", Color::Red),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, Style::default().fg(color).bold()));

    let mut lines: Vec<Line> = wrapped
        .into_iter()
        .map(|l| Line::from(l.into_owned()))
        .collect();
    lines.push(Line::from(""));
    lines.push(key_hint::hint_line(&[(key_hint::ACTIVATE, "ok")]));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
