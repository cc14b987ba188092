use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{List, ListItem, ListState, Paragraph},
};

use laboon_core::controller::{Controller, FRAME_MARGIN, Mode};
use laboon_core::keymap::Binding;
use laboon_core::list::{FilterState, Row};
use laboon_core::runtime::RuntimeClient;

use super::theme::styles;

const TITLE: &str = "Docker Containers";
const FOCUS_BAR: &str = "│ ";
const NO_BAR: &str = "  ";
const HELP_SEPARATOR: &str = " • ";
/// Bindings per line in the full help footer
const HELP_COLUMNS: usize = 3;

/// Truncate to `width` columns, ending with an ellipsis when cut
fn fit(s: &str, width: u16) -> String {
    let max = width as usize;
    if max == 0 {
        return "".into();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".into();
    }
    let mut out: String = chars.into_iter().take(max - 1).collect();
    out.push('…');
    out
}

fn help_line(bindings: &[&Binding]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(HELP_SEPARATOR, styles::text_dim()));
        }
        spans.push(Span::styled(binding.help_key, styles::key_hint()));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(binding.help, styles::text_dim()));
    }
    Line::from(spans)
}

fn help_lines<R: RuntimeClient>(ctl: &Controller<R>) -> Vec<Line<'static>> {
    if ctl.mode() == Mode::Filtering {
        return vec![Line::from(vec![
            Span::styled("enter", styles::key_hint()),
            Span::styled(" apply filter", styles::text_dim()),
            Span::styled(HELP_SEPARATOR, styles::text_dim()),
            Span::styled("esc", styles::key_hint()),
            Span::styled(" cancel", styles::text_dim()),
        ])];
    }

    if ctl.full_help() {
        let bindings: Vec<&Binding> = ctl.keys().full_help().collect();
        bindings.chunks(HELP_COLUMNS).map(help_line).collect()
    } else {
        let bindings: Vec<&Binding> = ctl.keys().short_help().collect();
        vec![help_line(&bindings)]
    }
}

fn filter_line<R: RuntimeClient>(ctl: &Controller<R>) -> Line<'static> {
    let list = ctl.list();
    match list.filter_state() {
        FilterState::Filtering => Line::from(vec![
            Span::styled("Filter: ", styles::key_hint()),
            Span::styled(format!("{}█", list.filter_query()), styles::text()),
        ]),
        FilterState::FilterApplied => Line::from(vec![
            Span::styled(
                format!("“{}” ", list.filter_query()),
                styles::text(),
            ),
            Span::styled(
                format!("{} of {} containers", list.visible_len(), list.len()),
                styles::text_dim(),
            ),
        ]),
        FilterState::Unfiltered => Line::default(),
    }
}

fn status_line<R: RuntimeClient>(ctl: &Controller<R>) -> Line<'static> {
    if let Some(status) = ctl.status() {
        return Line::from(Span::styled(status.text.clone(), styles::status(status.kind)));
    }

    let selected = ctl.selection().size();
    if selected > 0 {
        Line::from(Span::styled(
            format!("{} selected", selected),
            styles::marker(),
        ))
    } else {
        Line::default()
    }
}

fn row_item(row: Row, focused: bool, width: u16) -> ListItem<'static> {
    let bar = if focused {
        Span::styled(FOCUS_BAR, styles::focus_bar())
    } else {
        Span::raw(NO_BAR)
    };
    // bar + marker + space
    let text_width = width.saturating_sub(4);

    let title_style = if focused {
        styles::tone(row.tone).patch(styles::focused_title())
    } else {
        styles::tone(row.tone)
    };
    let description_style = if row.failed {
        styles::error()
    } else {
        styles::text_dim()
    };

    ListItem::new(Text::from(vec![
        Line::from(vec![
            bar.clone(),
            Span::styled(row.marker, styles::marker()),
            Span::raw(" "),
            Span::styled(fit(&row.title, text_width), title_style),
        ]),
        Line::from(vec![
            bar,
            Span::raw("  "),
            Span::styled(fit(&row.description, text_width), description_style),
        ]),
        Line::default(),
    ]))
}

fn draw_list<R: RuntimeClient>(f: &mut Frame, ctl: &Controller<R>, area: Rect) {
    let list = ctl.list();
    if list.visible_len() == 0 {
        let message = if list.is_empty() {
            "No containers."
        } else {
            "No matching containers."
        };
        f.render_widget(Paragraph::new(Span::styled(message, styles::text_dim())), area);
        return;
    }

    let cursor = list.index();
    let items: Vec<ListItem> = list
        .visible()
        .enumerate()
        .map(|(i, (_, entity))| row_item(Row::from_entity(entity), i == cursor, area.width))
        .collect();

    let mut state = ListState::default();
    state.select(Some(cursor));
    f.render_stateful_widget(List::new(items), area, &mut state);
}

/// Render the whole screen for the current controller state
pub fn draw<R: RuntimeClient>(f: &mut Frame, ctl: &Controller<R>) {
    let (margin_x, margin_y) = FRAME_MARGIN;
    let help = help_lines(ctl);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(margin_x)
        .vertical_margin(margin_y)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(help.len() as u16),
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(format!(" {} ", TITLE), styles::title_bar()));
    f.render_widget(title, chunks[0]);
    f.render_widget(Paragraph::new(filter_line(ctl)), chunks[1]);
    draw_list(f, ctl, chunks[2]);
    f.render_widget(Paragraph::new(status_line(ctl)), chunks[3]);
    f.render_widget(Paragraph::new(help), chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use laboon_core::controller::InputEvent;
    use laboon_core::fake::FakeRuntime;
    use laboon_core::keymap::Key;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(ctl: &Controller<FakeRuntime>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, ctl)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn demo_controller() -> Controller<FakeRuntime> {
        Controller::connect(FakeRuntime::demo()).await.unwrap()
    }

    #[test]
    fn test_fit_truncates_with_ellipsis() {
        assert_eq!(fit("postgres", 20), "postgres");
        assert_eq!(fit("postgres", 5), "post…");
        assert_eq!(fit("postgres", 1), "…");
        assert_eq!(fit("postgres", 0), "");
    }

    #[tokio::test]
    async fn test_screen_shows_title_and_rows() {
        let ctl = demo_controller().await;
        let text = screen(&ctl);

        assert!(text.contains("Docker Containers"));
        assert!(text.contains("api (3f9a1c0e7b2d) ▶"));
        assert!(text.contains("ghcr.io/acme/api:1.4 - running"));
        assert!(text.contains("q quit"));
    }

    #[tokio::test]
    async fn test_full_help_lists_lifecycle_bindings() {
        let mut ctl = demo_controller().await;
        ctl.handle(InputEvent::Key(Key::Char('?')));
        let text = screen(&ctl);

        assert!(text.contains("pause container"));
        assert!(text.contains("stop container"));
    }

    #[test]
    fn test_empty_list_message() {
        let ctl = Controller::new(FakeRuntime::new(Vec::new()), Vec::new());
        assert!(screen(&ctl).contains("No containers."));
    }
}
