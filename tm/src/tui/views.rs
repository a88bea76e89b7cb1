//! TUI views and rendering

use kvstore::KeyValueStore;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use super::app::App;
use super::state::{FormField, InteractionMode};
use crate::domain::{Emphasis, Filter, Task, priority_emphasis, priority_label};
use crate::format::{format_created_at, format_due_date, format_time_ago};
use crate::manager::TaskDraft;

mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Rgb(0, 200, 200); // Teal
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const FOCUS: Color = Color::Rgb(0, 200, 200);
    pub const SELECTED_BG: Color = Color::Rgb(40, 40, 40);
    pub const ERROR: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const DIM: Color = Color::DarkGray;
}

/// Color for a priority emphasis level
fn emphasis_color(emphasis: Emphasis) -> Color {
    match emphasis {
        Emphasis::Strong => Color::Red,
        Emphasis::Moderate => Color::Yellow,
        Emphasis::Mild => Color::Green,
        Emphasis::Neutral => Color::Gray,
    }
}

/// Main render function
pub fn render<S: KeyValueStore>(app: &App<S>, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Form
            Constraint::Length(1), // Summary
            Constraint::Min(0),    // Task list
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    render_form(app, frame, chunks[1]);
    render_summary(app, frame, chunks[2]);
    render_task_list(app, frame, chunks[3]);
    render_footer(app, frame, chunks[4]);

    if app.manager().is_filter_menu_open() {
        render_filter_menu(app.state().filter_menu_index, frame, chunks[3]);
    }
    if app.state().interaction_mode == InteractionMode::Help {
        let area = frame.area();
        render_help_overlay(frame, area);
    }
}

/// Render the header bar
fn render_header<S: KeyValueStore>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "✓ Task Manager ",
            Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled("Filter: ", Style::default().fg(colors::DIM)),
        Span::styled(app.manager().filter().label(), Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Render the new-task form, or the edit form while a task is being edited
fn render_form<S: KeyValueStore>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let state = app.state();
    let (title, draft) = match (state.interaction_mode, app.manager().editing()) {
        (InteractionMode::EditTask, Some(session)) => (" Edit task ", &session.draft),
        _ => (" New task ", app.manager().draft()),
    };
    let focused = state.interaction_mode.is_form().then_some(state.form.field);

    let due_input = if focused.is_some() {
        &state.form.due_input
    } else {
        &state.form.new_task_due
    };

    let lines = form_lines(draft, due_input, focused);
    let border_style = if focused.is_some() {
        Style::default().fg(colors::FOCUS)
    } else {
        Style::default()
    };

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(form, area);
}

fn form_lines<'a>(draft: &'a TaskDraft, due_input: &'a str, focused: Option<FormField>) -> Vec<Line<'a>> {
    let label = |field: FormField, text: &'static str| {
        let style = if focused == Some(field) {
            Style::default().fg(colors::FOCUS).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors::DIM)
        };
        Span::styled(text, style)
    };
    let cursor = |field: FormField| if focused == Some(field) { "▏" } else { "" };

    let text_value = if draft.text.is_empty() && focused.is_none() {
        Span::styled("press n to add a task", Style::default().fg(colors::DIM))
    } else {
        Span::raw(draft.text.as_str())
    };

    vec![
        Line::from(vec![label(FormField::Text, "Text      "), text_value, Span::raw(cursor(FormField::Text))]),
        Line::from(vec![
            label(FormField::DueDate, "Due date  "),
            Span::raw(due_input),
            Span::raw(cursor(FormField::DueDate)),
            Span::styled("  (YYYY-MM-DD)", Style::default().fg(colors::DIM)),
        ]),
        Line::from(vec![
            label(FormField::Priority, "Priority  "),
            Span::raw("◀ "),
            Span::styled(
                draft.priority.label(),
                Style::default().fg(emphasis_color(draft.priority.emphasis())),
            ),
            Span::raw(" ▶"),
        ]),
    ]
}

/// Render the "N tasks / X completed, Y remaining" line
fn render_summary<S: KeyValueStore>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let stats = app.manager().stats();
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let total = Paragraph::new(format!(" {} tasks", stats.total)).style(Style::default().fg(colors::DIM));
    let split = Paragraph::new(format!("{} completed, {} remaining ", stats.completed, stats.active))
        .style(Style::default().fg(colors::DIM))
        .alignment(Alignment::Right);

    frame.render_widget(total, halves[0]);
    frame.render_widget(split, halves[1]);
}

/// Render the filtered task list, or the empty-state message
fn render_task_list<S: KeyValueStore>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Tasks ");
    let tasks = app.manager().filtered_tasks();

    if tasks.is_empty() {
        let empty = Paragraph::new(vec![Line::from(""), Line::from("No tasks found")])
            .style(Style::default().fg(colors::DIM))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let editing = app.manager().editing_id();
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| task_item(task, editing == Some(&task.id)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(colors::SELECTED_BG));
    let mut list_state = ListState::default().with_selected(Some(app.state().selection.selected_index));

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn task_item(task: &Task, is_editing: bool) -> ListItem<'_> {
    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let text_style = if task.completed {
        Style::default().fg(colors::DIM).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let mut title = vec![
        Span::raw(checkbox),
        Span::styled(task.text.as_str(), text_style),
        Span::raw("  "),
        Span::styled(
            priority_label(task.priority),
            Style::default().fg(emphasis_color(priority_emphasis(task.priority))),
        ),
    ];
    if is_editing {
        title.push(Span::styled("  ✎ editing", Style::default().fg(colors::FOCUS)));
    }

    let mut meta = vec![Span::styled(
        format!(
            "    ⏱ {} ({})",
            format_created_at(task.created_at),
            format_time_ago(task.created_at)
        ),
        Style::default().fg(colors::DIM),
    )];
    if let Some(due) = task.due_date {
        meta.push(Span::styled(
            format!("    📅 {}", format_due_date(due)),
            Style::default().fg(colors::DIM),
        ));
    }

    ListItem::new(vec![Line::from(title), Line::from(meta)])
}

/// Render the footer: error message if any, otherwise key hints
fn render_footer<S: KeyValueStore>(app: &App<S>, frame: &mut Frame, area: Rect) {
    let state = app.state();

    let content = if let Some(error) = &state.error_message {
        Line::from(Span::styled(error.as_str(), Style::default().fg(colors::ERROR)))
    } else {
        let hints: &[(&str, &str)] = if app.manager().is_filter_menu_open() {
            &[("j/k", "move"), ("Enter", "choose"), ("Esc", "close")]
        } else if state.interaction_mode.is_form() {
            &[("Tab", "next field"), ("←/→", "priority"), ("Enter", "save"), ("Esc", "back")]
        } else {
            &[
                ("n", "new"),
                ("space", "toggle"),
                ("e", "edit"),
                ("d", "delete"),
                ("f", "filter"),
                ("?", "help"),
                ("q", "quit"),
            ]
        };
        Line::from(
            hints
                .iter()
                .flat_map(|(key, desc)| {
                    [
                        Span::styled(*key, Style::default().fg(colors::KEYBIND)),
                        Span::raw(format!(" {}  ", desc)),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    };

    let footer = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Render the filter menu popup
fn render_filter_menu(highlighted: usize, frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(40, 50, area);
    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = Filter::ALL
        .iter()
        .map(|filter| ListItem::new(format!(" {}", filter.label())))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Filter "))
        .highlight_style(Style::default().bg(colors::SELECTED_BG).add_modifier(Modifier::BOLD));
    let mut list_state = ListState::default().with_selected(Some(highlighted));

    frame.render_stateful_widget(list, popup_area, &mut list_state);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                .fg(colors::HEADER),
        )),
        Line::from(""),
        section("List"),
        key_line("j/↓ k/↑", "Move down / up"),
        key_line("g / G", "Go to top / bottom"),
        key_line("space", "Toggle completed"),
        key_line("e / Enter", "Edit task"),
        key_line("d / Del", "Delete task"),
        key_line("n / a", "New task"),
        key_line("f", "Filter menu"),
        key_line("q", "Quit"),
        Line::from(""),
        section("Form"),
        key_line("Tab", "Next field"),
        key_line("←/→", "Change priority"),
        key_line("Enter", "Add / save"),
        key_line("Esc", "Back (cancels an edit)"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(colors::DIM))),
    ];

    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, popup_area);
}

fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<12}", key), Style::default().fg(colors::KEYBIND)),
        Span::raw(desc),
    ])
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{DEFAULT_KEY, TaskManager};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use kvstore::MemoryStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn app() -> App<MemoryStore> {
        App::new(TaskManager::open(MemoryStore::new(), DEFAULT_KEY).unwrap())
    }

    #[test]
    fn test_renders_seed_task_and_summary() {
        let screen = draw(&app());
        assert!(screen.contains("Task Manager"));
        assert!(screen.contains("Ödev"));
        assert!(screen.contains("Medium"));
        assert!(screen.contains("1 tasks"));
        assert!(screen.contains("0 completed, 1 remaining"));
    }

    #[test]
    fn test_renders_empty_state() {
        let empty = MemoryStore::with_entry(DEFAULT_KEY, "[]");
        let app = App::new(TaskManager::open(empty, DEFAULT_KEY).unwrap());
        assert!(draw(&app).contains("No tasks found"));
    }

    #[test]
    fn test_closed_form_shows_new_task_draft() {
        let mut app = app();
        for code in [KeyCode::Char('n'), KeyCode::Char('x'), KeyCode::Tab] {
            app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        }
        for c in "2025-06-01".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));

        let screen = draw(&app);
        assert!(screen.contains("New task"));
        assert!(screen.contains("2025-06-01"));
    }

    #[test]
    fn test_emphasis_colors_are_distinct() {
        let colors = [
            emphasis_color(Emphasis::Strong),
            emphasis_color(Emphasis::Moderate),
            emphasis_color(Emphasis::Mild),
            emphasis_color(Emphasis::Neutral),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
