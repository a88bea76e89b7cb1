//! TUI application - event handling and state management
//!
//! The App owns the TaskManager and the AppState and handles all keyboard
//! events. It does not do any rendering - that's delegated to the views
//! module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kvstore::KeyValueStore;
use tracing::warn;

use super::state::{AppState, FormField, InteractionMode};
use crate::domain::{Filter, TaskId};
use crate::format::parse_due_date;
use crate::manager::{TaskDraft, TaskManager};

/// TUI application
pub struct App<S: KeyValueStore> {
    manager: TaskManager<S>,
    state: AppState,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new application around a loaded task manager
    pub fn new(manager: TaskManager<S>) -> Self {
        Self {
            manager,
            state: AppState::new(),
        }
    }

    pub fn manager(&self) -> &TaskManager<S> {
        &self.manager
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Id of the highlighted task in the filtered view
    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.manager
            .filtered_tasks()
            .get(self.state.selection.selected_index)
            .map(|task| task.id.clone())
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear any transient error message on key press
        self.state.clear_error();

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true; // Force quit
        }

        if self.manager.is_filter_menu_open() {
            self.handle_filter_menu_key(key);
            return false;
        }

        match self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::NewTask | InteractionMode::EditTask => self.handle_form_key(key),
            InteractionMode::Help => self.state.interaction_mode = InteractionMode::Normal,
        }

        false
    }

    /// Handle key in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent) {
        let visible = self.manager.filtered_tasks().len();

        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.state.interaction_mode = InteractionMode::Help,

            // === Navigation ===
            KeyCode::Up | KeyCode::Char('k') => self.state.selection.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.selection.select_next(visible),
            KeyCode::Char('g') => self.state.selection.select_first(),
            KeyCode::Char('G') => self.state.selection.select_last(visible),

            // === Actions ===
            KeyCode::Char(' ') | KeyCode::Char('x') => self.handle_toggle(),
            KeyCode::Char('e') | KeyCode::Enter => self.handle_begin_edit(),
            KeyCode::Char('d') | KeyCode::Delete => self.handle_delete(),
            KeyCode::Char('n') | KeyCode::Char('a') => self.begin_new_task(),
            KeyCode::Char('f') => {
                self.state.filter_menu_index = self.manager.filter().index();
                self.manager.toggle_filter_menu();
            }

            _ => {}
        }
    }

    fn handle_toggle(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Err(e) = self.manager.toggle_task(&id) {
            self.report("Failed to save", e);
        }
        // Under a filter the toggled task drops out of view
        self.clamp_selection();
    }

    fn handle_delete(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if let Err(e) = self.manager.delete_task(&id) {
            self.report("Failed to save", e);
        }
        self.clamp_selection();
    }

    fn handle_begin_edit(&mut self) {
        let Some(id) = self.selected_task_id() else {
            return;
        };
        if self.manager.begin_edit(&id) {
            let due_input = self.manager.editing().map(|s| due_to_input(&s.draft)).unwrap_or_default();
            self.state.form.reset(due_input);
            self.state.interaction_mode = InteractionMode::EditTask;
        }
    }

    fn begin_new_task(&mut self) {
        let due_input = self.state.form.new_task_due.clone();
        self.state.form.reset(due_input);
        self.state.interaction_mode = InteractionMode::NewTask;
    }

    /// Handle key while the filter menu is open
    fn handle_filter_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.filter_menu_index = self.state.filter_menu_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.filter_menu_index = (self.state.filter_menu_index + 1).min(Filter::ALL.len() - 1);
            }
            KeyCode::Enter => {
                let filter = Filter::ALL[self.state.filter_menu_index.min(Filter::ALL.len() - 1)];
                self.manager.set_filter(filter);
                self.clamp_selection();
            }
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => self.manager.toggle_filter_menu(),
            _ => {}
        }
    }

    /// Handle key in the new-task or edit form
    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.leave_form(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab => self.state.form.field = self.state.form.field.next(),
            KeyCode::BackTab => self.state.form.field = self.state.form.field.prev(),
            _ => match self.state.form.field {
                FormField::Text => self.edit_text(key),
                FormField::DueDate => self.edit_due(key),
                FormField::Priority => self.edit_priority(key),
            },
        }
    }

    /// Draft the form is editing
    fn form_draft_mut(&mut self) -> Option<&mut TaskDraft> {
        match self.state.interaction_mode {
            InteractionMode::NewTask => Some(self.manager.draft_mut()),
            InteractionMode::EditTask => self.manager.edit_draft_mut(),
            _ => None,
        }
    }

    fn edit_text(&mut self, key: KeyEvent) {
        let Some(draft) = self.form_draft_mut() else {
            return;
        };
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => draft.text.push(c),
            (KeyCode::Backspace, _) => {
                draft.text.pop();
            }
            _ => {}
        }
    }

    fn edit_due(&mut self, key: KeyEvent) {
        let due = &mut self.state.form.due_input;
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => due.push(c),
            KeyCode::Backspace => {
                due.pop();
            }
            KeyCode::Delete => due.clear(),
            _ => {}
        }
    }

    fn edit_priority(&mut self, key: KeyEvent) {
        let Some(draft) = self.form_draft_mut() else {
            return;
        };
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => draft.priority = draft.priority.prev(),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => draft.priority = draft.priority.next(),
            _ => {}
        }
    }

    /// Esc in a form: the new-task draft is kept, an edit is cancelled
    fn leave_form(&mut self) {
        match self.state.interaction_mode {
            InteractionMode::NewTask => {
                let due_input = self.state.form.due_input.clone();
                if let Ok(due_date) = parse_due_date(&due_input) {
                    self.manager.draft_mut().due_date = due_date;
                }
                self.state.form.new_task_due = due_input;
            }
            InteractionMode::EditTask => {
                self.manager.cancel_edit();
            }
            _ => {}
        }
        self.state.interaction_mode = InteractionMode::Normal;
    }

    fn submit_form(&mut self) {
        let due_date = match parse_due_date(&self.state.form.due_input) {
            Ok(due_date) => due_date,
            Err(message) => {
                self.state.form.field = FormField::DueDate;
                self.state.set_error(message);
                return;
            }
        };

        match self.state.interaction_mode {
            InteractionMode::NewTask => {
                self.manager.draft_mut().due_date = due_date;
                match self.manager.add_task() {
                    Ok(Some(id)) => {
                        self.state.interaction_mode = InteractionMode::Normal;
                        self.state.form.new_task_due.clear();
                        // The current filter may hide the new task
                        let position = self.manager.filtered_tasks().iter().position(|task| task.id == id);
                        if let Some(index) = position {
                            self.state.selection.selected_index = index;
                        }
                    }
                    // Blank text: stay in the form
                    Ok(None) => {}
                    Err(e) => {
                        self.state.interaction_mode = InteractionMode::Normal;
                        self.report("Failed to save", e);
                    }
                }
            }
            InteractionMode::EditTask => {
                if let Some(draft) = self.manager.edit_draft_mut() {
                    draft.due_date = due_date;
                }
                match self.manager.save_edit() {
                    Ok(true) => {}
                    // Refused: the edit session stays open
                    Ok(false) => self.state.set_error("Task text cannot be empty"),
                    Err(e) => self.report("Failed to save", e),
                }
                if self.manager.editing().is_none() {
                    self.state.interaction_mode = InteractionMode::Normal;
                }
            }
            _ => {}
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.manager.filtered_tasks().len();
        self.state.selection.clamp(visible);
    }

    fn report(&mut self, what: &str, err: impl std::fmt::Display) {
        warn!("{}: {}", what, err);
        self.state.set_error(format!("{}: {}", what, err));
    }
}

fn due_to_input(draft: &TaskDraft) -> String {
    draft
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::manager::DEFAULT_KEY;
    use chrono::NaiveDate;
    use kvstore::MemoryStore;

    fn app() -> App<MemoryStore> {
        App::new(TaskManager::open(MemoryStore::new(), DEFAULT_KEY).unwrap())
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App<MemoryStore>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut forced = app();
        assert!(forced.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));

        let mut normal = app();
        assert!(!press(&mut normal, KeyCode::Char('q')));
        assert!(normal.state().should_quit);
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state().interaction_mode, InteractionMode::NewTask);

        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-06-01");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        let tasks = app.manager().tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].text, "Buy milk");
        assert_eq!(tasks[1].priority, Some(Priority::High));
        assert_eq!(tasks[1].due_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(app.state().selection.selected_index, 1);
    }

    #[test]
    fn test_escape_keeps_new_task_draft() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-06-01");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.manager().draft().text, "Buy milk");
        assert_eq!(app.state().form.due_input, "2025-06-01");
        press(&mut app, KeyCode::Enter);

        let tasks = app.manager().tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].due_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(tasks[1].priority, Some(Priority::Low));

        // The next new task starts empty
        press(&mut app, KeyCode::Char('n'));
        assert!(app.manager().draft().is_blank());
        assert_eq!(app.state().form.due_input, "");
    }

    #[test]
    fn test_escape_keeps_half_typed_due_input() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-06");
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state().form.due_input, "2025-06");
        assert_eq!(app.manager().draft().due_date, None);
    }

    #[test]
    fn test_add_under_hiding_filter_keeps_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));

        // Completed filter: only the seed is visible
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.manager().filter(), Filter::Completed);

        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.manager().tasks().len(), 2);
        assert_eq!(app.state().selection.selected_index, 0);
        assert_eq!(app.selected_task_id(), Some(TaskId::from("1")));
    }

    #[test]
    fn test_add_selects_new_task_when_visible() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "first");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('g'));

        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "second");
        press(&mut app, KeyCode::Enter);

        let selected = app.selected_task_id().expect("a task is selected");
        assert_eq!(app.manager().get(&selected).map(|task| task.text.as_str()), Some("second"));
    }

    #[test]
    fn test_blank_submit_stays_in_form() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state().interaction_mode, InteractionMode::NewTask);
        assert_eq!(app.manager().tasks().len(), 1);
    }

    #[test]
    fn test_invalid_due_blocks_submit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "x");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-13-01");
        press(&mut app, KeyCode::Enter);

        assert!(app.state().error_message.is_some());
        assert_eq!(app.state().form.field, FormField::DueDate);
        assert_eq!(app.manager().tasks().len(), 1);
    }

    #[test]
    fn test_toggle_and_delete_selected() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.manager().tasks()[0].completed);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.manager().tasks().is_empty());
        assert_eq!(app.selected_task_id(), None);

        // Nothing selected: both are no-ops
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('d'));
        assert!(app.manager().tasks().is_empty());
    }

    #[test]
    fn test_edit_save_and_cancel() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state().interaction_mode, InteractionMode::EditTask);
        assert_eq!(app.manager().editing_id(), Some(&TaskId::from("1")));

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert_eq!(app.manager().tasks()[0].text, "Ödev");

        press(&mut app, KeyCode::Char('e'));
        type_str(&mut app, " 2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
        assert_eq!(app.manager().tasks()[0].text, "Ödev 2");
    }

    #[test]
    fn test_blank_edit_is_refused() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state().interaction_mode, InteractionMode::EditTask);
        assert!(app.state().error_message.is_some());
        assert_eq!(app.manager().tasks()[0].text, "Ödev");
    }

    #[test]
    fn test_edit_prefills_due_input() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "dated");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2025-06-01");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state().form.due_input, "2025-06-01");

        // Clearing the field removes the due date
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.manager().tasks()[1].due_date, None);
    }

    #[test]
    fn test_filter_menu() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        assert!(app.manager().is_filter_menu_open());

        // Keys go to the menu, not the list
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);

        assert!(!app.manager().is_filter_menu_open());
        assert_eq!(app.manager().filter(), Filter::Completed);
        assert!(app.manager().filtered_tasks().is_empty());
        assert_eq!(app.manager().tasks().len(), 1);

        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.manager().is_filter_menu_open());
        assert_eq!(app.manager().filter(), Filter::Completed);
    }

    #[test]
    fn test_toggle_under_active_filter_clamps_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.manager().filter(), Filter::Active);

        press(&mut app, KeyCode::Char(' '));
        assert!(app.manager().filtered_tasks().is_empty());
        assert_eq!(app.state().selection.selected_index, 0);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state().interaction_mode, InteractionMode::Help);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.state().interaction_mode, InteractionMode::Normal);
    }
}
