//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.
//! Task data and drafts live in the `TaskManager`; this holds only what the
//! terminal needs on top of it (mode, focus, selection, messages).

/// Interaction mode (modal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// List navigation
    #[default]
    Normal,
    /// Typing into the new-task form
    NewTask,
    /// Typing into the edit form of the task being edited
    EditTask,
    /// Help overlay
    Help,
}

impl InteractionMode {
    /// Check if a form has keyboard focus
    pub fn is_form(&self) -> bool {
        matches!(self, Self::NewTask | Self::EditTask)
    }
}

/// Form field with keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Text,
    DueDate,
    Priority,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Text => Self::DueDate,
            Self::DueDate => Self::Priority,
            Self::Priority => Self::Text,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Text => Self::Priority,
            Self::DueDate => Self::Text,
            Self::Priority => Self::DueDate,
        }
    }
}

/// Form focus plus the raw due-date text
///
/// The due date is typed as text. It reaches the draft only once it parses,
/// on submit or when the new-task form is left.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub field: FormField,
    pub due_input: String,
    /// Due-date text of the new-task form while it is closed
    pub new_task_due: String,
}

impl FormState {
    /// Reset focus and load the due-date text for a fresh form session
    pub fn reset(&mut self, due_input: String) {
        self.field = FormField::Text;
        self.due_input = due_input;
    }
}

/// Selection state for the task list
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub selected_index: usize,
}

impl SelectionState {
    pub fn select_next(&mut self, max_items: usize) {
        if max_items > 0 && self.selected_index < max_items - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self, max_items: usize) {
        if max_items > 0 {
            self.selected_index = max_items - 1;
        }
    }

    /// Ensure selection is within bounds
    pub fn clamp(&mut self, max_items: usize) {
        if max_items == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= max_items {
            self.selected_index = max_items - 1;
        }
    }
}

/// Main TUI application state
#[derive(Debug, Default)]
pub struct AppState {
    pub interaction_mode: InteractionMode,
    pub selection: SelectionState,
    pub form: FormState,
    /// Highlighted entry while the filter menu is open
    pub filter_menu_index: usize,
    /// Transient error shown in the footer until the next key press
    pub error_message: Option<String>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
