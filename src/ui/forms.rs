use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::EntityId;
use crate::view::{FieldKind, FieldView};

/// Edit draft for renaming a single row. Nothing is sent until the whole
/// draft is confirmed.
#[derive(Debug, Clone)]
pub(crate) struct RenameForm {
    pub(crate) id: EntityId,
    pub(crate) noun: &'static str,
    pub(crate) name: String,
    pub(crate) error: Option<String>,
}

impl RenameForm {
    /// Seed the draft with the row's current name.
    pub(crate) fn new(id: EntityId, noun: &'static str, current: &str) -> Self {
        Self {
            id,
            noun,
            name: current.to_string(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.name.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.name.pop();
    }

    /// Validate the draft and return the trimmed name ready to send.
    pub(crate) fn parse_inputs(&self) -> Result<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Name is required."));
        }
        Ok(name.to_string())
    }

    pub(crate) fn build_line(&self) -> Line<'static> {
        let display = if self.name.is_empty() {
            "<required>".to_string()
        } else {
            self.name.clone()
        };
        Line::from(vec![
            Span::raw("Name: "),
            Span::styled(display, Style::default().fg(Color::Yellow)),
        ])
    }

    pub(crate) fn value_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// State for confirming a delete.
#[derive(Debug, Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) id: EntityId,
    pub(crate) noun: &'static str,
    pub(crate) label: String,
}

impl ConfirmDelete {
    pub(crate) fn new(id: EntityId, noun: &'static str, label: impl Into<String>) -> Self {
        Self {
            id,
            noun,
            label: label.into(),
        }
    }
}

/// Render one creation dialog field as `Label: value`.
pub(crate) fn field_line(field: &FieldView) -> Line<'static> {
    let display = match (field.kind, field.value.is_empty()) {
        (FieldKind::Choice, true) => "<choose with ↑↓>".to_string(),
        (_, true) => "<empty>".to_string(),
        (_, false) => field.value.clone(),
    };

    let style = if field.active {
        Style::default().fg(Color::Yellow)
    } else if field.value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{}: ", field.label)),
        Span::styled(display, style),
    ])
}

/// Column where the cursor sits for a text field.
pub(crate) fn field_cursor_offset(field: &FieldView) -> usize {
    field.label.chars().count() + 2 + field.value.chars().count()
}
