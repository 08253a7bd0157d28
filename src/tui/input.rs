use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::gesture::GestureEvent;

/// Maps terminal mouse input onto swipe gestures over the conversation pane
pub struct PointerMapper {
    units_per_cell: f64,
}

impl PointerMapper {
    pub fn new(units_per_cell: f64) -> Self {
        Self { units_per_cell }
    }

    /// A press must land inside `pane`; drags and releases are followed
    /// anywhere once a gesture is in progress.
    pub fn map(&self, mouse: &MouseEvent, pane: Rect, dragging: bool) -> Option<GestureEvent> {
        let x = f64::from(mouse.column) * self.units_per_cell;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left)
                if pane.contains(Position::new(mouse.column, mouse.row)) =>
            {
                Some(GestureEvent::Start(x))
            }
            MouseEventKind::Drag(MouseButton::Left) if dragging => Some(GestureEvent::Move(x)),
            MouseEventKind::Up(MouseButton::Left) if dragging => Some(GestureEvent::End),
            _ => None,
        }
    }

    /// Convert a gesture offset back into terminal columns
    pub fn cells(&self, offset: f64) -> i32 {
        if self.units_per_cell <= 0.0 {
            return 0;
        }
        (offset / self.units_per_cell).round() as i32
    }
}
