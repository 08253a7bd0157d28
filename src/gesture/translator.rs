use crate::app::GestureConfig;

/// Direction of a completed swipe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Drag travelled towards lower coordinates: previous chat, or back to the list
    Backward,
    /// Drag travelled towards higher coordinates: next chat
    Forward,
}

/// Raw pointer input over the conversation pane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start(f64),
    Move(f64),
    End,
}

/// Resolved effect of a gesture on the active selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<T> {
    /// Selection unchanged
    Stay,
    /// Switch to this conversation
    Select(T),
    /// Drop the selection and show the list
    ClearSelection,
}

impl<T> Navigation<T> {
    /// Did the selection change?
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Stay)
    }
}

/// One touch-drag interaction, from press to release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub origin: f64,
    pub last: f64,
}

impl GestureSession {
    /// Live drag, positive when moving towards higher coordinates
    pub fn raw_offset(&self) -> f64 {
        self.last - self.origin
    }
}

/// Turns start/move/end events into navigation decisions
#[derive(Debug, Clone)]
pub struct GestureTranslator {
    threshold: f64,
    damping: f64,
    max_visual_offset: f64,
    session: Option<GestureSession>,
    offset: f64,
}

impl GestureTranslator {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            threshold: config.threshold,
            damping: config.damping,
            max_visual_offset: config.max_visual_offset.abs(),
            session: None,
            offset: 0.0,
        }
    }

    /// Begin a gesture. An unfinished session is discarded.
    pub fn start(&mut self, x: f64) {
        self.session = Some(GestureSession { origin: x, last: x });
        self.offset = 0.0;
    }

    /// Track the pointer. Ignored when no gesture is in progress.
    pub fn move_to(&mut self, x: f64) {
        if let Some(session) = self.session.as_mut() {
            session.last = x;
            self.offset = session.raw_offset();
        }
    }

    /// Finish the gesture and classify it. Always clears the session and offset.
    pub fn finish(&mut self) -> Option<SwipeDirection> {
        let session = self.session.take();
        self.offset = 0.0;

        let distance = session.map(|s| s.origin - s.last)?;
        if distance > self.threshold {
            Some(SwipeDirection::Backward)
        } else if distance < -self.threshold {
            Some(SwipeDirection::Forward)
        } else {
            None
        }
    }

    /// Finish the gesture and resolve it against the conversation order
    pub fn end<T: PartialEq + Clone>(&mut self, order: &[T], active: Option<&T>) -> Navigation<T> {
        match self.finish() {
            Some(direction) => resolve(direction, order, active),
            None => Navigation::Stay,
        }
    }

    /// Feed one event; only `End` can produce navigation
    pub fn handle<T: PartialEq + Clone>(
        &mut self,
        event: GestureEvent,
        order: &[T],
        active: Option<&T>,
    ) -> Navigation<T> {
        match event {
            GestureEvent::Start(x) => self.start(x),
            GestureEvent::Move(x) => self.move_to(x),
            GestureEvent::End => return self.end(order, active),
        }
        Navigation::Stay
    }

    /// Raw drag since the gesture started (zero when idle)
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Damped and clamped offset for drawing the pane
    pub fn visual_offset(&self) -> f64 {
        (self.offset * self.damping).clamp(-self.max_visual_offset, self.max_visual_offset)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }
}

impl Default for GestureTranslator {
    fn default() -> Self {
        Self::new(&GestureConfig::default())
    }
}

/// Apply a swipe direction to an ordered list and the current selection.
///
/// Backward moves to the previous entry, or clears the selection when there
/// is none. Forward moves to the next entry and does nothing at the end of
/// the list. With nothing selected there is no pane to swipe, so nothing
/// happens.
pub fn resolve<T: PartialEq + Clone>(
    direction: SwipeDirection,
    order: &[T],
    active: Option<&T>,
) -> Navigation<T> {
    let Some(active) = active else {
        return Navigation::Stay;
    };
    let position = order.iter().position(|id| id == active);

    match direction {
        SwipeDirection::Backward => match position {
            Some(index) if index > 0 => Navigation::Select(order[index - 1].clone()),
            _ => Navigation::ClearSelection,
        },
        SwipeDirection::Forward => match position.and_then(|index| order.get(index + 1)) {
            Some(next) => Navigation::Select(next.clone()),
            None => Navigation::Stay,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: [char; 3] = ['A', 'B', 'C'];

    fn swipe(translator: &mut GestureTranslator, from: f64, to: f64) {
        translator.start(from);
        translator.move_to((from + to) / 2.0);
        translator.move_to(to);
    }

    #[test]
    fn test_backward_swipe_selects_previous() {
        let mut t = GestureTranslator::default();
        swipe(&mut t, 200.0, 140.0);
        assert_eq!(t.end(&LIST, Some(&'B')), Navigation::Select('A'));
    }

    #[test]
    fn test_forward_swipe_at_last_is_noop() {
        let mut t = GestureTranslator::default();
        swipe(&mut t, 100.0, 160.0);
        assert_eq!(t.end(&LIST, Some(&'C')), Navigation::Stay);
    }

    #[test]
    fn test_backward_swipe_on_single_chat_clears() {
        let mut t = GestureTranslator::default();
        swipe(&mut t, 170.0, 100.0);
        assert_eq!(t.end(&['A'], Some(&'A')), Navigation::ClearSelection);
    }

    #[test]
    fn test_every_index_in_both_directions() {
        let order: Vec<u32> = (1..=5).collect();
        for (i, id) in order.iter().enumerate() {
            let mut t = GestureTranslator::default();
            swipe(&mut t, 300.0, 240.0);
            let expected = if i > 0 {
                Navigation::Select(order[i - 1])
            } else {
                Navigation::ClearSelection
            };
            assert_eq!(t.end(&order, Some(id)), expected, "backward from index {i}");

            swipe(&mut t, 300.0, 360.0);
            let expected = if i + 1 < order.len() {
                Navigation::Select(order[i + 1])
            } else {
                Navigation::Stay
            };
            assert_eq!(t.end(&order, Some(id)), expected, "forward from index {i}");
        }
    }

    #[test]
    fn test_exact_threshold_does_not_navigate() {
        let mut t = GestureTranslator::default();
        swipe(&mut t, 150.0, 100.0);
        assert_eq!(t.end(&LIST, Some(&'B')), Navigation::Stay);

        swipe(&mut t, 100.0, 150.0);
        assert_eq!(t.end(&LIST, Some(&'B')), Navigation::Stay);
    }

    #[test]
    fn test_offset_tracks_moves_and_resets_on_end() {
        let mut t = GestureTranslator::default();
        t.start(100.0);
        assert_eq!(t.offset(), 0.0);

        t.move_to(130.0);
        assert_eq!(t.offset(), 30.0);
        t.move_to(40.0);
        assert_eq!(t.offset(), -60.0);

        t.end(&LIST, Some(&'B'));
        assert_eq!(t.offset(), 0.0);
        assert!(!t.is_active());
    }

    #[test]
    fn test_visual_offset_is_damped_and_clamped() {
        let mut t = GestureTranslator::default();
        t.start(0.0);
        t.move_to(60.0);
        assert_eq!(t.visual_offset(), 30.0);

        t.move_to(1000.0);
        assert_eq!(t.visual_offset(), 100.0);

        t.move_to(-1000.0);
        assert_eq!(t.visual_offset(), -100.0);
    }

    #[test]
    fn test_move_without_start_is_ignored() {
        let mut t = GestureTranslator::default();
        t.move_to(500.0);
        assert!(t.session().is_none());
        assert_eq!(t.offset(), 0.0);
        assert_eq!(t.end(&LIST, Some(&'B')), Navigation::Stay);
    }

    #[test]
    fn test_end_without_start_is_stay() {
        let mut t = GestureTranslator::default();
        assert_eq!(t.finish(), None);
        assert_eq!(t.offset(), 0.0);
    }

    #[test]
    fn test_tap_without_move_is_stay() {
        let mut t = GestureTranslator::default();
        t.start(120.0);
        assert_eq!(t.end(&LIST, Some(&'A')), Navigation::Stay);
    }

    #[test]
    fn test_restart_discards_previous_session() {
        let mut t = GestureTranslator::default();
        t.start(300.0);
        t.move_to(200.0);
        t.start(50.0);
        assert_eq!(t.offset(), 0.0);
        t.move_to(60.0);
        assert_eq!(t.end(&LIST, Some(&'B')), Navigation::Stay);
    }

    #[test]
    fn test_resolution_edge_cases() {
        let empty: [char; 0] = [];
        assert_eq!(
            resolve(SwipeDirection::Backward, &empty, Some(&'A')),
            Navigation::ClearSelection
        );
        assert_eq!(resolve(SwipeDirection::Forward, &empty, Some(&'A')), Navigation::Stay);
        assert_eq!(
            resolve(SwipeDirection::Backward, &LIST, Some(&'Z')),
            Navigation::ClearSelection
        );
        assert_eq!(resolve(SwipeDirection::Forward, &LIST, Some(&'Z')), Navigation::Stay);
        assert_eq!(resolve(SwipeDirection::Backward, &LIST, None), Navigation::Stay);
        assert_eq!(resolve(SwipeDirection::Forward, &LIST, None), Navigation::Stay);
    }

    #[test]
    fn test_event_stream() {
        let mut t = GestureTranslator::default();
        let events = [
            GestureEvent::Move(10.0),
            GestureEvent::Start(400.0),
            GestureEvent::Move(380.0),
            GestureEvent::Move(330.0),
        ];
        for event in events {
            assert_eq!(t.handle(event, &LIST, Some(&'C')), Navigation::Stay);
        }
        assert_eq!(t.offset(), -70.0);
        assert_eq!(t.handle(GestureEvent::End, &LIST, Some(&'C')), Navigation::Select('B'));
        assert_eq!(t.offset(), 0.0);
    }

    #[test]
    fn test_custom_threshold() {
        let config = GestureConfig {
            threshold: 10.0,
            ..GestureConfig::default()
        };
        let mut t = GestureTranslator::new(&config);
        swipe(&mut t, 100.0, 111.0);
        assert_eq!(t.end(&LIST, Some(&'A')), Navigation::Select('B'));
    }
}
