//! Buffer mutations for editing keys.
//!
//! Only lengths and offsets are logged; the typed text never is.

use super::DispatchResult;
use crate::KeyAction;
use core_render::ScrollState;
use core_text::LineBuffer;
use tracing::trace;

pub(crate) fn handle_edit(
    action: &KeyAction,
    buffer: &mut LineBuffer,
    scroll: &mut ScrollState,
) -> DispatchResult {
    let before = buffer.cursor();
    let result = match action {
        // Backspace, Home and End repaint only when something moved.
        KeyAction::Backspace => DispatchResult::from_changed(buffer.delete_backward()),
        KeyAction::Home => DispatchResult::from_changed(buffer.move_home()),
        KeyAction::End => DispatchResult::from_changed(buffer.move_end()),
        // Arrows repaint even when the cursor is already at the boundary.
        KeyAction::Left => {
            buffer.move_left();
            DispatchResult::dirty()
        }
        KeyAction::Right => {
            buffer.move_right();
            DispatchResult::dirty()
        }
        KeyAction::ClearLine => {
            buffer.clear();
            scroll.reset();
            DispatchResult::dirty()
        }
        KeyAction::Insert(bytes) => DispatchResult::from_changed(buffer.insert(bytes)),
        KeyAction::Cancel | KeyAction::Confirm => DispatchResult::clean(),
    };
    trace!(
        target: "session",
        op = action.as_str(),
        cursor = before,
        to_cursor = buffer.cursor(),
        len = buffer.len(),
        dirty = result.dirty,
        "edit"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(text: &[u8]) -> LineBuffer {
        let mut b = LineBuffer::with_capacity(16);
        b.insert(text);
        b
    }

    #[test]
    fn backspace_at_origin_is_clean() {
        let mut b = buf(b"ab");
        b.move_home();
        let r = handle_edit(&KeyAction::Backspace, &mut b, &mut ScrollState::new());
        assert!(!r.dirty);
        assert_eq!(b.as_bytes(), b"ab");
    }

    #[test]
    fn arrows_at_boundary_still_repaint() {
        let mut b = buf(b"ab");
        let r = handle_edit(&KeyAction::Right, &mut b, &mut ScrollState::new());
        assert!(r.dirty);
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn home_and_end_only_repaint_on_move() {
        let mut b = buf(b"ab");
        let mut s = ScrollState::new();
        assert!(!handle_edit(&KeyAction::End, &mut b, &mut s).dirty);
        assert!(handle_edit(&KeyAction::Home, &mut b, &mut s).dirty);
        assert!(!handle_edit(&KeyAction::Home, &mut b, &mut s).dirty);
    }

    #[test]
    fn rejected_insert_is_clean() {
        let mut b = LineBuffer::with_capacity(4);
        assert!(handle_edit(&KeyAction::Insert(b"ab".to_vec()), &mut b, &mut ScrollState::new()).dirty);
        assert!(!handle_edit(&KeyAction::Insert(b"c".to_vec()), &mut b, &mut ScrollState::new()).dirty);
        assert_eq!(b.as_bytes(), b"ab");
    }
}
