use crate::geom::Point;

/// Which pointer button an event carries. Primary draws, secondary clears;
/// anything else is ignored by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// The four drawing-input events, decoupled from any concrete windowing or
/// DOM layer. Producers translate their native events into these.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Point, button: PointerButton },
    Move { pos: Point },
    Up { pos: Point },
    /// The pointer left the drawing surface; ends the stroke like `Up`.
    Leave { pos: Point },
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, button: PointerButton) -> PointerEvent {
        PointerEvent::Down { pos: Point::new(x, y), button }
    }

    pub fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move { pos: Point::new(x, y) }
    }

    pub fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up { pos: Point::new(x, y) }
    }

    pub fn leave(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Leave { pos: Point::new(x, y) }
    }
}
