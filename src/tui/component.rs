use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that draws itself into a given area.
///
/// Props arrive as struct fields; persistent presentation state is borrowed
/// mutably so a render pass may refresh caches such as message heights or
/// scroll offsets.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that consumes terminal events.
pub trait EventHandler {
    /// The higher-level event this component reports to the event loop.
    type Event;

    /// Handle a low-level `TuiEvent`, optionally producing a component event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
