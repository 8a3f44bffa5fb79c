//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: Top status bar (endpoint, session, status)
//! - `Message`: One transcript bubble with its source chips
//! - `Welcome`: Greeting and suggestion chips for an empty conversation
//! - `FileZone`: Drop target bound to one upload buffer
//! - Overlays: loading spinner, notice, confirm and help dialogs
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events:
//! - `InputBox`: Multi-line query editor
//! - `MessageList`: Scrollable conversation view with layout caching
//! - `Sidebar`: Tabbed sources / files / knowledge base / settings panel
//! - `PathPrompt`: Path entry for a drop zone
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, never by reaching into `App`
//! on their own. Persistent state (`MessageListState`, `SidebarState`) is
//! owned by `TuiState` and borrowed for a single frame.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── input_box.rs     (Query editor)
//! ├── welcome.rs       (Empty-conversation placeholder)
//! ├── sidebar.rs       (Tabbed side panel)
//! ├── file_zone.rs     (Drop zone + path prompt)
//! └── overlay.rs       (Modal boxes)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod file_zone;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod overlay;
pub mod sidebar;
pub mod welcome;

pub use file_zone::{PathPrompt, PromptEvent};
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub use welcome::Welcome;
