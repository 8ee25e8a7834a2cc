use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                let event = match reader.next().await {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
                        Event::Key(key)
                    }
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => Event::Mouse(mouse),
                    Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                    Some(Err(_)) | None => break,
                    _ => continue,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Map a key event to an action.
pub fn map_key_to_action(key: KeyEvent) -> Option<Action> {
    // Ctrl-C / Ctrl-D always quit
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(Action::Quit),
            KeyCode::Char('f') => Some(Action::ScrollPageDown),
            KeyCode::Char('b') => Some(Action::ScrollPageUp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::PageUp => Some(Action::ScrollPageUp),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::ScrollPageDown),
        KeyCode::Home | KeyCode::Char('g') => Some(Action::ScrollToTop),
        KeyCode::End | KeyCode::Char('G') => Some(Action::ScrollToBottom),
        KeyCode::Char('n') => Some(Action::NextHunk),
        KeyCode::Char('N') | KeyCode::Char('p') => Some(Action::PrevHunk),
        KeyCode::Tab => Some(Action::ToggleViewMode),
        KeyCode::Char('d') => Some(Action::ToggleDiffOnly),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::IncreaseContext),
        KeyCode::Char('-') => Some(Action::DecreaseContext),
        KeyCode::Char('t') => Some(Action::CycleTheme),
        KeyCode::Char('v') => Some(Action::TogglePreview),
        KeyCode::Char('r') => Some(Action::Reload),
        KeyCode::Char('?') => Some(Action::ToggleHud),
        _ => None,
    }
}

pub fn map_mouse_to_action(mouse: MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(Action::ScrollUp),
        MouseEventKind::ScrollDown => Some(Action::ScrollDown),
        _ => None,
    }
}
