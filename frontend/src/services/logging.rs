//! Browser-console logger tagged with the component that logged, plus the
//! `tracing` layer that routes the shared crate's events through it.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub struct Logger;

impl Logger {
    pub fn debug_with_component(component: &str, message: &str) {
        gloo::console::debug!(Self::tag(component), message);
    }

    pub fn info_with_component(component: &str, message: &str) {
        gloo::console::info!(Self::tag(component), message);
    }

    pub fn warn_with_component(component: &str, message: &str) {
        gloo::console::warn!(Self::tag(component), message);
    }

    pub fn error_with_component(component: &str, message: &str) {
        gloo::console::error!(Self::tag(component), message);
    }

    fn log_at(level: &Level, component: &str, message: &str) {
        match *level {
            Level::ERROR => Self::error_with_component(component, message),
            Level::WARN => Self::warn_with_component(component, message),
            Level::INFO => Self::info_with_component(component, message),
            _ => Self::debug_with_component(component, message),
        }
    }

    fn tag(component: &str) -> String {
        format!("[{}]", component)
    }
}

/// Install the console layer as the global `tracing` subscriber.
/// Debug builds keep debug events; release builds start at info.
pub fn init_tracing() {
    let max_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let subscriber = tracing_subscriber::registry()
        .with(ConsoleLayer::browser())
        .with(max_level);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        Logger::warn_with_component("logging", "A tracing subscriber was already installed");
    }
}

/// Writes each `tracing` event as one console line, tagged with the last
/// segment of its target (`splitledger_shared::domain::expense_form` logs
/// as `[expense_form]`).
pub struct ConsoleLayer {
    sink: fn(&Level, &str, &str),
}

impl ConsoleLayer {
    pub fn browser() -> Self {
        Self { sink: Logger::log_at }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut text = EventText::default();
        event.record(&mut text);
        (self.sink)(metadata.level(), component_of(metadata.target()), &text.finish());
    }
}

fn component_of(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// The event's message followed by its fields as `name=value`
#[derive(Default)]
struct EventText {
    message: String,
    fields: String,
}

impl EventText {
    fn finish(self) -> String {
        self.message + &self.fields
    }
}

impl Visit for EventText {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    thread_local! {
        static LINES: RefCell<Vec<(Level, String, String)>> = RefCell::new(Vec::new());
    }

    fn capture(level: &Level, component: &str, message: &str) {
        LINES.with(|lines| {
            lines
                .borrow_mut()
                .push((*level, component.to_string(), message.to_string()))
        });
    }

    #[test]
    fn test_shared_events_reach_the_console_layer() {
        let subscriber = tracing_subscriber::registry().with(ConsoleLayer { sink: capture });

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(
                target: "splitledger_shared::domain::expense_form",
                error = %"Please enter a description",
                "expense draft rejected"
            );
            tracing::debug!(target: "submission", attempt = 2, "expense submitting");
        });

        let lines = LINES.with(|lines| lines.borrow().clone());
        assert_eq!(
            lines,
            vec![
                (
                    Level::WARN,
                    "expense_form".to_string(),
                    "expense draft rejected error=Please enter a description".to_string(),
                ),
                (Level::DEBUG, "submission".to_string(), "expense submitting attempt=2".to_string()),
            ]
        );
    }
}
