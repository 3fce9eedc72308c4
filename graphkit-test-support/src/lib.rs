//! Test helpers shared by the graphkit crates.

pub mod tracing {
    //! A `tracing` layer that records spans and events for assertions.

    use std::{
        collections::HashMap,
        fmt,
        sync::{Arc, Mutex, MutexGuard, PoisonError},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        span::{Attributes, Id, Record},
    };
    use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

    /// Closed span captured by [`RecordingLayer`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SpanRecord {
        /// Span name from the callsite metadata.
        pub name: String,
        /// Fields recorded at creation or later via `Span::record`.
        pub fields: HashMap<String, String>,
    }

    /// Event captured by [`RecordingLayer`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct EventRecord {
        /// Event level.
        pub level: Level,
        /// Event target, usually the emitting module path.
        pub target: String,
        /// Event fields; the message lives under `message`.
        pub fields: HashMap<String, String>,
    }

    impl EventRecord {
        /// Returns the event's message, if any.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.field("message")
        }

        /// Returns the rendered value of field `name`.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    #[derive(Debug, Default)]
    struct Journal {
        spans: Vec<SpanRecord>,
        events: Vec<EventRecord>,
    }

    /// Layer that keeps every closed span and every event in memory.
    ///
    /// Clones share one journal, so a clone can be installed while the
    /// first is kept for assertions.
    ///
    /// # Examples
    /// ```
    /// use graphkit_test_support::tracing::RecordingLayer;
    /// use tracing_subscriber::layer::SubscriberExt;
    ///
    /// let layer = RecordingLayer::default();
    /// let subscriber = tracing_subscriber::registry().with(layer.clone());
    /// tracing::subscriber::with_default(subscriber, || tracing::warn!(code = 7, "odd"));
    /// let events = layer.events_at(tracing::Level::WARN);
    /// assert_eq!(events.len(), 1);
    /// assert_eq!(events[0].field("code"), Some("7"));
    /// ```
    #[derive(Clone, Debug, Default)]
    pub struct RecordingLayer {
        journal: Arc<Mutex<Journal>>,
    }

    impl RecordingLayer {
        fn journal(&self) -> MutexGuard<'_, Journal> {
            self.journal.lock().unwrap_or_else(PoisonError::into_inner)
        }

        /// Returns the closed spans in closing order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.journal().spans.clone()
        }

        /// Returns the closed spans called `name`.
        #[must_use]
        pub fn spans_named(&self, name: &str) -> Vec<SpanRecord> {
            self.journal()
                .spans
                .iter()
                .filter(|span| span.name == name)
                .cloned()
                .collect()
        }

        /// Returns the events in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.journal().events.clone()
        }

        /// Returns the events emitted at `level`.
        #[must_use]
        pub fn events_at(&self, level: Level) -> Vec<EventRecord> {
            self.journal()
                .events
                .iter()
                .filter(|event| event.level == level)
                .cloned()
                .collect()
        }

        /// Counts the events whose message equals `message`.
        #[must_use]
        pub fn count_messages(&self, message: &str) -> usize {
            self.journal()
                .events
                .iter()
                .filter(|event| event.message() == Some(message))
                .count()
        }
    }

    /// Fields of a span that is still open.
    struct OpenSpan(SpanRecord);

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            let mut record = SpanRecord {
                name: attrs.metadata().name().to_owned(),
                fields: HashMap::new(),
            };
            attrs.record(&mut Fields(&mut record.fields));
            span.extensions_mut().insert(OpenSpan(record));
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
            if let Some(span) = ctx.span(id)
                && let Some(open) = span.extensions_mut().get_mut::<OpenSpan>()
            {
                values.record(&mut Fields(&mut open.0.fields));
            }
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            let mut fields = HashMap::new();
            event.record(&mut Fields(&mut fields));
            self.journal().events.push(EventRecord {
                level: *metadata.level(),
                target: metadata.target().to_owned(),
                fields,
            });
        }

        fn on_close(&self, id: Id, ctx: Context<'_, S>) {
            let closed = ctx
                .span(&id)
                .and_then(|span| span.extensions_mut().remove::<OpenSpan>());
            if let Some(OpenSpan(record)) = closed {
                self.journal().spans.push(record);
            }
        }
    }

    /// Renders every field as text. Strings are stored without quotes; other
    /// values use their `Debug` or `Display` form.
    struct Fields<'a>(&'a mut HashMap<String, String>);

    impl Visit for Fields<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
            self.0.insert(field.name().to_owned(), value.to_string());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use rstest::rstest;
        use tracing_subscriber::layer::SubscriberExt;

        fn record(body: impl FnOnce()) -> RecordingLayer {
            let layer = RecordingLayer::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            tracing::subscriber::with_default(subscriber, body);
            layer
        }

        #[test]
        fn spans_keep_late_fields() {
            let layer = record(|| {
                let span = tracing::info_span!("work", op = tracing::field::Empty);
                span.record("op", "Coverage");
            });
            let spans = layer.spans_named("work");
            assert_eq!(spans.len(), 1);
            assert_eq!(spans[0].fields.get("op").map(String::as_str), Some("Coverage"));
        }

        #[rstest]
        #[case(Level::ERROR, 1)]
        #[case(Level::WARN, 2)]
        #[case(Level::DEBUG, 0)]
        fn events_filter_by_level(#[case] level: Level, #[case] expected: usize) {
            let layer = record(|| {
                tracing::warn!("first");
                tracing::error!("second");
                tracing::warn!("first");
            });
            assert_eq!(layer.events_at(level).len(), expected);
            assert_eq!(layer.count_messages("first"), 2);
        }

        #[test]
        fn display_fields_are_unquoted() {
            let layer = record(|| tracing::error!(reason = %"boom", "failed"));
            let events = layer.events();
            assert_eq!(events[0].field("reason"), Some("boom"));
            assert_eq!(events[0].message(), Some("failed"));
        }
    }
}
