use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::config::RuntimeConfig;
use crate::diagnostics::{
    Diagnostic, DiagnosticSink, Severity, TracingSink, DIRECT_CONSTRUCTION, UNSET_NORMALIZED,
};
use crate::identity::ObjectIdentity;

/// Construction context: configuration plus the diagnostics collaborator.
///
/// Factories that need to report misuse take an `ObjectRuntime` explicitly;
/// the convenience constructors on each type use [`ObjectRuntime::global`].
#[derive(Clone)]
pub struct ObjectRuntime {
    config: RuntimeConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl ObjectRuntime {
    /// A runtime reporting through `tracing`.
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostics sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The process-wide default runtime, created on first use.
    pub fn global() -> &'static ObjectRuntime {
        static GLOBAL: OnceLock<ObjectRuntime> = OnceLock::new();
        GLOBAL.get_or_init(ObjectRuntime::default)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    /// Create an identity rendered according to the configured display mode.
    pub fn new_identity(&self, type_tag: &'static str) -> ObjectIdentity {
        ObjectIdentity::with_display(type_tag, self.config.display_mode)
    }

    /// Emit a diagnostic unless its code is silenced by configuration.
    pub fn diagnose(&self, severity: Severity, code: &str, message: impl Into<String>) {
        if !self.is_enabled(code) {
            return;
        }
        self.sink.emit(Diagnostic::new(severity, code, message));
    }

    fn is_enabled(&self, code: &str) -> bool {
        match code {
            UNSET_NORMALIZED => self.config.warn_on_unset_normalization,
            DIRECT_CONSTRUCTION => self.config.warn_on_direct_construction,
            _ => true,
        }
    }
}

impl Default for ObjectRuntime {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl fmt::Debug for ObjectRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRuntime")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayMode;
    use crate::diagnostics::RecordingSink;

    #[test]
    fn diagnostics_reach_the_injected_sink() {
        let sink = Arc::new(RecordingSink::new());
        let runtime = ObjectRuntime::default().with_sink(sink.clone());
        runtime.diagnose(Severity::Warning, UNSET_NORMALIZED, "normalized");
        assert_eq!(sink.count(UNSET_NORMALIZED), 1);
    }

    #[test]
    fn silenced_codes_are_dropped() {
        let sink = Arc::new(RecordingSink::new());
        let runtime = ObjectRuntime::new(RuntimeConfig::quiet()).with_sink(sink.clone());
        runtime.diagnose(Severity::Warning, UNSET_NORMALIZED, "normalized");
        runtime.diagnose(Severity::Error, DIRECT_CONSTRUCTION, "direct");
        assert!(sink.is_empty());

        runtime.diagnose(Severity::Warning, "custom", "always delivered");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn identities_follow_display_mode() {
        let runtime = ObjectRuntime::new(RuntimeConfig {
            display_mode: DisplayMode::Compat,
            ..Default::default()
        });
        let identity = runtime.new_identity("Thing");
        assert_eq!(identity.display_mode(), DisplayMode::Compat);
        assert_eq!(identity.type_tag(), "Thing");
    }

    #[test]
    fn global_is_initialized_once() {
        let a = ObjectRuntime::global() as *const ObjectRuntime;
        let b = ObjectRuntime::global() as *const ObjectRuntime;
        assert_eq!(a, b);
        assert_eq!(ObjectRuntime::global().config(), &RuntimeConfig::default());
    }
}
