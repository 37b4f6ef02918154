use std::sync::Once;

use vista_transform::{GenerateConfig, Rendered, Transformation};

static TRACING: Once = Once::new();

/// Install a test subscriber once so `RUST_LOG=vista_transform=trace` shows
/// generation logs.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Generate with default settings, panicking on failure.
pub fn path(t: &Transformation) -> String {
    init_tracing();
    t.generate().expect("transformation should generate")
}

/// Render with the given defaults, panicking on failure.
pub fn render_with(t: &Transformation, config: &GenerateConfig) -> Rendered {
    init_tracing();
    t.render(config).expect("transformation should render")
}
