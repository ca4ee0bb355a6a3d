//! Tracing subscriber setup. Logs go to stderr; stdout carries command output.

use std::io;

use shared::config::{Config, LogFormat};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber and returns the configured level.
pub fn initialize_tracing(config: &Config) -> String {
    let env_filter = build_env_filter(config);

    let fmt_builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(io::stderr);

    // A subscriber may already be installed when running under a test harness.
    if matches!(config.logging.format, LogFormat::Json) {
        let _ = fmt_builder.json().with_ansi(false).try_init();
    } else {
        let _ = fmt_builder.with_ansi(true).try_init();
    }

    config.logging.level.clone()
}

fn build_env_filter(config: &Config) -> EnvFilter {
    let default_level = config
        .logging
        .level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };
    use tracing::{Subscriber, info};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferMakeWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    struct BufferWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl<'a> MakeWriter<'a> for BufferMakeWriter {
        type Writer = BufferWriter;

        fn make_writer(&'a self) -> Self::Writer {
            BufferWriter {
                buffer: Arc::clone(&self.buffer),
            }
        }
    }

    impl Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn subscriber_with_writer<W>(config: &Config, writer: W) -> Box<dyn Subscriber + Send + Sync>
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let builder = fmt::fmt()
            .with_env_filter(build_env_filter(config))
            .with_target(false)
            .with_level(true)
            .with_writer(writer);

        if matches!(config.logging.format, LogFormat::Json) {
            Box::new(builder.json().with_ansi(false).finish())
        } else {
            Box::new(builder.with_ansi(false).finish())
        }
    }

    #[test]
    fn initialize_tracing_returns_configured_level() {
        let mut config = Config::with_defaults();
        config.logging.level = "debug".to_string();
        assert_eq!(initialize_tracing(&config), "debug");
    }

    #[test]
    fn json_log_format_produces_json_output() {
        let mut config = Config::with_defaults();
        config.logging.format = LogFormat::Json;

        let buffer = Arc::new(Mutex::new(Vec::new()));
        let subscriber = subscriber_with_writer(
            &config,
            BufferMakeWriter {
                buffer: buffer.clone(),
            },
        );
        let dispatch = tracing::dispatcher::Dispatch::new(subscriber);

        tracing::dispatcher::with_default(&dispatch, || {
            info!(chat_id = 7, "stream finished");
        });

        let contents = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        let line = contents
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap();
        let value: Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["fields"]["message"], "stream finished");
        assert_eq!(value["fields"]["chat_id"], 7);
    }
}
