use crate::config::Config;
use std::{
    fs::{remove_file, File},
    io::Write,
    path::Path,
};

/// Buffered lifecycle log. Disabled loggers swallow everything, so the
/// environment can log unconditionally without an I/O cost on the hot
/// path. Each line is tagged with the step counter.
#[derive(Debug)]
pub struct Logger {
    buffer: Vec<String>,
    file: Option<File>,
}

impl Logger {
    pub fn new(enable: bool, cfg: &Config, path: &Path) -> Result<Logger, String> {
        if enable {
            if path.exists() {
                let _ = remove_file(path);
            }
            let file = File::create(path)
                .map_err(|e| format!("cannot create log file {}: {}", path.display(), e))?;
            Ok(Logger {
                buffer: Vec::with_capacity(cfg.log_buffer),
                file: Some(file),
            })
        } else {
            Ok(Logger::disabled())
        }
    }

    pub fn disabled() -> Logger {
        Logger {
            buffer: Vec::new(),
            file: None,
        }
    }

    pub fn log(&mut self, str: String, step: u32, cfg: &Config) {
        if let Some(file) = &mut self.file {
            let msg = format!("{}\t{}\n", step, str);
            self.buffer.push(msg);
            if self.buffer.len() >= cfg.log_buffer {
                for msg in self.buffer.iter() {
                    let _ = file.write(msg.as_bytes());
                }
                self.buffer.clear();
            }
        }
    }

    pub fn flush(&mut self) {
        if let Some(file) = &mut self.file {
            for msg in self.buffer.iter() {
                let _ = file.write(msg.as_bytes());
            }
        }
        self.buffer.clear();
    }
}
