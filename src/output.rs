use std::fs;
use std::io::{self, Stderr, Write};
use std::sync::{Mutex, PoisonError};

use camino::Utf8Path;
use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, PullSummary};
use crate::error::GeotableError;
use crate::table::GeoTable;

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &PullSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct ProgressWriter<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> ProgressWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressWriter<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ProgressSink for ProgressWriter<W> {
    fn event(&self, event: ProgressEvent) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = match event.elapsed {
            Some(elapsed) => writeln!(writer, "{} ({:.1}s)", event.message, elapsed.as_secs_f64()),
            None => writeln!(writer, "{}", event.message),
        };
    }
}

pub fn write_geojson(table: &GeoTable, path: &Utf8Path) -> Result<(), GeotableError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| GeotableError::Filesystem(format!("create {parent}: {err}")))?;
    }
    let collection = table.to_feature_collection();
    let json = serde_json::to_string(&collection)
        .map_err(|err| GeotableError::Filesystem(err.to_string()))?;
    fs::write(path, json).map_err(|err| GeotableError::Filesystem(format!("write {path}: {err}")))
}
