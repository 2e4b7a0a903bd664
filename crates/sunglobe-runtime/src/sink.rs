//! Frame sinks - where each frame's output goes

use std::io::Write;

use serde::Serialize;
use sunglobe_time::TimeBasis;

use crate::FrameOutput;

/// Consumer of driver frames
pub trait FrameSink {
    fn present(&mut self, frame: &FrameOutput);

    /// Called once after the last frame
    fn finish(&mut self) {}
}

/// Rewrites a single terminal line with the formatted zone time.
///
/// Only writes when the displayed text changes, i.e. once per second.
pub struct TerminalSink<W: Write> {
    out: W,
    last: Option<String>,
    failed: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        TerminalSink {
            out,
            last: None,
            failed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, frame: &FrameOutput) -> std::io::Result<()> {
        let marker = match frame.projected.basis {
            TimeBasis::Authoritative => ' ',
            TimeBasis::Fallback => '~',
        };
        write!(
            self.out,
            "\r{}{}  sun {:+.3} rad",
            frame.projected.display, marker, frame.light.angle
        )?;
        self.out.flush()
    }
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn present(&mut self, frame: &FrameOutput) {
        if self.last.as_deref() == Some(frame.projected.display.as_str()) {
            return;
        }
        self.last = Some(frame.projected.display.clone());

        if let Err(e) = self.write_line(frame) {
            if !self.failed {
                tracing::warn!(error = %e, "display sink write failed");
                self.failed = true;
            }
        }
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
    }
}

/// Serialized frame, one JSON object per line
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord<'a> {
    pub zone_time: String,
    pub display: &'a str,
    pub fractional_hour: f64,
    pub fallback: bool,
    pub sun_direction: [f32; 3],
}

impl<'a> From<&'a FrameOutput> for FrameRecord<'a> {
    fn from(frame: &'a FrameOutput) -> Self {
        let d = frame.light.direction;
        FrameRecord {
            zone_time: frame.projected.zone_time.to_string(),
            display: &frame.projected.display,
            fractional_hour: frame.projected.fractional_hour,
            fallback: frame.projected.basis == TimeBasis::Fallback,
            sun_direction: [d.x, d.y, d.z],
        }
    }
}

/// Emits every frame as a JSON line, for an external renderer to consume
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        JsonLinesSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &FrameOutput) {
        let record = FrameRecord::from(frame);
        let written = serde_json::to_writer(&mut self.out, &record)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out));
        if let Err(e) = written {
            tracing::warn!(error = %e, "frame record write failed");
        }
    }

    fn finish(&mut self) {
        let _ = self.out.flush();
    }
}

/// Keeps every frame in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub frames: Vec<FrameOutput>,
}

impl FrameSink for MemorySink {
    fn present(&mut self, frame: &FrameOutput) {
        self.frames.push(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunglobe_core::{Locale, ZoneTime};
    use sunglobe_scene::SunModel;
    use sunglobe_time::ProjectedTime;

    fn frame(raw: &str, basis: TimeBasis) -> FrameOutput {
        let zone_time = ZoneTime::parse_iso8601(raw).unwrap();
        let fractional_hour = zone_time.fractional_hour();
        FrameOutput {
            projected: ProjectedTime {
                display: Locale::PtBr.format(&zone_time),
                zone_time,
                fractional_hour,
                basis,
            },
            light: SunModel::default().light(fractional_hour),
        }
    }

    #[test]
    fn test_terminal_sink_skips_unchanged_display() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.present(&frame("2024-01-01T10:00:00.100", TimeBasis::Authoritative));
        sink.present(&frame("2024-01-01T10:00:00.900", TimeBasis::Authoritative));
        sink.present(&frame("2024-01-01T10:00:01", TimeBasis::Fallback));

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.matches('\r').count(), 2);
        assert!(text.contains("seg., 01 de jan. de 2024, 10:00:01~"));
    }

    #[test]
    fn test_json_lines_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.present(&frame("2024-01-01T06:00:00", TimeBasis::Fallback));

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["zone_time"], "2024-01-01T06:00:00");
        assert_eq!(value["fractional_hour"], 6.0);
        assert_eq!(value["fallback"], true);
        assert_eq!(value["sun_direction"].as_array().map(Vec::len), Some(3));
    }
}
