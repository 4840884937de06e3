//! Trajectory record writer.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Error, Result, Transform};

/// Column names of a trajectory file, in order.
pub const TRAJECTORY_COLUMNS: [&str; 10] = [
    "frame",
    "sensor_x",
    "sensor_y",
    "sensor_a",
    "camera_x",
    "camera_y",
    "camera_a",
    "apparent_x",
    "apparent_y",
    "apparent_a",
];

const DELIM: char = '\t';

/// Paths recorded for one rendered frame.
///
/// `sensor` and `camera` belong to the displayed frame, `apparent` is the
/// newest frame's value that the warp was computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRecord {
    pub frame: usize,
    pub sensor: Transform,
    pub camera: Transform,
    pub apparent: Transform,
}

struct Delimited<'a>(&'a Transform);

impl fmt::Display for Delimited<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DELIM}{}{DELIM}{}", self.0.x, self.0.y, self.0.a)
    }
}

impl fmt::Display for TrajectoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{DELIM}{}{DELIM}{}{DELIM}{}",
            self.frame,
            Delimited(&self.sensor),
            Delimited(&self.camera),
            Delimited(&self.apparent)
        )
    }
}

/// Writer for tab-separated trajectory records.
///
/// The output format is one header row followed by one row per rendered frame:
/// `frame, sensor_x, sensor_y, sensor_a, camera_x, camera_y, camera_a, apparent_x, apparent_y, apparent_a`
pub struct TrajectoryWriter {
    writer: Box<dyn Write + Send>,
    records: usize,
}

impl TrajectoryWriter {
    /// Create a writer over any byte sink and write the header row.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Result<Self> {
        let mut writer: Box<dyn Write + Send> = Box::new(writer);
        writeln!(writer, "{}", TRAJECTORY_COLUMNS.join("\t"))?;
        Ok(Self { writer, records: 0 })
    }

    /// Create (or truncate) a trajectory file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to create trajectory file {}: {}", path.display(), e),
            ))
        })?;
        Self::new(BufWriter::new(file))
    }

    /// Append one record.
    pub fn write_record(&mut self, record: &TrajectoryRecord) -> Result<()> {
        writeln!(self.writer, "{}", record)?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flush the writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(Error::IoError)
    }
}

impl Drop for TrajectoryWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_header_written_on_creation() {
        let buffer = SharedBuffer::default();
        let writer = TrajectoryWriter::new(buffer.clone()).unwrap();
        assert_eq!(writer.records(), 0);
        assert_eq!(
            buffer.contents(),
            "frame\tsensor_x\tsensor_y\tsensor_a\tcamera_x\tcamera_y\tcamera_a\tapparent_x\tapparent_y\tapparent_a\n"
        );
    }

    #[test]
    fn test_record_row_format() {
        let buffer = SharedBuffer::default();
        let mut writer = TrajectoryWriter::new(buffer.clone()).unwrap();

        writer
            .write_record(&TrajectoryRecord {
                frame: 3,
                sensor: Transform::new(1.5, -2.0, 0.25),
                camera: Transform::new(1.0, -1.0, 0.125),
                apparent: Transform::new(0.5, 0.0, 0.0),
            })
            .unwrap();
        writer.flush().unwrap();

        let contents = buffer.contents();
        let rows: Vec<&str> = contents.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "3\t1.5\t-2\t0.25\t1\t-1\t0.125\t0.5\t0\t0");
        assert_eq!(rows[1].split('\t').count(), TRAJECTORY_COLUMNS.len());
        assert_eq!(writer.records(), 1);
    }

    #[test]
    fn test_create_file() {
        let path = std::env::temp_dir().join(format!("flutter-trajectory-{}.tsv", std::process::id()));
        {
            let mut writer = TrajectoryWriter::create(&path).unwrap();
            writer
                .write_record(&TrajectoryRecord {
                    frame: 0,
                    sensor: Transform::IDENTITY,
                    camera: Transform::IDENTITY,
                    apparent: Transform::IDENTITY,
                })
                .unwrap();
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(contents.starts_with("frame\t"));
        assert!(contents.ends_with("0\t0\t0\t0\t0\t0\t0\t0\t0\t0\n"));
    }
}
