//! GPX 1.1 track writer.
//!
//! Every exercise becomes one document with a single track holding a single
//! segment. The document is streamed into `<name>.gpx.part` and renamed over
//! the target once the closing tags are written.

use crate::error::WriteError;
use crate::sample_extractor::GeoSample;
use chrono::{Local, TimeZone};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const GPX_CREATOR: &str = "SHealth2GPX";
const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const GPX_SCHEMA_LOCATION: &str =
    "http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd";

/// How sample timestamps are rendered in `<time>` elements.
///
/// Both styles use the local time zone of the machine running the
/// conversion. Neither converts to UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeStyle {
    /// Local wall clock time without an offset, e.g. `2020-09-13T14:26:40`
    #[default]
    NaiveLocal,
    /// Local wall clock time with its UTC offset, e.g. `2020-09-13T14:26:40+02:00`
    LocalOffset,
}

/// Render an epoch millisecond timestamp in the requested style
pub fn format_time(timestamp_ms: i64, style: TimeStyle) -> Result<String, WriteError> {
    let local = Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .ok_or(WriteError::Timestamp(timestamp_ms))?;

    // %.f prints millisecond precision (":40.250"), never the 6 digit form
    let formatted = match style {
        TimeStyle::NaiveLocal => local.naive_local().format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        TimeStyle::LocalOffset => local.format("%Y-%m-%dT%H:%M:%S%.f%:z").to_string(),
    };
    Ok(formatted)
}

/// Shortest round-trip decimal, but never without a fractional part (`1.0`, not `1`)
pub fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn part_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    output_path.with_file_name(name)
}

/// Write `samples` as a GPX track to `output_path`.
///
/// Returns `Ok(false)` without producing a file when `samples` is empty;
/// a file already sitting at `output_path` is removed in that case.
pub fn write_track(
    output_path: &Path,
    track_name: &str,
    samples: &[GeoSample],
    time_style: TimeStyle,
) -> Result<bool, WriteError> {
    if samples.is_empty() {
        remove_if_present(output_path)?;
        return Ok(false);
    }

    let times = samples
        .iter()
        .map(|sample| format_time(sample.timestamp_ms, time_style))
        .collect::<Result<Vec<_>, _>>()?;

    let part = part_path(output_path);
    let result = write_document(&part, track_name, samples, &times).and_then(|()| {
        fs::rename(&part, output_path).map_err(|source| WriteError::Io {
            path: output_path.to_path_buf(),
            source,
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&part);
    }
    result.map(|()| true)
}

fn remove_if_present(path: &Path) -> Result<(), WriteError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(WriteError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_document(
    path: &Path,
    track_name: &str,
    samples: &[GeoSample],
    times: &[String],
) -> Result<(), WriteError> {
    let io_error = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let xml_error = |source| WriteError::Xml {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    write_header(&mut writer, track_name).map_err(xml_error)?;
    for (sample, time) in samples.iter().zip(times) {
        write_trackpoint(&mut writer, sample, time).map_err(xml_error)?;
    }
    write_footer(&mut writer).map_err(xml_error)?;

    let mut inner = writer.into_inner();
    inner.write_all(b"\n").map_err(io_error)?;
    inner.flush().map_err(io_error)
}

fn write_header<W: Write>(writer: &mut Writer<W>, track_name: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("gpx").with_attributes([
        ("version", "1.1"),
        ("creator", GPX_CREATOR),
        ("xmlns", GPX_NAMESPACE),
        ("xmlns:xsi", XSI_NAMESPACE),
        ("xsi:schemaLocation", GPX_SCHEMA_LOCATION),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("metadata")))?;
    write_text_element(writer, "name", track_name)?;
    writer.write_event(Event::End(BytesEnd::new("metadata")))?;

    writer.write_event(Event::Start(BytesStart::new("trk")))?;
    write_text_element(writer, "name", track_name)?;
    writer.write_event(Event::Start(BytesStart::new("trkseg")))
}

fn write_trackpoint<W: Write>(
    writer: &mut Writer<W>,
    sample: &GeoSample,
    time: &str,
) -> quick_xml::Result<()> {
    let lat = format_coordinate(sample.latitude);
    let lon = format_coordinate(sample.longitude);
    writer.write_event(Event::Start(
        BytesStart::new("trkpt").with_attributes([("lat", lat.as_str()), ("lon", lon.as_str())]),
    ))?;
    write_text_element(writer, "time", time)?;
    writer.write_event(Event::End(BytesEnd::new("trkpt")))
}

fn write_footer<W: Write>(writer: &mut Writer<W>) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new("trkseg")))?;
    writer.write_event(Event::End(BytesEnd::new("trk")))?;
    writer.write_event(Event::End(BytesEnd::new("gpx")))
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;
    use tempfile::TempDir;

    fn sample(latitude: f64, longitude: f64, timestamp_ms: i64) -> GeoSample {
        GeoSample {
            latitude,
            longitude,
            timestamp_ms,
        }
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(1.0), "1.0");
        assert_eq!(format_coordinate(-74.0), "-74.0");
        assert_eq!(format_coordinate(0.0), "0.0");
        assert_eq!(format_coordinate(47.123456), "47.123456");
        assert_eq!(format_coordinate(-0.5), "-0.5");
    }

    #[test]
    fn test_naive_time_has_no_offset() {
        let formatted = format_time(1600000000000, TimeStyle::NaiveLocal).unwrap();
        let expected = Local
            .timestamp_millis_opt(1600000000000)
            .unwrap()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        assert_eq!(formatted, expected);
        assert_eq!(formatted.len(), "2020-09-13T12:26:40".len());
    }

    #[test]
    fn test_naive_time_keeps_milliseconds() {
        let formatted = format_time(1600000000250, TimeStyle::NaiveLocal).unwrap();
        assert!(formatted.ends_with(":40.250"), "got {}", formatted);
    }

    #[test]
    fn test_offset_time_parses_back_to_same_instant() {
        let formatted = format_time(1600000000000, TimeStyle::LocalOffset).unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(&formatted).unwrap();
        assert_eq!(parsed.timestamp_millis(), 1600000000000);
    }

    #[test]
    fn test_empty_track_produces_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.gpx");

        let written = write_track(&path, "empty", &[], TimeStyle::NaiveLocal).unwrap();

        assert!(!written);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_track_removes_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stale.gpx");
        fs::write(&path, "<gpx/>").unwrap();

        let written = write_track(&path, "stale", &[], TimeStyle::NaiveLocal).unwrap();

        assert!(!written);
        assert!(!path.exists(), "stale file should have been removed");
    }

    #[test]
    fn test_document_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("track.gpx");
        let samples = [sample(1.0, 2.0, 1600000000000), sample(1.5, 2.25, 1600000001000)];

        assert!(write_track(&path, "loc1.json", &samples, TimeStyle::NaiveLocal).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(content.contains(r#"version="1.1""#));
        assert!(content.contains(r#"creator="SHealth2GPX""#));
        assert!(content.contains(r#"xmlns="http://www.topografix.com/GPX/1/1""#));
        assert!(content.contains("<metadata>"));
        assert!(content.contains("<name>loc1.json</name>"));
        assert_eq!(content.matches("<trk>").count(), 1);
        assert_eq!(content.matches("<trkseg>").count(), 1);
        assert_eq!(content.matches("<trkpt ").count(), 2);
        assert!(content.contains(r#"<trkpt lat="1.0" lon="2.0">"#));
        assert!(content.contains(r#"<trkpt lat="1.5" lon="2.25">"#));
        assert!(content.trim_end().ends_with("</gpx>"));

        let first = content.find(r#"lat="1.0""#).unwrap();
        let second = content.find(r#"lat="1.5""#).unwrap();
        assert!(first < second, "points must keep sample order");

        assert!(!temp_dir.path().join("track.gpx.part").exists());
    }

    #[test]
    fn test_track_name_is_escaped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("escaped.gpx");

        write_track(&path, "a<b & c", &[sample(0.0, 0.0, 0)], TimeStyle::NaiveLocal).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("<name>a&lt;b &amp; c</name>"));
    }

    #[test]
    fn test_round_trip_through_gpx_parser() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("roundtrip.gpx");
        let samples = vec![
            sample(52.520008, 13.404954, 1600000000000),
            sample(52.520107, 13.405012, 1600000001500),
            sample(52.520231, 13.405188, 1600000003000),
            sample(-33.8688, 151.2093, 1600000004999),
        ];

        write_track(&path, "roundtrip", &samples, TimeStyle::LocalOffset).unwrap();

        let file = File::open(&path).unwrap();
        let parsed = gpx::read(BufReader::new(file)).expect("written file should be valid GPX");
        assert_eq!(parsed.tracks.len(), 1);
        assert_eq!(parsed.tracks[0].name.as_deref(), Some("roundtrip"));
        assert_eq!(parsed.tracks[0].segments.len(), 1);

        let points = &parsed.tracks[0].segments[0].points;
        assert_eq!(points.len(), samples.len());
        for (point, expected) in points.iter().zip(&samples) {
            assert_eq!(point.point().y(), expected.latitude);
            assert_eq!(point.point().x(), expected.longitude);
            let time = time::OffsetDateTime::from(point.time.expect("trkpt without time"));
            assert_eq!(time.unix_timestamp(), expected.timestamp_ms.div_euclid(1000));
        }
    }

    #[test]
    fn test_naive_round_trip_keeps_local_wall_clock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("naive.gpx");
        let samples = vec![
            sample(52.520008, 13.404954, 1600000000000),
            sample(52.520107, 13.405012, 1600000001500),
        ];

        write_track(&path, "naive", &samples, TimeStyle::default()).unwrap();

        let file = File::open(&path).unwrap();
        let parsed = gpx::read(BufReader::new(file)).expect("written file should be valid GPX");
        let points = &parsed.tracks[0].segments[0].points;
        assert_eq!(points.len(), samples.len());
        for (point, expected) in points.iter().zip(&samples) {
            assert_eq!(point.point().y(), expected.latitude);
            assert_eq!(point.point().x(), expected.longitude);

            // a time without offset reads back as the local wall clock at +00:00
            let time = time::OffsetDateTime::from(point.time.expect("trkpt without time"));
            let wall_clock = Local
                .timestamp_millis_opt(expected.timestamp_ms)
                .unwrap()
                .naive_local()
                .and_utc()
                .timestamp();
            assert_eq!(time.unix_timestamp(), wall_clock);
        }
    }
}
