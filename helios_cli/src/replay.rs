//! Telemetry replay: CSV lines in, gauge updates out.

use std::io::Read;

use helios_traits::{BoxError, GaugeUpdate, RenderSink, TelemetrySample, TelemetrySource};

/// Reads `device,element,value` records. Lines starting with `#` are skipped.
pub struct CsvTelemetrySource {
    rdr: csv::Reader<Box<dyn Read + Send>>,
    record: csv::StringRecord,
}

impl CsvTelemetrySource {
    pub fn new(input: Box<dyn Read + Send>) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(input);
        Self {
            rdr,
            record: csv::StringRecord::new(),
        }
    }
}

impl TelemetrySource for CsvTelemetrySource {
    fn next_sample(&mut self) -> Result<Option<TelemetrySample>, BoxError> {
        if !self.rdr.read_record(&mut self.record)? {
            return Ok(None);
        }
        let line = self.record.position().map_or(0, csv::Position::line);
        if self.record.len() != 3 {
            return Err(format!(
                "line {line}: expected device,element,value, got {} fields",
                self.record.len()
            )
            .into());
        }
        let value: f64 = self.record[2]
            .parse()
            .map_err(|e| format!("line {line}: invalid value '{}': {e}", &self.record[2]))?;
        Ok(Some(TelemetrySample::new(
            &self.record[0],
            &self.record[1],
            value,
        )))
    }
}

/// Prints each update on its own line.
pub struct StdoutSink {
    pub json: bool,
}

impl RenderSink for StdoutSink {
    fn apply(&mut self, update: &GaugeUpdate) -> Result<(), BoxError> {
        if self.json {
            let line = serde_json::json!({
                "gauge": update.gauge,
                "value": update.value,
                "output": update.output,
            });
            println!("{line}");
        } else {
            println!("{} {} -> {:.4}", update.gauge, update.value, update.output);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(text: &'static str) -> CsvTelemetrySource {
        CsvTelemetrySource::new(Box::new(text.as_bytes()))
    }

    #[test]
    fn parses_records_and_skips_comments() {
        let mut s = source("# recorded session\nRotor, RPM, 44\nFlight Instruments,IAS,-10.5\n");
        assert_eq!(
            s.next_sample().unwrap(),
            Some(TelemetrySample::new("Rotor", "RPM", 44.0))
        );
        assert_eq!(
            s.next_sample().unwrap(),
            Some(TelemetrySample::new("Flight Instruments", "IAS", -10.5))
        );
        assert_eq!(s.next_sample().unwrap(), None);
    }

    #[test]
    fn reports_bad_lines_and_continues() {
        let mut s = source("Rotor,RPM\nRotor,RPM,fast\nRotor,RPM,1\n");
        let e = s.next_sample().unwrap_err().to_string();
        assert!(e.contains("line 1") && e.contains("got 2 fields"), "{e}");
        let e = s.next_sample().unwrap_err().to_string();
        assert!(e.contains("line 2") && e.contains("invalid value 'fast'"), "{e}");
        assert_eq!(
            s.next_sample().unwrap(),
            Some(TelemetrySample::new("Rotor", "RPM", 1.0))
        );
    }
}
