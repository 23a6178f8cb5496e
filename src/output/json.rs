use serde::Serialize;

use super::{ReportFormatter, iso8601_timestamp};
use crate::batch::{BatchReport, BenchmarkRun};
use crate::error::Result;

pub struct JsonFormatter;

#[derive(Serialize)]
struct Document<'a, T: Serialize> {
    generated_at: String,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct BenchmarkBody<'a> {
    benchmark: &'a [BenchmarkRun],
}

fn to_json<T: Serialize>(body: &T) -> Result<String> {
    let document = Document {
        generated_at: iso8601_timestamp(),
        body,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &BatchReport) -> Result<String> {
        to_json(report)
    }

    fn format_benchmark(&self, runs: &[BenchmarkRun]) -> Result<String> {
        to_json(&BenchmarkBody { benchmark: runs })
    }
}
