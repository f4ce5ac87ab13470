use tabled::{
    Table, Tabled,
    settings::{Panel, Style},
};

use crate::aggregate::RankedResult;

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        table.with(Style::psql());
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }
        table
    }
}

#[derive(Debug, Tabled)]
pub(crate) struct Row {
    #[tabled(rename = "Configuration")]
    name: String,
    #[tabled(rename = "Avg Time")]
    mean: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Rel Speed")]
    relative: String,
    #[tabled(rename = "Failed")]
    failed: String,
}

impl From<&RankedResult> for Row {
    fn from(r: &RankedResult) -> Self {
        Self {
            name: r.name.clone(),
            mean: format_secs(r.mean_secs),
            speed: format!("{:.2} MiB/s", r.throughput_mib_s),
            relative: format_relative(r.relative_pct),
            failed: format!("{}/{}", r.failures, r.attempts),
        }
    }
}

pub fn format_secs(secs: f64) -> String {
    if secs.is_finite() {
        format!("{secs:.2} s")
    } else {
        "inf".to_string()
    }
}

pub fn format_relative(pct: Option<f64>) -> String {
    match pct {
        Some(pct) => format!("{pct:.0}%"),
        None => "N/A".to_string(),
    }
}
