//! Output sinks for analysis results.
//!
//! A sink receives the pieces of a [`RiskReport`] one panel at a time, so the
//! same report can drive a terminal, a JSON document or a test recorder.

use crate::presentation::{
    DecisionView, GaugeReading, RiskFactorBreakdown, RiskLevel, RiskReport, ERROR_LABEL,
    PENDING_LABEL,
};
use serde_json::{json, Value};
use std::fmt::Write as _;

/// Target for the rendered analysis panels.
pub trait RenderSink {
    /// Transient state while a score is being computed.
    fn show_pending(&mut self);

    /// Percentage readout, risk label and gauge.
    fn show_gauge(&mut self, percentage: u8, level: RiskLevel, gauge: &GaugeReading);

    /// Per-factor bars.
    fn show_factors(&mut self, factors: &RiskFactorBreakdown);

    /// Decision panel with confidence.
    fn show_decision(&mut self, decision: &DecisionView);

    /// Replaces the risk label after a failed analysis.
    fn show_error(&mut self, message: &str);
}

/// Pushes every panel of `report` into `sink`.
pub fn render_report(report: &RiskReport, sink: &mut dyn RenderSink) {
    sink.show_gauge(report.percentage, report.level, &report.gauge);
    sink.show_factors(&report.factors);
    sink.show_decision(&report.decision);
}

const BAR_WIDTH: usize = 20;

fn bar(value: f64) -> String {
    let filled = ((value / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Plain-text panel, one section per call.
#[derive(Debug, Default)]
pub struct TextSink {
    out: String,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

// Writing into a String cannot fail.
impl RenderSink for TextSink {
    fn show_pending(&mut self) {
        let _ = writeln!(self.out, "Risk: ... {}", PENDING_LABEL);
    }

    fn show_gauge(&mut self, percentage: u8, level: RiskLevel, gauge: &GaugeReading) {
        let _ = writeln!(
            self.out,
            "Risk: {}% {} (needle {:+.1} deg)",
            percentage,
            level.label(),
            gauge.rotation_deg
        );
        let _ = writeln!(self.out, "      {}", bar(gauge.arc_fraction * 100.0));
    }

    fn show_factors(&mut self, factors: &RiskFactorBreakdown) {
        let _ = writeln!(self.out, "Risk factors:");
        for f in &factors.factors {
            let _ = writeln!(
                self.out,
                "  {:<9} {} {:>5.1} {}",
                f.factor.name(),
                bar(f.value),
                f.value,
                f.impact.impact()
            );
        }
    }

    fn show_decision(&mut self, decision: &DecisionView) {
        let _ = writeln!(self.out, "Decision: {}", decision.title);
        let _ = writeln!(self.out, "  {}", decision.description);
        let _ = writeln!(self.out, "  Confidence: {}%", decision.confidence.round());
    }

    fn show_error(&mut self, message: &str) {
        let _ = writeln!(self.out, "Risk: -- {}", ERROR_LABEL);
        let _ = writeln!(self.out, "  {}", message);
    }
}

/// Collects panels into a JSON object keyed by panel name.
#[derive(Debug, Default)]
pub struct JsonSink {
    doc: serde_json::Map<String, Value>,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.doc)
    }
}

impl RenderSink for JsonSink {
    fn show_pending(&mut self) {
        self.doc.clear();
        self.doc.insert(
            "status".to_string(),
            json!({ "state": "pending", "label": PENDING_LABEL }),
        );
    }

    fn show_gauge(&mut self, percentage: u8, level: RiskLevel, gauge: &GaugeReading) {
        self.doc
            .insert("status".to_string(), json!({ "state": "complete" }));
        self.doc.insert(
            "gauge".to_string(),
            json!({
                "percentage": percentage,
                "label": level.label(),
                "color": level.color().token(),
                "rotation_deg": gauge.rotation_deg,
                "dash_offset": gauge.dash_offset,
            }),
        );
    }

    fn show_factors(&mut self, factors: &RiskFactorBreakdown) {
        let bars: serde_json::Map<String, Value> = factors
            .factors
            .iter()
            .map(|f| {
                (
                    f.factor.name().to_string(),
                    json!({
                        "width": f.value,
                        "impact": f.impact.impact(),
                        "color": f.impact.color().token(),
                    }),
                )
            })
            .collect();
        self.doc.insert("factors".to_string(), Value::Object(bars));
    }

    fn show_decision(&mut self, decision: &DecisionView) {
        self.doc.insert(
            "decision".to_string(),
            json!({
                "title": decision.title,
                "description": decision.description,
                "icon_class": decision.icon.css_class(),
                "confidence": decision.confidence,
            }),
        );
    }

    fn show_error(&mut self, message: &str) {
        self.doc.insert(
            "status".to_string(),
            json!({ "state": "error", "label": ERROR_LABEL, "message": message }),
        );
    }
}
