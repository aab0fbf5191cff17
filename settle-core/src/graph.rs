//! Settlement graph rendering
//!
//! Places participants evenly on a circle and draws one labelled arrow per
//! settling transfer.

use crate::{config::GraphConfig, types::*};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Write;

const EDGE_COLOR: &str = "#E11D48";
const NODE_FILL: &str = "#1E1B4B";
const NODE_STROKE: &str = "#14B8A6";
const LABEL_BORDER: &str = "#E2E8F0";
const LABEL_WIDTH: f64 = 50.0;
const LABEL_HEIGHT: f64 = 20.0;

/// Colour theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    fn text_color(self) -> &'static str {
        match self {
            Theme::Light => "#0F172A",
            Theme::Dark => "#F8FAFC",
        }
    }

    fn sub_text_color(self) -> &'static str {
        match self {
            Theme::Light => "#475569",
            Theme::Dark => "#94A3B8",
        }
    }

    fn box_color(self) -> &'static str {
        match self {
            Theme::Light => "white",
            Theme::Dark => "#1E293B",
        }
    }
}

/// Node centre on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    /// Participant drawn at this node
    pub participant: Participant,

    /// X coordinate
    pub x: f64,

    /// Y coordinate
    pub y: f64,
}

/// Evenly spaced positions on a circle, first participant at the top
pub fn circular_layout(participants: &[Participant], config: &GraphConfig) -> Vec<NodePosition> {
    let cx = config.width / 2.0;
    let cy = config.height / 2.0;
    let count = participants.len() as f64;

    participants
        .iter()
        .enumerate()
        .map(|(i, participant)| {
            let angle = (i as f64 * 2.0 * PI) / count - PI / 2.0;
            NodePosition {
                participant: participant.clone(),
                x: cx + config.radius * angle.cos(),
                y: cy + config.radius * angle.sin(),
            }
        })
        .collect()
}

/// Render the settlement graph as SVG.
///
/// Returns an empty string when there is nothing to settle. Transfers that
/// name a participant outside `participants` are skipped.
pub fn render_svg(
    participants: &[Participant],
    transfers: &[OptimizedDebt],
    config: &GraphConfig,
    theme: Theme,
    currency_symbol: &str,
) -> String {
    if transfers.is_empty() {
        return String::new();
    }

    let nodes = circular_layout(participants, config);
    let find = |p: &Participant| nodes.iter().find(|n| &n.participant == p);

    let mut svg = String::with_capacity(2048);
    let _ = writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = config.width,
        h = config.height,
    );
    let _ = writeln!(
        &mut svg,
        r#"<defs><marker id="arrowhead" markerWidth="10" markerHeight="7" refX="{ref_x}" refY="3.5" orient="auto"><polygon points="0 0, 10 3.5, 0 7" fill="{EDGE_COLOR}" /></marker></defs>"#,
        ref_x = config.node_radius + 6.0,
    );

    for transfer in transfers {
        let (Some(from), Some(to)) = (find(&transfer.from), find(&transfer.to)) else {
            tracing::warn!(from = %transfer.from, to = %transfer.to, "Transfer references unknown participant");
            continue;
        };

        let _ = writeln!(
            &mut svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{EDGE_COLOR}" stroke-width="2" marker-end="url(#arrowhead)" />"#,
            from.x, from.y, to.x, to.y,
        );

        let mid_x = (from.x + to.x) / 2.0;
        let mid_y = (from.y + to.y) / 2.0;
        let _ = writeln!(
            &mut svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{LABEL_WIDTH}" height="{LABEL_HEIGHT}" fill="{}" rx="4" stroke="{LABEL_BORDER}" />"#,
            mid_x - LABEL_WIDTH / 2.0,
            mid_y - LABEL_HEIGHT / 2.0,
            theme.box_color(),
        );
        let _ = writeln!(
            &mut svg,
            r#"<text x="{:.2}" y="{:.2}" fill="{}" font-size="12" font-weight="700" text-anchor="middle">{}{}</text>"#,
            mid_x,
            mid_y + 4.0,
            theme.text_color(),
            escape(currency_symbol),
            whole_units(transfer.amount),
        );
    }

    for node in &nodes {
        let initial = node
            .participant
            .initial()
            .map(|c| escape(&c.to_string()))
            .unwrap_or_default();

        let _ = writeln!(
            &mut svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{NODE_FILL}" stroke="{NODE_STROKE}" stroke-width="3" />"#,
            node.x, node.y, config.node_radius,
        );
        let _ = writeln!(
            &mut svg,
            r#"<text x="{:.2}" y="{:.2}" fill="white" text-anchor="middle" font-weight="700" font-size="14">{}</text>"#,
            node.x,
            node.y + 5.0,
            initial,
        );
        let _ = writeln!(
            &mut svg,
            r#"<text x="{:.2}" y="{:.2}" fill="{}" text-anchor="middle" font-weight="600" font-size="13">{}</text>"#,
            node.x,
            node.y + config.node_radius + 16.0,
            theme.sub_text_color(),
            escape(node.participant.as_str()),
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn whole_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
