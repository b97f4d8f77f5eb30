//! Rendering simulation records as text or JSON lines.

use std::io::Write;

use clap::ValueEnum;
use flipstack_core::{CardSnapshot, Completion, DriverCommand, PanDirection, Settlement};

use crate::error::Result;
use crate::sim::{Record, Summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per record.
    Jsonl,
}

pub fn write_records(records: &[Record], format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    for record in records {
        match format {
            OutputFormat::Jsonl => {
                serde_json::to_writer(&mut *out, record)?;
                writeln!(out)?;
            }
            OutputFormat::Text => writeln!(out, "{}", text_line(record))?,
        }
    }
    out.flush()?;
    Ok(())
}

fn text_line(record: &Record) -> String {
    match record {
        Record::Frame { t_ms, cards } => {
            let cards: Vec<String> = cards.iter().map(card_text).collect();
            format!("{t_ms:>8.1}ms  frame   {}", cards.join("  "))
        }
        Record::Settled { t_ms, settlement } => {
            format!("{t_ms:>8.1}ms  settle  {}", settlement_text(settlement))
        }
        Record::Command { t_ms, command } => {
            format!("{t_ms:>8.1}ms  command {}", command_text(command))
        }
        Record::Summary(summary) => summary_text(summary),
    }
}

fn card_text(snap: &CardSnapshot) -> String {
    format!(
        "#{} p={:.3} rot={:+.3} op={:.3} m24={:+.5} y={:.1}{}",
        snap.card,
        snap.progress,
        snap.visual.rotation,
        snap.visual.opacity,
        snap.transform[1][3],
        snap.frame.y,
        if snap.animating { "" } else { " (rest)" }
    )
}

fn settlement_text(s: &Settlement) -> String {
    let outcome = match s.completion {
        Completion::Finished => "finished",
        Completion::Cancelled => "cancelled",
    };
    let direction = match s.direction {
        PanDirection::Upwards => "up",
        PanDirection::Downwards => "down",
    };
    format!(
        "card {} {outcome} at {:.3} moving {direction}, spring v={:.2}, cumulative -> {}",
        s.card, s.local_progress, s.spring_velocity, s.cumulative_progress
    )
}

fn command_text(command: &DriverCommand) -> String {
    match command {
        DriverCommand::SetVisual { card, visual } => format!(
            "set_visual #{card} rot={:+.3} op={:.3}",
            visual.rotation, visual.opacity
        ),
        DriverCommand::AnimateCard {
            card,
            target,
            spring,
        } => format!(
            "animate_card #{card} -> {target:?} ({:.2}s, zeta {:.2}, v {:.2})",
            spring.duration_secs, spring.damping_ratio, spring.initial_velocity
        ),
        DriverCommand::AnimateFrame { card, frame, spring } => format!(
            "animate_frame #{card} -> ({:.1}, {:.1}, {:.1}x{:.1}) ({:.2}s, zeta {:.2}, v {:.2})",
            frame.x,
            frame.y,
            frame.width,
            frame.height,
            spring.duration_secs,
            spring.damping_ratio,
            spring.initial_velocity
        ),
    }
}

fn summary_text(summary: &Summary) -> String {
    format!(
        "summary: {} finished, {} cancelled over {} animated frames; card {} of {} active (cumulative {})",
        summary.finished,
        summary.cancelled,
        summary.frames,
        summary.active_index + 1,
        summary.cards,
        summary.cumulative_progress
    )
}
