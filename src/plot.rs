use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochLoss {
    pub epoch: usize,
    pub loss: f32,
}

/// Mean training loss of every finished epoch, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    epochs: Vec<EpochLoss>,
}

impl LossHistory {
    pub fn push(&mut self, epoch: usize, loss: f32) {
        self.epochs.push(EpochLoss { epoch, loss });
    }

    pub fn losses(&self) -> Vec<f32> {
        self.epochs.iter().map(|e| e.loss).collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        info!("saved loss history to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Renders losses as a text chart, one column per epoch and `height` rows. The top and bottom
/// rows are labeled with the maximum and minimum loss.
pub fn render_loss_curve(losses: &[f32], height: usize) -> String {
    if losses.is_empty() {
        return "(no epochs recorded)\n".to_string();
    }
    let height = height.max(2);
    let max = losses.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let min = losses.iter().copied().fold(f32::INFINITY, f32::min);
    let range = (max - min).max(f32::EPSILON);
    // Row 0 is the top of the chart
    let rows: Vec<usize> = losses
        .iter()
        .map(|&loss| (((max - loss) / range) * (height - 1) as f32).round() as usize)
        .collect();

    let mut chart = String::new();
    for row in 0..height {
        let label = match row {
            0 => format!("{max:>8.4}"),
            r if r == height - 1 => format!("{min:>8.4}"),
            _ => " ".repeat(8),
        };
        chart.push_str(&label);
        chart.push_str(" |");
        for &r in &rows {
            chart.push(if r == row { '*' } else { ' ' });
        }
        chart.push('\n');
    }
    chart.push_str(&" ".repeat(9));
    chart.push('+');
    chart.push_str(&"-".repeat(losses.len()));
    chart.push('\n');
    chart.push_str(&format!("{}epochs 1..{}\n", " ".repeat(10), losses.len()));
    chart
}
