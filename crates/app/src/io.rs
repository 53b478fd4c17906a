use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use prt_core::{ChannelCoefficients, ShVector, SH_COEFF_COUNT};

/// Transport coefficients as written per triangle corner.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransportData {
    pub vertex_count: usize,
    pub corners: Vec<ShVector>,
}

pub(crate) fn load_light(path: &Path) -> Result<ChannelCoefficients> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read light coefficients {}", path.display()))?;
    parse_light(&text).with_context(|| format!("malformed light file {}", path.display()))
}

pub(crate) fn load_transport(path: &Path) -> Result<TransportData> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transport coefficients {}", path.display()))?;
    parse_transport(&text).with_context(|| format!("malformed transport file {}", path.display()))
}

/// Nine lines of `r g b`, one per SH coefficient.
pub(crate) fn parse_light(text: &str) -> Result<ChannelCoefficients> {
    let mut channels = [[0.0f32; SH_COEFF_COUNT]; 3];
    let mut row = 0usize;
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if row >= SH_COEFF_COUNT {
            bail!("line {}: more than {SH_COEFF_COUNT} coefficient rows", line_no + 1);
        }
        let values = parse_floats(line).with_context(|| format!("line {}", line_no + 1))?;
        ensure!(
            values.len() == 3,
            "line {}: expected 3 values (r g b), got {}",
            line_no + 1,
            values.len()
        );
        for (channel, value) in channels.iter_mut().zip(values) {
            channel[row] = value;
        }
        row += 1;
    }
    ensure!(
        row == SH_COEFF_COUNT,
        "expected {SH_COEFF_COUNT} coefficient rows, got {row}"
    );
    Ok(channels)
}

/// Vertex count followed by nine coefficients per triangle corner.
pub(crate) fn parse_transport(text: &str) -> Result<TransportData> {
    let mut tokens = text.split_whitespace();
    let count = tokens.next().context("transport file is empty")?;
    let vertex_count: usize = count
        .parse()
        .with_context(|| format!("invalid vertex count {count:?}"))?;

    let values = tokens
        .map(|token| {
            token
                .parse::<f32>()
                .with_context(|| format!("invalid coefficient {token:?}"))
        })
        .collect::<Result<Vec<f32>>>()?;
    if let Some(bad) = values.iter().position(|value| !value.is_finite()) {
        bail!("coefficient {bad} is not finite ({})", values[bad]);
    }
    ensure!(
        values.len() % SH_COEFF_COUNT == 0,
        "{} coefficients is not a multiple of {SH_COEFF_COUNT}",
        values.len()
    );

    let corners = values
        .chunks_exact(SH_COEFF_COUNT)
        .map(prt_core::sh_vector_from_slice)
        .collect::<Result<Vec<ShVector>, _>>()?;
    ensure!(
        vertex_count > 0 || corners.is_empty(),
        "transport declares 0 vertices but has {} corners",
        corners.len()
    );
    if corners.len() % 3 != 0 {
        tracing::warn!(
            "transport has {} corners, not a whole number of triangles",
            corners.len()
        );
    }
    Ok(TransportData {
        vertex_count,
        corners,
    })
}

fn parse_floats(line: &str) -> Result<Vec<f32>> {
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<f32>()
                .with_context(|| format!("invalid number {token:?}"))
        })
        .collect()
}
