use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glam::Vec3;
use prt_core::{
    interpolate, shade_packed, LightingConfig, PackingLayout, PrecomputedTransfer, PrtLighting,
    SpatialRotation,
};
use prt_render::{PrtMaterial, ShaderSource};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use crate::io::{load_light, load_transport, TransportData};
use crate::logging::parse_level;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HeadlessPlan {
    lights: Vec<PathBuf>,
    transport: Option<PathBuf>,
    environment: Option<usize>,
    layout: Option<PackingLayout>,
    rotation: Option<PlanRotation>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
enum PlanRotation {
    AxisAngle { axis: [f32; 3], degrees: f32 },
    Matrix { matrix: Vec<f32> },
}

impl PlanRotation {
    fn to_rotation(&self) -> Result<SpatialRotation> {
        let rotation = match self {
            PlanRotation::AxisAngle { axis, degrees } => {
                SpatialRotation::from_axis_angle(Vec3::from(*axis), degrees.to_radians())?
            }
            PlanRotation::Matrix { matrix } => SpatialRotation::from_slice(matrix)?,
        };
        Ok(rotation)
    }
}

#[derive(Debug)]
pub(crate) struct HeadlessArgs {
    plan_path: Option<PathBuf>,
    lights: Vec<PathBuf>,
    transport: Option<PathBuf>,
    environment: Option<usize>,
    layout: Option<PackingLayout>,
    rotations: Vec<(Vec3, f32)>,
    save_path: Option<PathBuf>,
    print: bool,
    pub(crate) help: bool,
    pub(crate) log_level: LevelFilter,
}

impl Default for HeadlessArgs {
    fn default() -> Self {
        Self {
            plan_path: None,
            lights: Vec::new(),
            transport: None,
            environment: None,
            layout: None,
            rotations: Vec::new(),
            save_path: None,
            print: false,
            help: false,
            log_level: LevelFilter::INFO,
        }
    }
}

#[derive(Debug, Serialize)]
struct HeadlessReport {
    environment: usize,
    layout: PackingLayout,
    rotation: [f32; 9],
    band1: [[f32; 3]; 3],
    band2: [[f32; 5]; 5],
    uniforms: BTreeMap<String, [f32; 9]>,
    radiance: Option<RadianceSummary>,
}

/// `declared_vertex_count` is the transport file header, taken as given.
#[derive(Debug, Serialize, PartialEq)]
struct RadianceSummary {
    declared_vertex_count: usize,
    corners: ChannelStats,
    triangles: ChannelStats,
}

#[derive(Debug, Serialize, PartialEq)]
struct ChannelStats {
    count: usize,
    min: [f32; 3],
    max: [f32; 3],
    mean: [f32; 3],
}

pub(crate) fn parse_args(args: &[String]) -> Result<HeadlessArgs> {
    let mut parsed = HeadlessArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--plan" => parsed.plan_path = Some(PathBuf::from(value("--plan")?)),
            "--light" => parsed.lights.push(PathBuf::from(value("--light")?)),
            "--transport" => parsed.transport = Some(PathBuf::from(value("--transport")?)),
            "--environment" => {
                let raw = value("--environment")?;
                parsed.environment = Some(
                    raw.parse()
                        .with_context(|| format!("invalid environment index {raw:?}"))?,
                );
            }
            "--layout" => {
                let raw = value("--layout")?;
                parsed.layout = Some(parse_layout(&raw)?);
            }
            "--rotate-x" | "--rotate-y" | "--rotate-z" => {
                let raw = value(arg.as_str())?;
                let degrees: f32 = raw
                    .parse()
                    .with_context(|| format!("invalid angle {raw:?} for {arg}"))?;
                let axis = match arg.as_str() {
                    "--rotate-x" => Vec3::X,
                    "--rotate-y" => Vec3::Y,
                    _ => Vec3::Z,
                };
                parsed.rotations.push((axis, degrees));
            }
            "--save" => parsed.save_path = Some(PathBuf::from(value("--save")?)),
            "--print" => parsed.print = true,
            "--log-level" => {
                let raw = value("--log-level")?;
                parsed.log_level =
                    parse_level(&raw).with_context(|| format!("unknown log level {raw:?}"))?;
            }
            "--help" | "-h" => parsed.help = true,
            other => bail!("unknown argument {other:?} (see --help)"),
        }
    }

    Ok(parsed)
}

pub(crate) fn print_help() {
    println!(
        "Usage: prt [options]\n  --light <light.txt>        lighting coefficients, repeat per environment\n  --transport <transport.txt> per-corner transport coefficients\n  --plan <plan.json>\n  --environment <index>\n  --layout column|row\n  --rotate-x|--rotate-y|--rotate-z <degrees>  applied in the given order\n  --save <report.json>\n  --print\n  --log-level off|error|warn|info|debug|trace"
    );
}

pub(crate) fn run(args: &HeadlessArgs) -> Result<()> {
    let plan = match &args.plan_path {
        Some(path) => load_plan(path)?,
        None => HeadlessPlan::default(),
    };

    let light_paths = if args.lights.is_empty() {
        &plan.lights
    } else {
        &args.lights
    };
    if light_paths.is_empty() {
        bail!("no lighting coefficients given (use --light or a plan with \"lights\")");
    }
    let entries = light_paths
        .iter()
        .map(|path| load_light(path))
        .collect::<Result<Vec<_>>>()?;
    let transfer = PrecomputedTransfer::new(entries)?;
    tracing::info!("loaded {} lighting environment(s)", transfer.len());

    let transport = match args.transport.as_ref().or(plan.transport.as_ref()) {
        Some(path) => Some(load_transport(path)?),
        None => None,
    };

    let config = LightingConfig {
        environment: args.environment.or(plan.environment).unwrap_or(0),
        layout: args.layout.or(plan.layout).unwrap_or_default(),
    };
    let rotation = if args.rotations.is_empty() {
        match &plan.rotation {
            Some(planned) => planned.to_rotation()?,
            None => SpatialRotation::IDENTITY,
        }
    } else {
        compose_rotations(&args.rotations)?
    };

    let report = build_report(transfer, transport.as_ref(), config, rotation)?;
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = &args.save_path {
        std::fs::write(path, &json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        tracing::info!("saved report to {}", path.display());
    }
    if args.print || args.save_path.is_none() {
        println!("{json}");
    }
    Ok(())
}

fn load_plan(path: &Path) -> Result<HeadlessPlan> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read plan {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("invalid plan {}", path.display()))
}

fn parse_layout(raw: &str) -> Result<PackingLayout> {
    match raw {
        "column" | "column_major" => Ok(PackingLayout::ColumnMajor),
        "row" | "row_major" => Ok(PackingLayout::RowMajor),
        _ => bail!("unknown layout {raw:?}, expected column or row"),
    }
}

fn compose_rotations(steps: &[(Vec3, f32)]) -> Result<SpatialRotation> {
    let mut rotation = SpatialRotation::IDENTITY;
    for (axis, degrees) in steps {
        rotation = SpatialRotation::from_axis_angle(*axis, degrees.to_radians())? * rotation;
    }
    Ok(rotation)
}

fn build_report(
    transfer: PrecomputedTransfer,
    transport: Option<&TransportData>,
    config: LightingConfig,
    rotation: SpatialRotation,
) -> Result<HeadlessReport> {
    let mut lighting = PrtLighting::new(transfer);
    let ops = lighting.band_operators(&rotation)?;
    let packed = lighting.update(&rotation, &config)?;

    let mut material = PrtMaterial::new(ShaderSource::default());
    material.update(&packed);
    let uniforms = material
        .uniform_values()
        .context("material uniforms were not set")?
        .into_iter()
        .map(|(name, values)| (name.to_string(), values))
        .collect();

    let radiance = transport.map(|data| {
        let colors: Vec<[f32; 3]> = data
            .corners
            .iter()
            .map(|corner| shade_packed(&packed, corner))
            .collect();
        let centroids: Vec<[f32; 3]> = colors
            .chunks_exact(3)
            .map(|tri| interpolate(&[tri[0], tri[1], tri[2]], [1.0 / 3.0; 3]))
            .collect();
        RadianceSummary {
            declared_vertex_count: data.vertex_count,
            corners: summarize(&colors),
            triangles: summarize(&centroids),
        }
    });
    if let Some(summary) = &radiance {
        tracing::info!(
            "shaded {} corners in {} triangles, mean radiance {:?}",
            summary.corners.count,
            summary.triangles.count,
            summary.corners.mean
        );
    }

    Ok(HeadlessReport {
        environment: config.environment,
        layout: config.layout,
        rotation: rotation.matrix().to_cols_array(),
        band1: *ops.band1.rows(),
        band2: *ops.band2.rows(),
        uniforms,
        radiance,
    })
}

#[allow(clippy::needless_range_loop)]
fn summarize(colors: &[[f32; 3]]) -> ChannelStats {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    let mut sum = [0.0f64; 3];
    for color in colors {
        for c in 0..3 {
            min[c] = min[c].min(color[c]);
            max[c] = max[c].max(color[c]);
            sum[c] += f64::from(color[c]);
        }
    }
    if colors.is_empty() {
        min = [0.0; 3];
        max = [0.0; 3];
    }
    let count = colors.len().max(1) as f64;
    ChannelStats {
        count: colors.len(),
        min,
        max,
        mean: sum.map(|value| (value / count) as f32),
    }
}
