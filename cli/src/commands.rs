use analysis::aggregate::reduce_to_segments;
use analysis::diversity::{individual_diversity, network_diversity};
use analysis::individual::actual_vs_expected;
use analysis::mapper::{segment_edges, segment_records, try_map_to_segments};
use analysis::matrix::{ks_matrix, rpd_matrix, KsMatrixOptions, KsOutput};
use analysis::render::{
    render_ks_matrix_tsv, render_ks_pairs, render_matrix_output, render_scalars, to_json,
};
use anyhow::{anyhow, Context as _, Result};
use ingestion::{edge_records, named_records, vertex_records};
use interseg_core::config::AnalysisConfig;
use interseg_core::Weightedness;
use registry::{LabelClassifier, PopulationRegistry, SegmentField};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::Command;

pub struct Context {
    pub registry_path: Option<PathBuf>,
    pub analysis: AnalysisConfig,
}

impl Context {
    fn registry(&self) -> Result<PopulationRegistry> {
        let path = self
            .registry_path
            .as_ref()
            .ok_or_else(|| anyhow!("no registry archive given (use --registry or registry.archive_path)"))?;
        PopulationRegistry::load_archive(path)
            .with_context(|| format!("loading registry {}", path.display()))
    }
}

fn open_input(file: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match file {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn parse_weightedness(raw: &str) -> Result<Weightedness> {
    Ok(raw.parse::<Weightedness>()?)
}

pub(crate) fn run(command: Command, ctx: &Context) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Segment { field, file } => {
            let field: SegmentField = field.parse()?;
            let registry = ctx.registry()?;
            let classifier = registry.classifier(field);
            let rows = vertex_records(open_input(file.as_deref())?)
                .map(|row| row.map_err(anyhow::Error::from));
            for record in try_map_to_segments(rows, &classifier) {
                let record = record?;
                let values: Vec<String> = record.values.iter().map(f64::to_string).collect();
                writeln!(out, "{}\t{}", record.key, values.join("\t"))?;
            }
        }
        Command::Counts { field } => {
            let counts = ctx.registry()?.population_counts(&field)?;
            write!(out, "{}", render_scalars(&counts))?;
        }
        Command::Diversity {
            weightedness,
            segmenter,
            files,
        } => {
            let weightedness = parse_weightedness(&weightedness)?;
            let field: SegmentField = segmenter.parse()?;
            let registry = ctx.registry()?;
            let classifier = registry.classifier(field);

            let inputs: Vec<Option<PathBuf>> = if files.is_empty() {
                vec![None]
            } else {
                files.into_iter().map(Some).collect()
            };
            let prefix = inputs.len() > 1;
            for input in inputs {
                let records = vertex_records(open_input(input.as_deref())?).collect::<Result<Vec<_>, _>>()?;
                let segmented = segment_records(records, &classifier)?;
                let index = individual_diversity(&segmented, weightedness);
                match input.filter(|_| prefix) {
                    Some(path) => writeln!(out, "{}\t{}", path.display(), index)?,
                    None => writeln!(out, "{}", index)?,
                }
            }
        }
        Command::NetworkDiversity { file } => {
            let edges = edge_records(open_input(file.as_deref())?).collect::<Result<Vec<_>, _>>()?;
            info!("computing diversity over {} edges", edges.len());
            for (vertex, index) in network_diversity(&edges) {
                writeln!(out, "{}\t{}", vertex, index)?;
            }
        }
        Command::Rpd {
            field,
            weightedness,
            focal,
            file,
        } => {
            let weightedness = parse_weightedness(&weightedness)?;
            let field: SegmentField = field.parse()?;
            let registry = ctx.registry()?;
            let records = vertex_records(open_input(file.as_deref())?).collect::<Result<Vec<_>, _>>()?;
            let segmented = segment_records(records, &registry.classifier(field))?;
            let counts = registry.segment_counts(field);
            let comparison = actual_vs_expected(
                &segmented,
                &focal,
                weightedness,
                &counts,
                registry.len() as u64,
            )?;
            write!(out, "{}", render_scalars(&comparison.actual))?;
            writeln!(out, "population\t{}", comparison.focal_population)?;
            writeln!(out, "expected\t{}", comparison.expected_weight)?;
            writeln!(out, "rpd\t{}", comparison.rpd)?;
        }
        Command::RpdNetwork { field, file, json } => {
            let registry = ctx.registry()?;
            let counts = registry.population_counts(&field)?;
            let classifier = LabelClassifier::with_known_labels(counts.keys().cloned());
            let edges = edge_records(open_input(file.as_deref())?).collect::<Result<Vec<_>, _>>()?;
            let segmented = segment_edges(edges, &classifier)?;
            let output = rpd_matrix(&segmented, &counts, ctx.analysis.display_threshold)?;
            if json {
                writeln!(out, "{}", to_json(&output)?)?;
            } else {
                write!(out, "{}", render_matrix_output(&output))?;
            }
        }
        Command::Ks {
            weightedness,
            threshold,
            json,
            file,
        } => {
            let weightedness = parse_weightedness(&weightedness)?;
            let mut options = KsMatrixOptions::from_config(&ctx.analysis);
            if let Some(threshold) = threshold {
                options.min_sample_size = threshold;
            }
            let records = named_records(open_input(file.as_deref())?).collect::<Result<Vec<_>, _>>()?;
            let segmented = segment_records(records, &LabelClassifier::new())?;
            let distribution = reduce_to_segments(&segmented);
            info!(
                "comparing {} distributions of {} segments",
                weightedness,
                distribution.len()
            );
            let output = ks_matrix(&distribution, &options)?;
            if json {
                writeln!(out, "{}", to_json(&output)?)?;
            } else {
                match &output {
                    KsOutput::Matrix(matrix) => {
                        write!(out, "{}", render_ks_matrix_tsv(matrix, options.significance))?
                    }
                    KsOutput::TopPairs(pairs) => write!(out, "{}", render_ks_pairs(pairs))?,
                }
            }
        }
        Command::BuildArchive { tsv, out: target } => {
            let file = File::open(&tsv).with_context(|| format!("opening {}", tsv.display()))?;
            let registry = PopulationRegistry::from_tsv(BufReader::new(file))?;
            registry.save_archive(&target)?;
            writeln!(out, "wrote {} members to {}", registry.len(), target.display())?;
        }
    }
    out.flush()?;
    Ok(())
}
