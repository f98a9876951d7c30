//! CLI logic for the Stategraph layout tool.
//!
//! Reads a workflow definition, lays it out and writes the layout graph as
//! JSON to a file or stdout.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs::{self, File},
    io::{self, BufWriter},
};

use log::{info, warn};

use stategraph::{GraphBuilder, StategraphError, analysis, graph::LayoutGraph};

use error_adapter::{render, to_reportables, warnings_to_reportables};

/// Run the Stategraph CLI application
///
/// Malformed definitions are logged and produce the empty graph, unless
/// `args.strict` is set, in which case they are returned as errors.
///
/// # Errors
///
/// Returns `StategraphError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors (strict mode only)
/// - Export errors
pub fn run(args: &Args) -> Result<(), StategraphError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        strict = args.strict;
        "Processing definition"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;

    let builder = GraphBuilder::new(app_config);
    let graph = match builder.parse(source.as_str()) {
        Ok((definition, warnings)) => {
            for reportable in warnings_to_reportables(&warnings, &source) {
                warn!("{}", render(&reportable));
            }

            let unreachable = analysis::unreachable_states(&definition);
            if unreachable.is_empty() {
                info!("All states are reachable");
            } else {
                warn!(count = unreachable.len(); "Definition has unreachable states");
            }

            builder.layout_definition(&definition)
        }
        Err(err) if !args.strict => {
            for reportable in to_reportables(&err) {
                warn!("{}", render(&reportable));
            }
            warn!("Malformed definition, writing the empty graph");
            LayoutGraph::empty()
        }
        Err(err) => return Err(err),
    };

    if args.writes_stdout() {
        builder.write_json(&graph, io::stdout().lock())?;
    } else {
        let file = File::create(&args.output)?;
        builder.write_json(&graph, BufWriter::new(file))?;
    }

    info!(
        output = args.output,
        nodes = graph.nodes().len(),
        edges = graph.edges().len();
        "Layout graph written"
    );

    Ok(())
}
