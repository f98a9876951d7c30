//! Stategraph - deterministic layout of workflow state machine definitions.
//!
//! Parsing, layout and export for workflow definitions: a JSON definition
//! goes in, a [`LayoutGraph`](graph::LayoutGraph) of positioned nodes and
//! annotated edges comes out, ready for a renderer.

pub mod analysis;
pub mod config;
pub mod layout;

mod error;
mod source;

pub use stategraph_core::{definition, geometry, graph, identifier};

pub use error::StategraphError;
pub use source::DefinitionSource;

use std::io::Write;

use log::{debug, info, trace, warn};

use config::AppConfig;
use definition::WorkflowDefinition;
use graph::LayoutGraph;
use stategraph_parser::Diagnostic;

/// Builder for parsing and laying out workflow definitions.
///
/// # Examples
///
/// ```rust
/// use stategraph::{GraphBuilder, config::AppConfig};
///
/// let source = r#"{"StartAt": "Hello", "States": {
///     "Hello": {"Type": "Pass", "Next": "World"},
///     "World": {"Type": "Succeed"}
/// }}"#;
///
/// let builder = GraphBuilder::new(AppConfig::default());
///
/// // Strict: malformed input is an error
/// let graph = builder.try_layout(source).expect("Failed to lay out");
/// assert_eq!(graph.state_nodes().count(), 2);
///
/// // Fail-soft: malformed input is the empty graph
/// assert!(builder.layout("{not json").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: AppConfig,
}

impl GraphBuilder {
    /// Create a new graph builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration of this builder.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a definition, returning it with the warnings found.
    ///
    /// # Errors
    ///
    /// Returns `StategraphError::MissingInput` for a missing definition and
    /// `StategraphError::Parse` for text or values that do not describe a
    /// valid definition.
    pub fn parse(
        &self,
        source: impl Into<DefinitionSource>,
    ) -> Result<(WorkflowDefinition, Vec<Diagnostic>), StategraphError> {
        info!("Parsing definition");
        let (definition, warnings) = source.into().resolve()?;
        for warning in &warnings {
            debug!(warning:%; "Definition warning");
        }
        debug!(
            states_len = definition.states().len(),
            warnings_len = warnings.len();
            "Definition parsed successfully",
        );
        trace!(definition:?; "Parsed definition");
        Ok((definition, warnings))
    }

    /// Lay out an already validated definition.
    pub fn layout_definition(&self, definition: &WorkflowDefinition) -> LayoutGraph {
        layout::Engine::from_config(self.config.layout()).calculate_layout(definition)
    }

    /// Parse and lay out a definition.
    ///
    /// # Errors
    ///
    /// Same as [`GraphBuilder::parse`].
    pub fn try_layout(
        &self,
        source: impl Into<DefinitionSource>,
    ) -> Result<LayoutGraph, StategraphError> {
        let (definition, _) = self.parse(source)?;
        Ok(self.layout_definition(&definition))
    }

    /// Parse and lay out a definition, recovering from malformed input.
    ///
    /// Any error is logged and yields the empty graph.
    pub fn layout(&self, source: impl Into<DefinitionSource>) -> LayoutGraph {
        match self.try_layout(source) {
            Ok(graph) => graph,
            Err(StategraphError::Parse { err, .. }) => {
                for diagnostic in err.diagnostics() {
                    warn!("Malformed definition: {diagnostic}");
                }
                LayoutGraph::empty()
            }
            Err(err) => {
                warn!("Malformed definition: {err}");
                LayoutGraph::empty()
            }
        }
    }

    /// Serialize a layout graph to JSON, indented when configured.
    ///
    /// # Errors
    ///
    /// Returns `StategraphError::Export` if serialization fails.
    pub fn to_json(&self, graph: &LayoutGraph) -> Result<String, StategraphError> {
        let json = if self.config.output().pretty() {
            serde_json::to_string_pretty(graph)?
        } else {
            serde_json::to_string(graph)?
        };
        info!(bytes = json.len(); "Layout graph exported");
        Ok(json)
    }

    /// Write a layout graph as JSON to `writer`, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns `StategraphError::Export` or `StategraphError::Io` on failure.
    pub fn write_json(&self, graph: &LayoutGraph, mut writer: impl Write) -> Result<(), StategraphError> {
        let json = self.to_json(graph)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Lay out a definition with the default configuration.
///
/// Malformed input (missing, unparseable, no usable start state) yields the
/// empty graph.
///
/// # Examples
///
/// ```
/// let graph = stategraph::layout(r#"{"States": {}, "StartAt": "X"}"#);
/// assert!(graph.is_empty());
/// ```
pub fn layout(source: impl Into<DefinitionSource>) -> LayoutGraph {
    GraphBuilder::default().layout(source)
}
