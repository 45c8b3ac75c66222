//! End-to-end run: read inputs, parse, reconcile, generate, emit.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use attrgen_parser::{parse_css_table, parse_dtd, parse_interfaces};
use attrgen_resolver::reconcile;

use crate::config::Overrides;
use crate::emitter::{EmitReport, OutputEmitter};
use crate::error::{AttrgenError, CodegenError};
use crate::generators::{
    css::infer_properties, AccessorGenerator, AnimatedWrapperGenerator,
    CssPropertyTableGenerator, ElementFactoryGenerator, EnumerationGenerator, FileGenerator,
    GeneratedProject, ListContainerGenerator,
};
use crate::model::CodegenModel;

pub const INTERFACE_FILE: &str = "svg.idl";
pub const DTD_FILE: &str = "svg.dtd";
pub const CSS_TABLE_FILE: &str = "css-properties.tsv";
pub const OVERRIDES_FILE: &str = "attrgen.toml";

/// Raw inputs of one run.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub interfaces: String,
    pub dtd: String,
    pub css_table: String,
    pub overrides: Overrides,
}

impl Inputs {
    /// Read the conventional input files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, CodegenError> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|e| CodegenError::io(path, e))
        };

        Ok(Self {
            interfaces: read(INTERFACE_FILE)?,
            dtd: read(DTD_FILE)?,
            css_table: read(CSS_TABLE_FILE)?,
            overrides: Overrides::load(&dir.join(OVERRIDES_FILE))?,
        })
    }
}

/// Parse and reconcile the inputs.
pub fn build_model(inputs: &Inputs) -> Result<CodegenModel, AttrgenError> {
    let interfaces = parse_interfaces(&inputs.interfaces)?;
    let dtd = parse_dtd(&inputs.dtd)?;
    let rows = parse_css_table(&inputs.css_table);
    debug!(
        interfaces = interfaces.len(),
        elements = dtd.elements.len(),
        css_rows = rows.len(),
        "parsed inputs"
    );

    let reconciliation = reconcile(&interfaces, &dtd, &inputs.overrides.reconcile_options())?;
    let css_properties = infer_properties(&rows, &inputs.overrides.css_default_patches);

    Ok(CodegenModel {
        interfaces,
        dtd,
        reconciliation,
        css_properties,
        overrides: inputs.overrides.clone(),
    })
}

/// Run every generator over a model. Nothing is written.
pub fn generate_project(model: &CodegenModel) -> Result<GeneratedProject, CodegenError> {
    let generators: Vec<Box<dyn FileGenerator>> = vec![
        Box::new(EnumerationGenerator::new()?),
        Box::new(AccessorGenerator::new()),
        Box::new(AnimatedWrapperGenerator::new()?),
        Box::new(ListContainerGenerator::new()?),
        Box::new(CssPropertyTableGenerator::new()),
        Box::new(ElementFactoryGenerator::new()?),
    ];

    let mut project = GeneratedProject::default();
    for generator in &generators {
        let files = generator.generate(model)?;
        debug!(generator = generator.name(), files = files.len(), "generator finished");
        project.files.extend(files);
    }
    Ok(project)
}

/// Parse, reconcile and generate from in-memory inputs.
pub fn generate(inputs: &Inputs) -> Result<GeneratedProject, AttrgenError> {
    let model = build_model(inputs)?;
    Ok(generate_project(&model)?)
}

/// Generate from `input_dir` and write into `output_dir`.
///
/// Output is written only after every stage has succeeded, so a failed
/// run leaves `output_dir` as it was.
pub fn run(input_dir: &Path, output_dir: &Path) -> Result<EmitReport, AttrgenError> {
    info!(input = %input_dir.display(), output = %output_dir.display(), "starting generation");

    let inputs = Inputs::load(input_dir)?;
    let project = generate(&inputs)?;
    let report = OutputEmitter::new(output_dir).emit(&project)?;

    info!(
        files = project.files.len(),
        written = report.written.len(),
        "generation complete"
    );
    Ok(report)
}
