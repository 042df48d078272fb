//! Run command - executes an ad-hoc workflow and prints each step's output

use std::fmt::Write as _;

use anyhow::bail;
use clap::Args;
use tokio::io::AsyncReadExt;
use tracing::warn;

use crate::api::types::RunWorkflowResponse;
use crate::domain::{
    validate_workflow, StepKind, StepSelection, Workflow, WorkflowError, WorkflowExecutor,
    WorkflowId, WorkflowRun,
};
use crate::infrastructure::logging::init_cli_logging;

const AD_HOC_NAME: &str = "ad-hoc";

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Step to apply, in order. Repeat 2 to 4 times.
    ///
    /// One of clean-text, summarize, extract-key-points, tag-category.
    #[arg(short, long = "step", value_name = "KIND", required = true)]
    pub steps: Vec<StepKind>,

    /// Input text. Read from stdin when omitted.
    #[arg(short, long)]
    pub input: Option<String>,

    /// Print the run as JSON instead of plain text
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    init_cli_logging(&config.logging);

    let workflow = build_workflow(&args.steps)?;
    let input = match args.input {
        Some(input) => input,
        None => read_stdin().await?,
    };

    if input.trim().is_empty() {
        return Err(WorkflowError::MissingInput.into());
    }

    let llm_provider = crate::create_llm_provider(&config)?;
    let executor = crate::create_executor(&config, llm_provider);
    let run = executor.execute(&workflow, &input).await;

    let completed = run.is_completed();
    let rendered = if args.json {
        serde_json::to_string_pretty(&RunWorkflowResponse::from(run))?
    } else {
        render_text(&run)
    };
    println!("{}", rendered);

    if !completed {
        bail!("workflow run aborted");
    }

    Ok(())
}

/// Deduplicate the requested kinds in order and validate the resulting chain
fn build_workflow(steps: &[StepKind]) -> Result<Workflow, WorkflowError> {
    let selection: StepSelection = steps.iter().copied().collect();

    if selection.len() < steps.len() {
        warn!(
            requested = steps.len(),
            kept = selection.len(),
            "Dropped repeated or excess steps"
        );
    }

    let definition = validate_workflow(AD_HOC_NAME, None, &selection.to_wire())?;
    Ok(Workflow::new(WorkflowId::generate(), definition))
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}

fn render_text(run: &WorkflowRun) -> String {
    let mut out = String::new();

    for (index, result) in run.results().iter().enumerate() {
        let _ = writeln!(out, "[{}] {}", index + 1, result.kind.label());
        let _ = writeln!(out, "{}", result.output);
        let _ = writeln!(out);
    }

    if let Some(failure) = run.failure() {
        let _ = writeln!(
            out,
            "[{}] {} failed: {}",
            failure.index + 1,
            failure.kind.label(),
            failure.error
        );
    }

    out.trim_end().to_string()
}
