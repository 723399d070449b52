//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::{api_key, Config};
use crate::confirm::PromptConfirmation;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use eventscout_domain::{AutoConfirm, Confirmation, InferenceProvider, MatchPolicy, TextExtractor};
use eventscout_extractor::{PdfTextExtractor, Processor, RunSummary};
use eventscout_llm::ChatCompletionsProvider;
use eventscout_store::MasterStore;
use std::path::Path;
use tracing::info;

/// Execute the run command.
pub async fn execute_run(args: RunArgs, config: &Config, formatter: &Formatter) -> Result<RunSummary> {
    // Checked before anything touches the store or the source directory
    let api_key = api_key()?;

    let mut processing = config.processing.clone();
    processing.fail_fast |= args.fail_fast;
    processing.validate().map_err(CliError::Config)?;

    let match_policy = if args.exact_match {
        MatchPolicy::Exact
    } else {
        config.store.match_policy
    };
    let store = MasterStore::new(args.store.unwrap_or_else(|| config.store.path.clone()))
        .with_matcher(match_policy);
    let source = args.source.unwrap_or_else(|| config.source.dir.clone());

    let provider = ChatCompletionsProvider::new(api_key, config.inference.clone())?;
    info!("Using model {} at {}", provider.model_name(), provider.endpoint());

    let processor = Processor::new(provider, PdfTextExtractor, store, processing);

    if args.yes {
        run_processor(&processor, &source, &mut AutoConfirm(true), formatter).await
    } else {
        run_processor(&processor, &source, &mut PromptConfirmation::stdio(), formatter).await
    }
}

/// Drive `processor` over `source` and print the outcome.
///
/// Fails with [`CliError::Incomplete`] when any document failed, after the
/// summary has been printed.
pub async fn run_processor<L, X>(
    processor: &Processor<L, X>,
    source: &Path,
    confirmation: &mut dyn Confirmation,
    formatter: &Formatter,
) -> Result<RunSummary>
where
    L: InferenceProvider,
    X: TextExtractor,
{
    let summary = processor.run(source, confirmation).await?;
    println!("{}", formatter.run_summary(&summary));

    if !summary.failed.is_empty() {
        return Err(CliError::Incomplete(summary.failed.len()));
    }
    Ok(summary)
}
