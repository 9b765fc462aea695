//! AI CLI bridge
//!
//! Classification runs through an installed AI CLI (claude/codex/gemini)
//! rather than a direct API client, so whatever account the user already
//! has logged in keeps working. Every invocation runs under a hard
//! timeout; a hung CLI must not wedge a batch.

use crate::ai_provider::AiProvider;
use crate::error::{Result, SwiftClaimError};
use std::path::Path;
use std::time::Duration;
use swiftclaim_common::{build_classify_prompt, parse_classify_response, ClassifySuggestion};
use tokio::process::Command;

/// Classifies one receipt image into an amount/category suggestion.
pub async fn classify_image(
    image: &Path,
    categories: &[String],
    provider: AiProvider,
    timeout_seconds: u64,
    verbose: bool,
) -> Result<ClassifySuggestion> {
    if !image.exists() {
        return Err(SwiftClaimError::FileNotFound(image.display().to_string()));
    }

    let abs_path = std::fs::canonicalize(image)?;
    let prompt = build_classify_prompt(
        &abs_path.display().to_string().replace('\\', "/"),
        categories,
    );

    if verbose {
        println!("  [{}] prompt: {} chars", provider, prompt.len());
    }

    let response = run_provider_cli(&prompt, provider, timeout_seconds, verbose).await?;

    if verbose {
        let preview: String = response.chars().take(500).collect();
        println!("  response: {}", preview);
    }

    parse_classify_response(&response)
        .map_err(|e| SwiftClaimError::ClassifyParse(e.to_string()))
}

async fn run_provider_cli(
    prompt: &str,
    provider: AiProvider,
    timeout_seconds: u64,
    verbose: bool,
) -> Result<String> {
    let mut command = build_command(prompt, provider);

    let output = tokio::time::timeout(Duration::from_secs(timeout_seconds), command.output())
        .await
        .map_err(|_| SwiftClaimError::ClassifyTimeout(timeout_seconds))?
        .map_err(|e| {
            SwiftClaimError::CliExecution(format!("{} CLI launch failed: {}", provider, e))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SwiftClaimError::CliExecution(format!(
            "{} CLI failed (code {:?}): {}",
            provider,
            output.status.code(),
            stderr
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();

    if verbose {
        println!("  [{}] response: {} chars", provider, response.len());
    }

    Ok(response)
}

fn build_command(prompt: &str, provider: AiProvider) -> Command {
    // On Windows the CLIs are npm shims that need cmd /c
    #[cfg(windows)]
    {
        let mut command = Command::new("cmd");
        command.arg("/c").arg(provider.command_name());
        add_provider_args(&mut command, prompt, provider);
        command
    }

    #[cfg(not(windows))]
    {
        let mut command = Command::new(provider.command_name());
        add_provider_args(&mut command, prompt, provider);
        command
    }
}

fn add_provider_args(command: &mut Command, prompt: &str, provider: AiProvider) {
    match provider {
        AiProvider::Claude => {
            command.args(["-p", prompt, "--output-format", "text"]);
        }
        AiProvider::Codex => {
            command.args(["exec", prompt]);
        }
        AiProvider::Gemini => {
            command.args(["-p", prompt]);
        }
    }
}
