use clap::Parser;
use swiftclaim::{analyzer, cli, config, error, export, scanner};

use cli::{Cli, Commands};
use config::Config;
use error::{Result, SwiftClaimError};
use swiftclaim_common::{category_universe, ClaimState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let provider = cli.ai_provider.unwrap_or(config.provider);

    match cli.command {
        Commands::Classify { image, json } => {
            let categories = category_universe(&ClaimState::default());
            // Single-image classification degrades to the fallback instead
            // of failing; callers (the desktop app included) rely on always
            // getting a suggestion back.
            let suggestion = match analyzer::classify_image(
                &image,
                &categories,
                provider,
                config.timeout_seconds,
                cli.verbose,
            )
            .await
            {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("⚠ {} (using fallback)", e);
                    swiftclaim_common::ClassifySuggestion::fallback()
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&suggestion)?);
            } else {
                println!(
                    "Amount: RM {:.2}  Category: {}",
                    suggestion.amount, suggestion.category_suggestion
                );
            }
        }

        Commands::Analyze {
            folder,
            output,
            name,
            month,
            use_cache,
        } => {
            println!("🧾 swiftclaim - receipt analysis\n");

            println!("[1/3] Scanning receipts...");
            let images = scanner::scan_folder(&folder)?;
            println!("✔ {} receipt(s) found\n", images.len());

            if images.is_empty() {
                return Err(SwiftClaimError::NoImagesFound(folder.display().to_string()));
            }

            let categories = category_universe(&ClaimState::default());

            println!(
                "[2/3] Classifying...{}",
                if use_cache { " (cache enabled)" } else { "" }
            );
            let suggestions = if use_cache {
                analyzer::classify_folder_with_cache(
                    &images,
                    &folder,
                    &categories,
                    provider,
                    config.timeout_seconds,
                    cli.verbose,
                )
                .await?
            } else {
                analyzer::classify_folder(
                    &images,
                    &categories,
                    provider,
                    config.timeout_seconds,
                    cli.verbose,
                )
                .await
            };
            println!("✔ Classification done\n");

            println!("[3/3] Saving claim file...");
            let state = ClaimState {
                name,
                month: default_month(month),
                entries: analyzer::build_entries(
                    &images,
                    &suggestions,
                    &categories,
                    config.max_image_size,
                )?,
                custom_categories: Vec::new(),
            };

            let output = output.unwrap_or_else(|| folder.join("claim.json"));
            std::fs::write(&output, serde_json::to_string_pretty(&state)?)?;
            println!("✔ Claim saved: {}", output.display());

            println!("\n✅ Analysis complete");
        }

        Commands::Export {
            input,
            format,
            output,
            orientation,
            title,
        } => {
            println!("📄 swiftclaim - export\n");

            let state = load_claim(&input)?;
            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));

            export::export_claim(&state, &format, &output_dir, orientation, &title)?;

            println!("\n✅ Export complete");
        }

        Commands::Run {
            folder,
            output,
            format,
            name,
            month,
            orientation,
            use_cache,
        } => {
            println!("🚀 swiftclaim - full run\n");

            println!("[1/4] Scanning receipts...");
            let images = scanner::scan_folder(&folder)?;
            println!("✔ {} receipt(s) found\n", images.len());

            if images.is_empty() {
                return Err(SwiftClaimError::NoImagesFound(folder.display().to_string()));
            }

            let categories = category_universe(&ClaimState::default());

            println!(
                "[2/4] Classifying...{}",
                if use_cache { " (cache enabled)" } else { "" }
            );
            let suggestions = if use_cache {
                analyzer::classify_folder_with_cache(
                    &images,
                    &folder,
                    &categories,
                    provider,
                    config.timeout_seconds,
                    cli.verbose,
                )
                .await?
            } else {
                analyzer::classify_folder(
                    &images,
                    &categories,
                    provider,
                    config.timeout_seconds,
                    cli.verbose,
                )
                .await
            };
            println!("✔ Classification done\n");

            println!("[3/4] Building claim...");
            let state = ClaimState {
                name,
                month: default_month(month),
                entries: analyzer::build_entries(
                    &images,
                    &suggestions,
                    &categories,
                    config.max_image_size,
                )?,
                custom_categories: Vec::new(),
            };
            println!("✔ {} entries, total RM {:.2}\n", state.entries.len(), state.total_amount());

            println!("[4/4] Exporting...");
            let output_dir = output.unwrap_or_else(|| folder.clone());
            export::export_claim(&state, &format, &output_dir, orientation, "Expenses Claim Form")?;

            println!("\n✅ Done");
        }

        Commands::Config {
            set_provider,
            set_timeout,
            show,
        } => {
            let mut config = config;

            if let Some(provider) = set_provider {
                config.set_provider(provider)?;
                println!("✔ Provider set to {}", provider);
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ Timeout set to {}s", seconds);
            }

            if show {
                println!("Settings:");
                println!("  provider: {}", config.provider);
                println!("  timeout: {}s", config.timeout_seconds);
                println!("  max image size: {}px", config.max_image_size);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = analyzer::CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = analyzer::CacheFile::load(&target);
                    println!("Cache info:");
                    println!("  path: {}", cache_path.display());
                    println!("  entries: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  size: {} bytes", meta.len());
                    }
                } else {
                    println!("No cache file: {}", cache_path.display());
                }
            }

            if clear {
                match analyzer::CacheFile::clear(&target) {
                    Ok(true) => println!("✔ Cache deleted: {}", cache_path.display()),
                    Ok(false) => println!("No cache file to delete"),
                    Err(e) => println!("Cache delete error: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Loads a claim JSON file, rejecting documents whose `entries` field is
/// missing or not an array before deserializing the rest.
fn load_claim(path: &std::path::Path) -> Result<ClaimState> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| SwiftClaimError::FileNotFound(path.display().to_string()))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    if !value.get("entries").map(|e| e.is_array()).unwrap_or(false) {
        return Err(SwiftClaimError::InvalidClaimFile(
            "missing array-valued \"entries\" field".into(),
        ));
    }

    Ok(serde_json::from_value(value)?)
}

/// Current "YYYY-MM" when the user did not pass a month.
fn default_month(month: String) -> String {
    if month.trim().is_empty() {
        chrono::Local::now().format("%Y-%m").to_string()
    } else {
        month
    }
}
