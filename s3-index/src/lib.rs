pub mod cli;
pub mod store;

use anyhow::Result;
use tracing::info;

use s3_index_core::config::IndexConfig;
use s3_index_core::publish::{build_tree, publish};
use s3_index_core::render::humanize_bytes;
use s3_index_core::tree::FolderTree;

use cli::{Cli, Commands};
use store::S3Store;

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Publish(args) => {
            let config = args.index_config();
            config.trace_loaded();
            let store = S3Store::connect(&args.store_config()).await;

            println!(
                "Publishing directory index for s3://{}/{} ...",
                config.bucket, config.root
            );
            let report = publish(&store, &config).await?;
            println!("Publish complete.\nReport:");
            println!("{report:#?}");
            if !report.is_clean() {
                eprintln!(
                    "[WARN] {} object(s) failed to publish; see report above.",
                    report.failures.len()
                );
            }
            Ok(())
        }
        Commands::List(args) => {
            let config = args.index_config();
            config.trace_loaded();
            let store = S3Store::connect(&args.store_config()).await;

            let tree = build_tree(&store, &config).await?;
            info!(folders = tree.len(), "Listing materialized");
            print_listing(&tree, &config);
            Ok(())
        }
    }
}

/// Print the materialized tree, folders in path order with their files.
fn print_listing(tree: &FolderTree, config: &IndexConfig) {
    for folder in tree.folders().filter(|f| f.path.starts_with(&config.root)) {
        if folder.is_root() {
            println!("/");
        } else {
            println!("{}", folder.path);
        }
        for file in folder.files.values() {
            println!(
                "  {:>10}  {}  {}",
                humanize_bytes(file.size, config.decimal_units),
                file.last_modified.as_deref().unwrap_or("-"),
                file.filename
            );
        }
    }
}
