//! Foods command - FatSecret nutrition lookups.

use anyhow::Result;
use clap::{Args, Subcommand};
use forkfit_core::{AutocompleteRequest, BarcodeRequest, FoodDetailsRequest, FoodSearchRequest};

use super::prepare;
use crate::Cli;
use crate::output::JsonFormatter;

/// Arguments for the foods command.
#[derive(Args)]
pub struct FoodsArgs {
    #[command(subcommand)]
    pub action: FoodsAction,
}

/// Foods subcommands.
#[derive(Subcommand)]
pub enum FoodsAction {
    /// Search foods by name.
    Search {
        /// Search expression.
        query: String,
        /// Results per page.
        #[arg(long)]
        max: Option<u32>,
        /// Zero-based page number.
        #[arg(long)]
        page: Option<u32>,
    },

    /// Suggest food names for a partial expression.
    Autocomplete {
        /// Partial expression.
        expr: String,
        /// Maximum number of suggestions.
        #[arg(long)]
        max: Option<u32>,
    },

    /// Show a food and its servings.
    Details {
        /// FatSecret food id.
        food_id: String,
    },

    /// Look up a food by UPC/EAN barcode.
    Barcode {
        /// Barcode as scanned.
        raw_code: String,
        /// Market region (e.g. US).
        #[arg(long)]
        region: Option<String>,
        /// Language; only sent together with a region.
        #[arg(long)]
        language: Option<String>,
    },
}

/// Runs the foods command.
pub async fn run(args: &FoodsArgs, cli: &Cli) -> Result<()> {
    let (functions, ctx) = prepare(cli).await?;
    let formatter = JsonFormatter::new(cli.pretty);

    match &args.action {
        FoodsAction::Search { query, max, page } => {
            let request = FoodSearchRequest {
                query: query.clone(),
                max: *max,
                page: *page,
            };
            formatter.print(&functions.search_foods(&ctx, &request).await?)
        }
        FoodsAction::Autocomplete { expr, max } => {
            let request = AutocompleteRequest {
                expr: expr.clone(),
                max: *max,
            };
            formatter.print(&functions.autocomplete(&ctx, &request).await?)
        }
        FoodsAction::Details { food_id } => {
            let request = FoodDetailsRequest::new(food_id.clone());
            formatter.print(&functions.food_details(&ctx, &request).await?)
        }
        FoodsAction::Barcode {
            raw_code,
            region,
            language,
        } => {
            let request = BarcodeRequest {
                raw_code: raw_code.clone(),
                region: region.clone(),
                language: language.clone(),
            };
            formatter.print(&functions.food_by_barcode(&ctx, &request).await?)
        }
    }
}
