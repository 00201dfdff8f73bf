//! Exercises command - exercise database search.

use anyhow::Result;
use clap::Args;
use forkfit_core::ExerciseQuery;

use super::prepare;
use crate::Cli;
use crate::output::JsonFormatter;

/// Arguments for the exercises command.
#[derive(Args)]
pub struct ExercisesArgs {
    /// Exercise name (partial match).
    #[arg(long)]
    pub name: Option<String>,

    /// Target muscle group.
    #[arg(long)]
    pub muscle: Option<String>,

    /// Exercise type (e.g. strength, cardio).
    #[arg(long = "type")]
    pub exercise_type: Option<String>,

    /// Difficulty level.
    #[arg(long)]
    pub difficulty: Option<String>,
}

impl ExercisesArgs {
    fn query(&self) -> ExerciseQuery {
        ExerciseQuery {
            name: self.name.clone(),
            muscle: self.muscle.clone(),
            exercise_type: self.exercise_type.clone(),
            difficulty: self.difficulty.clone(),
        }
    }
}

/// Runs the exercises command.
pub async fn run(args: &ExercisesArgs, cli: &Cli) -> Result<()> {
    let (functions, ctx) = prepare(cli).await?;
    let exercises = functions.search_exercises(&ctx, &args.query()).await?;
    JsonFormatter::new(cli.pretty).print(&exercises)
}
