//! The `drill validate` command.

use anyhow::{Result, bail};

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let bank = ctx.load_bank()?;
    if bank.is_empty() {
        bail!("no question files found in {}", ctx.questions.display());
    }

    for state in bank.states() {
        let categories = bank.categories(state)?;
        let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        println!(
            "{state}: {} questions, {} categories ({})",
            bank.len(state),
            categories.len(),
            names.join(", ")
        );
    }
    println!("All question banks valid.");
    Ok(())
}
