//! `abiguard normalize` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::pattern::PatternList;
use crate::signature;

/// Execute the `normalize` command: print the signature file for a raw dump.
///
/// # Errors
///
/// Returns an error string if the input cannot be read.
pub fn run(ctx: &ServiceContext, input: Option<&Path>) -> Result<(), String> {
    let raw = super::read_input(ctx, input)?;
    print!("{}", render(&raw));
    Ok(())
}

fn render(raw: &str) -> String {
    signature::serialize(&signature::parse(raw, &PatternList::new()))
}
