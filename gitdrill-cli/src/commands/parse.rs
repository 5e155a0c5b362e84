//! `gitdrill parse`: show how a project reference is understood.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use gitdrill_core::RemoteDescriptor;

/// Arguments for `gitdrill parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Project reference: `owner/project`, `host/owner/project`, or a URL.
    pub reference: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ParseArgs {
    pub fn run(self) -> Result<()> {
        let remote = RemoteDescriptor::parse(&self.reference)?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&remote).context("failed to serialize descriptor")?
            );
            return Ok(());
        }

        println!("{}", remote.to_string().bold());
        println!("  {:<7}{}", "scheme".bright_black(), remote.scheme);
        println!("  {:<7}{}", "host".bright_black(), remote.host);
        println!("  {:<7}{}", "https".bright_black(), remote.https_url);
        println!("  {:<7}{}", "ssh".bright_black(), remote.ssh_url);
        Ok(())
    }
}
