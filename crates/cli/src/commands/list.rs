// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fwt list` — show the featured workspaces a run would test.

use anyhow::Result;
use clap::Args;
use fwt_engine::{discover_featured, FeaturedWorkspace};

use crate::color;
use crate::config::FileConfig;

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only list workspaces whose `project/name` contains this text
    #[arg(long)]
    pub only: Option<String>,
}

pub async fn handle(args: ListArgs, file: FileConfig) -> Result<()> {
    let mut config = file.run_config();
    if args.only.is_some() {
        config.clone.only = args.only;
    }
    let api = super::connect(&file).await?;

    let featured = discover_featured(&api, &config.clone).await?;

    print!("{}", format_list(&featured));
    Ok(())
}

pub fn format_list(featured: &[FeaturedWorkspace]) -> String {
    if featured.is_empty() {
        return "No featured workspaces selected\n".to_string();
    }
    let width = featured.iter().map(|f| f.workspace.to_string().len()).max().unwrap_or(0);
    let mut out = format!("{}\n", color::header(&format!("{} featured workspace(s)", featured.len())));
    for f in featured {
        let key = f.workspace.to_string();
        out.push_str(&format!(
            "  {}{}  {}\n",
            color::literal(&key),
            " ".repeat(width - key.len()),
            color::context(&f.owners.join(", "))
        ));
    }
    out
}
