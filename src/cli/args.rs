use clap::{Args, Parser, Subcommand};

/// Browse and edit dashboard resources from the terminal.
#[derive(Debug, Parser)]
#[command(name = "backoffice", version, about)]
pub struct Cli {
    /// Backend root URL (overrides BACKOFFICE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of a resource
    List(ListArgs),
    /// Edit fields of a record on a page
    Update(UpdateArgs),
    /// Delete a record by id
    Delete {
        resource: String,
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Resource name, e.g. customers
    pub resource: String,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Column filter on the loaded page, as column=text
    #[arg(long = "filter", value_parser = parse_pair)]
    pub filters: Vec<(String, String)>,

    /// Sort the loaded page by a column
    #[arg(long)]
    pub sort: Option<String>,

    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Hide a column
    #[arg(long = "hide")]
    pub hidden: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub page: PageArgs,

    /// Id of a record on the selected page
    pub id: String,

    /// Field to change, as key=value
    #[arg(long = "set", value_parser = parse_pair, required = true)]
    pub fields: Vec<(String, String)>,
}

pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
