//! Reference-resolution flags shared by every subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use draft4_fetch::HttpFetcher;
use draft4_schema::{ChainRetriever, CompileOptions, LocalRetriever};
use url::Url;

/// How results are printed.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON document on stdout.
    Json,
}

/// Where absolute `$ref` URIs may be resolved from.
#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Follow absolute-URI `$ref`s over HTTP.
    #[arg(long)]
    pub allow_external_refs: bool,

    /// Serve remote documents from this directory instead of the network.
    #[arg(long, value_name = "DIR")]
    pub remotes: Option<PathBuf>,

    /// URI at which `--remotes` is served.
    #[arg(long, value_name = "URL", default_value = "http://localhost:1234/")]
    pub remote_base: Url,
}

impl ResolveArgs {
    /// Whether any external source is configured.
    pub fn external_enabled(&self) -> bool {
        self.allow_external_refs || self.remotes.is_some()
    }

    /// Build the retriever chain: preloaded remotes first, then HTTP.
    /// Returns `None` when external references stay disabled.
    pub fn retriever(&self) -> Result<Option<ChainRetriever>> {
        if !self.external_enabled() {
            return Ok(None);
        }
        let mut chain = ChainRetriever::new();
        if let Some(dir) = &self.remotes {
            let local = LocalRetriever::from_dir(&self.remote_base, dir)
                .with_context(|| format!("failed to load remotes from {}", dir.display()))?;
            tracing::info!(documents = local.len(), base = %self.remote_base, "serving local remotes");
            chain = chain.push(local);
        }
        if self.allow_external_refs {
            let fetcher = HttpFetcher::from_env().context("failed to set up HTTP fetcher")?;
            chain = chain.push(fetcher);
        }
        Ok(Some(chain))
    }

    /// Compile options borrowing `retriever`.
    pub fn options<'a>(&self, retriever: Option<&'a ChainRetriever>) -> CompileOptions<'a> {
        let options = CompileOptions::new().allow_external(self.external_enabled());
        match retriever {
            Some(retriever) => options.with_retriever(retriever),
            None => options,
        }
    }
}
