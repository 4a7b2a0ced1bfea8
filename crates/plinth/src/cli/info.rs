use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use plinth_index::{Manifest, PlatformArtifact};
use plinth_install::matching_platform;

use crate::env::PlinthEnv;

#[derive(Debug, clap::Args)]
pub struct Info {
    /// Plugins to describe; every plugin in the index when omitted.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

impl Info {
    pub fn run(self, env: &PlinthEnv) -> Result<bool> {
        let index = env.index();
        let target = env.target()?;
        let manifests = if self.names.is_empty() {
            index.load_all().context("failed to read plugin index")?
        } else {
            self.names
                .iter()
                .map(|name| match index.load(name) {
                    Ok(manifest) => Ok(manifest),
                    Err(e) if e.is_not_found() => bail!("plugin {name:?} not found"),
                    Err(e) => Err(e).context("failed to load plugin manifest"),
                })
                .collect::<Result<Vec<_>>>()?
        };

        let mut out = io::stdout().lock();
        for (i, manifest) in manifests.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            // An artifact without a usable source is still worth describing
            // without its download details.
            let platform = matching_platform(manifest, &target).ok().flatten();
            write_info(&mut out, manifest, platform)?;
        }
        Ok(true)
    }
}

fn write_info(out: &mut impl Write, manifest: &Manifest, platform: Option<&PlatformArtifact>) -> io::Result<()> {
    writeln!(out, "NAME: {}", manifest.name())?;
    if let Some(platform) = platform {
        if let Some(head) = platform.head.as_deref().filter(|h| !h.is_empty()) {
            writeln!(out, "HEAD: {head}")?;
        }
        if let Some(uri) = platform.uri.as_deref().filter(|u| !u.is_empty()) {
            writeln!(out, "URI: {uri}")?;
            writeln!(out, "SHA256: {}", platform.sha256.as_deref().unwrap_or_default())?;
        }
    }
    writeln!(out, "VERSION: {}", manifest.version())?;
    if let Some(homepage) = manifest.homepage() {
        writeln!(out, "HOMEPAGE: {homepage}")?;
    }
    if let Some(description) = manifest.description() {
        writeln!(out, "DESCRIPTION: \n{description}")?;
    }
    if let Some(caveats) = manifest.caveats() {
        writeln!(out, "{}", caveats_block(caveats))?;
    }
    Ok(())
}

/// Caveats framed and indented so they stand out after install output.
pub(crate) fn caveats_block(caveats: &str) -> String {
    let mut out = String::from("CAVEATS:\n\\\n");
    for line in caveats.trim_end().lines() {
        out.push_str(" |  ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('/');
    out
}
