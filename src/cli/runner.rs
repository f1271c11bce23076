//! Runner that loads declarations, resolves them and prints the result

use crate::cli::args::Args;
use crate::cli::config::{BlockDefaults, load_declarations, validate_blocks};
use crate::common::{FileSystem, OsFileSystem};
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::{AuthBlock, AuthMode, AuthResolver, ResolvedAuthSet};
use std::path::Path;

pub struct Runner<F = OsFileSystem> {
    args: Args,
    output: Logger,
    defaults: BlockDefaults,
    fs: F,
}

impl Runner<OsFileSystem> {
    pub fn new(args: Args) -> Self {
        let defaults = if args.no_defaults {
            BlockDefaults::none()
        } else {
            BlockDefaults::from_env()
        };
        Self::with_parts(args, defaults, OsFileSystem)
    }
}

impl<F: FileSystem> Runner<F> {
    pub fn with_parts(args: Args, defaults: BlockDefaults, fs: F) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };

        Self {
            args,
            output,
            defaults,
            fs,
        }
    }

    pub fn run(&self) -> Result<()> {
        self.output.section("Registry Auth");
        self.args.validate()?;

        let blocks = self.load_blocks()?;
        let set = self.resolve(&blocks)?;

        println!("{}", self.render(&set)?);

        if let Some(elapsed) = self.output.elapsed() {
            self.output.success(&format!(
                "Resolved {} registr{} in {}",
                set.len(),
                if set.len() == 1 { "y" } else { "ies" },
                self.output.format_duration(elapsed)
            ));
        }
        Ok(())
    }

    /// All declarations with defaults applied, file declarations first
    pub fn load_blocks(&self) -> Result<Vec<AuthBlock>> {
        let mut blocks = Vec::new();

        if let Some(path) = &self.args.declarations {
            let declared = load_declarations(&self.fs, Path::new(path))?;
            self.output
                .info(&format!("Loaded {} declaration(s) from {}", declared.len(), path));
            blocks.extend(declared);
        }
        blocks.extend(self.args.inline_block());

        let blocks: Vec<AuthBlock> = blocks
            .into_iter()
            .map(|block| self.defaults.apply(block))
            .collect();

        for warning in validate_blocks(&blocks)? {
            self.output.warning(&warning);
        }
        Ok(blocks)
    }

    pub fn resolve(&self, blocks: &[AuthBlock]) -> Result<ResolvedAuthSet> {
        for block in blocks {
            let source = match block.mode() {
                AuthMode::Inline { .. } => "inline credentials".to_string(),
                AuthMode::ConfigFile(path) => format!("config file {}", path),
                AuthMode::Anonymous => "no credentials".to_string(),
            };
            self.output.detail(&format!("{} <- {}", block.address, source));
        }

        AuthResolver::with_fs(&self.fs).resolve(blocks)
    }

    /// Render the resolved set in the requested output format
    pub fn render(&self, set: &ResolvedAuthSet) -> Result<String> {
        match self.args.output.as_str() {
            "json" => Ok(serde_json::to_string_pretty(set)?),
            "header" => set.registry_config_header(),
            _ => {
                let items: Vec<(String, String)> = set
                    .iter()
                    .map(|(address, cred)| {
                        let value = if cred.is_anonymous() {
                            "anonymous".to_string()
                        } else {
                            format!("{} / {}", cred.username, mask(&cred.password))
                        };
                        (address.to_string(), value)
                    })
                    .collect();
                self.output.summary_kv("Resolved registry credentials", &items);

                Ok(items
                    .iter()
                    .map(|(address, value)| format!("{}\t{}", address, value))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(empty password)".to_string()
    } else {
        "*".repeat(8)
    }
}
