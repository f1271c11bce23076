//! Command-line argument parsing

use crate::error::{AuthError, Result};
use crate::registry::AuthBlock;
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "registry-auth")]
#[command(about = "Resolve container registry credentials from declarations and Docker config files")]
#[command(version)]
pub struct Args {
    /// JSON file with an array of registry auth declarations
    #[arg(
        long = "declarations",
        short = 'd',
        help = "Path to a JSON file containing an array of registry auth declarations"
    )]
    pub declarations: Option<String>,

    /// Registry address for a single inline declaration
    #[arg(
        long = "address",
        short = 'a',
        help = "Registry address, e.g. ghcr.io or registry.example.com:5000"
    )]
    pub address: Option<String>,

    /// Registry username
    #[arg(
        long = "username",
        short = 'u',
        requires = "address",
        help = "Username for the registry given with --address"
    )]
    pub username: Option<String>,

    /// Registry password
    #[arg(
        long = "password",
        short = 'p',
        requires = "address",
        help = "Password for the registry given with --address"
    )]
    pub password: Option<String>,

    /// Docker credentials file
    #[arg(
        long = "config-file",
        short = 'c',
        requires = "address",
        help = "Docker config file to read credentials for --address from"
    )]
    pub config_file: Option<String>,

    /// Output format
    #[arg(
        long = "output",
        short = 'o',
        default_value = "text",
        help = "Output format: text, json, header"
    )]
    pub output: String,

    /// Do not fill omitted fields from the environment or the default config file
    #[arg(long = "no-defaults", help = "Do not apply DOCKER_REGISTRY_USER, DOCKER_REGISTRY_PASS, DOCKER_CONFIG or ~/.docker/config.json defaults")]
    pub no_defaults: bool,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    /// Quiet mode
    #[arg(long = "quiet", short = 'q', conflicts_with = "verbose", help = "Only print the result")]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<()> {
        if self.declarations.is_none() && self.address.is_none() {
            return Err(AuthError::Validation(
                "no registry declared: pass --address or --declarations".to_string(),
            ));
        }

        match self.output.as_str() {
            "text" | "json" | "header" => {}
            _ => {
                return Err(AuthError::Validation(
                    "Output format must be one of: text, json, header".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The declaration given directly on the command line, if any
    pub fn inline_block(&self) -> Option<AuthBlock> {
        self.address.as_ref().map(|address| AuthBlock {
            address: address.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            config_file: self.config_file.clone(),
        })
    }
}
