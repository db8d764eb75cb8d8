use crate::profile::Target;
use clap::{Parser, Subcommand};

/// COESI Platform CLI - deploy and manage the docker compose stack.
#[derive(Parser, Debug)]
#[command(name = "coesi", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the development environment (localhost only)
    Dev {
        /// Dev deployments do not take an IP; passing one is an error
        ip: Option<String>,
    },

    /// Deploy the production environment, optionally updating its IP first
    Prod {
        /// IP address to deploy against (rewrites PRODUCTION_IP in .env.prod)
        ip: Option<String>,
    },

    /// Restart services without rebuilding
    Restart {
        /// Profile to restart (dev, prod, or all)
        #[arg(default_value = "all")]
        profile: Target,
    },

    /// Stop services
    Stop {
        /// Profile to stop (dev, prod, or all)
        #[arg(default_value = "all")]
        profile: Target,
    },

    /// Show service status
    Status {
        /// Profile to inspect (dev, prod, or all)
        #[arg(default_value = "all")]
        profile: Target,
    },

    /// View service logs
    Logs {
        /// Service to show logs for (all services when omitted)
        service: Option<String>,

        /// Follow log output
        #[arg(short, long)]
        follow: bool,
    },

    /// Remove containers, networks and volumes
    Clean {
        /// Profile to clean (dev, prod, or all)
        #[arg(default_value = "all")]
        profile: Target,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change the production IP in .env.prod without deploying
    Ip {
        /// New IP address for the production environment
        address: String,
    },
}
