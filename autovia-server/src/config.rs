//! CLI arguments and optional TOML configuration.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use autovia_core::weights::SpeedDefaults;

#[derive(Parser, Debug)]
#[command(
    name = "autovia-server",
    about = "Fastest-route HTTP service over a road network"
)]
pub struct Args {
    /// Path to a TOML configuration file; CLI flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// CSV table of road nodes (id,lon,lat)
    #[arg(long)]
    pub nodes: Option<PathBuf>,

    /// CSV table of directed road edges (from,to,length,speed,class)
    #[arg(long)]
    pub edges: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Directory with the front-end map UI, served under /web
    #[arg(long)]
    pub web_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    listen: Option<SocketAddr>,
    nodes: Option<PathBuf>,
    edges: Option<PathBuf>,
    web_dir: Option<PathBuf>,
    /// Last-resort fallback speed in km/h for edges without a speed
    default_speed_kph: Option<f64>,
    /// Per-road-class fallback speed overrides, km/h
    class_speeds: HashMap<String, f64>,
}

/// Fully resolved server configuration.
#[derive(Debug)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub nodes: PathBuf,
    pub edges: PathBuf,
    pub web_dir: Option<PathBuf>,
    pub speeds: SpeedDefaults,
}

impl ServerConfig {
    /// Merges the CLI arguments with the optional config file.
    ///
    /// # Errors
    ///
    /// Fails when the config file cannot be read or parsed, or when the
    /// node/edge table paths are missing from both sources.
    pub fn resolve(args: Args) -> Result<Self, Box<dyn std::error::Error>> {
        let file = match &args.config {
            Some(path) => toml::from_str::<FileConfig>(&std::fs::read_to_string(path)?)?,
            None => FileConfig::default(),
        };

        let nodes = args
            .nodes
            .or(file.nodes)
            .ok_or("no node table given (--nodes or `nodes` in the config file)")?;
        let edges = args
            .edges
            .or(file.edges)
            .ok_or("no edge table given (--edges or `edges` in the config file)")?;

        let mut speeds = SpeedDefaults::default();
        if let Some(fallback) = file.default_speed_kph {
            speeds.set_fallback(fallback);
        }
        for (class, speed) in &file.class_speeds {
            speeds.set_class_speed(class, *speed);
        }

        Ok(Self {
            listen: args
                .listen
                .or(file.listen)
                .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000))),
            nodes,
            edges,
            web_dir: args.web_dir.or(file.web_dir),
            speeds,
        })
    }
}
